//! # Composited Style
//!
//! 合成器输出的渲染描述。只被重新计算，不会被原地修改。

use serde::{Deserialize, Serialize};

/// 合成样式
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositedStyle {
    /// 滤镜样式（空串表示原图）
    pub visual_filter: String,
    /// 变换（空串表示无变换）
    pub transform: String,
    /// 美妆叠加色
    pub overlay_color: Option<String>,
    /// 贴纸字形
    pub overlay_glyph: Option<String>,
}

impl CompositedStyle {
    /// 是否不对画面做任何修改
    pub fn is_identity(&self) -> bool {
        self.visual_filter.is_empty()
            && self.transform.is_empty()
            && self.overlay_color.is_none()
            && self.overlay_glyph.is_none()
    }

    /// 输出为 CSS 声明，供 web 呈现层直接套用到视频元素
    ///
    /// 叠加层以自定义属性给出，由呈现层决定如何绘制。
    pub fn to_css(&self) -> String {
        let mut decls = vec![
            format!("filter: {};", or_none(&self.visual_filter)),
            format!("transform: {};", or_none(&self.transform)),
        ];
        if let Some(color) = &self.overlay_color {
            decls.push(format!("--overlay-color: {};", color));
        }
        if let Some(glyph) = &self.overlay_glyph {
            decls.push(format!("--overlay-glyph: \"{}\";", glyph));
        }
        decls.join(" ")
    }
}

fn or_none(value: &str) -> &str {
    if value.is_empty() { "none" } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        assert!(CompositedStyle::default().is_identity());

        let style = CompositedStyle {
            overlay_glyph: Some("👑".to_string()),
            ..Default::default()
        };
        assert!(!style.is_identity());
    }

    #[test]
    fn test_to_css() {
        assert_eq!(
            CompositedStyle::default().to_css(),
            "filter: none; transform: none;"
        );

        let style = CompositedStyle {
            visual_filter: "sepia(0.6)".to_string(),
            transform: "scaleX(-1)".to_string(),
            overlay_color: Some("#e8466c".to_string()),
            overlay_glyph: Some("🐱".to_string()),
        };
        assert_eq!(
            style.to_css(),
            "filter: sepia(0.6); transform: scaleX(-1); --overlay-color: #e8466c; --overlay-glyph: \"🐱\";"
        );
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_string(&CompositedStyle::default()).unwrap();
        assert_eq!(
            json,
            r#"{"visualFilter":"","transform":"","overlayColor":null,"overlayGlyph":null}"#
        );
    }
}
