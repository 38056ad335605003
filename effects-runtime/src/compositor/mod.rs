//! # Compositor 模块（会话状态 → 渲染描述）
//!
//! 把会话中的全部特效参数收敛为一个 [`CompositedStyle`]，交给视频呈现层套用到当前帧。
//!
//! ## 核心组件
//!
//! - [`Compositor`]：持有只读配置的无状态变换
//! - [`compose`]：使用默认配置的便捷入口
//! - [`CompositorConfig`]：呈现调校常量
//!
//! ## 映射规则
//!
//! | 输出 | 来源 | 对比模式 |
//! |------|------|----------|
//! | `visual_filter` | filter 分类当前选择的样式；空选项为空串 | 空串 |
//! | `transform` | 镜像变换 + 瘦脸缩放（数值 > 0 时） | 只保留镜像 |
//! | `overlay_color` | makeup 分类当前选择的颜色 | `None` |
//! | `overlay_glyph` | sticker 分类当前选择的字形 | `None` |
//!
//! 相同输入总是得到逐字节相同的输出：没有隐藏状态、随机数或 IO。

mod config;
mod style;

pub use config::CompositorConfig;
pub use style::CompositedStyle;

use crate::catalog::{EffectCategory, ItemPayload};
use crate::params::ParameterSet;
use crate::session::SessionState;

/// 合成器
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compositor {
    config: CompositorConfig,
}

impl Compositor {
    pub fn new(config: CompositorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompositorConfig {
        &self.config
    }

    /// 从会话状态推导渲染描述
    ///
    /// 参数集缺键属于会话层的契约违例；这里按空选项 / 0 处理，不会失败。
    pub fn compose(&self, session: &SessionState, is_mirrored: bool) -> CompositedStyle {
        let params = session.params();

        if session.is_comparing() {
            return CompositedStyle {
                transform: self.transform(is_mirrored, None),
                ..Default::default()
            };
        }

        let visual_filter = match selected_payload(params, EffectCategory::Filter) {
            Some(ItemPayload::Filter { style: Some(style) }) => style.clone(),
            _ => String::new(),
        };
        let overlay_color = match selected_payload(params, EffectCategory::Makeup) {
            Some(ItemPayload::Makeup { color }) => color.clone(),
            _ => None,
        };
        let overlay_glyph = match selected_payload(params, EffectCategory::Sticker) {
            Some(ItemPayload::Sticker { glyph }) => glyph.clone(),
            _ => None,
        };
        let slim_face = params
            .value(EffectCategory::Reshape, &self.config.slim_face_item)
            .filter(|v| *v > 0);

        CompositedStyle {
            visual_filter,
            transform: self.transform(is_mirrored, slim_face),
            overlay_color,
            overlay_glyph,
        }
    }

    fn transform(&self, is_mirrored: bool, slim_face: Option<u8>) -> String {
        let mut terms = Vec::with_capacity(2);
        if is_mirrored {
            terms.push(self.config.mirror_transform.clone());
        }
        if let Some(value) = slim_face {
            let scale = 1.0 - f64::from(value) * self.config.slim_face_coefficient;
            terms.push(format!("scaleX({:.*})", self.config.precision, scale));
        }
        terms.join(" ")
    }
}

fn selected_payload(params: &ParameterSet, category: EffectCategory) -> Option<&ItemPayload> {
    params.selection(category).map(|s| &s.payload)
}

/// 使用默认配置合成
pub fn compose(session: &SessionState, is_mirrored: bool) -> CompositedStyle {
    Compositor::default().compose(session, is_mirrored)
}
