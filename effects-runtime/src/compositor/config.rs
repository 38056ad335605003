//! # Compositor 配置
//!
//! 合成器的呈现调校常量。这些值没有推导依据，只作为配置存在。

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, EffectCategory};
use crate::error::{EffectsError, EffectsResult};

/// 瘦脸系数上限
const MAX_SLIM_FACE_COEFFICIENT: f64 = 0.01;

/// 小数位上限
const MAX_PRECISION: usize = 6;

/// 合成器配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositorConfig {
    /// 瘦脸条目 id（reshape 分类内）
    #[serde(default = "default_slim_face_item")]
    pub slim_face_item: String,

    /// 瘦脸系数：横向缩放量 = 数值 × 系数
    #[serde(default = "default_slim_face_coefficient")]
    pub slim_face_coefficient: f64,

    /// 镜像变换
    #[serde(default = "default_mirror_transform")]
    pub mirror_transform: String,

    /// 缩放量输出的小数位数
    #[serde(default = "default_precision")]
    pub precision: usize,
}

fn default_slim_face_item() -> String {
    "slimFace".to_string()
}

fn default_slim_face_coefficient() -> f64 {
    0.001
}

fn default_mirror_transform() -> String {
    "scaleX(-1)".to_string()
}

fn default_precision() -> usize {
    3
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            slim_face_item: default_slim_face_item(),
            slim_face_coefficient: default_slim_face_coefficient(),
            mirror_transform: default_mirror_transform(),
            precision: default_precision(),
        }
    }
}

impl CompositorConfig {
    /// 验证配置有效性
    pub fn validate(&self) -> EffectsResult<()> {
        if !(self.slim_face_coefficient > 0.0
            && self.slim_face_coefficient <= MAX_SLIM_FACE_COEFFICIENT)
        {
            return Err(EffectsError::Config {
                message: format!(
                    "slim_face_coefficient 必须在 (0, {}] 之间，实际为 {}",
                    MAX_SLIM_FACE_COEFFICIENT, self.slim_face_coefficient
                ),
            });
        }

        if self.precision > MAX_PRECISION {
            return Err(EffectsError::Config {
                message: format!("precision 不能超过 {}", MAX_PRECISION),
            });
        }

        if self.mirror_transform.trim().is_empty() {
            return Err(EffectsError::Config {
                message: "mirror_transform 不能为空".to_string(),
            });
        }

        if self.slim_face_item.is_empty() {
            return Err(EffectsError::Config {
                message: "slim_face_item 不能为空".to_string(),
            });
        }

        Ok(())
    }

    /// 验证配置引用的条目存在于目录中
    ///
    /// 瘦脸条目 id 拼错时瘦脸项会静默失效，因此在加载目录后检查。
    pub fn validate_against(&self, catalog: &Catalog) -> EffectsResult<()> {
        catalog
            .item_by_id(EffectCategory::Reshape, &self.slim_face_item)
            .map_err(|e| EffectsError::Config {
                message: format!("slim_face_item 无效: {e}"),
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CompositorConfig::default();
        assert_eq!(config.slim_face_coefficient, 0.001);
        assert_eq!(config.mirror_transform, "scaleX(-1)");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: CompositorConfig =
            serde_json::from_str(r#"{ "slim_face_coefficient": 0.002 }"#).unwrap();
        assert_eq!(config.slim_face_coefficient, 0.002);
        assert_eq!(config.precision, 3);
        assert_eq!(config.slim_face_item, "slimFace");
    }

    #[test]
    fn test_config_validation() {
        let mut config = CompositorConfig::default();

        config.slim_face_coefficient = 0.0;
        assert!(config.validate().is_err());

        config.slim_face_coefficient = 0.5;
        assert!(config.validate().is_err());

        config.slim_face_coefficient = f64::NAN;
        assert!(config.validate().is_err());

        config.slim_face_coefficient = 0.001;
        config.precision = 12;
        assert!(config.validate().is_err());

        config.precision = 3;
        config.mirror_transform = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_against_catalog() {
        let catalog = Catalog::builtin();
        assert!(CompositorConfig::default().validate_against(&catalog).is_ok());

        let config = CompositorConfig {
            slim_face_item: "slimface".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        let err = config.validate_against(&catalog).unwrap_err();
        assert_eq!(
            err.to_string(),
            "配置错误: slim_face_item 无效: 分类 reshape 中不存在条目 'slimface'"
        );

        // 其他分类中的同名条目不算
        let config = CompositorConfig {
            slim_face_item: "vintage".to_string(),
            ..Default::default()
        };
        assert!(config.validate_against(&catalog).is_err());
    }
}
