//! # Config 模块
//!
//! headless 宿主的运行配置。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (config.json)
//! 3. 默认值（最低）

use effects_runtime::{Catalog, CatalogError, CompositorConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// 宿主配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudioConfig {
    /// 自定义目录 JSON 路径；未配置时使用内置目录
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    /// 是否镜像（前置摄像头）
    #[serde(default = "default_mirrored")]
    pub mirrored: bool,

    /// 日志级别（trace/debug/info/warn/error）
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// 合成帧源配置
    #[serde(default)]
    pub frame: FrameConfig,

    /// 合成器配置
    #[serde(default)]
    pub compositor: CompositorConfig,
}

/// 合成帧源配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameConfig {
    #[serde(default = "default_frame_width")]
    pub width: u32,

    #[serde(default = "default_frame_height")]
    pub height: u32,

    #[serde(default = "default_fps")]
    pub fps: u32,
}

// 默认值函数
fn default_mirrored() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_frame_width() -> u32 {
    720
}

fn default_frame_height() -> u32 {
    1280
}

fn default_fps() -> u32 {
    30
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            mirrored: default_mirrored(),
            log_level: default_log_level(),
            frame: FrameConfig::default(),
            compositor: CompositorConfig::default(),
        }
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            width: default_frame_width(),
            height: default_frame_height(),
            fps: default_fps(),
        }
    }
}

impl StudioConfig {
    /// 加载配置文件
    ///
    /// 文件不存在时使用默认配置（`config.json` 是可选的）；
    /// 文件存在但无法读取或解析时报错，而不是悄悄回退到默认值。
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&content)
            .map_err(|e| ConfigError::ParseFailed(format!("{}: {e}", path.display())))
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        fs::write(path, json).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.catalog_path {
            if !path.exists() {
                return Err(ConfigError::ValidationFailed(format!(
                    "目录文件不存在: {:?}",
                    path
                )));
            }
        }

        if self.log_level.parse::<tracing::Level>().is_err() {
            return Err(ConfigError::ValidationFailed(format!(
                "无效的日志级别: {}",
                self.log_level
            )));
        }

        if self.frame.width == 0 || self.frame.height == 0 {
            return Err(ConfigError::ValidationFailed(
                "帧尺寸必须大于 0".to_string(),
            ));
        }

        if !(1..=240).contains(&self.frame.fps) {
            return Err(ConfigError::ValidationFailed(
                "帧率必须在 1 - 240 之间".to_string(),
            ));
        }

        self.compositor
            .validate()
            .map_err(|e| ConfigError::ValidationFailed(e.to_string()))?;

        Ok(())
    }

    /// 加载目录：配置了路径则读取并校验，否则使用内置目录
    ///
    /// 同时检查合成器配置引用的条目在目录中存在。
    pub fn load_catalog(&self) -> Result<Arc<Catalog>, ConfigError> {
        let catalog = match &self.catalog_path {
            Some(path) => {
                let json =
                    fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
                Arc::new(Catalog::from_json(&json)?)
            }
            None => Catalog::global(),
        };

        self.compositor
            .validate_against(&catalog)
            .map_err(|e| ConfigError::ValidationFailed(e.to_string()))?;
        Ok(catalog)
    }
}

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 序列化失败
    #[error("配置序列化失败: {0}")]
    SerializationFailed(String),

    /// 配置文件解析失败
    #[error("配置文件解析失败: {0}")]
    ParseFailed(String),

    /// IO 错误
    #[error("配置 IO 错误: {0}")]
    IoError(String),

    /// 验证失败
    #[error("配置验证失败: {0}")]
    ValidationFailed(String),

    /// 目录无效
    #[error("目录无效: {0}")]
    Catalog(#[from] CatalogError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StudioConfig::default();
        assert!(config.mirrored);
        assert_eq!(config.frame.fps, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = StudioConfig::load(dir.path().join("missing.json")).unwrap();
        assert_eq!(config.log_level, "info");
        assert!(config.mirrored);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = StudioConfig::default();
        config.mirrored = false;
        config.frame.fps = 60;
        config.compositor.slim_face_coefficient = 0.002;
        config.save(&path).unwrap();

        let loaded = StudioConfig::load(&path).unwrap();
        assert!(!loaded.mirrored);
        assert_eq!(loaded.frame.fps, 60);
        assert_eq!(loaded.compositor.slim_face_coefficient, 0.002);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ mirrored: ").unwrap();

        let err = StudioConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseFailed(_)));
        assert!(err.to_string().contains("config.json"), "{err}");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "mirrored": false, "frame": { "fps": 24 } }"#).unwrap();

        let config = StudioConfig::load(&path).unwrap();
        assert!(!config.mirrored);
        assert_eq!(config.frame.fps, 24);
        assert_eq!(config.frame.width, 720);
        assert_eq!(config.compositor, CompositorConfig::default());
    }

    #[test]
    fn test_config_validation() {
        let mut config = StudioConfig::default();

        config.log_level = "loud".to_string();
        assert!(config.validate().is_err());

        config.log_level = "debug".to_string();
        config.frame.fps = 0;
        assert!(config.validate().is_err());

        config.frame.fps = 30;
        config.compositor.precision = 99;
        assert!(config.validate().is_err());

        config.compositor.precision = 3;
        config.catalog_path = Some(PathBuf::from("/definitely/not/here.json"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_catalog_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(&path, Catalog::builtin().to_json_pretty().unwrap()).unwrap();

        let config = StudioConfig {
            catalog_path: Some(path.clone()),
            ..Default::default()
        };
        assert_eq!(*config.load_catalog().unwrap(), Catalog::builtin());

        fs::write(&path, r#"{ "beauty": [] }"#).unwrap();
        assert!(matches!(
            config.load_catalog(),
            Err(ConfigError::Catalog(_))
        ));
    }

    #[test]
    fn test_load_catalog_checks_slim_face_item() {
        let mut config = StudioConfig::default();
        config.compositor.slim_face_item = "thinFace".to_string();
        assert!(config.validate().is_ok());

        let err = config.load_catalog().unwrap_err();
        assert!(matches!(err, ConfigError::ValidationFailed(_)));
        assert!(err.to_string().contains("thinFace"), "{err}");
    }
}
