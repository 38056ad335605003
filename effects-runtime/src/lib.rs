//! # Effects Runtime
//!
//! 拍摄流程中实时相机特效的配置与合成核心库。
//!
//! ## 架构概述
//!
//! `effects-runtime` 是纯逻辑核心，不依赖任何摄像头、渲染引擎或网络。
//! 它通过 **事件驱动模式** 与表现层通信：
//!
//! ```text
//! Presentation                  Runtime
//!   │                              │
//!   │──── EffectInput ───────────►│
//!   │                              │ SessionState 变更
//!   │◄─── CompositedStyle ────────│ Compositor 重算
//!   │                              │
//! ```
//!
//! ## 核心类型
//!
//! - [`Catalog`]：特效分类与条目的静态目录
//! - [`SessionState`]：当前分类、当前条目、参数集与对比标志
//! - [`Compositor`]：会话状态到 [`CompositedStyle`] 的无状态变换
//! - [`EffectsController`]：独占会话、在每个事件后重算样式
//!
//! ## 使用示例
//!
//! ```ignore
//! use effects_runtime::{EffectCategory, EffectInput, SessionState, compose};
//!
//! let mut session = SessionState::with_builtin_catalog();
//! session.apply(&EffectInput::category(EffectCategory::Filter))?;
//! session.apply(&EffectInput::item("vintage"))?;
//!
//! let style = compose(&session, false);
//! assert_eq!(style.visual_filter, "sepia(0.6)");
//! ```
//!
//! ## 模块结构
//!
//! - [`catalog`]：分类、条目、目录校验
//! - [`params`]：参数集
//! - [`session`]：会话状态与操作
//! - [`input`]：手势事件与手势脚本
//! - [`compositor`]：合成器
//! - [`controller`]：控制器
//! - [`backend`]：采集源 / 渲染后端接口与打桩实现
//! - [`error`]：错误类型定义

pub mod backend;
pub mod catalog;
pub mod compositor;
pub mod controller;
pub mod error;
pub mod input;
pub mod params;
pub mod session;

// 重导出核心类型
pub use backend::{Frame, FrameSource, LoggingBackend, Presented, RenderBackend, SyntheticFrameSource};
pub use catalog::{Catalog, CategoryKind, EffectCategory, EffectItem, ItemPayload, MAX_VALUE};
pub use compositor::{CompositedStyle, Compositor, CompositorConfig, compose};
pub use controller::EffectsController;
pub use error::{CatalogError, EffectsError, EffectsResult, ScriptError, SessionError};
pub use input::{EffectInput, parse_script};
pub use params::{ParameterSet, Selection, clamp_value};
pub use session::{ActiveEntry, SessionState};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_accessible() {
        // 验证所有公共类型都可以正常使用
        let _input = EffectInput::category(EffectCategory::Beauty);

        let session = SessionState::with_builtin_catalog();

        let _style = compose(&session, false);

        let _controller = EffectsController::new(
            Catalog::global(),
            CompositorConfig::default(),
            true,
        );
    }
}
