//! # Controller 模块
//!
//! 拍摄流程中的特效控制器：独占会话状态，在每个手势事件后重算合成样式。
//!
//! ## 执行模型
//!
//! ```text
//! EffectInput ──► handle() ──► SessionState 变更 ──► Compositor ──► latest style
//!                                                                  │
//! FrameSource ──► render_next_frame() ─────────────────────────────┴──► RenderBackend
//! ```
//!
//! 所有操作都在同一事件线程上同步完成，不挂起、不加锁。

use std::sync::Arc;
use tracing::debug;

use crate::backend::{Frame, FrameSource, RenderBackend};
use crate::catalog::Catalog;
use crate::compositor::{CompositedStyle, Compositor, CompositorConfig};
use crate::error::SessionError;
use crate::input::EffectInput;
use crate::session::SessionState;

/// 特效控制器
#[derive(Debug, Clone)]
pub struct EffectsController {
    session: SessionState,
    compositor: Compositor,
    mirrored: bool,
    style: CompositedStyle,
}

impl EffectsController {
    /// 创建控制器
    ///
    /// `mirrored` 对应当前采集设备（前置摄像头通常镜像）。
    pub fn new(catalog: Arc<Catalog>, config: CompositorConfig, mirrored: bool) -> Self {
        let session = SessionState::new(catalog);
        let compositor = Compositor::new(config);
        let style = compositor.compose(&session, mirrored);
        Self {
            session,
            compositor,
            mirrored,
            style,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn is_mirrored(&self) -> bool {
        self.mirrored
    }

    /// 最新合成样式
    pub fn style(&self) -> &CompositedStyle {
        &self.style
    }

    /// 处理一个手势事件并重算样式
    ///
    /// 事件被拒绝时会话不变，样式保持上一次结果。
    pub fn handle(&mut self, input: &EffectInput) -> Result<&CompositedStyle, SessionError> {
        self.session.apply(input)?;
        self.recompose();
        debug!(input = input.name(), "样式已更新");
        Ok(&self.style)
    }

    /// 切换镜像（切换前后摄像头时由采集层通知）
    pub fn set_mirrored(&mut self, mirrored: bool) {
        if self.mirrored != mirrored {
            self.mirrored = mirrored;
            self.recompose();
        }
    }

    /// 取下一帧并套用最新样式；采集源无帧时返回 `None`
    pub fn render_next_frame(
        &self,
        source: &mut impl FrameSource,
        backend: &mut impl RenderBackend,
    ) -> Option<Frame> {
        let frame = source.next_frame()?;
        backend.present(&frame, &self.style);
        Some(frame)
    }

    fn recompose(&mut self) {
        self.style = self.compositor.compose(&self.session, self.mirrored);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{LoggingBackend, SyntheticFrameSource};
    use crate::catalog::EffectCategory;

    fn controller(mirrored: bool) -> EffectsController {
        EffectsController::new(
            Arc::new(Catalog::builtin()),
            CompositorConfig::default(),
            mirrored,
        )
    }

    #[test]
    fn test_initial_style() {
        assert!(controller(false).style().is_identity());
        assert_eq!(controller(true).style().transform, "scaleX(-1)");
    }

    #[test]
    fn test_handle_recomputes_style() {
        let mut c = controller(false);
        c.handle(&EffectInput::category(EffectCategory::Filter))
            .unwrap();
        let style = c.handle(&EffectInput::item("vivid")).unwrap();
        assert_eq!(style.visual_filter, "saturate(1.6)");

        c.handle(&EffectInput::BeginCompare).unwrap();
        assert_eq!(c.style().visual_filter, "");
        c.handle(&EffectInput::EndCompare).unwrap();
        assert_eq!(c.style().visual_filter, "saturate(1.6)");
    }

    #[test]
    fn test_rejected_input_keeps_style() {
        let mut c = controller(false);
        c.handle(&EffectInput::category(EffectCategory::Sticker))
            .unwrap();
        c.handle(&EffectInput::item("cat")).unwrap();
        let before = c.style().clone();

        assert!(c.handle(&EffectInput::value(30)).is_err());
        assert!(c.handle(&EffectInput::item("ghost")).is_err());
        assert_eq!(c.style(), &before);
    }

    #[test]
    fn test_set_mirrored() {
        let mut c = controller(false);
        c.set_mirrored(true);
        assert_eq!(c.style().transform, "scaleX(-1)");
        c.set_mirrored(false);
        assert_eq!(c.style().transform, "");
    }

    #[test]
    fn test_latest_style_applied_to_next_frame() {
        let mut c = controller(true);
        let mut source = SyntheticFrameSource::new(720, 1280, 30).with_limit(2);
        let mut backend = LoggingBackend::with_history();

        c.render_next_frame(&mut source, &mut backend).unwrap();
        c.handle(&EffectInput::category(EffectCategory::Makeup))
            .unwrap();
        c.handle(&EffectInput::item("rose")).unwrap();
        c.render_next_frame(&mut source, &mut backend).unwrap();
        assert!(c.render_next_frame(&mut source, &mut backend).is_none());

        let presented = backend.presented();
        assert_eq!(presented.len(), 2);
        assert_eq!(presented[0].style.overlay_color, None);
        assert_eq!(presented[1].style.overlay_color.as_deref(), Some("#e8466c"));
    }
}
