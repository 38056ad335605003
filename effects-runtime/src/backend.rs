//! # Backend 模块
//!
//! 采集源与渲染后端的协作接口。
//!
//! ## 设计说明
//!
//! - 采集（摄像头获取、设备切换、权限）不归本 crate 管，只通过 [`FrameSource`] 提供帧
//! - 真实的 AR / 美颜渲染后端消费 [`CompositedStyle`] 与原始帧产出像素；
//!   此处用 [`LoggingBackend`] 打桩，只记录调用
//! - 帧到达与样式重算之间没有同步要求：总是把最新样式套用到下一帧

use serde::Serialize;
use tracing::info;

use crate::compositor::CompositedStyle;

/// 帧元数据（不携带像素）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Frame {
    /// 帧序号（从 0 开始）
    pub sequence: u64,
    /// 采集时间戳（毫秒）
    pub timestamp_ms: u64,
    pub width: u32,
    pub height: u32,
}

/// 采集源
pub trait FrameSource {
    /// 获取下一帧；采集结束时返回 `None`
    fn next_frame(&mut self) -> Option<Frame>;
}

/// 渲染后端
pub trait RenderBackend {
    /// 把样式套用到帧上并呈现
    fn present(&mut self, frame: &Frame, style: &CompositedStyle);
}

/// 合成帧源：按固定帧率产出递增的帧元数据
#[derive(Debug, Clone)]
pub struct SyntheticFrameSource {
    width: u32,
    height: u32,
    fps: u32,
    next_sequence: u64,
    limit: Option<u64>,
}

impl SyntheticFrameSource {
    pub fn new(width: u32, height: u32, fps: u32) -> Self {
        Self {
            width,
            height,
            fps: fps.max(1),
            next_sequence: 0,
            limit: None,
        }
    }

    /// 限制总帧数
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl FrameSource for SyntheticFrameSource {
    fn next_frame(&mut self) -> Option<Frame> {
        if self.limit.is_some_and(|limit| self.next_sequence >= limit) {
            return None;
        }
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        Some(Frame {
            sequence,
            timestamp_ms: sequence * 1000 / u64::from(self.fps),
            width: self.width,
            height: self.height,
        })
    }
}

/// 已呈现帧的记录
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Presented {
    pub frame: Frame,
    pub style: CompositedStyle,
}

/// 打桩渲染后端：统计呈现次数、保留最后一帧并输出日志
///
/// 默认不保存历史，长时间回放时内存占用恒定；
/// 需要逐帧断言时用 [`LoggingBackend::with_history`] 开启记录。
#[derive(Debug, Default)]
pub struct LoggingBackend {
    frame_count: u64,
    last: Option<Presented>,
    history: Option<Vec<Presented>>,
}

impl LoggingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录每一次呈现
    pub fn with_history() -> Self {
        Self {
            history: Some(Vec::new()),
            ..Self::default()
        }
    }

    /// 已呈现的帧数
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// 历史记录（未开启时为空）
    pub fn presented(&self) -> &[Presented] {
        self.history.as_deref().unwrap_or(&[])
    }

    pub fn last(&self) -> Option<&Presented> {
        self.last.as_ref()
    }
}

impl RenderBackend for LoggingBackend {
    fn present(&mut self, frame: &Frame, style: &CompositedStyle) {
        info!(
            sequence = frame.sequence,
            timestamp_ms = frame.timestamp_ms,
            filter = %style.visual_filter,
            transform = %style.transform,
            overlay_color = ?style.overlay_color,
            overlay_glyph = ?style.overlay_glyph,
            "呈现帧"
        );
        self.frame_count += 1;
        let presented = Presented {
            frame: *frame,
            style: style.clone(),
        };
        if let Some(history) = &mut self.history {
            history.push(presented.clone());
        }
        self.last = Some(presented);
    }
}
