//! 手势脚本回放。
//!
//! 脚本格式见 [`effects_runtime::parse_script`]。每个事件后向输出写一行 [`StepReport`]，
//! 再按配置的帧源呈现若干帧。

use anyhow::Context;
use effects_runtime::{
    CompositedStyle, EffectInput, EffectsController, LoggingBackend, SyntheticFrameSource,
    parse_script,
};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::warn;

use crate::config::FrameConfig;

/// 读取脚本文件
pub fn load_script(path: &Path) -> anyhow::Result<Vec<EffectInput>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("无法读取脚本: {}", path.display()))?;
    parse_script(&text).with_context(|| format!("无效的脚本: {}", path.display()))
}

/// 单步回放结果（每个事件输出一行 JSON）
#[derive(Debug, Serialize)]
pub struct StepReport<'a> {
    pub step: usize,
    pub input: &'a EffectInput,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<&'a CompositedStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// 回放参数
#[derive(Debug, Clone, Copy)]
pub struct ReplayOptions {
    /// 每个事件后呈现的帧数
    pub frames: u32,
    /// 遇到被拒绝的事件立即失败
    pub strict: bool,
}

/// 回放统计
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub events: usize,
    pub rejected: usize,
    pub frames: u64,
}

/// 回放事件
///
/// 非严格模式下被拒绝的事件写出带 `error` 的报告并继续；
/// 严格模式下在第一个被拒绝的事件处返回错误，之前的报告已写出。
pub fn replay(
    controller: &mut EffectsController,
    frame: &FrameConfig,
    inputs: &[EffectInput],
    options: ReplayOptions,
    out: &mut impl Write,
) -> anyhow::Result<ReplaySummary> {
    let mut source = SyntheticFrameSource::new(frame.width, frame.height, frame.fps);
    let mut backend = LoggingBackend::new();
    let mut rejected = 0usize;

    for (step, input) in inputs.iter().enumerate() {
        let report = match controller.handle(input) {
            Ok(style) => StepReport {
                step,
                input,
                style: Some(style),
                error: None,
            },
            Err(e) => {
                if options.strict {
                    anyhow::bail!("第 {step} 个事件被拒绝: {e}");
                }
                warn!(step, error = %e, "事件被拒绝，继续回放");
                rejected += 1;
                StepReport {
                    step,
                    input,
                    style: None,
                    error: Some(e.to_string()),
                }
            }
        };
        serde_json::to_writer(&mut *out, &report)?;
        writeln!(out)?;

        for _ in 0..options.frames {
            controller.render_next_frame(&mut source, &mut backend);
        }
    }

    Ok(ReplaySummary {
        events: inputs.len(),
        rejected,
        frames: backend.frame_count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use effects_runtime::{Catalog, CompositorConfig, EffectCategory};

    /// 第 3 个事件在滤镜分类上调滑杆，必然被拒绝
    fn script_with_rejection() -> Vec<EffectInput> {
        vec![
            EffectInput::category(EffectCategory::Filter),
            EffectInput::item("vintage"),
            EffectInput::value(40),
            EffectInput::category(EffectCategory::Reshape),
            EffectInput::value(40),
        ]
    }

    fn controller() -> EffectsController {
        EffectsController::new(Catalog::global(), CompositorConfig::default(), true)
    }

    fn lines(out: &[u8]) -> Vec<serde_json::Value> {
        std::str::from_utf8(out)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_step_report_shape() {
        let input = EffectInput::value(150);
        let report = StepReport {
            step: 3,
            input: &input,
            style: None,
            error: Some("rejected".to_string()),
        };
        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(
            json,
            r#"{"step":3,"input":{"type":"set_value","value":150},"error":"rejected"}"#
        );
    }

    #[test]
    fn test_replay_continues_past_rejection() {
        let mut c = controller();
        let mut out = Vec::new();
        let options = ReplayOptions {
            frames: 2,
            strict: false,
        };
        let summary = replay(
            &mut c,
            &FrameConfig::default(),
            &script_with_rejection(),
            options,
            &mut out,
        )
        .unwrap();

        assert_eq!(
            summary,
            ReplaySummary {
                events: 5,
                rejected: 1,
                frames: 10,
            }
        );

        let reports = lines(&out);
        assert_eq!(reports.len(), 5);
        assert_eq!(reports[1]["style"]["visualFilter"], "sepia(0.6)");
        assert!(reports[2].get("style").is_none());
        assert_eq!(reports[2]["error"], "分类 filter 不支持操作 set_value");
        assert_eq!(
            reports[4]["style"]["transform"],
            "scaleX(-1) scaleX(0.960)"
        );
        assert_eq!(c.style().transform, "scaleX(-1) scaleX(0.960)");
    }

    #[test]
    fn test_replay_strict_stops_at_rejection() {
        let mut c = controller();
        let mut out = Vec::new();
        let options = ReplayOptions {
            frames: 1,
            strict: true,
        };
        let err = replay(
            &mut c,
            &FrameConfig::default(),
            &script_with_rejection(),
            options,
            &mut out,
        )
        .unwrap_err();

        assert!(err.to_string().starts_with("第 2 个事件被拒绝"), "{err}");
        // 被拒绝前的报告已写出，之后的事件没有执行
        assert_eq!(lines(&out).len(), 2);
        assert_eq!(c.session().active_category(), EffectCategory::Filter);
    }

    #[test]
    fn test_replay_without_frames() {
        let mut c = controller();
        let mut out = Vec::new();
        let options = ReplayOptions {
            frames: 0,
            strict: true,
        };
        let summary = replay(
            &mut c,
            &FrameConfig::default(),
            &[EffectInput::Reset],
            options,
            &mut out,
        )
        .unwrap();
        assert_eq!(summary.frames, 0);
        assert_eq!(summary.events, 1);
    }

    #[test]
    fn test_load_script_reports_path_and_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jsonl");
        std::fs::write(&path, "{\"type\":\"reset\"}\n{\"type\":\"wave\"}\n").unwrap();

        let err = load_script(&path).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("broken.jsonl"), "{message}");
        assert!(message.contains("第 2 行"), "{message}");
    }
}
