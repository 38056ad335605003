//! # Input 模块
//!
//! 定义表现层向会话传递的手势事件。
//!
//! ## 设计说明
//!
//! - 每个事件一一对应一个会话操作
//! - 会话不直接处理触摸/鼠标/键盘事件，只处理语义化的输入
//! - 对比手势抽象为 begin/end 一对事件，按下/松开、键盘按住等都映射到这两者
//!
//! ## 手势脚本
//!
//! 录制的手势序列可以用两种格式保存，由 [`parse_script`] 解析：
//!
//! - JSON 数组：`[{"type": "reset"}, ...]`
//! - JSON Lines：每行一个事件，空行与 `#` 开头的行被忽略

use serde::{Deserialize, Serialize};

use crate::catalog::EffectCategory;
use crate::error::ScriptError;

/// 手势事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EffectInput {
    /// 点击分类标签
    SelectCategory { category: EffectCategory },

    /// 点击当前分类下的条目
    SelectItem { id: String },

    /// 拖动滑杆（未夹取的原始值）
    SetValue { value: i32 },

    /// 按下对比
    BeginCompare,

    /// 松开对比
    EndCompare,

    /// 点击重置
    Reset,
}

impl EffectInput {
    pub fn category(category: EffectCategory) -> Self {
        Self::SelectCategory { category }
    }

    pub fn item(id: impl Into<String>) -> Self {
        Self::SelectItem { id: id.into() }
    }

    pub fn value(value: i32) -> Self {
        Self::SetValue { value }
    }

    /// 事件名（用于日志）
    pub fn name(&self) -> &'static str {
        match self {
            Self::SelectCategory { .. } => "select_category",
            Self::SelectItem { .. } => "select_item",
            Self::SetValue { .. } => "set_value",
            Self::BeginCompare => "begin_compare",
            Self::EndCompare => "end_compare",
            Self::Reset => "reset",
        }
    }
}

/// 解析手势脚本
///
/// 首个非空白字符为 `[` 时按 JSON 数组解析，否则按 JSON Lines 逐行解析。
pub fn parse_script(text: &str) -> Result<Vec<EffectInput>, ScriptError> {
    let trimmed = text.trim_start();
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).map_err(|e| ScriptError::Array {
            message: e.to_string(),
        });
    }

    text.lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line, json)| {
            serde_json::from_str(json).map_err(|e| ScriptError::Line {
                line,
                message: e.to_string(),
            })
        })
        .collect()
}
