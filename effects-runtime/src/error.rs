//! # Error 模块
//!
//! 定义 effects-runtime 中使用的错误类型。

use thiserror::Error;

use crate::catalog::EffectCategory;

/// 会话操作错误
///
/// 三种错误都是调用方的契约违例：表现层只应发出由 Catalog 自身声明的 id 构造的事件。
/// 被拒绝的操作不会修改任何状态。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    /// 未知分类
    #[error("未知分类 '{name}'")]
    UnknownCategory { name: String },

    /// 分类下不存在该条目
    #[error("分类 {category} 中不存在条目 '{id}'")]
    UnknownItem { category: EffectCategory, id: String },

    /// 当前分类不支持此操作
    #[error("分类 {category} 不支持操作 {operation}")]
    InvalidOperationForCategory {
        category: EffectCategory,
        operation: &'static str,
    },
}

/// Catalog 校验错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// 分类缺失或为空
    #[error("分类 {category} 没有任何条目")]
    EmptyCategory { category: EffectCategory },

    /// 同一分类下 id 重复
    #[error("分类 {category} 中条目 id '{id}' 重复")]
    DuplicateItem { category: EffectCategory, id: String },

    /// 可选分类的第一个条目不是哨兵条目
    #[error("分类 {category} 的第一个条目必须是空选项，实际为 '{id}'")]
    MissingSentinel { category: EffectCategory, id: String },

    /// 哨兵条目出现在非首位
    #[error("分类 {category} 中空选项 '{id}' 只能位于首位")]
    MisplacedSentinel { category: EffectCategory, id: String },

    /// 默认值超出范围
    #[error("条目 '{id}' 的默认值 {value} 超出范围 0..=100")]
    DefaultOutOfRange { id: String, value: u8 },

    /// 条目载荷与所属分类不匹配
    #[error("条目 '{id}' 的载荷类型与分类 {category} 不匹配")]
    PayloadMismatch { category: EffectCategory, id: String },

    /// JSON 解析失败
    #[error("Catalog 解析失败: {message}")]
    Parse { message: String },
}

/// 手势脚本解析错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScriptError {
    /// JSON 数组格式整体解析失败
    #[error("解析 JSON 数组脚本失败: {message}")]
    Array { message: String },

    /// JSON Lines 格式中某一行无效（行号从 1 开始）
    #[error("第 {line} 行：无效的事件: {message}")]
    Line { line: usize, message: String },
}

/// effects-runtime 统一错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EffectsError {
    /// 会话错误
    #[error("会话错误: {0}")]
    Session(#[from] SessionError),

    /// Catalog 错误
    #[error("Catalog 错误: {0}")]
    Catalog(#[from] CatalogError),

    /// 脚本错误
    #[error("脚本错误: {0}")]
    Script(#[from] ScriptError),

    /// 配置错误
    #[error("配置错误: {message}")]
    Config { message: String },
}

/// Result 类型别名
pub type EffectsResult<T> = Result<T, EffectsError>;
