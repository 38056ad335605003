//! # Session 模块
//!
//! 一次拍摄流程中的特效会话状态。
//!
//! ## 设计原则
//!
//! - 会话是拍摄流程控制器**独占**的唯一可变状态
//! - 所有修改都经由本模块的操作；操作要么完整生效，要么被整体拒绝
//! - 不持久化：退出拍摄流程即销毁
//!
//! ## 不变量
//!
//! - `active_item` 总是属于 `active_category` 的条目列表
//! - 参数集中的数值键与目录的可调条目一一对应

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::catalog::{Catalog, CategoryKind, EffectCategory, EffectItem, ItemPayload};
use crate::error::SessionError;
use crate::input::EffectInput;
use crate::params::{ParameterSet, clamp_value};

/// 当前条目视图
///
/// 滑杆 / 条目网格按分类语义分别渲染：可调分类显示数值，可选分类显示载荷。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActiveEntry<'a> {
    Adjustable {
        item_id: &'a str,
        value: u8,
    },
    Selectable {
        item_id: &'a str,
        payload: &'a ItemPayload,
        /// 该条目是否为分类当前生效的选择
        selected: bool,
    },
}

/// 特效会话状态
#[derive(Debug, Clone)]
pub struct SessionState {
    catalog: Arc<Catalog>,
    active_category: EffectCategory,
    active_item: String,
    params: ParameterSet,
    comparing: bool,
}

impl SessionState {
    /// 以目录默认值创建会话，激活 beauty 的第一个条目
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let params = ParameterSet::from_catalog(&catalog);
        let active_item = catalog
            .first_item(EffectCategory::Beauty)
            .map(|item| item.id.clone())
            .unwrap_or_default();
        Self {
            catalog,
            active_category: EffectCategory::Beauty,
            active_item,
            params,
            comparing: false,
        }
    }

    /// 使用进程内共享目录创建会话
    pub fn with_builtin_catalog() -> Self {
        Self::new(Catalog::global())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn active_category(&self) -> EffectCategory {
        self.active_category
    }

    pub fn active_item_id(&self) -> &str {
        &self.active_item
    }

    /// 当前条目的完整描述
    pub fn active_item(&self) -> Option<&EffectItem> {
        self.catalog
            .item_by_id(self.active_category, &self.active_item)
            .ok()
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn is_comparing(&self) -> bool {
        self.comparing
    }

    /// 当前条目视图
    pub fn active_entry(&self) -> Option<ActiveEntry<'_>> {
        let item = self.active_item()?;
        match self.active_category.kind() {
            CategoryKind::Adjustable => Some(ActiveEntry::Adjustable {
                item_id: &item.id,
                value: self.params.value(self.active_category, &item.id)?,
            }),
            CategoryKind::Selectable => Some(ActiveEntry::Selectable {
                item_id: &item.id,
                payload: &item.payload,
                selected: self
                    .params
                    .selection(self.active_category)
                    .is_some_and(|s| s.item_id == item.id),
            }),
        }
    }

    /// 切换分类，当前条目总是落到该分类第一个条目
    pub fn select_category(&mut self, category: EffectCategory) -> Result<(), SessionError> {
        let first = self.catalog.first_item(category).ok_or_else(|| {
            let err = SessionError::UnknownCategory {
                name: category.to_string(),
            };
            warn!(error = %err, "切换分类被拒绝");
            err
        })?;

        self.active_item = first.id.clone();
        self.active_category = category;
        debug!(category = %category, item = %self.active_item, "切换分类");
        Ok(())
    }

    /// 按名称切换分类（表现层传入字符串 id 时使用）
    pub fn select_category_named(&mut self, name: &str) -> Result<(), SessionError> {
        let category = name.parse::<EffectCategory>().inspect_err(|e| {
            warn!(error = %e, "切换分类被拒绝");
        })?;
        self.select_category(category)
    }

    /// 选择当前分类下的条目
    ///
    /// 可选分类会同时替换该分类的当前选择记录。
    pub fn select_item(&mut self, id: &str) -> Result<(), SessionError> {
        let category = self.active_category;
        let item = self
            .catalog
            .item_by_id(category, id)
            .inspect_err(|e| warn!(error = %e, "选择条目被拒绝"))?;

        match category.kind() {
            CategoryKind::Adjustable => {}
            CategoryKind::Selectable => self.params.select(category, item),
        }
        self.active_item = item.id.clone();
        debug!(category = %category, item = %id, "选择条目");
        Ok(())
    }

    /// 设置当前可调条目的数值，返回夹取后实际写入的值
    pub fn set_value(&mut self, value: i32) -> Result<u8, SessionError> {
        let category = self.active_category;
        if !category.is_adjustable() {
            let err = SessionError::InvalidOperationForCategory {
                category,
                operation: "set_value",
            };
            warn!(error = %err, "设置数值被拒绝");
            return Err(err);
        }

        let clamped = clamp_value(value);
        if !self.params.set_value(category, &self.active_item, clamped) {
            let err = SessionError::UnknownItem {
                category,
                id: self.active_item.clone(),
            };
            warn!(error = %err, "设置数值被拒绝");
            return Err(err);
        }
        debug!(category = %category, item = %self.active_item, value = clamped, "设置数值");
        Ok(clamped)
    }

    /// 开始对比（幂等）
    pub fn begin_compare(&mut self) {
        self.comparing = true;
    }

    /// 结束对比（幂等）
    pub fn end_compare(&mut self) {
        self.comparing = false;
    }

    /// 恢复所有默认值；不改变当前分类与条目
    pub fn reset(&mut self) {
        self.params.reset(&self.catalog);
        debug!("重置全部特效参数");
    }

    /// 分发一个手势事件
    pub fn apply(&mut self, input: &EffectInput) -> Result<(), SessionError> {
        match input {
            EffectInput::SelectCategory { category } => self.select_category(*category),
            EffectInput::SelectItem { id } => self.select_item(id),
            EffectInput::SetValue { value } => self.set_value(*value).map(|_| ()),
            EffectInput::BeginCompare => {
                self.begin_compare();
                Ok(())
            }
            EffectInput::EndCompare => {
                self.end_compare();
                Ok(())
            }
            EffectInput::Reset => {
                self.reset();
                Ok(())
            }
        }
    }

    /// 会话不变量是否成立
    pub fn invariants_hold(&self) -> bool {
        self.active_item().is_some() && self.params.is_consistent_with(&self.catalog)
    }
}
