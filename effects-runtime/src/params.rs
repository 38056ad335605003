//! # Params 模块
//!
//! 会话中的参数集合：每个可调条目一个数值，每个可选分类一条当前选择记录。
//!
//! 参数集只能由 [`ParameterSet::from_catalog`] 构造，构造时即为目录中每个可调条目
//! 建立条目；之后写入只会覆盖已有键，不会新增或删除键。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::{Catalog, EffectCategory, EffectItem, ItemPayload, MAX_VALUE};

/// 将任意整数夹到 0..=100
pub fn clamp_value(value: i32) -> u8 {
    value.clamp(0, MAX_VALUE as i32) as u8
}

/// 可选分类的当前选择
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub item_id: String,
    pub payload: ItemPayload,
}

impl Selection {
    fn of(item: &EffectItem) -> Self {
        Self {
            item_id: item.id.clone(),
            payload: item.payload.clone(),
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.payload.is_sentinel()
    }
}

/// 参数集合
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterSet {
    /// 可调分类 → (条目 id → 当前值)
    values: BTreeMap<EffectCategory, BTreeMap<String, u8>>,
    /// 可选分类 → 当前选择
    selections: BTreeMap<EffectCategory, Selection>,
}

impl ParameterSet {
    /// 以目录默认值构造
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let mut set = Self {
            values: BTreeMap::new(),
            selections: BTreeMap::new(),
        };
        set.reset(catalog);
        set
    }

    /// 全部恢复为目录默认值 / 空选项
    pub(crate) fn reset(&mut self, catalog: &Catalog) {
        self.values.clear();
        for (category, item) in catalog.adjustable_items() {
            self.values
                .entry(category)
                .or_default()
                .insert(item.id.clone(), item.default_value());
        }

        self.selections.clear();
        for category in EffectCategory::ALL {
            if let Some(sentinel) = catalog.sentinel(category) {
                self.selections.insert(category, Selection::of(sentinel));
            }
        }
    }

    pub fn value(&self, category: EffectCategory, id: &str) -> Option<u8> {
        self.values.get(&category)?.get(id).copied()
    }

    /// 写入已有键；键不存在时返回 `false` 且不做任何修改
    pub(crate) fn set_value(&mut self, category: EffectCategory, id: &str, value: u8) -> bool {
        match self.values.get_mut(&category).and_then(|m| m.get_mut(id)) {
            Some(slot) => {
                *slot = value.min(MAX_VALUE);
                true
            }
            None => false,
        }
    }

    pub fn selection(&self, category: EffectCategory) -> Option<&Selection> {
        self.selections.get(&category)
    }

    pub(crate) fn select(&mut self, category: EffectCategory, item: &EffectItem) {
        self.selections.insert(category, Selection::of(item));
    }

    /// 遍历所有数值条目
    pub fn values(&self) -> impl Iterator<Item = (EffectCategory, &str, u8)> {
        self.values.iter().flat_map(|(category, items)| {
            items
                .iter()
                .map(move |(id, value)| (*category, id.as_str(), *value))
        })
    }

    /// 数值条目数量
    pub fn len(&self) -> usize {
        self.values.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 数值键集合与目录可调条目完全一致，且每个可选分类都有选择记录
    pub fn is_consistent_with(&self, catalog: &Catalog) -> bool {
        let expected = catalog.adjustable_items().count();
        let all_present = catalog
            .adjustable_items()
            .all(|(category, item)| self.value(category, &item.id).is_some());
        let selections_present = EffectCategory::ALL
            .into_iter()
            .filter(|c| !c.is_adjustable())
            .all(|c| {
                self.selection(c)
                    .is_some_and(|s| catalog.item_by_id(c, &s.item_id).is_ok())
            });
        self.len() == expected && all_present && selections_present
    }
}
