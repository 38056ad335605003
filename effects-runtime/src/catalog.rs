//! # Catalog 模块
//!
//! 特效分类与条目的静态注册表。
//! 这是所有条目 id、默认值、载荷的**唯一来源**。
//!
//! ## 设计说明
//!
//! - 分类集合是封闭的（[`EffectCategory`]），顺序即界面上从左到右的标签顺序
//! - 可调分类（beauty / reshape）的条目携带 0..=100 的默认值
//! - 可选分类（filter / makeup / sticker）的首个条目必须是空选项（哨兵）
//! - Catalog 构造后不可变；进程内共享同一份（[`Catalog::global`]）

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use crate::error::{CatalogError, SessionError};

/// 参数取值上限
pub const MAX_VALUE: u8 = 100;

/// 特效分类
///
/// 声明顺序即标签顺序，`Ord` 由声明顺序派生。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectCategory {
    /// 美颜
    Beauty,
    /// 美型
    Reshape,
    /// 滤镜
    Filter,
    /// 美妆
    Makeup,
    /// 贴纸
    Sticker,
}

/// 分类语义
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryKind {
    /// 条目携带可调数值
    Adjustable,
    /// 条目携带固定载荷，互斥选择
    Selectable,
}

impl EffectCategory {
    /// 所有分类（按标签顺序）
    pub const ALL: [EffectCategory; 5] = [
        EffectCategory::Beauty,
        EffectCategory::Reshape,
        EffectCategory::Filter,
        EffectCategory::Makeup,
        EffectCategory::Sticker,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beauty => "beauty",
            Self::Reshape => "reshape",
            Self::Filter => "filter",
            Self::Makeup => "makeup",
            Self::Sticker => "sticker",
        }
    }

    pub fn kind(&self) -> CategoryKind {
        match self {
            Self::Beauty | Self::Reshape => CategoryKind::Adjustable,
            Self::Filter | Self::Makeup | Self::Sticker => CategoryKind::Selectable,
        }
    }

    pub fn is_adjustable(&self) -> bool {
        self.kind() == CategoryKind::Adjustable
    }
}

impl fmt::Display for EffectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EffectCategory {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| SessionError::UnknownCategory {
                name: s.to_string(),
            })
    }
}

/// 条目载荷
///
/// 可选分类的载荷为 `None` 时即为该分类的空选项（哨兵）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemPayload {
    /// 可调条目，携带默认值
    Adjustable { default_value: u8 },
    /// 滤镜样式（如 `sepia(0.6)`）
    Filter { style: Option<String> },
    /// 美妆叠加色（如 `#e8466c`）
    Makeup { color: Option<String> },
    /// 贴纸字形（emoji）
    Sticker { glyph: Option<String> },
}

impl ItemPayload {
    /// 是否为空选项
    pub fn is_sentinel(&self) -> bool {
        matches!(
            self,
            Self::Filter { style: None } | Self::Makeup { color: None } | Self::Sticker { glyph: None }
        )
    }

    /// 载荷类型是否属于该分类
    pub fn belongs_to(&self, category: EffectCategory) -> bool {
        matches!(
            (self, category),
            (Self::Adjustable { .. }, EffectCategory::Beauty | EffectCategory::Reshape)
                | (Self::Filter { .. }, EffectCategory::Filter)
                | (Self::Makeup { .. }, EffectCategory::Makeup)
                | (Self::Sticker { .. }, EffectCategory::Sticker)
        )
    }
}

/// 特效条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectItem {
    /// 分类内唯一的 id
    pub id: String,
    /// 显示名称
    pub name: String,
    /// 图标引用
    pub icon: String,
    /// 分类相关载荷
    pub payload: ItemPayload,
}

impl EffectItem {
    pub fn adjustable(id: &str, name: &str, icon: &str, default_value: u8) -> Self {
        Self::new(id, name, icon, ItemPayload::Adjustable { default_value })
    }

    pub fn filter(id: &str, name: &str, icon: &str, style: Option<&str>) -> Self {
        let style = style.map(str::to_string);
        Self::new(id, name, icon, ItemPayload::Filter { style })
    }

    pub fn makeup(id: &str, name: &str, icon: &str, color: Option<&str>) -> Self {
        let color = color.map(str::to_string);
        Self::new(id, name, icon, ItemPayload::Makeup { color })
    }

    pub fn sticker(id: &str, name: &str, icon: &str, glyph: Option<&str>) -> Self {
        let glyph = glyph.map(str::to_string);
        Self::new(id, name, icon, ItemPayload::Sticker { glyph })
    }

    fn new(id: &str, name: &str, icon: &str, payload: ItemPayload) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
            payload,
        }
    }

    /// 默认值（非可调条目为 0）
    pub fn default_value(&self) -> u8 {
        match self.payload {
            ItemPayload::Adjustable { default_value } => default_value,
            _ => 0,
        }
    }
}

/// 特效目录
///
/// 通过 [`Catalog::builtin`] 或 [`Catalog::from_json`] 构造，构造时即完成校验。
/// 反序列化同样经过 [`Catalog::new`]，无效目录无法构造。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    categories: BTreeMap<EffectCategory, Vec<EffectItem>>,
}

static GLOBAL: OnceLock<Arc<Catalog>> = OnceLock::new();

impl Catalog {
    /// 从分类表构造并校验
    pub fn new(categories: BTreeMap<EffectCategory, Vec<EffectItem>>) -> Result<Self, CatalogError> {
        let catalog = Self { categories };
        catalog.validate()?;
        Ok(catalog)
    }

    /// 进程内共享的内置目录
    pub fn global() -> Arc<Catalog> {
        GLOBAL.get_or_init(|| Arc::new(Self::builtin())).clone()
    }

    /// 从 JSON 加载并校验
    ///
    /// 与直接反序列化不同，校验失败时保留具体的 [`CatalogError`] 变体。
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let categories = serde_json::from_str(json).map_err(|e| CatalogError::Parse {
            message: e.to_string(),
        })?;
        Self::new(categories)
    }

    pub fn to_json_pretty(&self) -> Result<String, CatalogError> {
        serde_json::to_string_pretty(self).map_err(|e| CatalogError::Parse {
            message: e.to_string(),
        })
    }

    /// 分类下的有序条目
    pub fn items_of(&self, category: EffectCategory) -> &[EffectItem] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// 按名称查询分类条目
    pub fn items_of_named(&self, name: &str) -> Result<&[EffectItem], SessionError> {
        let category = name.parse::<EffectCategory>()?;
        Ok(self.items_of(category))
    }

    pub fn item_by_id(&self, category: EffectCategory, id: &str) -> Result<&EffectItem, SessionError> {
        self.items_of(category)
            .iter()
            .find(|item| item.id == id)
            .ok_or_else(|| SessionError::UnknownItem {
                category,
                id: id.to_string(),
            })
    }

    pub fn default_value(&self, category: EffectCategory, id: &str) -> Result<u8, SessionError> {
        self.item_by_id(category, id).map(EffectItem::default_value)
    }

    pub fn first_item(&self, category: EffectCategory) -> Option<&EffectItem> {
        self.items_of(category).first()
    }

    /// 可选分类的空选项
    pub fn sentinel(&self, category: EffectCategory) -> Option<&EffectItem> {
        self.first_item(category)
            .filter(|item| item.payload.is_sentinel())
    }

    /// 所有可调条目（按分类顺序）
    pub fn adjustable_items(&self) -> impl Iterator<Item = (EffectCategory, &EffectItem)> {
        EffectCategory::ALL
            .into_iter()
            .filter(EffectCategory::is_adjustable)
            .flat_map(move |c| self.items_of(c).iter().map(move |item| (c, item)))
    }

    /// 校验目录不变量
    pub fn validate(&self) -> Result<(), CatalogError> {
        for category in EffectCategory::ALL {
            let items = self.items_of(category);
            if items.is_empty() {
                return Err(CatalogError::EmptyCategory { category });
            }

            let mut seen = HashSet::new();
            for (index, item) in items.iter().enumerate() {
                if !seen.insert(item.id.as_str()) {
                    return Err(CatalogError::DuplicateItem {
                        category,
                        id: item.id.clone(),
                    });
                }
                if !item.payload.belongs_to(category) {
                    return Err(CatalogError::PayloadMismatch {
                        category,
                        id: item.id.clone(),
                    });
                }
                if let ItemPayload::Adjustable { default_value } = item.payload {
                    if default_value > MAX_VALUE {
                        return Err(CatalogError::DefaultOutOfRange {
                            id: item.id.clone(),
                            value: default_value,
                        });
                    }
                }
                if item.payload.is_sentinel() && index != 0 {
                    return Err(CatalogError::MisplacedSentinel {
                        category,
                        id: item.id.clone(),
                    });
                }
            }

            if !category.is_adjustable() && !items[0].payload.is_sentinel() {
                return Err(CatalogError::MissingSentinel {
                    category,
                    id: items[0].id.clone(),
                });
            }
        }
        Ok(())
    }

    /// 内置目录
    pub fn builtin() -> Self {
        let mut categories = BTreeMap::new();

        categories.insert(
            EffectCategory::Beauty,
            vec![
                EffectItem::adjustable("smooth", "磨皮", "beauty/smooth", 60),
                EffectItem::adjustable("whiten", "美白", "beauty/whiten", 40),
                EffectItem::adjustable("rosy", "红润", "beauty/rosy", 30),
                EffectItem::adjustable("sharpen", "清晰", "beauty/sharpen", 20),
                EffectItem::adjustable("brightEyes", "亮眼", "beauty/bright-eyes", 0),
            ],
        );

        categories.insert(
            EffectCategory::Reshape,
            vec![
                EffectItem::adjustable("slimFace", "瘦脸", "reshape/slim-face", 0),
                EffectItem::adjustable("bigEyes", "大眼", "reshape/big-eyes", 0),
                EffectItem::adjustable("vFace", "V脸", "reshape/v-face", 0),
                EffectItem::adjustable("narrowFace", "窄脸", "reshape/narrow-face", 0),
                EffectItem::adjustable("chin", "下巴", "reshape/chin", 50),
                EffectItem::adjustable("forehead", "额头", "reshape/forehead", 50),
                EffectItem::adjustable("nose", "瘦鼻", "reshape/nose", 0),
            ],
        );

        categories.insert(
            EffectCategory::Filter,
            vec![
                EffectItem::filter("origin", "原图", "filter/origin", None),
                EffectItem::filter("vintage", "复古", "filter/vintage", Some("sepia(0.6)")),
                EffectItem::filter("noir", "黑白", "filter/noir", Some("grayscale(1)")),
                EffectItem::filter("vivid", "鲜艳", "filter/vivid", Some("saturate(1.6)")),
                EffectItem::filter(
                    "warm",
                    "暖阳",
                    "filter/warm",
                    Some("sepia(0.3) saturate(1.4)"),
                ),
                EffectItem::filter(
                    "cool",
                    "冷调",
                    "filter/cool",
                    Some("hue-rotate(-15deg) saturate(1.2)"),
                ),
                EffectItem::filter(
                    "fade",
                    "褪色",
                    "filter/fade",
                    Some("contrast(0.8) brightness(1.1)"),
                ),
            ],
        );

        categories.insert(
            EffectCategory::Makeup,
            vec![
                EffectItem::makeup("none", "无", "makeup/none", None),
                EffectItem::makeup("coral", "珊瑚", "makeup/coral", Some("#ff7f50")),
                EffectItem::makeup("rose", "玫瑰", "makeup/rose", Some("#e8466c")),
                EffectItem::makeup("berry", "莓果", "makeup/berry", Some("#8e2f5a")),
                EffectItem::makeup("nude", "裸色", "makeup/nude", Some("#d8a48f")),
            ],
        );

        categories.insert(
            EffectCategory::Sticker,
            vec![
                EffectItem::sticker("none", "无", "sticker/none", None),
                EffectItem::sticker("bunny", "兔耳", "sticker/bunny", Some("🐰")),
                EffectItem::sticker("cat", "猫咪", "sticker/cat", Some("🐱")),
                EffectItem::sticker("crown", "皇冠", "sticker/crown", Some("👑")),
                EffectItem::sticker("heart", "爱心", "sticker/heart", Some("💖")),
                EffectItem::sticker("sparkle", "闪光", "sticker/sparkle", Some("✨")),
            ],
        );

        Self { categories }
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let categories = BTreeMap::deserialize(deserializer)?;
        Catalog::new(categories).map_err(serde::de::Error::custom)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
