use bevy::asset::Asset;
use bevy::prelude::Resource;
use bevy::reflect::TypePath;
use serde_derive::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// 物品分类，用于背包面板的分页筛选
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum ItemCategory {
    #[default]
    Tools,
    Keys,
    Consumables,
    Misc,
}

impl ItemCategory {
    pub const ALL: [ItemCategory; 4] = [
        ItemCategory::Tools,
        ItemCategory::Keys,
        ItemCategory::Consumables,
        ItemCategory::Misc,
    ];
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ItemCategory::Tools => "Tools",
            ItemCategory::Keys => "Keys",
            ItemCategory::Consumables => "Consumables",
            ItemCategory::Misc => "Misc",
        };
        f.write_str(s)
    }
}

impl FromStr for ItemCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemCategory::ALL
            .into_iter()
            .find(|c| c.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown category `{s}`"))
    }
}

/// 物品附带的属性加成
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct ItemStats {
    #[serde(default)] pub strength:     u32,
    #[serde(default)] pub intelligence: u32,
    #[serde(default)] pub willpower:    u32,
}

impl ItemStats {
    pub fn scaled(self, n: u32) -> Self {
        Self {
            strength: self.strength.saturating_mul(n),
            intelligence: self.intelligence.saturating_mul(n),
            willpower: self.willpower.saturating_mul(n),
        }
    }
}

impl std::ops::Add for ItemStats {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            strength: self.strength.saturating_add(rhs.strength),
            intelligence: self.intelligence.saturating_add(rhs.intelligence),
            willpower: self.willpower.saturating_add(rhs.willpower),
        }
    }
}

/// 静态物品表条目；创建后不可变，多个槽位共享同一份 `Arc`
#[derive(Debug, Clone, Deserialize)]
pub struct ItemDefinition {
    pub id:   String,
    pub name: String,
    #[serde(default)] pub category:    ItemCategory,
    #[serde(default)] pub description: String,
    #[serde(default)] pub stackable:   bool,
    #[serde(default = "one")] pub max_stack: u32,
    #[serde(default)] pub stats:       ItemStats,
}

fn one() -> u32 {
    1
}

impl ItemDefinition {
    /// 不可堆叠物品的上限强制为 1
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: ItemCategory,
        stackable: bool,
        max_stack: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            description: String::new(),
            stackable,
            max_stack: if stackable { max_stack.max(1) } else { 1 },
            stats: ItemStats::default(),
        }
    }

    pub fn effective_max_stack(&self) -> u32 {
        if self.stackable { self.max_stack } else { 1 }
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

// 身份只看 id
impl PartialEq for ItemDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ItemDefinition {}

impl std::hash::Hash for ItemDefinition {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// RON 文件的顶层结构
#[derive(Deserialize, Debug)]
pub struct ItemList {
    pub items: Vec<ItemDefinition>,
}

/// 加载完成的物品目录；加载后同时作为 Resource 插入，供游戏内系统查询
#[derive(Asset, Resource, TypePath, Debug, Clone, Default)]
pub struct ItemCatalog {
    items: Vec<Arc<ItemDefinition>>,
}

impl ItemCatalog {
    pub fn new(items: Vec<Arc<ItemDefinition>>) -> Self {
        Self { items }
    }

    /// 按 id 查找，忽略大小写
    pub fn get(&self, id: &str) -> Option<Arc<ItemDefinition>> {
        self.items
            .iter()
            .find(|e| e.id.eq_ignore_ascii_case(id))
            .cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ItemDefinition>> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}
