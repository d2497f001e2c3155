use std::sync::Arc;

use super::slot::Slot;
use crate::data::schema::{ItemCategory, ItemDefinition};

/// 按分类汇总的持有物品视图：同一物品跨多个格子的数量会合并。
/// 按需计算，不缓存；条目顺序为物品首次出现的格子顺序。
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex {
    entries: Vec<(Arc<ItemDefinition>, u32)>,
}

impl CategoryIndex {
    pub fn build<'a>(slots: impl IntoIterator<Item = &'a Slot>, category: ItemCategory) -> Self {
        let mut entries: Vec<(Arc<ItemDefinition>, u32)> = Vec::new();
        for slot in slots {
            let Some(item) = slot.item() else { continue };
            if item.category != category {
                continue;
            }
            match entries.iter_mut().find(|(held, _)| held.id == item.id) {
                Some((_, total)) => *total += slot.quantity(),
                None => entries.push((Arc::clone(item), slot.quantity())),
            }
        }
        Self { entries }
    }
}

impl IntoIterator for CategoryIndex {
    type Item = (Arc<ItemDefinition>, u32);
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
