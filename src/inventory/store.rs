use bevy::prelude::*;
use serde_derive::Serialize;
use std::sync::Arc;

use super::category::CategoryIndex;
use super::error::InventoryError;
use super::notifier::ChangeNotifier;
use super::slot::Slot;
use crate::data::schema::{ItemCategory, ItemDefinition, ItemStats};

/// 拾取成功（可能只接收了一部分）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accepted {
    pub fully_accepted: bool,
    pub amount_accepted: u32,
}

/// 单个格子的只读快照，供调试输出
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotView {
    pub index: usize,
    pub item: Option<String>,
    pub name: Option<String>,
    pub quantity: u32,
    pub max_stack: u32,
}

/// 玩家背包：固定数量的格子 + "是否已拿到背包" 开关。
///
/// 挂在持有者实体上（Component），而不是全局资源；容量在构造后不可变。
/// 每修改一个格子就广播一次变更通知。
#[derive(Component, Debug)]
pub struct InventoryStore {
    slots: Box<[Slot]>,
    bag_acquired: bool,
    notifier: ChangeNotifier,
    revision: u64,
}

impl InventoryStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![Slot::default(); capacity].into_boxed_slice(),
            bag_acquired: false,
            notifier: ChangeNotifier::new(),
            revision: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn is_bag_acquired(&self) -> bool {
        self.bag_acquired
    }

    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    /// 已发出的变更通知次数，单调递增
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn changed(&mut self) {
        self.revision += 1;
        self.notifier.notify();
    }

    /// 单向开关，重复调用无效果
    pub fn set_bag_acquired(&mut self) {
        if self.bag_acquired {
            return;
        }
        self.bag_acquired = true;
        info!("Inventory bag obtained!");
        self.changed();
    }

    /// 拾取物品。先补满已有的同种未满堆叠（按格子顺序），再按顺序占用空格；
    /// 装不下的部分留给调用方，已放入的部分不会回滚。
    pub fn try_pickup(
        &mut self,
        item: &Arc<ItemDefinition>,
        quantity: u32,
    ) -> Result<Accepted, InventoryError> {
        if !self.bag_acquired {
            debug!("pickup of `{}` refused: no bag", item.id);
            return Err(InventoryError::BagNotAcquired);
        }
        if quantity == 0 {
            error!("pickup of `{}` with zero quantity", item.id);
            return Err(InventoryError::InvalidQuantity);
        }
        if !item.stackable && quantity > 1 {
            error!("pickup of {quantity} x non-stackable `{}`", item.id);
            return Err(InventoryError::NotStackable {
                id: item.id.clone(),
                quantity,
            });
        }

        let max = item.effective_max_stack();
        let mut remaining = quantity;

        // 1. 补满已有堆叠
        if item.stackable {
            for idx in 0..self.slots.len() {
                if remaining == 0 {
                    break;
                }
                let slot = &mut self.slots[idx];
                if slot.is_empty() || !slot.can_accept(item) {
                    continue;
                }
                let take = slot.room_for(item).min(remaining);
                slot.put(item, take);
                remaining -= take;
                debug!("stacked {take} x `{}` into slot {idx} ({}/{max})", item.id, slot.quantity());
                self.changed();
            }
        }

        // 2. 依次占用空格
        while remaining > 0 {
            let Some(idx) = self.slots.iter().position(Slot::is_empty) else {
                break;
            };
            let take = self.slots[idx].room_for(item).min(remaining);
            self.slots[idx].put(item, take);
            remaining -= take;
            debug!("placed {take} x `{}` into empty slot {idx}", item.id);
            self.changed();
        }

        if remaining == 0 {
            Ok(Accepted {
                fully_accepted: true,
                amount_accepted: quantity,
            })
        } else if remaining < quantity {
            info!("Inventory is full, {remaining} x `{}` left behind", item.id);
            Ok(Accepted {
                fully_accepted: false,
                amount_accepted: quantity - remaining,
            })
        } else {
            info!("Inventory is full!");
            Err(InventoryError::Full)
        }
    }

    /// 按格子顺序移除，返回实际移除数量
    pub fn try_remove(&mut self, item: &ItemDefinition, quantity: u32) -> Result<u32, InventoryError> {
        if quantity == 0 {
            return Err(InventoryError::InvalidQuantity);
        }

        let mut removed = 0;
        for idx in 0..self.slots.len() {
            if removed == quantity {
                break;
            }
            if !self.slots[idx].holds(item) {
                continue;
            }
            removed += self.slots[idx].take_up_to(quantity - removed);
            self.changed();
        }

        if removed == 0 {
            Err(InventoryError::NotFound { id: item.id.clone() })
        } else {
            Ok(removed)
        }
    }

    /// 指定分类下的持有物品及合计数量
    pub fn query(&self, category: ItemCategory) -> impl Iterator<Item = (Arc<ItemDefinition>, u32)> {
        CategoryIndex::build(self.slots.iter(), category).into_iter()
    }

    pub fn count_of(&self, item: &ItemDefinition) -> u32 {
        self.slots
            .iter()
            .filter(|s| s.holds(item))
            .map(Slot::quantity)
            .sum()
    }

    pub fn contains(&self, item: &ItemDefinition) -> bool {
        self.slots.iter().any(|s| s.holds(item))
    }

    /// 按数量累加所有持有物品的属性
    pub fn total_stats(&self) -> ItemStats {
        self.slots
            .iter()
            .filter_map(|s| s.item().map(|item| item.stats.scaled(s.quantity())))
            .fold(ItemStats::default(), |acc, s| acc + s)
    }

    pub fn snapshot(&self) -> Vec<SlotView> {
        self.slots
            .iter()
            .enumerate()
            .map(|(index, s)| SlotView {
                index,
                item: s.item().map(|i| i.id.clone()),
                name: s.item().map(|i| i.name.clone()),
                quantity: s.quantity(),
                max_stack: s.item().map_or(0, |i| i.effective_max_stack()),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn key() -> Arc<ItemDefinition> {
        ItemDefinition::new("key", "Key", ItemCategory::Keys, false, 1).shared()
    }

    fn gem() -> Arc<ItemDefinition> {
        ItemDefinition::new("gem", "Gem", ItemCategory::Misc, true, 5).shared()
    }

    fn open_store(capacity: usize) -> InventoryStore {
        let mut store = InventoryStore::new(capacity);
        store.set_bag_acquired();
        store
    }

    fn layout(store: &InventoryStore) -> Vec<Option<(String, u32)>> {
        store
            .slots()
            .iter()
            .map(|s| s.item().map(|i| (i.id.clone(), s.quantity())))
            .collect()
    }

    fn assert_slot_invariants(store: &InventoryStore) {
        for slot in store.slots() {
            assert_eq!(slot.quantity() == 0, slot.item().is_none());
            if let Some(item) = slot.item() {
                assert!(slot.quantity() <= item.effective_max_stack());
            }
        }
    }

    #[test]
    fn pickup_before_bag_is_refused() {
        let mut store = InventoryStore::new(3);
        let before = layout(&store);
        assert_eq!(store.try_pickup(&gem(), 2), Err(InventoryError::BagNotAcquired));
        assert_eq!(layout(&store), before);
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn non_stackable_uses_one_slot_each() {
        let key = key();
        let mut store = open_store(2);

        let first = store.try_pickup(&key, 1).unwrap();
        assert_eq!(first, Accepted { fully_accepted: true, amount_accepted: 1 });
        assert_eq!(layout(&store)[0], Some(("key".into(), 1)));

        store.try_pickup(&key, 1).unwrap();
        assert_eq!(layout(&store)[1], Some(("key".into(), 1)));

        assert_eq!(store.try_pickup(&key, 1), Err(InventoryError::Full));
        assert_slot_invariants(&store);
    }

    #[test]
    fn overflow_is_partially_accepted() {
        let gem = gem();
        let mut store = open_store(1);

        assert_eq!(
            store.try_pickup(&gem, 3),
            Ok(Accepted { fully_accepted: true, amount_accepted: 3 })
        );
        assert_eq!(
            store.try_pickup(&gem, 4),
            Ok(Accepted { fully_accepted: false, amount_accepted: 2 })
        );
        assert_eq!(layout(&store)[0], Some(("gem".into(), 5)));
    }

    #[test]
    fn removal_drains_and_frees_slot() {
        let gem = gem();
        let mut store = open_store(1);
        store.try_pickup(&gem, 5).unwrap();

        assert_eq!(store.try_remove(&gem, 2), Ok(2));
        assert_eq!(layout(&store)[0], Some(("gem".into(), 3)));
        assert_eq!(store.try_remove(&gem, 10), Ok(3));
        assert!(store.slots()[0].is_empty());
        assert_eq!(
            store.try_remove(&gem, 1),
            Err(InventoryError::NotFound { id: "gem".into() })
        );
    }

    #[test]
    fn removal_drains_slots_in_ascending_order() {
        let gem = gem();
        let mut store = open_store(2);
        store.try_pickup(&gem, 7).unwrap();
        assert_eq!(layout(&store), vec![Some(("gem".into(), 5)), Some(("gem".into(), 2))]);

        assert_eq!(store.try_remove(&gem, 6), Ok(6));
        assert_eq!(layout(&store), vec![None, Some(("gem".into(), 1))]);
    }

    #[test]
    fn removal_skips_slots_holding_other_items() {
        let gem = gem();
        let key = key();
        let mut store = open_store(3);
        store.try_pickup(&gem, 5).unwrap();
        store.try_pickup(&key, 1).unwrap();
        store.try_pickup(&gem, 3).unwrap();
        assert_eq!(
            layout(&store),
            vec![Some(("gem".into(), 5)), Some(("key".into(), 1)), Some(("gem".into(), 3))]
        );

        assert_eq!(store.try_remove(&gem, 7), Ok(7));
        assert_eq!(
            layout(&store),
            vec![None, Some(("key".into(), 1)), Some(("gem".into(), 1))]
        );
        assert!(store.contains(&gem));
        assert!(store.contains(&key));

        store.try_remove(&gem, 1).unwrap();
        assert!(!store.contains(&gem));
    }

    #[test]
    fn partial_stack_is_topped_up_before_empty_slot() {
        let gem = gem();
        let coin = ItemDefinition::new("coin", "Coin", ItemCategory::Misc, true, 99).shared();
        let mut store = open_store(3);

        // slot0 = coin, slot1 = gem x4, 然后清空 slot0
        store.try_pickup(&coin, 1).unwrap();
        store.try_pickup(&gem, 4).unwrap();
        store.try_remove(&coin, 1).unwrap();
        assert!(store.slots()[0].is_empty());

        store.try_pickup(&gem, 3).unwrap();
        assert_eq!(
            layout(&store),
            vec![Some(("gem".into(), 2)), Some(("gem".into(), 5)), None]
        );
    }

    #[test]
    fn large_pickup_splits_across_slots() {
        let gem = gem();
        let mut store = open_store(4);
        let accepted = store.try_pickup(&gem, 12).unwrap();
        assert!(accepted.fully_accepted);
        assert_eq!(
            layout(&store),
            vec![
                Some(("gem".into(), 5)),
                Some(("gem".into(), 5)),
                Some(("gem".into(), 2)),
                None
            ]
        );
        assert_eq!(store.count_of(&gem), 12);
    }

    #[test]
    fn invalid_quantities_are_caller_bugs() {
        let mut store = open_store(2);
        let zero = store.try_pickup(&gem(), 0).unwrap_err();
        assert!(zero.is_caller_bug());
        let many = store.try_pickup(&key(), 2).unwrap_err();
        assert!(matches!(many, InventoryError::NotStackable { quantity: 2, .. }));
        assert!(store.slots().iter().all(Slot::is_empty));
        assert_eq!(store.try_remove(&gem(), 0), Err(InventoryError::InvalidQuantity));
    }

    #[test]
    fn conservation_over_mixed_sequence() {
        let gem = gem();
        let key = key();
        let mut store = open_store(3);

        for qty in [2, 7, 1, 9] {
            let before = store.count_of(&gem);
            let accepted = match store.try_pickup(&gem, qty) {
                Ok(a) => a.amount_accepted,
                Err(InventoryError::Full) => 0,
                Err(e) => panic!("unexpected {e}"),
            };
            assert_eq!(store.count_of(&gem), before + accepted);
            assert_slot_invariants(&store);
            let _ = store.try_pickup(&key, 1);
            assert_slot_invariants(&store);
        }
    }

    #[test]
    fn same_calls_give_same_layout() {
        let run = || {
            let mut store = open_store(4);
            let results = vec![
                store.try_pickup(&gem(), 7),
                store.try_pickup(&key(), 1),
                store.try_pickup(&gem(), 9),
            ];
            (layout(&store), results)
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn notifies_once_per_mutated_slot() {
        let gem = gem();
        let mut store = open_store(3);
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        store.notifier().subscribe(move || {
            h.fetch_add(1, Ordering::SeqCst);
        });

        store.try_pickup(&gem, 3).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        // 补满 slot0 再开 slot1
        store.try_pickup(&gem, 4).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 3);

        store.try_remove(&gem, 6).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn bag_gate_is_one_way_and_idempotent() {
        let mut store = InventoryStore::new(1);
        assert!(!store.is_bag_acquired());
        store.set_bag_acquired();
        store.set_bag_acquired();
        assert!(store.is_bag_acquired());
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn query_sums_by_category() {
        let torch = ItemDefinition::new("torch", "Torch", ItemCategory::Tools, false, 1).shared();
        let rope = ItemDefinition::new("rope", "Rope", ItemCategory::Tools, true, 3).shared();
        let mut store = open_store(6);
        store.try_pickup(&key(), 1).unwrap();
        store.try_pickup(&rope, 4).unwrap();
        store.try_pickup(&torch, 1).unwrap();
        store.try_pickup(&key(), 1).unwrap();

        let mut tools: Vec<(String, u32)> = store
            .query(ItemCategory::Tools)
            .map(|(item, n)| (item.id.clone(), n))
            .collect();
        tools.sort();
        assert_eq!(tools, vec![("rope".into(), 4), ("torch".into(), 1)]);

        let keys: Vec<_> = store.query(ItemCategory::Keys).collect();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].1, 2);
    }

    #[test]
    fn stats_are_weighted_by_quantity() {
        let scroll = ItemDefinition {
            stats: ItemStats { strength: 0, intelligence: 2, willpower: 1 },
            ..ItemDefinition::new("scroll", "Scroll", ItemCategory::Consumables, true, 5)
        }
        .shared();
        let mut store = open_store(2);
        store.try_pickup(&scroll, 3).unwrap();
        let stats = store.total_stats();
        assert_eq!(stats.intelligence, 6);
        assert_eq!(stats.willpower, 3);
    }

    #[test]
    fn snapshot_serializes() {
        let mut store = open_store(2);
        store.try_pickup(&gem(), 2).unwrap();
        let json = serde_json::to_value(store.snapshot()).unwrap();
        assert_eq!(json[0]["item"], "gem");
        assert_eq!(json[0]["quantity"], 2);
        assert!(json[1]["item"].is_null());
    }
}
