use std::sync::Arc;

use crate::data::schema::ItemDefinition;

/// 背包中的一个格子：要么为空，要么放着某一种物品及其数量
#[derive(Debug, Clone, Default)]
pub struct Slot {
    item: Option<Arc<ItemDefinition>>,
    quantity: u32,
}

impl Slot {
    pub fn is_empty(&self) -> bool {
        self.quantity == 0
    }

    pub fn item(&self) -> Option<&Arc<ItemDefinition>> {
        self.item.as_ref()
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn holds(&self, item: &ItemDefinition) -> bool {
        self.item.as_deref() == Some(item)
    }

    /// 剩余可堆叠空间；放着别的物品时为 0
    pub fn room_for(&self, item: &ItemDefinition) -> u32 {
        if self.is_empty() {
            item.effective_max_stack()
        } else if self.holds(item) {
            item.effective_max_stack() - self.quantity
        } else {
            0
        }
    }

    /// 能否再接收至少 1 个
    pub fn can_accept(&self, item: &ItemDefinition) -> bool {
        self.is_empty() || (item.stackable && self.holds(item) && self.room_for(item) > 0)
    }

    /// 放入 `amount` 个。超出上限或放入异种物品属于调用方 bug，直接 panic
    pub fn put(&mut self, item: &Arc<ItemDefinition>, amount: u32) {
        assert!(amount > 0, "put of zero units into slot");
        assert!(
            self.is_empty() || self.holds(item),
            "slot holds a different item than `{}`",
            item.id
        );
        let total = self.quantity + amount;
        assert!(
            total <= item.effective_max_stack(),
            "`{}` over stack limit: {total} > {}",
            item.id,
            item.effective_max_stack()
        );

        if self.item.is_none() {
            self.item = Some(Arc::clone(item));
        }
        self.quantity = total;
    }

    /// 最多取出 `amount` 个，返回实际取出数量；取空后清除物品
    pub fn take_up_to(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.quantity);
        self.quantity -= removed;
        if self.quantity == 0 {
            self.item = None;
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::ItemCategory;

    fn gem() -> Arc<ItemDefinition> {
        ItemDefinition::new("gem", "Gem", ItemCategory::Misc, true, 5).shared()
    }

    #[test]
    fn empty_slot_accepts_anything() {
        let slot = Slot::default();
        assert!(slot.is_empty());
        assert!(slot.item().is_none());
        assert!(slot.can_accept(&gem()));
        assert_eq!(slot.room_for(&gem()), 5);
    }

    #[test]
    fn full_stack_refuses_more() {
        let gem = gem();
        let mut slot = Slot::default();
        slot.put(&gem, 5);
        assert!(!slot.can_accept(&gem));
        assert_eq!(slot.room_for(&gem), 0);
    }

    #[test]
    fn non_stackable_never_merges() {
        let key = ItemDefinition::new("key", "Key", ItemCategory::Keys, false, 1).shared();
        let mut slot = Slot::default();
        slot.put(&key, 1);
        assert!(!slot.can_accept(&key));
    }

    #[test]
    fn other_item_is_refused() {
        let mut slot = Slot::default();
        slot.put(&gem(), 1);
        let coin = ItemDefinition::new("coin", "Coin", ItemCategory::Misc, true, 99);
        assert!(!slot.can_accept(&coin));
        assert_eq!(slot.room_for(&coin), 0);
    }

    #[test]
    #[should_panic]
    fn put_over_limit_panics() {
        let gem = gem();
        let mut slot = Slot::default();
        slot.put(&gem, 4);
        slot.put(&gem, 2);
    }

    #[test]
    fn take_up_to_clears_when_drained() {
        let gem = gem();
        let mut slot = Slot::default();
        slot.put(&gem, 3);
        assert_eq!(slot.take_up_to(2), 2);
        assert_eq!(slot.quantity(), 1);
        assert_eq!(slot.take_up_to(10), 1);
        assert!(slot.is_empty());
        assert!(slot.item().is_none());
        assert_eq!(slot.take_up_to(1), 0);
    }
}
