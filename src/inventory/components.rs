use bevy::ecs::component::HookContext;
use bevy::ecs::world::DeferredWorld;
use bevy::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::notifier::SubscriptionId;
use super::store::InventoryStore;

/// 散落在世界里、可被拾取的物品
#[derive(Component, Debug, Clone)]
pub struct WorldItem {
    pub id:       String,
    pub quantity: u32,
}

/// 世界里的背包，只能被拾取一次
#[derive(Component, Debug, Default)]
pub struct BagPickup;

/// 订阅背包的变更通知，收到通知后置脏，由 `emit_inventory_changed` 消费
#[derive(Component, Debug)]
#[component(on_remove = unwatch)]
pub struct InventoryWatch {
    dirty: Arc<AtomicBool>,
    subscription: SubscriptionId,
}

impl InventoryWatch {
    pub fn new(store: &InventoryStore) -> Self {
        let dirty = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&dirty);
        let subscription = store.notifier().subscribe(move || {
            flag.store(true, Ordering::Release);
        });
        Self { dirty, subscription }
    }

    /// 读取并清除脏标记
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }
}

// 移除观察者时从背包退订
fn unwatch(world: DeferredWorld, ctx: HookContext) {
    let Some(watch) = world.get::<InventoryWatch>(ctx.entity) else {
        return;
    };
    if let Some(store) = world.get::<InventoryStore>(ctx.entity) {
        store.notifier().unsubscribe(watch.subscription);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::{ItemCategory, ItemDefinition};

    #[test]
    fn watch_flags_each_change_once() {
        let mut store = InventoryStore::new(2);
        let watch = InventoryWatch::new(&store);
        assert!(!watch.take_dirty());

        store.set_bag_acquired();
        let gem = ItemDefinition::new("gem", "Gem", ItemCategory::Misc, true, 5).shared();
        store.try_pickup(&gem, 7).unwrap();
        assert!(watch.take_dirty());
        assert!(!watch.take_dirty());
    }

    #[test]
    fn removing_watch_unsubscribes() {
        let mut world = World::new();
        let store = InventoryStore::new(1);
        let watch = InventoryWatch::new(&store);
        let entity = world.spawn((store, watch)).id();
        assert_eq!(world.get::<InventoryStore>(entity).unwrap().notifier().subscriber_count(), 1);

        world.entity_mut(entity).remove::<InventoryWatch>();
        assert_eq!(world.get::<InventoryStore>(entity).unwrap().notifier().subscriber_count(), 0);
    }
}
