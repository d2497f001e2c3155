use super::{components::*, events::*};
use super::pickup::{collect, CollectDecision};
use super::store::{Accepted, InventoryStore};
use super::error::InventoryError;
use crate::character::components::Player;
use crate::core::events::LogEvent;
use crate::data::schema::ItemCatalog;
use bevy::prelude::*;
use std::collections::HashSet;

/// 处理触发器：碰到背包 → 开启背包；碰到物品 → 尝试拾取
pub fn handle_trigger_enter(
    mut commands: Commands,
    mut ev_trigger: EventReader<TriggerEnter>,
    mut collectors: Query<&mut InventoryStore>,
    mut items: Query<&mut WorldItem>,
    bags: Query<(), With<BagPickup>>,
    catalog: Res<ItemCatalog>,
    mut log: EventWriter<LogEvent>,
) {
    // 同一帧内可能重复触发，已处理的实体跳过
    let mut consumed = HashSet::new();

    for ev in ev_trigger.read() {
        if consumed.contains(&ev.other) {
            continue;
        }
        // 只有挂着背包的实体才能拾取
        let Ok(mut store) = collectors.get_mut(ev.collector) else {
            continue;
        };

        if bags.get(ev.other).is_ok() {
            consumed.insert(ev.other);
            store.set_bag_acquired();
            commands.entity(ev.other).despawn();
            log.write(LogEvent("拾取了背包！".into()));
            continue;
        }

        let Ok(mut world_item) = items.get_mut(ev.other) else {
            continue;
        };
        let Some(def) = catalog.get(&world_item.id) else {
            warn!("不存在物品 ID {}", world_item.id);
            continue;
        };

        match collect(&mut *store, &def, world_item.quantity) {
            CollectDecision::Consume => {
                consumed.insert(ev.other);
                commands.entity(ev.other).despawn();
                log.write(LogEvent(format!("获得 {} ×{}", def.name, world_item.quantity)));
            }
            CollectDecision::Leave { remaining } => {
                let taken = world_item.quantity - remaining;
                if taken > 0 {
                    log.write(LogEvent(format!(
                        "获得 {} ×{}，背包已满，剩余 {} 个留在原地",
                        def.name, taken, remaining
                    )));
                } else {
                    log.write(LogEvent(format!("背包已满，无法拾取 {}", def.name)));
                }
                world_item.quantity = remaining;
            }
            CollectDecision::NeedBag => {
                log.write(LogEvent("需要先拾取背包！".into()));
            }
            CollectDecision::Rejected(e) => {
                error!("拾取 {} 失败: {e}", def.id);
            }
        }
    }
}

/// 处理"give"——绕过世界物体直接往玩家背包塞物品
pub fn give_item(
    mut ev_give: EventReader<GiveItemEvent>,
    mut player: Query<&mut InventoryStore, With<Player>>,
    catalog: Res<ItemCatalog>,
    mut log: EventWriter<LogEvent>,
) {
    for ev in ev_give.read() {
        let Some(def) = catalog.get(&ev.id) else {
            log.write(LogEvent(format!("不存在物品 ID {}", ev.id)));
            continue;
        };
        let Ok(mut store) = player.single_mut() else {
            continue;
        };

        let msg = match store.try_pickup(&def, ev.count) {
            Ok(Accepted { fully_accepted: true, amount_accepted }) => {
                format!("获得 {} ×{}", def.name, amount_accepted)
            }
            Ok(Accepted { amount_accepted, .. }) => format!(
                "获得 {} ×{}，背包已满，{} 个未能放入",
                def.name,
                amount_accepted,
                ev.count - amount_accepted
            ),
            Err(InventoryError::Full) => format!("背包已满，无法获得 {}", def.name),
            Err(InventoryError::BagNotAcquired) => "需要先拾取背包！".to_string(),
            Err(e) => {
                if e.is_caller_bug() {
                    error!("give {} ×{} rejected: {e}", def.id, ev.count);
                }
                format!("无法获得 {}: {e}", def.name)
            }
        };
        log.write(LogEvent(msg));
    }
}

/// 处理"drop"——从玩家背包移除
pub fn remove_item(
    mut ev_remove: EventReader<RemoveItemEvent>,
    mut player: Query<&mut InventoryStore, With<Player>>,
    catalog: Res<ItemCatalog>,
    mut log: EventWriter<LogEvent>,
) {
    for ev in ev_remove.read() {
        let Some(def) = catalog.get(&ev.id) else {
            log.write(LogEvent(format!("不存在物品 ID {}", ev.id)));
            continue;
        };
        let Ok(mut store) = player.single_mut() else {
            continue;
        };

        match store.try_remove(&def, ev.count) {
            Ok(n) => log.write(LogEvent(format!("移除 {} ×{}", def.name, n))),
            Err(e) => log.write(LogEvent(format!("无法移除: {e}"))),
        };
    }
}

/// 把变更通知转换成 InventoryChanged 事件，一帧内多次通知只发一次
pub fn emit_inventory_changed(
    stores: Query<(Entity, &InventoryStore, &InventoryWatch)>,
    mut ev_changed: EventWriter<InventoryChanged>,
) {
    for (entity, store, watch) in &stores {
        if watch.take_dirty() {
            debug!("inventory {entity} changed (revision {})", store.revision());
            ev_changed.write(InventoryChanged { entity });
        }
    }
}

/// 打印背包内容
pub fn print_inventory(
    mut ev_list: EventReader<ListInventoryEvent>,
    player: Query<&InventoryStore, With<Player>>,
    mut log: EventWriter<LogEvent>,
) {
    for ev in ev_list.read() {
        let Ok(store) = player.single() else {
            continue;
        };

        if ev.json {
            match serde_json::to_string_pretty(&store.snapshot()) {
                Ok(s) => log.write(LogEvent(s)),
                Err(e) => log.write(LogEvent(format!("序列化失败: {e}"))),
            };
            continue;
        }

        let lines = match ev.category {
            Some(category) => super::ui::render_category(store, category),
            None => render_slots(store),
        };
        for line in lines {
            log.write(LogEvent(line));
        }
    }
}

/// 打印背包属性合计
pub fn show_stats(
    mut ev_show: EventReader<ShowStatsEvent>,
    player: Query<&InventoryStore, With<Player>>,
    mut log: EventWriter<LogEvent>,
) {
    for _ in ev_show.read() {
        if let Ok(store) = player.single() {
            let s = store.total_stats();
            log.write(LogEvent(format!(
                "背包属性合计: STR {}  INT {}  WIL {}",
                s.strength, s.intelligence, s.willpower
            )));
        }
    }
}

/// 按格子列出背包
pub fn render_slots(store: &InventoryStore) -> Vec<String> {
    let mut lines = vec![format!(
        "=== 背包 ({}) ===",
        if store.is_bag_acquired() { "已拥有" } else { "未获得" }
    )];

    for (idx, slot) in store.slots().iter().enumerate() {
        if let Some(item) = slot.item() {
            lines.push(format!(
                "[{idx}] {} ×{}/{} (id={})",
                item.name,
                slot.quantity(),
                item.effective_max_stack(),
                item.id
            ));
        }
    }

    if lines.len() == 1 {
        lines.push("  (empty)".to_string());
    }
    lines
}
