//! 文字版背包面板：按分类列出持有物品，打开时随背包变化自动刷新

use bevy::prelude::*;

use super::events::*;
use super::store::InventoryStore;
use crate::character::components::Player;
use crate::core::events::LogEvent;
use crate::data::schema::ItemCategory;

#[derive(Resource, Debug, Default)]
pub struct InventoryPanel {
    pub open: bool,
    pub active_category: ItemCategory,
}

pub fn update_panel(
    mut ev_toggle: EventReader<TogglePanelEvent>,
    mut ev_select: EventReader<SelectCategoryEvent>,
    mut ev_changed: EventReader<InventoryChanged>,
    mut panel: ResMut<InventoryPanel>,
    player: Query<(Entity, &InventoryStore), With<Player>>,
    mut log: EventWriter<LogEvent>,
) {
    let Ok((player_entity, store)) = player.single() else {
        ev_toggle.clear();
        ev_select.clear();
        ev_changed.clear();
        return;
    };

    let mut refresh = false;

    for _ in ev_toggle.read() {
        // 拿到背包前面板不可用
        if !store.is_bag_acquired() {
            log.write(LogEvent("还没有背包".into()));
            continue;
        }
        panel.open = !panel.open;
        if panel.open {
            refresh = true;
        } else {
            log.write(LogEvent("背包面板已关闭".into()));
        }
    }

    for SelectCategoryEvent(category) in ev_select.read() {
        panel.active_category = *category;
        refresh = true;
    }

    if ev_changed.read().filter(|e| e.entity == player_entity).count() > 0 {
        refresh = true;
    }

    if refresh && panel.open {
        for line in render_category(store, panel.active_category) {
            log.write(LogEvent(line));
        }
    }
}

/// 某一分类下的物品列表
pub fn render_category(store: &InventoryStore, category: ItemCategory) -> Vec<String> {
    let mut lines = vec![format!("=== {category} ===")];
    let mut entries = store.query(category).peekable();
    if entries.peek().is_none() {
        lines.push("  (empty)".to_string());
        return lines;
    }
    for (item, quantity) in entries {
        let s = item.stats;
        lines.push(format!(
            "{} ×{}  STR {}  INT {}  WIL {}",
            item.name, quantity, s.strength, s.intelligence, s.willpower
        ));
    }
    lines
}
