use bevy::prelude::*;
use crate::data::schema::ItemCategory;

/// 物理层报告：collector 碰到了 other
#[derive(Event, Debug, Clone, Copy)]
pub struct TriggerEnter {
    pub collector: Entity,
    pub other:     Entity,
}

/// 调试命令：直接往玩家背包塞物品
#[derive(Event)]
pub struct GiveItemEvent {
    pub id:    String,
    pub count: u32,
}

/// 调试命令：从玩家背包移除物品
#[derive(Event)]
pub struct RemoveItemEvent {
    pub id:    String,
    pub count: u32,
}

/// 让 CLI 请求打印背包；None=全部格子
#[derive(Event, Default)]
pub struct ListInventoryEvent {
    pub category: Option<ItemCategory>,
    pub json:     bool,
}

/// 背包内容发生变化（由 store 的 revision 推导）
#[derive(Event, Debug, Clone, Copy)]
pub struct InventoryChanged {
    pub entity: Entity,
}

#[derive(Event)]
pub struct TogglePanelEvent;

#[derive(Event)]
pub struct SelectCategoryEvent(pub ItemCategory);

/// 打印属性合计
#[derive(Event)]
pub struct ShowStatsEvent;
