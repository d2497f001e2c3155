pub mod category;
pub mod components;
pub mod error;
pub mod events;
pub mod notifier;
pub mod pickup;
pub mod slot;
pub mod store;
pub mod ui;
mod systems;

use bevy::prelude::*;
use crate::core::states::AppState;
use events::*;
use systems::*;

pub use store::InventoryStore;

/// 拾取相关系统所在的集合，CLI 等生成世界物体的系统需排在它之前
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectSet;

pub struct InventoryPlugin;
impl Plugin for InventoryPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<ui::InventoryPanel>()
            .add_event::<TriggerEnter>()
            .add_event::<GiveItemEvent>()
            .add_event::<RemoveItemEvent>()
            .add_event::<ListInventoryEvent>()
            .add_event::<InventoryChanged>()
            .add_event::<TogglePanelEvent>()
            .add_event::<SelectCategoryEvent>()
            .add_event::<ShowStatsEvent>()
            .add_systems(
                Update,
                (
                    (handle_trigger_enter, give_item, remove_item).in_set(CollectSet),
                    emit_inventory_changed,
                    ui::update_panel,
                    print_inventory,
                    show_stats,
                )
                    .chain()
                    .run_if(in_state(AppState::InGame)),
            );
    }
}
