pub mod components;

use crate::core::{resources::GameConfig, states::AppState};
use crate::inventory::{components::InventoryWatch, InventoryStore};
use bevy::prelude::*;
use components::Player;

pub struct CharacterPlugin;

impl Plugin for CharacterPlugin {
    fn build(&self, app: &mut App) {
        // 在游戏开始时生成玩家
        app.add_systems(OnEnter(AppState::InGame), spawn_player);
    }
}

/// 初始化玩家实体，背包随玩家一起创建
pub fn spawn_player(mut commands: Commands, config: Res<GameConfig>) {
    let store = InventoryStore::new(config.inventory_capacity);
    let watch = InventoryWatch::new(&store);
    info!("spawn player with {} inventory slots", store.capacity());
    commands.spawn((Player, store, watch));
}
