use bevy::prelude::*;

/// 玩家标记组件
#[derive(Component, Debug, Default)]
pub struct Player;
