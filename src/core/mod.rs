use bevy::prelude::*;

pub mod states;
pub mod events;
pub mod resources;

/// 核心插件：注册全局资源 / 事件 / 状态
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        use states::AppState;

        // 插件首次载入时，插入初始 State
        app
            .init_state::<AppState>()
            .add_event::<events::LogEvent>()
            .init_resource::<resources::GameConfig>()
            .add_systems(PreStartup, load_config)
            .add_systems(Startup, events::hello_world);
    }
}

/// 读取 config/game.toml 覆盖默认配置
fn load_config(mut commands: Commands) {
    let config = resources::GameConfig::load_or_default(resources::CONFIG_PATH);
    info!("config: {config:?}");
    commands.insert_resource(config);
}
