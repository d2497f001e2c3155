pub mod schema;
pub mod loader;

use bevy::prelude::*;
use schema::ItemCatalog;
use crate::core::{resources::GameConfig, states::AppState};

// --------------------------- 资源 ---------------------------
#[derive(Resource, Default)]
pub struct ItemAssets {
    handle: Option<Handle<ItemCatalog>>,
}

impl ItemAssets {
    /// 目录尚未加载完成时返回 None
    pub fn catalog<'a>(&self, catalogs: &'a Assets<ItemCatalog>) -> Option<&'a ItemCatalog> {
        self.handle.as_ref().and_then(|h| catalogs.get(h))
    }
}

// --------------------------- 插件 ---------------------------
pub struct DataPlugin;
impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app
            // 注册资产类型 & Loader
            .init_asset::<ItemCatalog>()
            .register_asset_loader(loader::RonCatalogLoader)
            // 注册资源
            .init_resource::<ItemAssets>()
            // Loading 流程
            .add_systems(OnEnter(AppState::Loading), start_loading)
            .add_systems(
                Update,
                check_loaded.run_if(in_state(AppState::Loading)),
            );
    }
}

// --------------------------- 系统 ---------------------------
fn start_loading(
    mut item_assets: ResMut<ItemAssets>,
    asset_server: Res<AssetServer>,
    config: Res<GameConfig>,
) {
    let handle: Handle<ItemCatalog> = asset_server.load(config.catalog_path.clone());
    item_assets.handle = Some(handle);
}

fn check_loaded(
    mut commands: Commands,
    mut next: ResMut<NextState<AppState>>,
    item_assets: Res<ItemAssets>,
    catalogs: Res<Assets<ItemCatalog>>,
) {
    if let Some(catalog) = item_assets.catalog(&catalogs) {
        info!("✔ Items loaded: {}", catalog.len());
        commands.insert_resource(catalog.clone());
        next.set(AppState::InGame);
    }
}
