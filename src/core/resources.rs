use anyhow::{Context, ensure};
use bevy::prelude::*;
use serde_derive::Deserialize;
use std::path::Path;

pub const CONFIG_PATH: &str = "config/game.toml";

/// 全局配置（config/game.toml）
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// 背包格数，构造后不可变
    pub inventory_capacity: usize,
    /// 物品目录（相对 assets/）
    pub catalog_path: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            inventory_capacity: 12,
            catalog_path: "data/items.catalog.ron".into(),
        }
    }
}

impl GameConfig {
    pub fn from_toml(s: &str) -> anyhow::Result<Self> {
        let config: GameConfig = toml::from_str(s).context("parse game config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read {}", path.display()))?;
        Self::from_toml(&s)
    }

    /// 文件缺失或非法时退回默认值
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            warn!("{} not found, using default config", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                error!("invalid config {}: {e:#}", path.display());
                Self::default()
            }
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.inventory_capacity >= 1, "inventory_capacity must be >= 1");
        ensure!(!self.catalog_path.is_empty(), "catalog_path must not be empty");
        Ok(())
    }
}
