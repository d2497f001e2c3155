use bevy::asset::{io::Reader, ron, AssetLoader, LoadContext};
use std::collections::HashSet;
use std::future::Future;
use thiserror::Error;

use super::schema::{ItemCatalog, ItemDefinition, ItemList};

#[derive(Default)]
pub struct RonCatalogLoader;

#[derive(Debug, Error)]
pub enum RonCatalogLoaderError {
    #[error("Could not load asset: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not parse RON: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("Could not interpret bytes as UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("Invalid catalog: {0}")]
    Invalid(String),
}

impl AssetLoader for RonCatalogLoader {
    type Asset = ItemCatalog;
    type Settings = ();
    type Error = RonCatalogLoaderError;

    fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        _load_context: &mut LoadContext,
    ) -> impl Future<Output = Result<Self::Asset, Self::Error>> + Send {
        async move {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes).await?;

            let s = std::str::from_utf8(&bytes)?;
            parse_catalog(s)
        }
    }

    fn extensions(&self) -> &[&str] {
        &["catalog.ron"]
    }
}

/// 解析 + 校验：max_stack 不能为 0，id 不能重复（忽略大小写）
pub fn parse_catalog(s: &str) -> Result<ItemCatalog, RonCatalogLoaderError> {
    let list: ItemList = ron::de::from_str(s)?;

    let mut seen = HashSet::new();
    let mut items = Vec::with_capacity(list.items.len());
    for entry in list.items {
        let entry = normalize(entry);
        if entry.max_stack == 0 {
            return Err(RonCatalogLoaderError::Invalid(format!(
                "item `{}` has max_stack = 0",
                entry.id
            )));
        }
        if !seen.insert(entry.id.to_lowercase()) {
            return Err(RonCatalogLoaderError::Invalid(format!(
                "duplicate item id `{}`",
                entry.id
            )));
        }
        items.push(entry.shared());
    }

    Ok(ItemCatalog::new(items))
}

fn normalize(mut entry: ItemDefinition) -> ItemDefinition {
    if !entry.stackable {
        entry.max_stack = 1;
    }
    entry
}
