pub mod schema;
pub mod loader;

use std::collections::HashMap;

use bevy::prelude::*;
use schema::{ItemEntry, ItemList};
use crate::core::states::AppState;
use crate::inventory::components::ItemRecord;

// --------------------------- 资源 ---------------------------
#[derive(Resource, Default)]
pub struct ItemAssets {
    handle: Option<Handle<ItemList>>,
}

/// 已加载的物品目录，按物品类型编号查找
#[derive(Resource, Default, Debug)]
pub struct ItemCatalog {
    entries: HashMap<u32, ItemEntry>,
}

impl ItemCatalog {
    pub fn from_entries(entries: impl IntoIterator<Item = ItemEntry>) -> Self {
        Self {
            entries: entries.into_iter().map(|e| (e.id, e)).collect(),
        }
    }

    pub fn get(&self, item_type_id: u32) -> Option<&ItemEntry> {
        self.entries.get(&item_type_id)
    }

    /// 按 id 排序后的全部条目
    pub fn entries(&self) -> Vec<&ItemEntry> {
        let mut all: Vec<_> = self.entries.values().collect();
        all.sort_by_key(|e| e.id);
        all
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 显示名；目录里没有时用 `Item #<id>`
    pub fn item_name(&self, item: &ItemRecord) -> String {
        self.get(item.item_type_id)
            .map(|e| e.display_name(item.is_identified).to_string())
            .unwrap_or_else(|| format!("Item #{}", item.item_type_id))
    }
}

// --------------------------- 插件 ---------------------------
pub struct DataPlugin;
impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_asset::<ItemList>()
            .register_asset_loader(loader::RonItemLoader)
            .init_resource::<ItemAssets>()
            .init_resource::<ItemCatalog>()
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
) {
    let handle: Handle<ItemList> = asset_server.load("data/items.ron");
    item_assets.handle = Some(handle);
}

fn check_loaded(
    mut next: ResMut<NextState<AppState>>,
    mut catalog: ResMut<ItemCatalog>,
    item_assets: Res<ItemAssets>,
    lists: Res<Assets<ItemList>>,
) {
    if let Some(list) = item_assets.handle.as_ref().and_then(|h| lists.get(h)) {
        *catalog = ItemCatalog::from_entries(list.items.iter().cloned());
        info!("物品目录已加载: {} 条", catalog.len());
        next.set(AppState::InGame);
    }
}
