use bevy::asset::Asset;
use bevy::reflect::TypePath;
use serde_derive::Deserialize;

/// 物品目录中的一条静态定义，按 `id`（物品类型编号）索引
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemEntry {
    pub id:   u32,
    pub name: String,
    /// 未鉴定时显示的名字，缺省沿用 `name`
    #[serde(default)] pub unidentified_name: Option<String>,
}

impl ItemEntry {
    pub fn display_name(&self, identified: bool) -> &str {
        match (&self.unidentified_name, identified) {
            (Some(unknown), false) => unknown,
            _ => &self.name,
        }
    }
}

#[derive(Asset, TypePath, Deserialize, Debug)]
pub struct ItemList {
    pub items: Vec<ItemEntry>,
}
