use std::fs;
use std::path::Path;

use anyhow::Context;
use bevy::prelude::*;
use serde_derive::Deserialize;

use crate::inventory::tabs::Tab;

/// 背包窗口偏好。构造时读入一次，运行期只改内存里的值。
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InventoryPreferences {
    /// 当前选中的标签页
    pub tab: Tab,
    /// 禁止把物品拖出窗口丢到地上
    pub item_lock: bool,
    /// 查看物品信息时同时显示同部位已穿戴装备
    pub item_compare: bool,
    /// 收藏页物品禁止卖给 NPC
    pub npc_sale_lock: bool,
    pub capacity: usize,
}

impl Default for InventoryPreferences {
    fn default() -> Self {
        Self {
            tab: Tab::Usable,
            item_lock: false,
            item_compare: false,
            npc_sale_lock: false,
            capacity: 100,
        }
    }
}

impl InventoryPreferences {
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("invalid inventory preferences")
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&text)
    }

    /// 读取失败时退回默认值，不阻止启动
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(prefs) => prefs,
            Err(err) => {
                warn!("使用默认背包偏好: {err:#}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let prefs = InventoryPreferences::from_toml("tab = \"fav\"\nitem_compare = true").unwrap();
        assert_eq!(prefs.tab, Tab::Favorite);
        assert!(prefs.item_compare);
        assert!(!prefs.item_lock);
        assert_eq!(prefs.capacity, 100);
    }

    #[test]
    fn unknown_tab_is_rejected() {
        assert!(InventoryPreferences::from_toml("tab = \"weapons\"").is_err());
    }

    #[test]
    fn unreadable_file_yields_defaults() {
        let prefs = InventoryPreferences::load_or_default("does/not/exist.toml");
        assert_eq!(prefs, InventoryPreferences::default());
    }
}
