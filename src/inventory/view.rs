//! 背包窗口的投影：由镜像推导出的可见行、计数和信息面板，不反向修改镜像。

use bevy::prelude::*;

use super::components::{InventoryStore, ItemIndex, ItemRecord};
use super::tabs::{self, Tab};
use crate::data::ItemCatalog;
use crate::equipment::components::EquipSwitchCoordinator;

#[derive(Debug, Clone, PartialEq)]
pub struct ItemRow {
    pub index: ItemIndex,
    pub item_type_id: u32,
    pub count: u32,
    /// 悬停提示，例如 `Red Potion: 3 ea`
    pub label: String,
    pub is_new: bool,
    /// 已加入换装列表
    pub staged: bool,
    /// 未鉴定物品提示文字置灰
    pub grey: bool,
}

#[derive(Resource, Debug, Default)]
pub struct InventoryView {
    pub open: bool,
    pub tab: Tab,
    pub rows: Vec<ItemRow>,
    /// 背包物品数 + 已穿戴数
    pub occupied: usize,
    pub capacity: usize,
    pub has_new_items: bool,
}

pub fn hover_label(item: &ItemRecord, catalog: &ItemCatalog) -> String {
    format!(
        "{}: {}{}",
        catalog.item_name(item),
        item.display_count(),
        item.quantity_suffix()
    )
}

pub fn build_rows(
    store: &InventoryStore,
    tab: Tab,
    switch_list: &EquipSwitchCoordinator,
    catalog: &ItemCatalog,
) -> Vec<ItemRow> {
    tabs::visible_list(store, tab)
        .into_iter()
        .map(|item| ItemRow {
            index: item.index,
            item_type_id: item.item_type_id,
            count: item.display_count(),
            label: hover_label(item, catalog),
            is_new: store.is_new(item.index),
            staged: switch_list.is_staged(item.index),
            grey: !item.is_identified,
        })
        .collect()
}

/// 物品信息窗口及装备对比窗口
#[derive(Resource, Debug, Default)]
pub struct ItemInfoPanel {
    pub item: Option<ItemRecord>,
    pub compare: Option<ItemRecord>,
}

impl ItemInfoPanel {
    /// 打开信息窗口；同类型物品再点一次则连同对比窗口一起关闭。返回是否处于打开状态。
    pub fn inspect(&mut self, item: &ItemRecord, compare: Option<&ItemRecord>) -> bool {
        if self
            .item
            .as_ref()
            .is_some_and(|shown| shown.item_type_id == item.item_type_id)
        {
            self.item = None;
            self.compare = None;
            return false;
        }
        self.item = Some(item.clone());
        self.compare = compare.cloned();
        true
    }
}
