use bevy::prelude::*;

use super::components::{EquipLocation, ItemIndex, ItemRecord};
use super::tabs::Tab;

/// 服务器下发的物品通知。共用一个事件类型，按到达顺序逐条应用。
#[derive(Event, Debug, Clone)]
pub enum ServerNotification {
    ItemsAppeared(Vec<ItemRecord>),
    ItemAppeared(ItemRecord),
    ItemRemoved { index: ItemIndex, count: u32 },
    ItemCountSet { index: ItemIndex, count: u32 },
    ItemFavoriteChanged { index: ItemIndex, flag: u8 },
    /// 背包里的物品被穿上
    ItemWorn { index: ItemIndex, wear_state: EquipLocation },
    /// 脱下；之后服务器会再发一次 ItemAppeared
    ItemTakenOff { index: ItemIndex },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceFlag {
    ItemLock,
    ItemCompare,
    NpcSaleLock,
}

/// 玩家在背包窗口上的操作
#[derive(Event, Debug, Clone)]
pub enum InventoryAction {
    SwitchTab(Tab),
    /// 双击
    Activate(ItemIndex),
    /// 右键查看信息，按住 Alt 时改为转移到已打开的仓库 / 手推车
    Inspect { index: ItemIndex, alt: bool },
    /// 打开 / 关闭窗口，关闭时清除新物品标记
    ToggleWindow,
    TogglePreference(PreferenceFlag),
}

/// 某类物品的携带数量变了，徽标和任务追踪只认这个
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemCountChanged {
    pub item_type_id: u32,
    pub count: u32,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct UseItemRequest {
    pub index: ItemIndex,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct UseCardRequest {
    pub index: ItemIndex,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EquipItemRequest {
    pub index: ItemIndex,
    pub location: EquipLocation,
}

/// 当前标签页需要整页重算
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct VisibleListDirty;

#[derive(Event)]
pub struct ListInventoryEvent;   // 让 CLI 请求打印背包
