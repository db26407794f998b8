use bevy::prelude::*;

use super::components::{RemoveRequest, TransferTarget};
use crate::inventory::components::ItemIndex;

/// 物品被放到背包格子区域，`payload` 为拖拽数据原文
#[derive(Event, Debug, Clone)]
pub struct ItemDropped {
    pub payload: String,
}

/// 物品被放到某个标签页按钮上
#[derive(Event, Debug, Clone)]
pub struct TabDropped {
    pub payload: String,
    pub data_tab: String,
}

/// 数量输入框的结果
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityInput {
    Submit(u32),
    Cancel,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct DragStarted {
    pub index: ItemIndex,
}

/// 背包发出的拖拽数据
#[derive(Event, Debug, Clone)]
pub struct DragPayloadReady(pub String);

/// Alt + 右键
#[derive(Event, Debug, Clone, Copy)]
pub struct TransferOut {
    pub index: ItemIndex,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct PanelToggled {
    pub panel: TransferTarget,
    pub open: bool,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityPromptOpened {
    pub max: u32,
}

/* ---------- 发往其它面板 / 服务器 ---------- */

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelRemoveRequest(pub RemoveRequest);

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetFavoriteRequest {
    pub index: ItemIndex,
    pub favorite: bool,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageAddRequest {
    pub index: ItemIndex,
    pub count: u32,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveToCartRequest {
    pub index: ItemIndex,
    pub count: u32,
}
