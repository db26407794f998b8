use bevy::prelude::*;

use super::components::SwitchCommand;
use crate::inventory::components::{ItemIndex, ItemRecord};

/// 穿上装备（带 `wear_state` 的物品）
#[derive(Event, Debug, Clone)]
pub struct WearItem(pub ItemRecord);

#[derive(Event, Debug, Clone, Copy)]
pub struct TakeOffItem {
    pub index: ItemIndex,
}

/// 玩家加入 / 移出换装列表，按发生顺序处理
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchListAction {
    Stage(ItemIndex),
    Unstage(ItemIndex),
}

/// 发给换装预览窗口
#[derive(Event, Debug, Clone, PartialEq)]
pub struct SwitchPreviewCommand(pub SwitchCommand);
