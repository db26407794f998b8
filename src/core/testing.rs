//! 无窗口的测试 App：只挂同步相关插件，直接进入 InGame。

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use super::{events::LogEvent, resources::InventoryPreferences, states::AppState};
use crate::data::ItemCatalog;
use crate::equipment::EquipmentPlugin;
use crate::inventory::InventoryPlugin;
use crate::transfer::TransferPlugin;

pub fn test_app() -> App {
    let mut app = App::new();
    app.add_plugins(StatesPlugin)
        .init_state::<AppState>()
        .add_event::<LogEvent>()
        .insert_resource(InventoryPreferences::default())
        .init_resource::<ItemCatalog>()
        .add_plugins((InventoryPlugin, EquipmentPlugin, TransferPlugin));

    app.world_mut()
        .resource_mut::<NextState<AppState>>()
        .set(AppState::InGame);
    app.update();
    app
}

/// 发一个事件并跑一帧
pub fn step<E: Event>(app: &mut App, event: E) {
    app.world_mut().send_event(event);
    app.update();
}

/// 取出到目前为止写入的全部事件
pub fn drain<E: Event>(app: &mut App) -> Vec<E> {
    app.world_mut().resource_mut::<Events<E>>().drain().collect()
}
