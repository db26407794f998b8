use super::{components::*, events::*};
use crate::core::events::LogEvent;
use crate::data::ItemCatalog;
use crate::inventory::{components::InventoryStore, events::VisibleListDirty};
use bevy::prelude::*;

/// 穿上装备（“穿戴中”名单已由背包镜像在收到通知时记下）
pub fn wear_items(
    mut ev_wear: EventReader<WearItem>,
    mut equipment: ResMut<Equipment>,
    catalog: Res<ItemCatalog>,
) {
    for WearItem(item) in ev_wear.read() {
        for old in equipment.wear(item.clone()) {
            debug!("{} 被替换下来", catalog.item_name(&old));
        }
        info!("穿上 {}", catalog.item_name(item));
    }
}

/// 脱下装备
pub fn take_off_items(mut ev_take_off: EventReader<TakeOffItem>, mut equipment: ResMut<Equipment>) {
    for ev in ev_take_off.read() {
        if equipment.take_off(ev.index).is_none() {
            debug!("脱下未穿戴的装备 index={}", ev.index);
        }
    }
}

/// 处理换装列表的加入 / 移出
pub fn handle_switch_actions(
    mut ev_action: EventReader<SwitchListAction>,
    mut switch: ResMut<EquipSwitchCoordinator>,
    store: Res<InventoryStore>,
    catalog: Res<ItemCatalog>,
    mut preview: EventWriter<SwitchPreviewCommand>,
    mut log_event: EventWriter<LogEvent>,
    mut dirty: EventWriter<VisibleListDirty>,
) {
    for action in ev_action.read() {
        let (index, result, message) = match *action {
            SwitchListAction::Stage(index) => (index, switch.stage(&store, index), "已加入换装列表"),
            SwitchListAction::Unstage(index) => {
                (index, switch.unstage(&store, index), "已移出换装列表")
            }
        };

        match result {
            Ok(commands) if commands.is_empty() => {}
            Ok(commands) => {
                if let Some(item) = store.get(index) {
                    log_event.write(LogEvent(format!("{} {}", catalog.item_name(item), message)));
                }
                for command in commands {
                    preview.write(SwitchPreviewCommand(command));
                }
                dirty.write(VisibleListDirty);
            }
            Err(err) => warn!("换装列表操作失败: {err}"),
        }
    }
}

/// 背包镜像变化后，清掉已经不在背包里的换装条目
pub fn reconcile_switch_list(
    store: Res<InventoryStore>,
    mut switch: ResMut<EquipSwitchCoordinator>,
    mut preview: EventWriter<SwitchPreviewCommand>,
) {
    if !store.is_changed() {
        return;
    }
    for command in switch.reconcile(&store) {
        preview.write(SwitchPreviewCommand(command));
    }
}

/// 把指令应用到换装预览窗口
pub fn apply_switch_preview(
    mut ev_preview: EventReader<SwitchPreviewCommand>,
    mut preview: ResMut<SwitchPreview>,
    equipment: Res<Equipment>,
) {
    for SwitchPreviewCommand(command) in ev_preview.read() {
        preview.apply(command, &equipment);
    }
}

pub fn reset_equipment(
    mut equipment: ResMut<Equipment>,
    mut switch: ResMut<EquipSwitchCoordinator>,
    mut preview: ResMut<SwitchPreview>,
) {
    *equipment = Equipment::default();
    switch.clear();
    *preview = SwitchPreview::default();
}
