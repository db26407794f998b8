use super::{components::*, events::*, view::*};
use crate::core::{events::LogEvent, resources::InventoryPreferences};
use crate::data::ItemCatalog;
use crate::equipment::components::{EquipSwitchCoordinator, Equipment};
use crate::equipment::events::{TakeOffItem, WearItem};
use crate::transfer::events::TransferOut;
use bevy::prelude::*;

/// 按到达顺序把服务器通知应用到背包镜像
pub fn apply_server_notifications(
    mut ev_notify: EventReader<ServerNotification>,
    mut store: ResMut<InventoryStore>,
    prefs: Res<InventoryPreferences>,
    mut count_changed: EventWriter<ItemCountChanged>,
    mut wear: EventWriter<WearItem>,
    mut take_off: EventWriter<TakeOffItem>,
    mut dirty: EventWriter<VisibleListDirty>,
) {
    for notification in ev_notify.read() {
        let applied: Vec<Applied> = match notification {
            ServerNotification::ItemsAppeared(items) => store.apply_batch(items.iter().cloned()),
            ServerNotification::ItemAppeared(item) => vec![store.add(item.clone())],
            ServerNotification::ItemRemoved { index, count } => {
                store.remove(*index, *count).map(Applied::Stored).into_iter().collect()
            }
            ServerNotification::ItemCountSet { index, count } => {
                store.update(*index, *count).map(Applied::Stored).into_iter().collect()
            }
            ServerNotification::ItemFavoriteChanged { index, flag } => store
                .set_favorite(*index, *flag != 0)
                .map(Applied::Stored)
                .into_iter()
                .collect(),
            ServerNotification::ItemWorn { index, wear_state } => {
                match store.take_worn(*index, *wear_state) {
                    Some((item, mutation)) => {
                        vec![Applied::Stored(mutation), Applied::Redirected(item)]
                    }
                    None => {
                        debug!("穿戴通知指向未知物品 index={index}");
                        Vec::new()
                    }
                }
            }
            ServerNotification::ItemTakenOff { index } => {
                take_off.write(TakeOffItem { index: *index });
                Vec::new()
            }
        };

        for effect in applied {
            match effect {
                Applied::Stored(mutation) => {
                    if mutation.changes_count() {
                        count_changed.write(ItemCountChanged {
                            item_type_id: mutation.item_type_id,
                            count: mutation.count,
                        });
                    }
                    if mutation.kind == MutationKind::Reclassified
                        || mutation.tab == Some(prefs.tab)
                    {
                        dirty.write(VisibleListDirty);
                    }
                }
                Applied::Redirected(item) => {
                    wear.write(WearItem(item));
                }
            }
        }
    }
}

/// 处理窗口上的操作：切换标签页、双击、右键、开关窗口
pub fn handle_inventory_actions(
    mut ev_action: EventReader<InventoryAction>,
    mut store: ResMut<InventoryStore>,
    mut prefs: ResMut<InventoryPreferences>,
    mut view: ResMut<InventoryView>,
    mut info_panel: ResMut<ItemInfoPanel>,
    equipment: Res<Equipment>,
    mut use_item: EventWriter<UseItemRequest>,
    mut use_card: EventWriter<UseCardRequest>,
    mut equip_item: EventWriter<EquipItemRequest>,
    mut transfer_out: EventWriter<TransferOut>,
    mut dirty: EventWriter<VisibleListDirty>,
) {
    for action in ev_action.read() {
        match *action {
            InventoryAction::SwitchTab(tab) => {
                prefs.tab = tab;
                dirty.write(VisibleListDirty);
            }

            InventoryAction::Activate(index) => {
                let Some(item) = store.get(index) else {
                    debug!("双击未知物品 index={index}");
                    continue;
                };
                match item.activation() {
                    Some(Activation::Use(index)) => {
                        use_item.write(UseItemRequest { index });
                    }
                    Some(Activation::UseCard(index)) => {
                        use_card.write(UseCardRequest { index });
                    }
                    Some(Activation::Equip { index, location }) => {
                        equip_item.write(EquipItemRequest { index, location });
                    }
                    None => {}
                }
            }

            InventoryAction::Inspect { index, alt } => {
                let Some(item) = store.get(index) else {
                    continue;
                };
                if alt {
                    transfer_out.write(TransferOut { index });
                    continue;
                }
                let compare = if prefs.item_compare {
                    equipment.occupant(item.location)
                } else {
                    None
                };
                info_panel.inspect(item, compare);
            }

            InventoryAction::ToggleWindow => {
                view.open = !view.open;
                if !view.open {
                    store.clear_new_items();
                    info_panel.item = None;
                    info_panel.compare = None;
                }
                dirty.write(VisibleListDirty);
            }

            InventoryAction::TogglePreference(flag) => {
                let value = match flag {
                    PreferenceFlag::ItemLock => &mut prefs.item_lock,
                    PreferenceFlag::ItemCompare => &mut prefs.item_compare,
                    PreferenceFlag::NpcSaleLock => &mut prefs.npc_sale_lock,
                };
                *value = !*value;
            }
        }
    }
}

/// 重算当前标签页的可见行与计数
pub fn refresh_inventory_view(
    mut ev_dirty: EventReader<VisibleListDirty>,
    store: Res<InventoryStore>,
    prefs: Res<InventoryPreferences>,
    switch: Res<EquipSwitchCoordinator>,
    equipment: Res<Equipment>,
    catalog: Res<ItemCatalog>,
    mut view: ResMut<InventoryView>,
) {
    let rebuild = !ev_dirty.is_empty() || prefs.is_changed() || catalog.is_changed();
    ev_dirty.clear();

    if rebuild {
        view.tab = prefs.tab;
        view.rows = build_rows(&store, prefs.tab, &switch, &catalog);
    }
    if rebuild || store.is_changed() || equipment.is_changed() {
        view.occupied = store.len() + equipment.count();
        view.capacity = prefs.capacity;
        view.has_new_items = store.has_new_items();
    }
}

/// 打印背包内容
pub fn print_inventory(
    mut ev_list: EventReader<ListInventoryEvent>,
    view: Res<InventoryView>,
    mut log_event: EventWriter<LogEvent>,
) {
    if ev_list.is_empty() {
        return;
    }
    ev_list.clear();

    let mut lines = vec![format!(
        "[{}] {}/{}{}",
        view.tab.label(),
        view.occupied,
        view.capacity,
        if view.has_new_items { " (new)" } else { "" }
    )];
    for row in &view.rows {
        lines.push(format!(
            "  #{} {}{}{}",
            row.index,
            row.label,
            if row.is_new { " [new]" } else { "" },
            if row.staged { " [swap]" } else { "" },
        ));
    }
    if view.rows.is_empty() {
        lines.push("  (empty)".into());
    }
    log_event.write(LogEvent(lines.join("\n")));
}

/// 离开游戏时清空镜像和界面
pub fn reset_inventory(
    mut store: ResMut<InventoryStore>,
    mut view: ResMut<InventoryView>,
    mut info_panel: ResMut<ItemInfoPanel>,
) {
    store.clear();
    *view = InventoryView::default();
    *info_panel = ItemInfoPanel::default();
}
