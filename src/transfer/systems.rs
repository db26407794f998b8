use super::{components::*, events::*};
use crate::core::events::LogEvent;
use crate::inventory::components::InventoryStore;
use bevy::prelude::*;

pub fn track_open_panels(mut ev_toggle: EventReader<PanelToggled>, mut panels: ResMut<OpenPanels>) {
    for toggle in ev_toggle.read() {
        match toggle.panel {
            TransferTarget::Storage => panels.storage = toggle.open,
            TransferTarget::Cart => panels.cart = toggle.open,
        }
    }
}

/// 放到背包上：解析、决定是否弹数量框、向来源面板发移除请求
pub fn handle_item_drops(
    mut ev_drop: EventReader<ItemDropped>,
    mut desk: ResMut<TransferDesk>,
    mut prompt: EventWriter<QuantityPromptOpened>,
    mut remove: EventWriter<PanelRemoveRequest>,
) {
    for ItemDropped { payload } in ev_drop.read() {
        match desk.begin(payload) {
            Ok(TransferStep::AwaitQuantity { max }) => {
                prompt.write(QuantityPromptOpened { max });
            }
            Ok(TransferStep::Commit(request)) => {
                remove.write(PanelRemoveRequest(request));
            }
            Err(err) => debug!("放弃转移: {err}"),
        }
    }
}

pub fn handle_quantity_input(
    mut ev_input: EventReader<QuantityInput>,
    mut desk: ResMut<TransferDesk>,
    mut remove: EventWriter<PanelRemoveRequest>,
    mut log_event: EventWriter<LogEvent>,
) {
    for input in ev_input.read() {
        match *input {
            QuantityInput::Submit(quantity) => match desk.submit(quantity) {
                Ok(request) => {
                    remove.write(PanelRemoveRequest(request));
                }
                Err(err @ TransferError::InvalidQuantity { .. }) => {
                    log_event.write(LogEvent(err.to_string()));
                }
                Err(err) => debug!("{err}"),
            },
            QuantityInput::Cancel => {
                desk.cancel();
            }
        }
    }
}

pub fn handle_tab_drops(
    mut ev_drop: EventReader<TabDropped>,
    mut favorite: EventWriter<SetFavoriteRequest>,
) {
    for TabDropped { payload, data_tab } in ev_drop.read() {
        match favorite_request(payload, data_tab) {
            Ok((index, on)) => {
                favorite.write(SetFavoriteRequest { index, favorite: on });
            }
            Err(err) => debug!("忽略标签页拖放: {err}"),
        }
    }
}

pub fn handle_drag_start(
    mut ev_drag: EventReader<DragStarted>,
    store: Res<InventoryStore>,
    mut ready: EventWriter<DragPayloadReady>,
) {
    for DragStarted { index } in ev_drag.read() {
        let Some(item) = store.get(*index) else {
            warn!("拖拽未知物品 index={index}");
            continue;
        };
        match TransferDescriptor::new(SourcePanel::Inventory, item).encode() {
            Ok(text) => {
                ready.write(DragPayloadReady(text));
            }
            Err(err) => warn!("无法生成拖拽数据: {err}"),
        }
    }
}

/// Alt + 右键：仓库打开时存入仓库，否则放进手推车
pub fn handle_transfer_out(
    mut ev_out: EventReader<TransferOut>,
    store: Res<InventoryStore>,
    panels: Res<OpenPanels>,
    mut storage_add: EventWriter<StorageAddRequest>,
    mut move_to_cart: EventWriter<MoveToCartRequest>,
) {
    for TransferOut { index } in ev_out.read() {
        let Some(item) = store.get(*index) else {
            warn!("转移未知物品 index={index}");
            continue;
        };
        let count = item.display_count();
        match panels.transfer_target() {
            Some(TransferTarget::Storage) => {
                storage_add.write(StorageAddRequest { index: *index, count });
            }
            Some(TransferTarget::Cart) => {
                move_to_cart.write(MoveToCartRequest { index: *index, count });
            }
            None => debug!("没有打开的仓库或手推车"),
        }
    }
}
