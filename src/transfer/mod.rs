pub mod components;
pub mod events;
mod systems;

use bevy::prelude::*;
use crate::core::states::AppState;
use crate::inventory::InventorySet;
use components::*;
use events::*;
use systems::*;

pub struct TransferPlugin;
impl Plugin for TransferPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<TransferDesk>()
            .init_resource::<OpenPanels>()
            .add_event::<ItemDropped>()
            .add_event::<TabDropped>()
            .add_event::<QuantityInput>()
            .add_event::<DragStarted>()
            .add_event::<DragPayloadReady>()
            .add_event::<TransferOut>()
            .add_event::<PanelToggled>()
            .add_event::<QuantityPromptOpened>()
            .add_event::<PanelRemoveRequest>()
            .add_event::<SetFavoriteRequest>()
            .add_event::<StorageAddRequest>()
            .add_event::<MoveToCartRequest>()
            .add_systems(
                Update,
                (
                    track_open_panels,
                    handle_item_drops,
                    handle_quantity_input,
                    handle_tab_drops,
                    handle_drag_start,
                    handle_transfer_out,
                )
                    .chain()
                    .after(InventorySet::Actions)
                    .before(InventorySet::Projection)
                    .run_if(in_state(AppState::InGame)),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::events::LogEvent;
    use crate::core::testing::{drain, step, test_app};
    use crate::inventory::components::{InventoryStore, ItemCategory, ItemRecord};
    use crate::inventory::events::{InventoryAction, ServerNotification};

    fn storage_stack(count: u32) -> String {
        let item = ItemRecord::new(12, 501, ItemCategory::Healing).with_count(Some(count));
        TransferDescriptor::new(SourcePanel::Storage, &item)
            .encode()
            .unwrap()
    }

    #[test]
    fn stack_drop_waits_for_quantity() {
        let mut app = test_app();
        step(&mut app, ItemDropped { payload: storage_stack(30) });
        assert_eq!(drain::<QuantityPromptOpened>(&mut app), [QuantityPromptOpened { max: 30 }]);
        assert!(drain::<PanelRemoveRequest>(&mut app).is_empty());

        step(&mut app, QuantityInput::Submit(40));
        assert!(drain::<PanelRemoveRequest>(&mut app).is_empty());
        assert_eq!(drain::<LogEvent>(&mut app).len(), 1);

        step(&mut app, QuantityInput::Submit(10));
        assert_eq!(
            drain::<PanelRemoveRequest>(&mut app),
            [PanelRemoveRequest(RemoveRequest { panel: SourcePanel::Storage, index: 12, quantity: 10 })]
        );
        // 入包要等服务器通知
        assert!(app.world().resource::<InventoryStore>().is_empty());
    }

    #[test]
    fn single_item_drop_commits_at_once() {
        let mut app = test_app();
        step(&mut app, ItemDropped { payload: storage_stack(1) });
        assert!(drain::<QuantityPromptOpened>(&mut app).is_empty());
        assert_eq!(drain::<PanelRemoveRequest>(&mut app)[0].0.quantity, 1);
    }

    #[test]
    fn cancelled_prompt_issues_nothing() {
        let mut app = test_app();
        step(&mut app, ItemDropped { payload: storage_stack(5) });
        step(&mut app, QuantityInput::Cancel);
        step(&mut app, QuantityInput::Submit(2));

        assert!(drain::<PanelRemoveRequest>(&mut app).is_empty());
        assert!(app.world().resource::<TransferDesk>().pending().is_none());
        assert!(app.world().resource::<InventoryStore>().is_empty());
    }

    #[test]
    fn unknown_panel_is_dropped_silently() {
        let mut app = test_app();
        let text = r#"{"type":"item","from":"UnknownPanel","data":{"index":1,"item_type_id":501,"count":3,"category":"Healing"}}"#;
        step(&mut app, ItemDropped { payload: text.into() });

        assert!(drain::<PanelRemoveRequest>(&mut app).is_empty());
        assert!(drain::<QuantityPromptOpened>(&mut app).is_empty());
        assert!(app.world().resource::<TransferDesk>().pending().is_none());
    }

    #[test]
    fn alt_click_routes_to_open_panel() {
        let mut app = test_app();
        let stack = ItemRecord::new(4, 909, ItemCategory::Etc).with_count(Some(6));
        step(&mut app, ServerNotification::ItemAppeared(stack));

        step(&mut app, InventoryAction::Inspect { index: 4, alt: true });
        assert!(drain::<MoveToCartRequest>(&mut app).is_empty());
        assert!(drain::<StorageAddRequest>(&mut app).is_empty());

        step(&mut app, PanelToggled { panel: TransferTarget::Cart, open: true });
        step(&mut app, InventoryAction::Inspect { index: 4, alt: true });
        assert_eq!(drain::<MoveToCartRequest>(&mut app), [MoveToCartRequest { index: 4, count: 6 }]);

        step(&mut app, PanelToggled { panel: TransferTarget::Storage, open: true });
        step(&mut app, InventoryAction::Inspect { index: 4, alt: true });
        assert_eq!(drain::<StorageAddRequest>(&mut app), [StorageAddRequest { index: 4, count: 6 }]);
        assert!(drain::<MoveToCartRequest>(&mut app).is_empty());
    }

    #[test]
    fn own_drag_payload_only_works_on_tabs() {
        let mut app = test_app();
        let potion = ItemRecord::new(1, 501, ItemCategory::Healing).with_count(Some(2));
        step(&mut app, ServerNotification::ItemAppeared(potion));
        step(&mut app, DragStarted { index: 1 });

        let payload = drain::<DragPayloadReady>(&mut app).remove(0).0;
        let descriptor = TransferDescriptor::parse(&payload).unwrap();
        assert_eq!(descriptor.source, SourcePanel::Inventory);

        step(&mut app, ItemDropped { payload: payload.clone() });
        assert!(drain::<QuantityPromptOpened>(&mut app).is_empty());
        assert!(drain::<PanelRemoveRequest>(&mut app).is_empty());

        step(&mut app, TabDropped { payload, data_tab: "fav".into() });
        assert_eq!(
            drain::<SetFavoriteRequest>(&mut app),
            [SetFavoriteRequest { index: 1, favorite: true }]
        );
    }
}
