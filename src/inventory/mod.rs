pub mod components;
pub mod events;
pub mod tabs;
pub mod view;
mod systems;

use bevy::prelude::*;
use crate::core::states::AppState;
use components::*;
use events::*;
use systems::*;
use view::*;

/// 同一帧内的先后：先应用服务器通知，再处理玩家操作，最后刷新界面
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum InventorySet {
    Mirror,
    Actions,
    Projection,
}

pub struct InventoryPlugin;
impl Plugin for InventoryPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<InventoryStore>()
            .init_resource::<InventoryView>()
            .init_resource::<ItemInfoPanel>()
            .add_event::<ServerNotification>()
            .add_event::<InventoryAction>()
            .add_event::<ItemCountChanged>()
            .add_event::<UseItemRequest>()
            .add_event::<UseCardRequest>()
            .add_event::<EquipItemRequest>()
            .add_event::<VisibleListDirty>()
            .add_event::<ListInventoryEvent>()
            .configure_sets(
                Update,
                (InventorySet::Mirror, InventorySet::Actions, InventorySet::Projection).chain(),
            )
            .add_systems(
                Update,
                (
                    apply_server_notifications.in_set(InventorySet::Mirror),
                    handle_inventory_actions.in_set(InventorySet::Actions),
                    (refresh_inventory_view, print_inventory)
                        .chain()
                        .in_set(InventorySet::Projection),
                )
                    .run_if(in_state(AppState::InGame)),
            )
            .add_systems(OnExit(AppState::InGame), reset_inventory);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{drain, step, test_app};
    use crate::equipment::components::Equipment;
    use crate::inventory::tabs::Tab;

    fn etc(index: ItemIndex, type_id: u32, count: u32) -> ItemRecord {
        ItemRecord::new(index, type_id, ItemCategory::Etc).with_count(Some(count))
    }

    #[test]
    fn count_changes_follow_every_mutation() {
        let mut app = test_app();
        let mut counts = Vec::new();
        for notification in [
            ServerNotification::ItemAppeared(etc(5, 501, 3)),
            ServerNotification::ItemAppeared(etc(5, 501, 2)),
            ServerNotification::ItemRemoved { index: 5, count: 9 },
            ServerNotification::ItemRemoved { index: 5, count: 5 },
        ] {
            step(&mut app, notification);
            counts.extend(
                drain::<ItemCountChanged>(&mut app)
                    .into_iter()
                    .map(|e| (e.item_type_id, e.count)),
            );
        }
        assert_eq!(counts, [(501, 3), (501, 5), (501, 0)]);
        assert!(app.world().resource::<InventoryStore>().is_empty());
    }

    #[test]
    fn notifications_in_one_frame_apply_in_order() {
        let mut app = test_app();
        app.world_mut().send_event(ServerNotification::ItemAppeared(etc(2, 909, 3)));
        app.world_mut().send_event(ServerNotification::ItemCountSet { index: 2, count: 8 });
        app.world_mut().send_event(ServerNotification::ItemRemoved { index: 2, count: 1 });
        app.update();

        let store = app.world().resource::<InventoryStore>();
        assert_eq!(store.get(2).map(ItemRecord::amount), Some(7));
    }

    #[test]
    fn worn_item_reaches_equipment() {
        let mut app = test_app();
        let knife = ItemRecord::new(9, 1201, ItemCategory::Weapon)
            .with_count(None)
            .with_location(EquipLocation::WEAPON)
            .worn_at(EquipLocation::WEAPON);
        step(&mut app, ServerNotification::ItemsAppeared(vec![knife, etc(1, 909, 1)]));

        let world = app.world();
        assert_eq!(world.resource::<InventoryStore>().len(), 1);
        let equipment = world.resource::<Equipment>();
        assert_eq!(equipment.worn()[0].item_type_id, 1201);
        assert_eq!(world.resource::<InventoryView>().occupied, 2);
    }

    #[test]
    fn unequipped_gear_returns_without_new_badge() {
        let mut app = test_app();
        let armor = ItemRecord::new(7, 2301, ItemCategory::Armor).with_location(EquipLocation::ARMOR);
        step(&mut app, ServerNotification::ItemAppeared(armor.clone()));
        assert!(app.world().resource::<InventoryStore>().is_new(7));

        step(&mut app, ServerNotification::ItemWorn { index: 7, wear_state: EquipLocation::ARMOR });
        assert!(app.world().resource::<InventoryStore>().is_empty());
        assert_eq!(app.world().resource::<Equipment>().count(), 1);

        app.world_mut().send_event(ServerNotification::ItemTakenOff { index: 7 });
        app.world_mut().send_event(ServerNotification::ItemAppeared(armor));
        app.update();

        let store = app.world().resource::<InventoryStore>();
        assert_eq!(store.len(), 1);
        assert!(!store.is_new(7));
        assert_eq!(app.world().resource::<Equipment>().count(), 0);
    }

    #[test]
    fn wear_take_off_and_return_in_one_frame() {
        let mut app = test_app();
        let armor = ItemRecord::new(7, 2301, ItemCategory::Armor).with_location(EquipLocation::ARMOR);
        step(&mut app, ServerNotification::ItemAppeared(armor.clone()));

        for notification in [
            ServerNotification::ItemWorn { index: 7, wear_state: EquipLocation::ARMOR },
            ServerNotification::ItemTakenOff { index: 7 },
            ServerNotification::ItemAppeared(armor.clone()),
        ] {
            app.world_mut().send_event(notification);
        }
        app.update();

        let store = app.world().resource::<InventoryStore>();
        assert_eq!(store.len(), 1);
        assert!(!store.is_new(7));
        assert_eq!(app.world().resource::<Equipment>().count(), 0);

        // 序号被别的物品复用时照常算新
        step(&mut app, ServerNotification::ItemRemoved { index: 7, count: 1 });
        step(&mut app, ServerNotification::ItemAppeared(etc(7, 909, 1)));
        assert!(app.world().resource::<InventoryStore>().is_new(7));
    }

    #[test]
    fn view_follows_active_tab_and_window() {
        let mut app = test_app();
        step(&mut app, ServerNotification::ItemAppeared(ItemRecord::new(1, 501, ItemCategory::Healing)));
        step(&mut app, ServerNotification::ItemAppeared(etc(2, 909, 4)));

        let view = app.world().resource::<InventoryView>();
        assert_eq!(view.tab, Tab::Usable);
        assert_eq!(view.rows.len(), 1);
        assert!(view.rows[0].is_new);
        assert!(view.has_new_items);

        step(&mut app, InventoryAction::SwitchTab(Tab::Etc));
        let view = app.world().resource::<InventoryView>();
        assert_eq!(view.rows.iter().map(|r| r.index).collect::<Vec<_>>(), [2]);
        assert_eq!(view.rows[0].label, "Item #909: 4 ea");

        // 打开不清，关闭才清
        step(&mut app, InventoryAction::ToggleWindow);
        assert!(app.world().resource::<InventoryView>().has_new_items);
        step(&mut app, InventoryAction::ToggleWindow);
        let view = app.world().resource::<InventoryView>();
        assert!(!view.open);
        assert!(!view.has_new_items);
        assert!(!view.rows[0].is_new);
    }

    #[test]
    fn favorite_notification_moves_item_between_tabs() {
        let mut app = test_app();
        step(&mut app, ServerNotification::ItemAppeared(ItemRecord::new(1, 501, ItemCategory::Healing)));
        step(&mut app, ServerNotification::ItemFavoriteChanged { index: 1, flag: 1 });

        assert!(app.world().resource::<InventoryView>().rows.is_empty());
        assert_eq!(drain::<ItemCountChanged>(&mut app).len(), 1);

        step(&mut app, InventoryAction::SwitchTab(Tab::Favorite));
        assert_eq!(app.world().resource::<InventoryView>().rows.len(), 1);
    }

    #[test]
    fn activation_is_dispatched_by_category() {
        let mut app = test_app();
        let sword = ItemRecord::new(3, 1101, ItemCategory::Weapon).with_location(EquipLocation::WEAPON);
        step(
            &mut app,
            ServerNotification::ItemsAppeared(vec![
                ItemRecord::new(1, 501, ItemCategory::Healing),
                ItemRecord::new(2, 4001, ItemCategory::Card),
                sword,
                ItemRecord::new(4, 9001, ItemCategory::PetEgg),
            ]),
        );
        for index in [1, 2, 3, 4, 99] {
            app.world_mut().send_event(InventoryAction::Activate(index));
        }
        app.update();

        assert_eq!(drain::<UseItemRequest>(&mut app), [UseItemRequest { index: 1 }]);
        assert_eq!(drain::<UseCardRequest>(&mut app), [UseCardRequest { index: 2 }]);
        assert_eq!(
            drain::<EquipItemRequest>(&mut app),
            [EquipItemRequest { index: 3, location: EquipLocation::WEAPON }]
        );
    }

    #[test]
    fn inspect_compares_with_worn_gear() {
        let mut app = test_app();
        let worn = ItemRecord::new(8, 2301, ItemCategory::Armor)
            .with_location(EquipLocation::ARMOR)
            .worn_at(EquipLocation::ARMOR);
        let spare = ItemRecord::new(9, 2302, ItemCategory::Armor).with_location(EquipLocation::ARMOR);
        step(&mut app, ServerNotification::ItemsAppeared(vec![worn, spare]));

        step(&mut app, InventoryAction::Inspect { index: 9, alt: false });
        let panel = app.world().resource::<ItemInfoPanel>();
        assert_eq!(panel.item.as_ref().map(|i| i.index), Some(9));
        assert!(panel.compare.is_none());

        step(&mut app, InventoryAction::Inspect { index: 9, alt: false });
        step(&mut app, InventoryAction::TogglePreference(PreferenceFlag::ItemCompare));
        step(&mut app, InventoryAction::Inspect { index: 9, alt: false });
        let panel = app.world().resource::<ItemInfoPanel>();
        assert_eq!(panel.compare.as_ref().map(|i| i.index), Some(8));
    }

    #[test]
    fn leaving_game_clears_mirror() {
        let mut app = test_app();
        step(&mut app, ServerNotification::ItemAppeared(etc(1, 909, 2)));
        assert_eq!(app.world().resource::<InventoryView>().occupied, 1);

        app.world_mut()
            .resource_mut::<NextState<AppState>>()
            .set(AppState::Shutdown);
        app.update();

        assert!(app.world().resource::<InventoryStore>().is_empty());
        assert_eq!(app.world().resource::<InventoryView>().occupied, 0);
    }
}
