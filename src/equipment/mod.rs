pub mod components;
pub mod events;
mod systems;

use crate::core::states::AppState;
use bevy::prelude::*;
use components::*;
use events::*;
use systems::*;

pub struct EquipmentPlugin;
impl Plugin for EquipmentPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Equipment>()
            .init_resource::<EquipSwitchCoordinator>()
            .init_resource::<SwitchPreview>()
            .add_event::<WearItem>()
            .add_event::<TakeOffItem>()
            .add_event::<SwitchListAction>()
            .add_event::<SwitchPreviewCommand>()
            .add_systems(
                Update,
                (
                    wear_items,
                    take_off_items,
                    handle_switch_actions,
                    reconcile_switch_list,
                    apply_switch_preview,
                )
                    .chain()
                    .after(crate::inventory::InventorySet::Mirror)
                    .before(crate::inventory::InventorySet::Projection)
                    .run_if(in_state(AppState::InGame)),
            )
            .add_systems(OnExit(AppState::InGame), reset_equipment);
    }
}
