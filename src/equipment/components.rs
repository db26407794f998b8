use bevy::prelude::*;
use thiserror::Error;

use crate::inventory::components::{EquipLocation, InventoryStore, ItemIndex, ItemRecord};

/// 已穿戴装备的镜像（装备窗口）
#[derive(Resource, Debug, Default)]
pub struct Equipment {
    worn: Vec<ItemRecord>,
}

impl Equipment {
    /// 按 `wear_state` 穿上，返回被顶掉的旧装备
    pub fn wear(&mut self, item: ItemRecord) -> Vec<ItemRecord> {
        let (displaced, kept): (Vec<_>, Vec<_>) = self
            .worn
            .drain(..)
            .partition(|worn| worn.wear_state.overlaps(item.wear_state));
        self.worn = kept;
        self.worn.push(item);
        displaced
    }

    pub fn take_off(&mut self, index: ItemIndex) -> Option<ItemRecord> {
        let pos = self.worn.iter().position(|i| i.index == index)?;
        Some(self.worn.remove(pos))
    }

    /// 占用这些部位之一的装备
    pub fn occupant(&self, location: EquipLocation) -> Option<&ItemRecord> {
        self.worn.iter().find(|i| i.wear_state.overlaps(location))
    }

    pub fn count(&self) -> usize {
        self.worn.len()
    }

    pub fn worn(&self) -> &[ItemRecord] {
        &self.worn
    }
}

/// 交给换装预览窗口的指令
#[derive(Debug, Clone, PartialEq)]
pub enum SwitchCommand {
    Equip { item: ItemRecord, location: EquipLocation },
    Unequip { index: ItemIndex, location: EquipLocation },
    /// 清空预览，按当前穿戴重新填充
    RebuildFromWorn,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SwitchError {
    #[error("item {0} not found in inventory")]
    UnknownIndex(ItemIndex),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StagedItem {
    pub index: ItemIndex,
    pub location: EquipLocation,
}

/// 换装列表：只记顺序和部位，物品数据仍以背包镜像为准。
/// 同一部位（位有重叠）最多一件。
#[derive(Resource, Debug, Default)]
pub struct EquipSwitchCoordinator {
    staged: Vec<StagedItem>,
}

impl EquipSwitchCoordinator {
    pub fn staged(&self) -> &[StagedItem] {
        &self.staged
    }

    pub fn is_staged(&self, index: ItemIndex) -> bool {
        self.staged.iter().any(|s| s.index == index)
    }

    /// 按位判断：与任一已加入条目的部位有交集即为占用
    pub fn is_location_staged(&self, location: EquipLocation) -> bool {
        self.staged.iter().any(|s| s.location.overlaps(location))
    }

    /// 加入换装列表。同部位已有物品时先卸下它。
    pub fn stage(
        &mut self,
        store: &InventoryStore,
        index: ItemIndex,
    ) -> Result<Vec<SwitchCommand>, SwitchError> {
        let item = store.get(index).ok_or(SwitchError::UnknownIndex(index))?;
        let location = item.location;

        let mut commands = Vec::new();
        if self.is_location_staged(location) || self.is_staged(index) {
            self.staged.retain(|s| {
                let same_slot = s.index == index || s.location.overlaps(location);
                if same_slot {
                    commands.push(SwitchCommand::Unequip {
                        index: s.index,
                        location: s.location,
                    });
                }
                !same_slot
            });
        }

        self.staged.push(StagedItem { index, location });
        commands.push(SwitchCommand::Equip {
            item: item.clone(),
            location,
        });
        Ok(commands)
    }

    /// 移出换装列表。部位之间互相影响，所以每次都整份重建预览。
    pub fn unstage(
        &mut self,
        store: &InventoryStore,
        index: ItemIndex,
    ) -> Result<Vec<SwitchCommand>, SwitchError> {
        if store.get(index).is_none() {
            return Err(SwitchError::UnknownIndex(index));
        }
        let Some(pos) = self.staged.iter().position(|s| s.index == index) else {
            return Ok(Vec::new());
        };
        let removed = self.staged.remove(pos);

        let mut commands = vec![
            SwitchCommand::Unequip {
                index: removed.index,
                location: removed.location,
            },
            SwitchCommand::RebuildFromWorn,
        ];
        commands.extend(self.replay(store));
        Ok(commands)
    }

    /// 丢掉已不在背包里的条目，有变化时整份重建
    pub fn reconcile(&mut self, store: &InventoryStore) -> Vec<SwitchCommand> {
        let (kept, dropped): (Vec<_>, Vec<_>) = self
            .staged
            .iter()
            .copied()
            .partition(|s| store.get(s.index).is_some());
        if dropped.is_empty() {
            return Vec::new();
        }
        self.staged = kept;

        let mut commands: Vec<_> = dropped
            .into_iter()
            .map(|s| SwitchCommand::Unequip {
                index: s.index,
                location: s.location,
            })
            .collect();
        commands.push(SwitchCommand::RebuildFromWorn);
        commands.extend(self.replay(store));
        commands
    }

    fn replay(&self, store: &InventoryStore) -> Vec<SwitchCommand> {
        self.staged
            .iter()
            .filter_map(|s| {
                store.get(s.index).map(|item| SwitchCommand::Equip {
                    item: item.clone(),
                    location: s.location,
                })
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.staged.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewSlot {
    pub index: ItemIndex,
    pub item_type_id: u32,
    pub location: EquipLocation,
    /// 来自换装列表而非当前穿戴
    pub from_switch_list: bool,
}

/// 换装预览窗口的内容
#[derive(Resource, Debug, Default)]
pub struct SwitchPreview {
    slots: Vec<PreviewSlot>,
}

impl SwitchPreview {
    pub fn slots(&self) -> &[PreviewSlot] {
        &self.slots
    }

    pub fn equip(&mut self, item: &ItemRecord, location: EquipLocation, from_switch_list: bool) {
        self.slots.retain(|s| !s.location.overlaps(location));
        self.slots.push(PreviewSlot {
            index: item.index,
            item_type_id: item.item_type_id,
            location,
            from_switch_list,
        });
    }

    pub fn unequip(&mut self, index: ItemIndex, location: EquipLocation) {
        self.slots
            .retain(|s| !(s.index == index && s.location.overlaps(location)));
    }

    pub fn apply(&mut self, command: &SwitchCommand, equipment: &Equipment) {
        match command {
            SwitchCommand::Equip { item, location } => self.equip(item, *location, true),
            SwitchCommand::Unequip { index, location } => self.unequip(*index, *location),
            SwitchCommand::RebuildFromWorn => {
                self.slots.clear();
                for worn in equipment.worn() {
                    self.equip(worn, worn.wear_state, false);
                }
            }
        }
    }
}
