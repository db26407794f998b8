use std::collections::HashSet;
use std::ops::BitOr;

use bevy::prelude::*;
use serde_derive::{Deserialize, Serialize};

use super::tabs::{self, Tab};

/// 服务器分配的背包序号。携带期间唯一，跨会话不保证。
pub type ItemIndex = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    Healing,
    Usable,
    DelayedConsume,
    Cash,
    Weapon,
    Armor,
    ShadowGear,
    PetEgg,
    PetArmor,
    Etc,
    Card,
    Ammo,
}

impl ItemCategory {
    pub fn is_equipment(self) -> bool {
        matches!(
            self,
            Self::Weapon | Self::Armor | Self::ShadowGear | Self::PetEgg | Self::PetArmor
        )
    }

    /// 不区分大小写，供命令行使用
    pub fn parse(token: &str) -> Option<Self> {
        let category = match token.to_ascii_lowercase().as_str() {
            "healing" => Self::Healing,
            "usable" => Self::Usable,
            "delayedconsume" | "delayed" => Self::DelayedConsume,
            "cash" => Self::Cash,
            "weapon" => Self::Weapon,
            "armor" => Self::Armor,
            "shadowgear" | "shadow" => Self::ShadowGear,
            "petegg" => Self::PetEgg,
            "petarmor" => Self::PetArmor,
            "etc" => Self::Etc,
            "card" => Self::Card,
            "ammo" => Self::Ammo,
            _ => return None,
        };
        Some(category)
    }
}

/// 装备部位位掩码。一个值可以同时占多个部位（例如双手武器）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EquipLocation(pub u32);

impl EquipLocation {
    pub const NONE: Self = Self(0);
    pub const HEAD_BOTTOM: Self = Self(1 << 0);
    pub const WEAPON: Self = Self(1 << 1);
    pub const GARMENT: Self = Self(1 << 2);
    pub const ACCESSORY_LEFT: Self = Self(1 << 3);
    pub const ARMOR: Self = Self(1 << 4);
    pub const SHIELD: Self = Self(1 << 5);
    pub const SHOES: Self = Self(1 << 6);
    pub const ACCESSORY_RIGHT: Self = Self(1 << 7);
    pub const HEAD_TOP: Self = Self(1 << 8);
    pub const HEAD_MID: Self = Self(1 << 9);

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn overlaps(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for EquipLocation {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// 随机属性槽，`index == 0` 表示空槽
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ItemOption {
    pub index: u16,
    #[serde(default)]
    pub value: i16,
    #[serde(default)]
    pub param: u8,
}

/// 背包镜像中的一条物品记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub index: ItemIndex,
    pub item_type_id: u32,
    /// 装备类物品服务器可能不给数量
    #[serde(default)]
    pub count: Option<u32>,
    pub category: ItemCategory,
    /// 可装备的部位
    #[serde(default)]
    pub location: EquipLocation,
    /// 非零表示已穿戴在这些部位上
    #[serde(default)]
    pub wear_state: EquipLocation,
    /// 收藏标记：0 未收藏，2 普通物品，4 装备
    #[serde(default)]
    pub favorite_flag: u8,
    #[serde(default)]
    pub is_identified: bool,
    #[serde(default)]
    pub is_damaged: bool,
    #[serde(default)]
    pub options: Vec<ItemOption>,
}

impl ItemRecord {
    pub fn new(index: ItemIndex, item_type_id: u32, category: ItemCategory) -> Self {
        Self {
            index,
            item_type_id,
            count: Some(1),
            category,
            location: EquipLocation::NONE,
            wear_state: EquipLocation::NONE,
            favorite_flag: 0,
            is_identified: true,
            is_damaged: false,
            options: Vec::new(),
        }
    }

    pub fn with_count(mut self, count: Option<u32>) -> Self {
        self.count = count;
        self
    }

    pub fn with_location(mut self, location: EquipLocation) -> Self {
        self.location = location;
        self
    }

    pub fn worn_at(mut self, wear_state: EquipLocation) -> Self {
        self.wear_state = wear_state;
        self
    }

    /// 数量缺失或为 0 一律按 1 处理（装备固定数量为 1）
    pub fn normalize_count(&mut self) {
        if matches!(self.count, None | Some(0)) {
            self.count = Some(1);
        }
    }

    /// 参与加减运算的数量
    pub fn amount(&self) -> u32 {
        self.count.unwrap_or(1)
    }

    /// 格子右下角显示的数量
    pub fn display_count(&self) -> u32 {
        match self.count {
            Some(n) if n > 0 => n,
            _ => 1,
        }
    }

    /// 已穿戴的物品交给装备窗口，不进背包列表。箭矢和卡片除外。
    pub fn is_worn(&self) -> bool {
        !self.wear_state.is_empty()
            && !matches!(self.category, ItemCategory::Ammo | ItemCategory::Card)
    }

    /// 悬停提示里数量后面的单位
    pub fn quantity_suffix(&self) -> &'static str {
        let randomized = matches!(
            self.category,
            ItemCategory::Weapon | ItemCategory::Armor | ItemCategory::ShadowGear
        ) && self.options.iter().any(|o| o.index != 0);
        if randomized { " Quantity" } else { " ea" }
    }
}

/// 双击物品时转发给外部的请求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Use(ItemIndex),
    UseCard(ItemIndex),
    Equip { index: ItemIndex, location: EquipLocation },
}

impl ItemRecord {
    /// 只做分类，不做使用逻辑。延迟消耗品和宠物蛋没有双击动作。
    pub fn activation(&self) -> Option<Activation> {
        match self.category {
            ItemCategory::Healing | ItemCategory::Usable | ItemCategory::Cash => {
                Some(Activation::Use(self.index))
            }
            ItemCategory::Card => Some(Activation::UseCard(self.index)),
            ItemCategory::Weapon
            | ItemCategory::Armor
            | ItemCategory::ShadowGear
            | ItemCategory::PetArmor
            | ItemCategory::Ammo => (self.is_identified && !self.is_damaged).then_some(
                Activation::Equip {
                    index: self.index,
                    location: self.location,
                },
            ),
            ItemCategory::DelayedConsume | ItemCategory::PetEgg | ItemCategory::Etc => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Inserted,
    Merged,
    Decremented,
    Updated,
    Removed,
    Reclassified,
}

/// 一次结构性修改的描述，由系统投射成事件和界面刷新
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation {
    pub index: ItemIndex,
    pub item_type_id: u32,
    /// 修改后的数量，移除时为 0
    pub count: u32,
    /// 修改后所在标签页，移除时为原标签页
    pub tab: Option<Tab>,
    pub kind: MutationKind,
}

impl Mutation {
    fn of(item: &ItemRecord, count: u32, kind: MutationKind) -> Self {
        Self {
            index: item.index,
            item_type_id: item.item_type_id,
            count,
            tab: tabs::classify(item),
            kind,
        }
    }

    /// 数量有变化（收藏切换不算）
    pub fn changes_count(&self) -> bool {
        self.kind != MutationKind::Reclassified
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    Stored(Mutation),
    /// 已穿戴，应转交装备窗口
    Redirected(ItemRecord),
}

/// 背包镜像。所有对物品列表的修改都经过这里。
#[derive(Resource, Debug, Default)]
pub struct InventoryStore {
    items: Vec<ItemRecord>,
    new_items: HashSet<ItemIndex>,
    /// 穿戴中的序号；脱下后重新出现时不算新物品
    equipped_items: HashSet<ItemIndex>,
}

impl InventoryStore {
    pub fn items(&self) -> &[ItemRecord] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: ItemIndex) -> Option<&ItemRecord> {
        self.items.iter().find(|i| i.index == index)
    }

    pub fn get_by_type(&self, item_type_id: u32) -> Option<&ItemRecord> {
        self.items.iter().find(|i| i.item_type_id == item_type_id)
    }

    fn position(&self, index: ItemIndex) -> Option<usize> {
        self.items.iter().position(|i| i.index == index)
    }

    /// 整条移出，同时撤掉新物品标记
    fn detach(&mut self, pos: usize) -> ItemRecord {
        let item = self.items.remove(pos);
        self.new_items.remove(&item.index);
        item
    }

    /// 整表下发。已有同序号记录时先整条移除再放入，避免重复计数。
    pub fn apply_batch(&mut self, items: impl IntoIterator<Item = ItemRecord>) -> Vec<Applied> {
        let mut applied = Vec::new();
        for mut item in items {
            if let Some(pos) = self.position(item.index) {
                let old = self.detach(pos);
                applied.push(Applied::Stored(Mutation::of(&old, 0, MutationKind::Removed)));
            }
            item.normalize_count();
            if item.is_worn() {
                applied.push(self.redirect(item));
                continue;
            }
            let mutation = Mutation::of(&item, item.amount(), MutationKind::Inserted);
            self.items.push(item);
            applied.push(Applied::Stored(mutation));
        }
        applied
    }

    /// 单件获得：同序号合并数量，否则插入新记录
    pub fn add(&mut self, mut item: ItemRecord) -> Applied {
        item.normalize_count();
        if item.is_worn() {
            return self.redirect(item);
        }

        if !self.equipped_items.remove(&item.index) {
            self.new_items.insert(item.index);
        }

        if let Some(existing) = self.items.iter_mut().find(|i| i.index == item.index) {
            existing.normalize_count();
            let total = existing.amount().saturating_add(item.amount());
            existing.count = Some(total);
            return Applied::Stored(Mutation::of(existing, total, MutationKind::Merged));
        }

        let mutation = Mutation::of(&item, item.amount(), MutationKind::Inserted);
        self.items.push(item);
        Applied::Stored(mutation)
    }

    /// 按差量扣除。未知序号、数量为 0 或超过持有量时什么都不做。
    pub fn remove(&mut self, index: ItemIndex, count: u32) -> Option<Mutation> {
        if count == 0 {
            return None;
        }
        let pos = self.position(index)?;
        let held = self.items[pos].amount();
        if count > held {
            debug!("忽略越量移除: index={index} held={held} count={count}");
            return None;
        }
        if held > count {
            let item = &mut self.items[pos];
            item.count = Some(held - count);
            return Some(Mutation::of(item, held - count, MutationKind::Decremented));
        }
        let item = self.detach(pos);
        Some(Mutation::of(&item, 0, MutationKind::Removed))
    }

    /// 直接设置数量，不大于 0 时移除
    pub fn update(&mut self, index: ItemIndex, count: u32) -> Option<Mutation> {
        let pos = self.position(index)?;
        if count > 0 {
            let item = &mut self.items[pos];
            item.count = Some(count);
            return Some(Mutation::of(item, count, MutationKind::Updated));
        }
        let item = self.detach(pos);
        Some(Mutation::of(&item, 0, MutationKind::Removed))
    }

    /// 背包里的物品被穿上：整条取出，记入穿戴中名单
    pub fn take_worn(
        &mut self,
        index: ItemIndex,
        wear_state: EquipLocation,
    ) -> Option<(ItemRecord, Mutation)> {
        let pos = self.position(index)?;
        let item = self.detach(pos);
        let mutation = Mutation::of(&item, 0, MutationKind::Removed);
        self.equipped_items.insert(index);
        Some((item.worn_at(wear_state), mutation))
    }

    /// 已穿戴的物品不进列表，序号记下来，脱下后回来不算新物品
    fn redirect(&mut self, item: ItemRecord) -> Applied {
        self.equipped_items.insert(item.index);
        Applied::Redirected(item)
    }

    /// 收藏开关。打开时按类别写入 2 或 4，关闭时清零。
    pub fn set_favorite(&mut self, index: ItemIndex, on: bool) -> Option<Mutation> {
        let item = self.items.iter_mut().find(|i| i.index == index)?;
        item.favorite_flag = if on { tabs::favorite_flag(item.category) } else { 0 };
        let count = item.amount();
        Some(Mutation::of(item, count, MutationKind::Reclassified))
    }

    pub fn is_new(&self, index: ItemIndex) -> bool {
        self.new_items.contains(&index)
    }

    pub fn has_new_items(&self) -> bool {
        self.items.iter().any(|i| self.new_items.contains(&i.index))
    }

    pub fn clear_new_items(&mut self) {
        self.new_items.clear();
    }

    /// 窗口销毁时清空镜像
    pub fn clear(&mut self) {
        self.items.clear();
        self.new_items.clear();
        self.equipped_items.clear();
    }
}
