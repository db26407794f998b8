//! 标签页归类：由物品类别、收藏标记和穿戴状态唯一决定。

use serde_derive::{Deserialize, Serialize};

use super::components::{InventoryStore, ItemCategory, ItemRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Usable,
    Equip,
    Etc,
    #[serde(rename = "fav", alias = "favorite")]
    Favorite,
}

impl Tab {
    /// 对应界面上 `data-tab` 的取值
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "usable" | "item" => Some(Tab::Usable),
            "equip" => Some(Tab::Equip),
            "etc" => Some(Tab::Etc),
            "fav" | "favorite" => Some(Tab::Favorite),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::Usable => "usable",
            Tab::Equip => "equip",
            Tab::Etc => "etc",
            Tab::Favorite => "fav",
        }
    }
}

pub fn category_tab(category: ItemCategory) -> Tab {
    match category {
        ItemCategory::Healing
        | ItemCategory::Usable
        | ItemCategory::DelayedConsume
        | ItemCategory::Cash => Tab::Usable,
        ItemCategory::Weapon
        | ItemCategory::Armor
        | ItemCategory::ShadowGear
        | ItemCategory::PetEgg
        | ItemCategory::PetArmor => Tab::Equip,
        ItemCategory::Etc | ItemCategory::Card | ItemCategory::Ammo => Tab::Etc,
    }
}

/// 已穿戴的物品不属于任何标签页
pub fn classify(item: &ItemRecord) -> Option<Tab> {
    if item.is_worn() {
        return None;
    }
    if item.favorite_flag != 0 {
        return Some(Tab::Favorite);
    }
    Some(category_tab(item.category))
}

/// 当前标签页可见的物品，保持镜像中的插入顺序
pub fn visible_list(store: &InventoryStore, active: Tab) -> Vec<&ItemRecord> {
    store
        .items()
        .iter()
        .filter(|item| classify(item) == Some(active))
        .collect()
}

/// 收藏时写入的标记值：装备 4，其余 2
pub fn favorite_flag(category: ItemCategory) -> u8 {
    if category.is_equipment() { 4 } else { 2 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::components::EquipLocation;

    #[test]
    fn categories_map_to_tabs() {
        assert_eq!(category_tab(ItemCategory::Healing), Tab::Usable);
        assert_eq!(category_tab(ItemCategory::Cash), Tab::Usable);
        assert_eq!(category_tab(ItemCategory::PetEgg), Tab::Equip);
        assert_eq!(category_tab(ItemCategory::ShadowGear), Tab::Equip);
        assert_eq!(category_tab(ItemCategory::Card), Tab::Etc);
        assert_eq!(category_tab(ItemCategory::Ammo), Tab::Etc);
    }

    #[test]
    fn favorite_overrides_category() {
        let mut potion = ItemRecord::new(1, 501, ItemCategory::Healing);
        assert_eq!(classify(&potion), Some(Tab::Usable));
        potion.favorite_flag = 2;
        assert_eq!(classify(&potion), Some(Tab::Favorite));
        assert_eq!(classify(&potion), classify(&potion));
    }

    #[test]
    fn worn_gear_is_unclassified() {
        let shield = ItemRecord::new(1, 2101, ItemCategory::Armor).worn_at(EquipLocation::SHIELD);
        assert_eq!(classify(&shield), None);

        let card = ItemRecord::new(2, 4001, ItemCategory::Card).worn_at(EquipLocation::WEAPON);
        assert_eq!(classify(&card), Some(Tab::Etc));
    }

    #[test]
    fn visible_list_filters_in_insertion_order() {
        let mut store = InventoryStore::default();
        store.add(ItemRecord::new(3, 909, ItemCategory::Etc));
        store.add(ItemRecord::new(1, 501, ItemCategory::Healing));
        store.add(ItemRecord::new(2, 4001, ItemCategory::Card));
        store.add(ItemRecord::new(4, 1101, ItemCategory::Weapon));

        let etc: Vec<_> = visible_list(&store, Tab::Etc).iter().map(|i| i.index).collect();
        assert_eq!(etc, [3, 2]);

        store.set_favorite(3, true);
        let etc: Vec<_> = visible_list(&store, Tab::Etc).iter().map(|i| i.index).collect();
        assert_eq!(etc, [2]);
        let fav: Vec<_> = visible_list(&store, Tab::Favorite).iter().map(|i| i.index).collect();
        assert_eq!(fav, [3]);
    }

    #[test]
    fn favorite_flag_values() {
        assert_eq!(favorite_flag(ItemCategory::Ammo), 2);
        assert_eq!(favorite_flag(ItemCategory::Usable), 2);
        assert_eq!(favorite_flag(ItemCategory::PetArmor), 4);
    }

    #[test]
    fn parses_data_tab_tokens() {
        assert_eq!(Tab::parse("fav"), Some(Tab::Favorite));
        assert_eq!(Tab::parse("EQUIP"), Some(Tab::Equip));
        assert_eq!(Tab::parse("storage"), None);
        for tab in [Tab::Usable, Tab::Equip, Tab::Etc, Tab::Favorite] {
            assert_eq!(Tab::parse(tab.label()), Some(tab));
        }
    }
}
