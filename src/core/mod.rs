use bevy::prelude::*;

pub mod states;
pub mod events;
pub mod resources;

#[cfg(test)]
pub mod testing;

/// 偏好配置文件路径（相对工作目录）
pub const PREFERENCES_PATH: &str = "config/inventory.toml";

/// 核心插件：注册全局资源 / 事件 / 状态
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        use states::AppState;

        app
            .init_state::<AppState>()
            .add_event::<events::LogEvent>()
            .insert_resource(resources::InventoryPreferences::load_or_default(PREFERENCES_PATH))
            .add_systems(OnEnter(AppState::InGame), events::announce_ready)
            .add_systems(OnEnter(AppState::Shutdown), events::request_exit);
    }
}
