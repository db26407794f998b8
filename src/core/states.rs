use bevy::prelude::*;

/// 客户端运行的大状态
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum AppState {
    #[default]
    Startup,
    /// 等待物品目录加载
    Loading,
    /// 接收服务器通知、处理玩家操作
    InGame,
    Shutdown,
}
