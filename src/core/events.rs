use bevy::app::AppExit;
use bevy::prelude::*;

/// 面向玩家的提示文字（聊天框 / 终端）
#[derive(Event, Debug, Clone)]
pub struct LogEvent(pub String);

pub fn announce_ready(mut writer: EventWriter<LogEvent>) {
    writer.write(LogEvent("物品同步已就绪，输入 help 查看命令".into()));
}

/// 进入 Shutdown 时各插件已清理完毕，结束程序
pub fn request_exit(mut writer: EventWriter<LogEvent>, mut app_exit: EventWriter<AppExit>) {
    writer.write(LogEvent("Bye~".into()));
    app_exit.write(AppExit::Success);
}
