use bevy::prelude::*;

/// 面向玩家的一行提示，由 main 统一打印
#[derive(Event, Debug, Clone)]
pub struct LogEvent(pub String);

pub fn hello_world(mut writer: EventWriter<LogEvent>) {
    writer.write(LogEvent("Type `help` for commands.".into()));
}
