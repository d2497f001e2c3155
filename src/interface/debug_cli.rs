//! 文字 CLI：读取 stdin → 解析命令 → 执行并打印

use bevy::app::AppExit;
use bevy::prelude::*;
use once_cell::sync::Lazy;
use std::collections::VecDeque;
use std::num::NonZero;
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

use crate::character::components::Player;
use crate::core::{events::LogEvent, states::AppState};
use crate::data::schema::{ItemCatalog, ItemCategory};
use crate::inventory::components::{BagPickup, WorldItem};
use crate::inventory::events::*;
use crate::inventory::{CollectSet, InventoryStore};

static CLI_BUFFER: Lazy<Arc<Mutex<VecDeque<String>>>> =
    Lazy::new(|| Arc::new(Mutex::new(VecDeque::new())));

/// 插件入口
pub struct DebugCliPlugin;
impl Plugin for DebugCliPlugin {
    fn build(&self, app: &mut App) {
        {
            let buffer = CLI_BUFFER.clone();
            std::thread::spawn(move || {
                use std::io::{self, BufRead};
                let stdin = io::stdin();
                for line in stdin.lock().lines().map_while(Result::ok) {
                    let line = line.trim();
                    if !line.is_empty() {
                        let mut buf = buffer.lock().unwrap_or_else(PoisonError::into_inner);
                        buf.push_back(line.to_string());
                    }
                }
            });
        }
        app
            // 事件：原始输入行
            .add_event::<CliLine>()
            // 每帧从 buffer 取出所有命令行写入事件
            .add_systems(Update, read_stdin)
            // 仅在 InGame 处理命令；生成的世界物体要在拾取系统之前落地
            .add_systems(
                Update,
                execute_cli_commands
                    .after(read_stdin)
                    .before(CollectSet)
                    .run_if(in_state(AppState::InGame)),
            );
    }
}

/* ---------------------------- 事件与枚举 ---------------------------- */

/// 终端敲的一整行
#[derive(Event)]
struct CliLine(String);

/// 我们支持的命令
#[derive(Debug, PartialEq)]
enum Command {
    Help,
    Status,
    Exit,
    Items(Option<String>), // None=全部；Some(token)=按 id/uuid/name 查询
    Bag,
    Touch { id: String, count: u32 },
    Give { id: String, count: u32 },
    Drop { id: String, count: u32 },
    Has(String),
    Inventory { category: Option<ItemCategory>, json: bool },
    Panel,
    Category(ItemCategory),
    Stats,
    Unsupported(String),
}

/* ---------------------------- 读取 stdin ---------------------------- */

fn read_stdin(mut writer: EventWriter<CliLine>) {
    let mut buffer = CLI_BUFFER.lock().unwrap_or_else(PoisonError::into_inner);
    while let Some(line) = buffer.pop_front() {
        writer.write(CliLine(line));
    }
}

/* ---------------------------- 命令执行 ---------------------------- */

#[allow(clippy::too_many_arguments)]
fn execute_cli_commands(
    mut commands: Commands,
    mut line_reader: EventReader<CliLine>,
    mut app_exit: EventWriter<AppExit>,
    mut log: EventWriter<LogEvent>,
    state: Res<State<AppState>>,
    catalog: Res<ItemCatalog>,
    player: Query<(Entity, &InventoryStore), With<Player>>,
    mut ev_trigger: EventWriter<TriggerEnter>,
    mut ev_give: EventWriter<GiveItemEvent>,
    mut ev_remove: EventWriter<RemoveItemEvent>,
    mut ev_list: EventWriter<ListInventoryEvent>,
    mut ev_panel: EventWriter<TogglePanelEvent>,
    mut ev_select: EventWriter<SelectCategoryEvent>,
    mut ev_stats: EventWriter<ShowStatsEvent>,
) {
    for CliLine(input) in line_reader.read() {
        match parse_command(input) {
            Command::Help => {
                log.write(LogEvent(
                    "命令列表:
  help                   查看帮助
  status                 查看当前状态
  exit / quit            退出程序
  items                  列出所有物品
  items <token>          用 id / uuid / 名称 查询单个物品
  bag                    走到背包上（拾取背包）
  touch <id> [count]     走到一件世界物品上
  give <id> [count]      直接给予物品
  drop <id> [count]      移除物品
  has <id>               是否持有某物品
  inv [category|json]    查看物品栏
  panel                  打开/关闭背包面板
  cat <category>         切换面板分类
  stats                  查看背包属性合计
  ".into()));
            }

            Command::Status => {
                log.write(LogEvent(format!(
                    "State: {:?}, Items Loaded: {}",
                    state.get(),
                    catalog.len()
                )));
            }

            Command::Exit => {
                log.write(LogEvent("Bye~".into()));
                app_exit.write(AppExit::Error(NonZero::<u8>::MIN));
            }

            Command::Items(token) => match token {
                None => {
                    // 全部列出
                    for entry in catalog.iter() {
                        let uuid = uuid_from_id(&entry.id);
                        log.write(LogEvent(format!(
                            "{} | {} | {} | {}",
                            uuid, entry.id, entry.name, entry.category
                        )));
                    }
                }
                Some(t) => {
                    // 按三种字段匹配
                    let t_low = t.to_lowercase();
                    if let Some(e) = catalog.iter().find(|e| {
                        e.id.eq_ignore_ascii_case(&t_low)
                            || e.name.eq_ignore_ascii_case(&t_low)
                            || uuid_from_id(&e.id).to_string() == t_low
                    }) {
                        let uuid = uuid_from_id(&e.id);
                        log.write(LogEvent(format!(
                            "==================================================
UUID     : {uuid}
ID       : {}
Name     : {}
Category : {}
Stack    : {}
Stats    : STR {} INT {} WIL {}
{}
==================================================",
                            e.id,
                            e.name,
                            e.category,
                            e.effective_max_stack(),
                            e.stats.strength,
                            e.stats.intelligence,
                            e.stats.willpower,
                            e.description
                        )));
                    } else {
                        log.write(LogEvent("未找到匹配物品".into()));
                    }
                }
            },

            Command::Bag => {
                // 模拟物理层：生成背包并立即触发碰撞
                if let Ok((player, _)) = player.single() {
                    let bag = commands.spawn(BagPickup).id();
                    ev_trigger.write(TriggerEnter { collector: player, other: bag });
                }
            }

            Command::Touch { id, count } => {
                // 先校验再生成，否则会在世界里留下无法拾取的物体
                if let Err(msg) = check_touch(&catalog, &id, count) {
                    log.write(LogEvent(msg));
                    continue;
                }
                if let Ok((player, _)) = player.single() {
                    let item = commands.spawn(WorldItem { id, quantity: count }).id();
                    ev_trigger.write(TriggerEnter { collector: player, other: item });
                }
            }

            Command::Give { id, count } => {
                ev_give.write(GiveItemEvent { id, count });
            }

            Command::Drop { id, count } => {
                ev_remove.write(RemoveItemEvent { id, count });
            }

            Command::Has(id) => {
                if let Ok((_, store)) = player.single() {
                    log.write(LogEvent(describe_holding(&catalog, store, &id)));
                }
            }

            Command::Inventory { category, json } => {
                ev_list.write(ListInventoryEvent { category, json });
            }

            Command::Panel => {
                ev_panel.write(TogglePanelEvent);
            }

            Command::Category(category) => {
                ev_select.write(SelectCategoryEvent(category));
            }

            Command::Stats => {
                ev_stats.write(ShowStatsEvent);
            }

            Command::Unsupported(cmd) => {
                log.write(LogEvent(format!("不支持的命令: {cmd}")));
            }
        }
    }
}

/* ---------------------------- 工具函数 ---------------------------- */

fn parse_command(input: &str) -> Command {
    let mut parts = input.split_whitespace();
    let cmd = parts.next().unwrap_or("").to_lowercase();
    match cmd.as_str() {
        "help" | "h" | "?" => Command::Help,
        "status" | "s" => Command::Status,
        "exit" | "quit" | "q" => Command::Exit,
        "items" | "item" | "i" => {
            let token = parts.next().map(|s| s.to_string());
            Command::Items(token)
        }
        "bag" => Command::Bag,
        "touch" => {
            let (id, count) = id_count(&mut parts);
            Command::Touch { id, count }
        }
        "give" => {
            let (id, count) = id_count(&mut parts);
            Command::Give { id, count }
        }
        "drop" => {
            let (id, count) = id_count(&mut parts);
            Command::Drop { id, count }
        }
        "has" => Command::Has(parts.next().unwrap_or("").to_string()),
        "inventory" | "inv" => match parts.next() {
            None => Command::Inventory { category: None, json: false },
            Some("json") => Command::Inventory { category: None, json: true },
            Some(c) => match c.parse() {
                Ok(category) => Command::Inventory { category: Some(category), json: false },
                Err(e) => Command::Unsupported(e),
            },
        },
        "panel" | "p" => Command::Panel,
        "cat" => match parts.next().unwrap_or("").parse() {
            Ok(category) => Command::Category(category),
            Err(e) => Command::Unsupported(e),
        },
        "stats" => Command::Stats,
        other => Command::Unsupported(other.into()),
    }
}

fn check_touch(catalog: &ItemCatalog, id: &str, count: u32) -> Result<(), String> {
    if catalog.get(id).is_none() {
        return Err(format!("不存在物品 ID {id}"));
    }
    if count == 0 {
        return Err("数量必须大于 0".to_string());
    }
    Ok(())
}

fn describe_holding(catalog: &ItemCatalog, store: &InventoryStore, id: &str) -> String {
    match catalog.get(id) {
        None => format!("不存在物品 ID {id}"),
        Some(def) if store.contains(&def) => {
            format!("持有 {} ×{}", def.name, store.count_of(&def))
        }
        Some(def) => format!("没有 {}", def.name),
    }
}

/// `<id> [count]`，count 缺省为 1
fn id_count(parts: &mut std::str::SplitWhitespace<'_>) -> (String, u32) {
    let id = parts.next().unwrap_or("").to_string();
    let cnt = parts.next().unwrap_or("1").parse().unwrap_or(1);
    (id, cnt)
}

fn uuid_from_id(id: &str) -> Uuid {
    // 用固定 namespace + id 字节生成版本 5 UUID，保证可重复得到同一值
    Uuid::new_v5(&Uuid::NAMESPACE_OID, id.as_bytes())
}
