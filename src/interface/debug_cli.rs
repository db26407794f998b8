//! 文字 CLI：读取 stdin → 解析命令 → 转成服务器通知 / 玩家操作事件

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use once_cell::sync::Lazy;
use std::collections::VecDeque;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::core::{events::LogEvent, states::AppState};
use crate::data::ItemCatalog;
use crate::equipment::components::{EquipSwitchCoordinator, Equipment};
use crate::equipment::events::SwitchListAction;
use crate::inventory::components::{EquipLocation, InventoryStore, ItemCategory, ItemIndex, ItemRecord};
use crate::inventory::events::*;
use crate::inventory::tabs::Tab;
use crate::inventory::InventorySet;
use crate::transfer::components::{TransferDesk, TransferTarget};
use crate::transfer::events::*;

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
                    if line.is_empty() {
                        continue;
                    }
                    if let Ok(mut buf) = buffer.lock() {
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
            // 仅在 InGame 处理命令
            .add_systems(
                Update,
                execute_cli_commands
                    .before(InventorySet::Mirror)
                    .run_if(in_state(AppState::InGame)),
            )
            .add_systems(
                Update,
                echo_outbound_requests
                    .after(InventorySet::Projection)
                    .run_if(in_state(AppState::InGame)),
            );
    }
}

/* ---------------------------- 事件与枚举 ---------------------------- */

/// 终端敲的一整行
#[derive(Event)]
struct CliLine(String);

/// 我们支持的命令
enum Command {
    Help,
    Status,
    Exit,
    Items(Option<String>), // None=全部；Some(token)=按 id/uuid/name 查询
    Notify(ServerNotification),
    Action(InventoryAction),
    Switch(SwitchListAction),
    Inventory,
    Drag(ItemIndex),
    Drop(String),
    TabDrop { data_tab: String, payload: String },
    Quantity(QuantityInput),
    Panel(PanelToggled),
    Usage(&'static str),
    Unsupported(String),
}

/// 命令会写入的全部事件
#[derive(SystemParam)]
struct CliWriters<'w> {
    notify: EventWriter<'w, ServerNotification>,
    action: EventWriter<'w, InventoryAction>,
    switch: EventWriter<'w, SwitchListAction>,
    list: EventWriter<'w, ListInventoryEvent>,
    drag: EventWriter<'w, DragStarted>,
    drop: EventWriter<'w, ItemDropped>,
    tab_drop: EventWriter<'w, TabDropped>,
    quantity: EventWriter<'w, QuantityInput>,
    panel: EventWriter<'w, PanelToggled>,
}

const HELP: &str = "命令列表:
  help                                   查看帮助
  status                                 查看当前状态
  exit / quit                            退出程序
  items [token]                          列出物品目录，或按 id / uuid / 名称 查询
  -- 模拟服务器 --
  appear <idx> <type> <category> [count] [slots] [worn-slots]
  batch <json 数组>                       整表下发
  remove <idx> <count>                   按差量扣除
  set <idx> <count>                      设置绝对数量
  fav <idx> <0|1>                        收藏标记
  wear <idx> <slots>                     穿上背包里的物品
  takeoff <idx>                          脱下
  -- 背包窗口 --
  inv                                    打印当前标签页
  tab <usable|equip|etc|fav>             切换标签页
  use <idx>                              双击
  info <idx> / alt <idx>                 右键 / Alt+右键
  stage <idx> / unstage <idx>            换装列表
  drag <idx>                             从背包拖出
  drop <json>                            放到背包
  tabdrop <tab> <json>                   放到标签页
  qty <n> / cancel                       数量输入框
  toggle                                 开关窗口
  pref <lock|compare|npcsale>            切换选项
  open <storage|cart> <on|off>           其它面板开关
  slots: weapon shield armor head_top head_mid head_bottom garment shoes acc_l acc_r，可用 + 连接或直接写数字";

/* ---------------------------- 读取 stdin ---------------------------- */

fn read_stdin(mut writer: EventWriter<CliLine>) {
    let Ok(mut buffer) = CLI_BUFFER.lock() else {
        return;
    };
    while let Some(line) = buffer.pop_front() {
        writer.write(CliLine(line));
    }
}

/* ---------------------------- 命令执行 ---------------------------- */

fn execute_cli_commands(
    mut line_reader: EventReader<CliLine>,
    mut next_state: ResMut<NextState<AppState>>,
    mut log: EventWriter<LogEvent>,
    mut writers: CliWriters,
    state: Res<State<AppState>>,
    catalog: Res<ItemCatalog>,
    store: Res<InventoryStore>,
    equipment: Res<Equipment>,
    switch: Res<EquipSwitchCoordinator>,
    desk: Res<TransferDesk>,
) {
    for CliLine(input) in line_reader.read() {
        match parse_command(input) {
            Command::Help => {
                log.write(LogEvent(HELP.into()));
            }

            Command::Status => {
                log.write(LogEvent(format!(
                    "State: {:?}, Catalog: {}, Inventory: {}, Worn: {}, Staged: {}, Prompt: {}",
                    state.get(),
                    catalog.len(),
                    store.len(),
                    equipment.count(),
                    switch.staged().len(),
                    desk.pending()
                        .map_or("-".to_string(), |p| format!("{} #{} (max {})", p.source.tag(), p.index, p.max)),
                )));
            }

            Command::Exit => {
                next_state.set(AppState::Shutdown);
            }

            Command::Items(None) => {
                for entry in catalog.entries() {
                    log.write(LogEvent(format!(
                        "{} | {} | {}",
                        uuid_from_id(entry.id),
                        entry.id,
                        entry.name
                    )));
                }
            }

            Command::Items(Some(token)) => {
                // 按三种字段匹配
                let t_low = token.to_lowercase();
                let found = catalog.entries().into_iter().find(|e| {
                    e.id.to_string() == t_low
                        || e.name.eq_ignore_ascii_case(&t_low)
                        || uuid_from_id(e.id).to_string() == t_low
                });
                let msg = match found {
                    Some(e) => format!(
                        "==================================================
UUID : {}
ID   : {}
Name : {}
Unidentified : {}
Held : {}
==================================================",
                        uuid_from_id(e.id),
                        e.id,
                        e.name,
                        e.unidentified_name.as_deref().unwrap_or("-"),
                        store.get_by_type(e.id).map_or(0, ItemRecord::amount),
                    ),
                    None => "未找到匹配物品".into(),
                };
                log.write(LogEvent(msg));
            }

            Command::Notify(notification) => {
                writers.notify.write(notification);
            }

            Command::Action(action) => {
                writers.action.write(action);
            }

            Command::Switch(action) => {
                writers.switch.write(action);
            }

            Command::Inventory => {
                writers.list.write(ListInventoryEvent);
            }

            Command::Drag(index) => {
                writers.drag.write(DragStarted { index });
            }

            Command::Drop(payload) => {
                writers.drop.write(ItemDropped { payload });
            }

            Command::TabDrop { data_tab, payload } => {
                writers.tab_drop.write(TabDropped { payload, data_tab });
            }

            Command::Quantity(input) => {
                writers.quantity.write(input);
            }

            Command::Panel(toggle) => {
                writers.panel.write(toggle);
            }

            Command::Usage(usage) => {
                log.write(LogEvent(format!("用法: {usage}")));
            }

            Command::Unsupported(cmd) => {
                log.write(LogEvent(format!("不支持的命令: {cmd}")));
            }
        }
    }
}

/// 把发给其它模块 / 服务器的请求打印出来
fn echo_outbound_requests(
    mut log: EventWriter<LogEvent>,
    mut count_changed: EventReader<ItemCountChanged>,
    mut use_item: EventReader<UseItemRequest>,
    mut use_card: EventReader<UseCardRequest>,
    mut equip_item: EventReader<EquipItemRequest>,
    mut prompt: EventReader<QuantityPromptOpened>,
    mut remove: EventReader<PanelRemoveRequest>,
    mut favorite: EventReader<SetFavoriteRequest>,
    mut storage_add: EventReader<StorageAddRequest>,
    mut move_to_cart: EventReader<MoveToCartRequest>,
    mut drag_ready: EventReader<DragPayloadReady>,
) {
    let mut lines = Vec::new();
    lines.extend(count_changed.read().map(|e| format!("数量变化: #{} -> {}", e.item_type_id, e.count)));
    lines.extend(use_item.read().map(|e| format!("→ 使用物品 idx={}", e.index)));
    lines.extend(use_card.read().map(|e| format!("→ 使用卡片 idx={}", e.index)));
    lines.extend(
        equip_item
            .read()
            .map(|e| format!("→ 穿戴 idx={} location={}", e.index, e.location.0)),
    );
    lines.extend(prompt.read().map(|e| format!("请输入数量 (1-{})，qty <n> 或 cancel", e.max)));
    lines.extend(remove.read().map(|PanelRemoveRequest(r)| {
        format!("→ {} 移除 idx={} x{}", r.panel.tag(), r.index, r.quantity)
    }));
    lines.extend(
        favorite
            .read()
            .map(|e| format!("→ 收藏 idx={} favorite={}", e.index, e.favorite)),
    );
    lines.extend(storage_add.read().map(|e| format!("→ 存入仓库 idx={} x{}", e.index, e.count)));
    lines.extend(move_to_cart.read().map(|e| format!("→ 放入手推车 idx={} x{}", e.index, e.count)));
    lines.extend(drag_ready.read().map(|DragPayloadReady(text)| format!("拖拽数据: {text}")));

    for line in lines {
        log.write(LogEvent(line));
    }
}

/* ---------------------------- 工具函数 ---------------------------- */

fn parse_command(input: &str) -> Command {
    let (cmd, rest) = input.split_once(' ').unwrap_or((input, ""));
    let rest = rest.trim();
    let mut parts = rest.split_whitespace();
    match cmd.to_lowercase().as_str() {
        "help" | "h" | "?" => Command::Help,
        "status" | "s" => Command::Status,
        "exit" | "quit" | "q" => Command::Exit,
        "items" | "item" | "i" => Command::Items(parts.next().map(|s| s.to_string())),

        "appear" => parse_appear(&mut parts).map_or(
            Command::Usage("appear <idx> <type> <category> [count] [slots] [worn-slots]"),
            |item| Command::Notify(ServerNotification::ItemAppeared(item)),
        ),
        "batch" => match serde_json::from_str::<Vec<ItemRecord>>(rest) {
            Ok(items) => Command::Notify(ServerNotification::ItemsAppeared(items)),
            Err(_) => Command::Usage("batch [{\"index\":1,\"item_type_id\":501,\"count\":3,\"category\":\"Healing\"}]"),
        },
        "remove" => match (num(parts.next()), num(parts.next())) {
            (Some(index), Some(count)) => Command::Notify(ServerNotification::ItemRemoved { index, count }),
            _ => Command::Usage("remove <idx> <count>"),
        },
        "set" => match (num(parts.next()), num(parts.next())) {
            (Some(index), Some(count)) => Command::Notify(ServerNotification::ItemCountSet { index, count }),
            _ => Command::Usage("set <idx> <count>"),
        },
        "fav" => match (num(parts.next()), num(parts.next())) {
            (Some(index), Some(flag)) => {
                Command::Notify(ServerNotification::ItemFavoriteChanged { index, flag })
            }
            _ => Command::Usage("fav <idx> <0|1>"),
        },
        "wear" => match (num(parts.next()), parts.next().and_then(parse_location)) {
            (Some(index), Some(wear_state)) => {
                Command::Notify(ServerNotification::ItemWorn { index, wear_state })
            }
            _ => Command::Usage("wear <idx> <slots>"),
        },
        "takeoff" => num(parts.next()).map_or(Command::Usage("takeoff <idx>"), |index| {
            Command::Notify(ServerNotification::ItemTakenOff { index })
        }),

        "inventory" | "inv" => Command::Inventory,
        "tab" => parts.next().and_then(Tab::parse).map_or(
            Command::Usage("tab <usable|equip|etc|fav>"),
            |tab| Command::Action(InventoryAction::SwitchTab(tab)),
        ),
        "use" => num(parts.next()).map_or(Command::Usage("use <idx>"), |index| {
            Command::Action(InventoryAction::Activate(index))
        }),
        "info" | "alt" => num(parts.next()).map_or(Command::Usage("info|alt <idx>"), |index| {
            Command::Action(InventoryAction::Inspect { index, alt: cmd.eq_ignore_ascii_case("alt") })
        }),
        "toggle" => Command::Action(InventoryAction::ToggleWindow),
        "pref" => match parts.next() {
            Some("lock") => Command::Action(InventoryAction::TogglePreference(PreferenceFlag::ItemLock)),
            Some("compare") => {
                Command::Action(InventoryAction::TogglePreference(PreferenceFlag::ItemCompare))
            }
            Some("npcsale") => {
                Command::Action(InventoryAction::TogglePreference(PreferenceFlag::NpcSaleLock))
            }
            _ => Command::Usage("pref <lock|compare|npcsale>"),
        },
        "stage" => num(parts.next()).map_or(Command::Usage("stage <idx>"), |index| {
            Command::Switch(SwitchListAction::Stage(index))
        }),
        "unstage" => num(parts.next()).map_or(Command::Usage("unstage <idx>"), |index| {
            Command::Switch(SwitchListAction::Unstage(index))
        }),

        "drag" => num(parts.next()).map_or(Command::Usage("drag <idx>"), Command::Drag),
        "drop" if !rest.is_empty() => Command::Drop(rest.to_string()),
        "tabdrop" => match rest.split_once(' ') {
            Some((data_tab, payload)) => Command::TabDrop {
                data_tab: data_tab.to_string(),
                payload: payload.trim().to_string(),
            },
            None => Command::Usage("tabdrop <tab> <json>"),
        },
        "qty" => num(parts.next()).map_or(Command::Usage("qty <n>"), |n| {
            Command::Quantity(QuantityInput::Submit(n))
        }),
        "cancel" => Command::Quantity(QuantityInput::Cancel),
        "open" => {
            let panel = match parts.next() {
                Some("storage") => Some(TransferTarget::Storage),
                Some("cart") => Some(TransferTarget::Cart),
                _ => None,
            };
            let open = match parts.next() {
                Some("on") => Some(true),
                Some("off") => Some(false),
                _ => None,
            };
            match (panel, open) {
                (Some(panel), Some(open)) => Command::Panel(PanelToggled { panel, open }),
                _ => Command::Usage("open <storage|cart> <on|off>"),
            }
        }
        other => Command::Unsupported(other.into()),
    }
}

fn num<T: FromStr>(token: Option<&str>) -> Option<T> {
    token?.parse().ok()
}

fn parse_appear<'a>(parts: &mut impl Iterator<Item = &'a str>) -> Option<ItemRecord> {
    let index = num(parts.next())?;
    let item_type_id = num(parts.next())?;
    let category = ItemCategory::parse(parts.next()?)?;
    let mut item = ItemRecord::new(index, item_type_id, category);
    if let Some(count) = parts.next() {
        // `-` 表示不带数量
        item.count = if count == "-" { None } else { Some(count.parse().ok()?) };
    }
    if let Some(slots) = parts.next() {
        item.location = parse_location(slots)?;
    }
    if let Some(slots) = parts.next() {
        item.wear_state = parse_location(slots)?;
    }
    Some(item)
}

/// `weapon+shield` 或数字
fn parse_location(token: &str) -> Option<EquipLocation> {
    if let Ok(bits) = token.parse() {
        return Some(EquipLocation(bits));
    }
    token.split('+').try_fold(EquipLocation::NONE, |acc, name| {
        let slot = match name.to_ascii_lowercase().as_str() {
            "head_bottom" => EquipLocation::HEAD_BOTTOM,
            "weapon" => EquipLocation::WEAPON,
            "garment" => EquipLocation::GARMENT,
            "acc_l" => EquipLocation::ACCESSORY_LEFT,
            "armor" => EquipLocation::ARMOR,
            "shield" => EquipLocation::SHIELD,
            "shoes" => EquipLocation::SHOES,
            "acc_r" => EquipLocation::ACCESSORY_RIGHT,
            "head_top" => EquipLocation::HEAD_TOP,
            "head_mid" => EquipLocation::HEAD_MID,
            _ => return None,
        };
        Some(acc | slot)
    })
}

fn uuid_from_id(id: u32) -> Uuid {
    // 用固定 namespace + id 生成版本 5 UUID，保证可重复得到同一值
    Uuid::new_v5(&Uuid::NAMESPACE_OID, id.to_string().as_bytes())
}
