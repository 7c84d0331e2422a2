// ==========================================
// 工厂设备维护管理系统 - 命令行入口
// ==========================================
// 输入: 后端导出的设备 JSON（数组或 {data: [...]} 包装）
// 输出: JSON（stdout），日志走 stderr
// ==========================================

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use plant_maint::api::WorklistFilter;
use plant_maint::app::{get_default_db_path, AppState, DB_PATH_ENV};
use plant_maint::config::IntervalConfigReader;
use plant_maint::domain::{MaintenanceState, MaintenanceUnit, TicketAction, TicketStatus};
use plant_maint::importer::load_equipment_file;
use plant_maint::logging;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "plant-maint", version, about = "工厂设备维护管理系统 - 保养周期状态")]
struct Cli {
    /// SQLite 数据库路径（配置与界面偏好）
    #[arg(long, global = true, env = DB_PATH_ENV)]
    db: Option<PathBuf>,

    /// 状态标签语言（zh-CN / en）
    #[arg(long, global = true)]
    locale: Option<String>,

    /// 以 JSON 格式输出日志
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 评估设备并按原顺序输出状态
    Evaluate {
        #[arg(long)]
        input: PathBuf,
    },
    /// 生成保养工作清单（超期优先）
    Worklist {
        #[arg(long)]
        input: PathBuf,
        /// 状态过滤，可重复: overdue / approaching / normal / unset
        #[arg(long = "state")]
        states: Vec<String>,
        #[arg(long)]
        unit: Option<String>,
        #[arg(long)]
        search: Option<String>,
        /// 使用已保存的筛选条件（忽略其他筛选参数）
        #[arg(long)]
        saved_filter: bool,
        /// 将本次筛选条件保存为偏好
        #[arg(long)]
        save_filter: bool,
    },
    /// 输出保养预警
    Alerts {
        #[arg(long)]
        input: PathBuf,
    },
    /// 输出看板汇总
    Summary {
        #[arg(long)]
        input: PathBuf,
    },
    /// 工单状态流转
    #[command(subcommand)]
    Ticket(TicketCommand),
    /// 界面偏好
    #[command(subcommand)]
    Pref(PrefCommand),
    /// 系统配置
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand)]
enum TicketCommand {
    /// 列出当前状态可执行的操作
    Actions {
        #[arg(long)]
        status: String,
    },
    /// 校验操作并输出目标状态
    Apply {
        #[arg(long)]
        status: String,
        #[arg(long)]
        action: String,
    },
}

#[derive(Subcommand)]
enum PrefCommand {
    Get { key: String },
    Set { key: String, value: String },
    Remove { key: String },
    List,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// 输出全部配置与生效阈值
    Show,
    Set { key: String, value: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_json);

    let db_path = cli
        .db
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(get_default_db_path);
    tracing::debug!("使用数据库: {}", db_path);

    let state = AppState::new(db_path, cli.locale.as_deref())
        .await
        .map_err(|e| anyhow!(e))?;

    match cli.command {
        Command::Evaluate { input } => {
            let equipment = load_equipment_file(&input)?;
            print_json(&state.equipment_api.evaluate(&equipment))
        }
        Command::Worklist {
            input,
            states,
            unit,
            search,
            saved_filter,
            save_filter,
        } => {
            let filter = if saved_filter {
                state.preference_api.worklist_filter()?
            } else {
                build_filter(&states, unit.as_deref(), search)?
            };
            if save_filter {
                state.preference_api.set_worklist_filter(&filter)?;
            }

            let equipment = load_equipment_file(&input)?;
            print_json(&state.equipment_api.build_worklist(&equipment, &filter))
        }
        Command::Alerts { input } => {
            let equipment = load_equipment_file(&input)?;
            print_json(&state.equipment_api.list_alerts(&equipment))
        }
        Command::Summary { input } => {
            let equipment = load_equipment_file(&input)?;
            print_json(&state.equipment_api.dashboard_summary(&equipment))
        }
        Command::Ticket(TicketCommand::Actions { status }) => {
            let status = parse_ticket_status(&status)?;
            print_json(&state.equipment_api.ticket_actions(status))
        }
        Command::Ticket(TicketCommand::Apply { status, action }) => {
            let status = parse_ticket_status(&status)?;
            let action = TicketAction::parse(&action)
                .ok_or_else(|| anyhow!("未知的工单操作: {}", action))?;
            print_json(&state.equipment_api.apply_ticket_action(status, action)?)
        }
        Command::Pref(PrefCommand::Get { key }) => print_json(&state.preference_api.get(&key)?),
        Command::Pref(PrefCommand::Set { key, value }) => {
            state.preference_api.set(&key, &value)?;
            print_json(&serde_json::json!({ "key": key, "value": value }))
        }
        Command::Pref(PrefCommand::Remove { key }) => {
            print_json(&state.preference_api.remove(&key)?)
        }
        Command::Pref(PrefCommand::List) => {
            let entries: serde_json::Map<String, serde_json::Value> = state
                .preference_api
                .list()?
                .into_iter()
                .map(|(k, v)| (k, serde_json::Value::String(v)))
                .collect();
            print_json(&entries)
        }
        Command::Config(ConfigCommand::Show) => {
            let snapshot = state
                .config_manager
                .get_config_snapshot()
                .map_err(|e| anyhow!(e))?;
            let thresholds = state
                .config_manager
                .get_interval_thresholds()
                .await
                .map_err(|e| anyhow!(e))?;
            let stored: serde_json::Value =
                serde_json::from_str(&snapshot).context("配置快照解析失败")?;
            print_json(&serde_json::json!({
                "stored": stored,
                "effective": thresholds,
                "locale": state.equipment_api.engine().locale(),
            }))
        }
        Command::Config(ConfigCommand::Set { key, value }) => {
            state
                .config_manager
                .set_global_config_value(&key, &value)
                .map_err(|e| anyhow!(e))?;
            print_json(&serde_json::json!({ "key": key, "value": value }))
        }
    }
}

fn build_filter(
    states: &[String],
    unit: Option<&str>,
    search: Option<String>,
) -> Result<WorklistFilter> {
    let states = states
        .iter()
        .map(|s| MaintenanceState::parse(s).ok_or_else(|| anyhow!("未知的保养状态: {}", s)))
        .collect::<Result<Vec<_>>>()?;
    let unit = unit
        .map(|u| MaintenanceUnit::parse(u).ok_or_else(|| anyhow!("未知的计量单位: {}", u)))
        .transpose()?;

    Ok(WorklistFilter {
        states,
        unit,
        search,
    })
}

fn parse_ticket_status(s: &str) -> Result<TicketStatus> {
    TicketStatus::parse(s).ok_or_else(|| anyhow!("未知的工单状态: {}", s))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
