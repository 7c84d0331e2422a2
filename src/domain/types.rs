// ==========================================
// 工厂设备维护管理系统 - 领域类型定义
// ==========================================
// 保养计量单位 / 保养状态 / 状态来源 / 周期计数模式
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 保养计量单位 (Maintenance Unit)
// ==========================================
// 序列化格式: lowercase (与后端接口一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaintenanceUnit {
    Kilometers, // 里程
    Hours,      // 运行小时
    Cycles,     // 动作次数
    Days,       // 日历天
}

impl fmt::Display for MaintenanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_api_str())
    }
}

impl MaintenanceUnit {
    /// 解析后端返回的单位字符串（兼容缩写与单复数）
    ///
    /// 无法识别时返回 None，由调用方按"未配置"处理
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "kilometers" | "kilometer" | "km" | "kms" => Some(MaintenanceUnit::Kilometers),
            "hours" | "hour" | "h" | "hrs" => Some(MaintenanceUnit::Hours),
            "cycles" | "cycle" | "times" => Some(MaintenanceUnit::Cycles),
            "days" | "day" | "d" => Some(MaintenanceUnit::Days),
            _ => None,
        }
    }

    /// 接口字符串
    pub fn to_api_str(&self) -> &'static str {
        match self {
            MaintenanceUnit::Kilometers => "kilometers",
            MaintenanceUnit::Hours => "hours",
            MaintenanceUnit::Cycles => "cycles",
            MaintenanceUnit::Days => "days",
        }
    }

    /// 国际化键（单位简称）
    pub fn i18n_key(&self) -> &'static str {
        match self {
            MaintenanceUnit::Kilometers => "unit.kilometers",
            MaintenanceUnit::Hours => "unit.hours",
            MaintenanceUnit::Cycles => "unit.cycles",
            MaintenanceUnit::Days => "unit.days",
        }
    }
}

// ==========================================
// 保养状态 (Maintenance State)
// ==========================================
// 严重度: Overdue > Approaching > Normal > Unset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaintenanceState {
    Normal,      // 正常
    Approaching, // 即将到期
    Overdue,     // 已超期
    Unset,       // 未配置
}

impl fmt::Display for MaintenanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_api_str())
    }
}

impl MaintenanceState {
    /// 严重度排名（越大越紧急）
    pub fn severity(&self) -> u8 {
        match self {
            MaintenanceState::Overdue => 3,
            MaintenanceState::Approaching => 2,
            MaintenanceState::Normal => 1,
            MaintenanceState::Unset => 0,
        }
    }

    /// 解析后端标注的状态值
    ///
    /// 只认可 overdue / approaching / warning 三种，其余一律视为未标注。
    /// warning 是旧接口的写法，与 approaching 同义。
    pub fn from_server_annotation(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "overdue" => Some(MaintenanceState::Overdue),
            "approaching" | "warning" => Some(MaintenanceState::Approaching),
            _ => None,
        }
    }

    /// 解析筛选参数
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Some(MaintenanceState::Normal),
            "approaching" | "warning" => Some(MaintenanceState::Approaching),
            "overdue" => Some(MaintenanceState::Overdue),
            "unset" => Some(MaintenanceState::Unset),
            _ => None,
        }
    }

    pub fn to_api_str(&self) -> &'static str {
        match self {
            MaintenanceState::Normal => "normal",
            MaintenanceState::Approaching => "approaching",
            MaintenanceState::Overdue => "overdue",
            MaintenanceState::Unset => "unset",
        }
    }
}

// ==========================================
// 状态来源 (Status Source)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusSource {
    Computed, // 前端按用量计算
    Server,   // 后端已标注
}

// ==========================================
// 周期计数模式 (Cycle Mode)
// ==========================================
// SinceBaseline: 基准点即上次保养点，之后的用量全部计入当前周期（可超期）
// Rolling: 按整周期滚动，只给出下一个到期点（本地计算不会超期）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleMode {
    SinceBaseline,
    Rolling,
}

impl Default for CycleMode {
    fn default() -> Self {
        CycleMode::SinceBaseline
    }
}

impl CycleMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "since_baseline" | "baseline" => Some(CycleMode::SinceBaseline),
            "rolling" => Some(CycleMode::Rolling),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            CycleMode::SinceBaseline => "since_baseline",
            CycleMode::Rolling => "rolling",
        }
    }
}
