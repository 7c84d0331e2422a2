// ==========================================
// 工厂设备维护管理系统 - 设备与保养计划领域模型
// ==========================================
// 设备 / 保养计划 为后端拥有的实体，前端每次拉取后持有只读副本
// 保养状态 (StatusResult) 为派生值，不存储
// ==========================================

use crate::domain::types::{MaintenanceState, MaintenanceUnit, StatusSource};
use serde::{Deserialize, Serialize};

// ==========================================
// Equipment - 设备
// ==========================================
// 已规范化的类型化记录（字段别名/数值容错在 importer::normalize 中完成）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    // ===== 标识 =====
    pub id: Option<i64>,
    pub code: String,
    pub name: String,

    // ===== 描述 =====
    pub equipment_type: Option<String>,
    pub location: Option<String>,

    // ===== 用量 =====
    pub maintenance_unit: Option<MaintenanceUnit>, // 未设置表示未启用按用量保养
    pub current_usage: Option<f64>,                // 缺失时不参与计算

    // ===== 保养计划 (一对多) =====
    #[serde(default)]
    pub maintenance_schedules: Vec<MaintenanceSchedule>,
}

impl Equipment {
    /// 创建未配置保养的设备
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: None,
            code: code.into(),
            name: name.into(),
            equipment_type: None,
            location: None,
            maintenance_unit: None,
            current_usage: None,
            maintenance_schedules: Vec::new(),
        }
    }

    /// 设置计量单位与当前用量
    pub fn with_usage(mut self, unit: MaintenanceUnit, current_usage: f64) -> Self {
        self.maintenance_unit = Some(unit);
        self.current_usage = Some(current_usage);
        self
    }

    /// 追加保养计划
    pub fn with_schedule(mut self, schedule: MaintenanceSchedule) -> Self {
        self.maintenance_schedules.push(schedule);
        self
    }

    /// 是否存在进行中的维修工单（任一计划挂有工单）
    pub fn has_open_ticket(&self) -> bool {
        self.maintenance_schedules.iter().any(|s| s.has_open_ticket())
    }
}

// ==========================================
// MaintenanceSchedule - 保养计划
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceSchedule {
    pub id: Option<i64>,
    pub interval_value: Option<f64>,         // 周期长度（设备计量单位）
    pub start_from_usage: Option<f64>,       // 起算用量，缺省 0
    pub last_completed_at_usage: Option<f64>, // 上次完成保养时的用量
    pub description: Option<String>,
    pub current_ticket_id: Option<i64>,      // 已有未关闭工单
    pub status: Option<String>,              // 后端标注的状态
}

impl MaintenanceSchedule {
    /// 按周期长度创建计划
    pub fn new(interval_value: f64) -> Self {
        Self {
            id: None,
            interval_value: Some(interval_value),
            start_from_usage: None,
            last_completed_at_usage: None,
            description: None,
            current_ticket_id: None,
            status: None,
        }
    }

    pub fn with_start_from(mut self, start_from_usage: f64) -> Self {
        self.start_from_usage = Some(start_from_usage);
        self
    }

    pub fn with_last_completed(mut self, usage: f64) -> Self {
        self.last_completed_at_usage = Some(usage);
        self
    }

    pub fn with_ticket(mut self, ticket_id: i64) -> Self {
        self.current_ticket_id = Some(ticket_id);
        self
    }

    pub fn with_server_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// 基准用量
    ///
    /// 优先取上次完成用量，其次起算用量，均缺失时为 0。非有限值视为缺失。
    pub fn baseline_usage(&self) -> f64 {
        self.last_completed_at_usage
            .filter(|v| v.is_finite())
            .or(self.start_from_usage.filter(|v| v.is_finite()))
            .unwrap_or(0.0)
    }

    /// 有效周期长度（> 0 且有限），否则 None
    pub fn effective_interval(&self) -> Option<f64> {
        self.interval_value.filter(|v| v.is_finite() && *v > 0.0)
    }

    pub fn has_open_ticket(&self) -> bool {
        self.current_ticket_id.is_some()
    }
}

// ==========================================
// StatusResult - 保养状态（派生）
// ==========================================
// remaining < 0 表示已超期 |remaining|；Unset 时 remaining 为 None
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResult {
    pub state: MaintenanceState,
    pub remaining: Option<f64>,
    pub overdue_by: Option<f64>,
    pub next_due: Option<f64>,
    pub used_fraction: Option<f64>,
    pub source: StatusSource,
    pub label: String,
}

impl StatusResult {
    /// 未配置
    pub fn unset(label: impl Into<String>) -> Self {
        Self {
            state: MaintenanceState::Unset,
            remaining: None,
            overdue_by: None,
            next_due: None,
            used_fraction: None,
            source: StatusSource::Computed,
            label: label.into(),
        }
    }

    pub fn is_unset(&self) -> bool {
        self.state == MaintenanceState::Unset
    }
}

// ==========================================
// ScheduleEvaluation - 单个计划的评估结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEvaluation {
    pub schedule_index: usize, // 在设备计划列表中的位置
    pub schedule_id: Option<i64>,
    pub description: Option<String>,
    pub interval_value: Option<f64>,
    pub current_ticket_id: Option<i64>,
    pub status: StatusResult,
}

// ==========================================
// EquipmentStatus - 设备汇总状态
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentStatus {
    pub equipment_id: Option<i64>,
    pub code: String,
    pub name: String,
    pub unit: Option<MaintenanceUnit>,
    pub current_usage: Option<f64>,

    /// 最紧急的计划；无可评估计划时为 None（显示为"未配置"）
    pub worst: Option<ScheduleEvaluation>,

    /// 参与评估的计划（已剔除 Unset）
    pub schedules: Vec<ScheduleEvaluation>,

    /// 仅用于"有进行中工单"角标，不抑制告警
    pub any_open_ticket: bool,
}

impl EquipmentStatus {
    /// 汇总状态；无状态时为 Unset
    pub fn state(&self) -> MaintenanceState {
        self.worst
            .as_ref()
            .map(|w| w.status.state)
            .unwrap_or(MaintenanceState::Unset)
    }

    /// 汇总剩余量
    pub fn remaining(&self) -> Option<f64> {
        self.worst.as_ref().and_then(|w| w.status.remaining)
    }
}
