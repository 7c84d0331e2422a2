// ==========================================
// 工厂设备维护管理系统 - 保养预警引擎
// ==========================================
// 职责: 从设备评估结果中提取需要提醒的保养计划
// 输入: EquipmentStatus 列表
// 输出: MaintenanceAlert 列表 + 统计
// 规则: 已挂工单的计划不再重复提醒
// ==========================================

use crate::domain::equipment::{EquipmentStatus, ScheduleEvaluation};
use crate::domain::types::{MaintenanceState, MaintenanceUnit};
use crate::engine::interval_status::compare_urgency;
use crate::i18n::{self, format_quantity};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use tracing::instrument;

// ==========================================
// 预警等级 (Alert Level)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertLevel {
    Warning,  // 即将到期
    Critical, // 已超期
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertLevel::Warning => write!(f, "WARNING"),
            AlertLevel::Critical => write!(f, "CRITICAL"),
        }
    }
}

// ==========================================
// MaintenanceAlert - 保养预警
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceAlert {
    /// 稳定键 "{equipment}:{schedule}"，供前端比对两次轮询结果
    pub alert_key: String,

    pub equipment_id: Option<i64>,
    pub equipment_code: String,
    pub equipment_name: String,

    pub schedule_id: Option<i64>,
    pub schedule_index: usize,
    pub description: Option<String>,

    pub level: AlertLevel,
    pub state: MaintenanceState,
    pub remaining: Option<f64>,
    pub overdue_by: Option<f64>,
    pub unit: Option<MaintenanceUnit>,

    /// 提示文案
    pub message: String,

    /// 预警原因 (JSON)
    pub reason: String,
}

// ==========================================
// AlertSummary - 预警统计
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertSummary {
    pub total_alerts: usize,
    pub critical_count: usize,
    pub warning_count: usize,
    /// 涉及的设备编码（按预警顺序去重）
    pub equipment_codes: Vec<String>,
}

// ==========================================
// MaintenanceAlertEngine - 保养预警引擎
// ==========================================
#[derive(Debug, Clone)]
pub struct MaintenanceAlertEngine {
    locale: String,
}

impl MaintenanceAlertEngine {
    pub fn new() -> Self {
        Self {
            locale: i18n::DEFAULT_LOCALE.to_string(),
        }
    }

    pub fn with_locale(mut self, locale: &str) -> Self {
        self.locale = i18n::normalize_locale(locale).to_string();
        self
    }

    /// 提取预警
    ///
    /// 每个 超期/即将到期 且未挂工单 的计划生成一条预警；
    /// 结果按 超期优先、remaining 升序 排列。
    #[instrument(skip(self, statuses), fields(count = statuses.len()))]
    pub fn collect(&self, statuses: &[EquipmentStatus]) -> Vec<MaintenanceAlert> {
        let mut candidates: Vec<(&EquipmentStatus, &ScheduleEvaluation)> = statuses
            .iter()
            .flat_map(|eq| eq.schedules.iter().map(move |s| (eq, s)))
            .filter(|(_, s)| {
                matches!(
                    s.status.state,
                    MaintenanceState::Overdue | MaintenanceState::Approaching
                )
            })
            .filter(|(_, s)| s.current_ticket_id.is_none())
            .collect();

        candidates.sort_by(|(_, a), (_, b)| compare_urgency(&a.status, &b.status));

        let alerts: Vec<MaintenanceAlert> = candidates
            .into_iter()
            .map(|(eq, s)| self.build_alert(eq, s))
            .collect();

        tracing::debug!(alerts = alerts.len(), "保养预警提取完成");
        alerts
    }

    /// 统计预警
    pub fn summarize(&self, alerts: &[MaintenanceAlert]) -> AlertSummary {
        let mut summary = AlertSummary {
            total_alerts: alerts.len(),
            ..AlertSummary::default()
        };

        for alert in alerts {
            match alert.level {
                AlertLevel::Critical => summary.critical_count += 1,
                AlertLevel::Warning => summary.warning_count += 1,
            }
            if !summary.equipment_codes.contains(&alert.equipment_code) {
                summary.equipment_codes.push(alert.equipment_code.clone());
            }
        }

        summary
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    fn build_alert(&self, eq: &EquipmentStatus, s: &ScheduleEvaluation) -> MaintenanceAlert {
        let level = if s.status.state == MaintenanceState::Overdue {
            AlertLevel::Critical
        } else {
            AlertLevel::Warning
        };

        let equipment_part = eq
            .equipment_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| eq.code.clone());
        let schedule_part = s
            .schedule_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| format!("#{}", s.schedule_index));

        MaintenanceAlert {
            alert_key: format!("{}:{}", equipment_part, schedule_part),
            equipment_id: eq.equipment_id,
            equipment_code: eq.code.clone(),
            equipment_name: eq.name.clone(),
            schedule_id: s.schedule_id,
            schedule_index: s.schedule_index,
            description: s.description.clone(),
            level,
            state: s.status.state,
            remaining: s.status.remaining,
            overdue_by: s.status.overdue_by,
            unit: eq.unit,
            message: self.build_message(eq, s, level),
            reason: self.build_reason(eq, s, level),
        }
    }

    fn build_message(&self, eq: &EquipmentStatus, s: &ScheduleEvaluation, level: AlertLevel) -> String {
        let description = s
            .description
            .clone()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| i18n::t_in(&self.locale, "alert.default_description"));
        let unit_text = eq
            .unit
            .map(|u| i18n::t_in(&self.locale, u.i18n_key()))
            .unwrap_or_default();
        // 后端标注但本地数值不支持该结论时，不展示超期量/剩余量
        match (level, s.status.overdue_by, s.status.remaining) {
            (AlertLevel::Critical, Some(overdue), _) => i18n::t_with_args_in(
                &self.locale,
                "alert.critical",
                &[
                    ("code", &eq.code),
                    ("description", &description),
                    ("overdue", &format_quantity(overdue)),
                    ("unit", &unit_text),
                ],
            ),
            (AlertLevel::Warning, _, Some(remaining)) if remaining >= 0.0 => i18n::t_with_args_in(
                &self.locale,
                "alert.warning",
                &[
                    ("code", &eq.code),
                    ("description", &description),
                    ("remaining", &format_quantity(remaining)),
                    ("unit", &unit_text),
                ],
            ),
            (AlertLevel::Critical, None, _) => i18n::t_with_args_in(
                &self.locale,
                "alert.critical_server",
                &[("code", &eq.code), ("description", &description)],
            ),
            (AlertLevel::Warning, _, _) => i18n::t_with_args_in(
                &self.locale,
                "alert.warning_server",
                &[("code", &eq.code), ("description", &description)],
            ),
        }
    }

    fn build_reason(&self, eq: &EquipmentStatus, s: &ScheduleEvaluation, level: AlertLevel) -> String {
        json!({
            "level": level.to_string(),
            "state": s.status.state.to_api_str(),
            "source": s.status.source,
            "equipment_code": eq.code,
            "current_usage": eq.current_usage,
            "unit": eq.unit.map(|u| u.to_api_str()),
            "interval_value": s.interval_value,
            "next_due": s.status.next_due,
            "remaining": s.status.remaining,
            "used_fraction": s.status.used_fraction,
        })
        .to_string()
    }
}

impl Default for MaintenanceAlertEngine {
    fn default() -> Self {
        Self::new()
    }
}
