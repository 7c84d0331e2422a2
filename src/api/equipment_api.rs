// ==========================================
// 工厂设备维护管理系统 - 设备保养状态 API
// ==========================================
// 职责: 每次拉取设备、更新用量、编辑计划或完成工单后重新评估状态
// 说明: 设备数据以后端为准，这里只做派生计算，不写回
// ==========================================

use crate::api::error::{map_config_error, ApiResult};
use crate::config::interval_config_trait::IntervalConfigReader;
use crate::domain::equipment::{Equipment, EquipmentStatus};
use crate::domain::ticket::{TicketAction, TicketStatus};
use crate::domain::types::{MaintenanceState, MaintenanceUnit};
use crate::engine::interval_status::IntervalStatusEngine;
use crate::engine::maintenance_alert::{AlertSummary, MaintenanceAlert, MaintenanceAlertEngine};
use crate::engine::ticket_transition;
use crate::engine::worklist::sort_worklist;
use crate::importer::normalize::parse_equipment_list;
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::instrument;

// ==========================================
// WorklistFilter - 工作清单筛选条件
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorklistFilter {
    /// 为空表示不过滤状态
    pub states: Vec<MaintenanceState>,
    pub unit: Option<MaintenanceUnit>,
    /// 编码/名称关键字（不区分大小写）
    pub search: Option<String>,
}

impl WorklistFilter {
    pub fn matches(&self, status: &EquipmentStatus) -> bool {
        if !self.states.is_empty() && !self.states.contains(&status.state()) {
            return false;
        }

        if let Some(unit) = self.unit {
            if status.unit != Some(unit) {
                return false;
            }
        }

        match self.search.as_deref().map(str::trim) {
            Some(keyword) if !keyword.is_empty() => {
                let keyword = keyword.to_lowercase();
                status.code.to_lowercase().contains(&keyword)
                    || status.name.to_lowercase().contains(&keyword)
            }
            _ => true,
        }
    }
}

// ==========================================
// MaintenanceDashboard - 保养看板汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceDashboard {
    pub total_equipment: usize,
    pub overdue_count: usize,
    pub approaching_count: usize,
    pub normal_count: usize,
    pub unset_count: usize,
    /// 有未关闭工单的设备数
    pub open_ticket_count: usize,
    pub alert_summary: AlertSummary,
    pub generated_at: NaiveDateTime,
}

// ==========================================
// EquipmentApi
// ==========================================
pub struct EquipmentApi {
    engine: IntervalStatusEngine,
    alert_engine: MaintenanceAlertEngine,
}

impl Default for EquipmentApi {
    fn default() -> Self {
        Self::new(IntervalStatusEngine::new())
    }
}

impl EquipmentApi {
    /// 使用给定引擎创建（预警文案语言与引擎一致）
    pub fn new(engine: IntervalStatusEngine) -> Self {
        let alert_engine = MaintenanceAlertEngine::new().with_locale(engine.locale());
        Self {
            engine,
            alert_engine,
        }
    }

    /// 从配置读取阈值与标签语言
    pub async fn from_config(reader: &dyn IntervalConfigReader) -> ApiResult<Self> {
        let thresholds = map_config_error(reader.get_interval_thresholds().await)?;
        let locale = map_config_error(reader.get_label_locale().await)?;

        tracing::info!(
            cycle_mode = thresholds.cycle_mode.to_db_str(),
            locale = %locale,
            "设备保养状态 API 已按配置初始化"
        );

        let engine = IntervalStatusEngine::with_thresholds(thresholds).with_locale(&locale);
        Ok(Self::new(engine))
    }

    pub fn engine(&self) -> &IntervalStatusEngine {
        &self.engine
    }

    /// 评估设备列表（保持输入顺序）
    pub fn evaluate(&self, equipment: &[Equipment]) -> Vec<EquipmentStatus> {
        self.engine.evaluate_batch(equipment)
    }

    /// 生成工作清单：评估、筛选、排序
    #[instrument(skip(self, equipment, filter), fields(count = equipment.len()))]
    pub fn build_worklist(
        &self,
        equipment: &[Equipment],
        filter: &WorklistFilter,
    ) -> Vec<EquipmentStatus> {
        let mut items: Vec<EquipmentStatus> = self
            .evaluate(equipment)
            .into_iter()
            .filter(|status| filter.matches(status))
            .collect();
        sort_worklist(&mut items);

        tracing::debug!(items = items.len(), "工作清单生成完成");
        items
    }

    /// 提取保养预警
    pub fn list_alerts(&self, equipment: &[Equipment]) -> Vec<MaintenanceAlert> {
        let statuses = self.evaluate(equipment);
        self.alert_engine.collect(&statuses)
    }

    /// 看板汇总
    pub fn dashboard_summary(&self, equipment: &[Equipment]) -> MaintenanceDashboard {
        let statuses = self.evaluate(equipment);
        let alerts = self.alert_engine.collect(&statuses);

        let count_state = |state: MaintenanceState| {
            statuses.iter().filter(|s| s.state() == state).count()
        };

        MaintenanceDashboard {
            total_equipment: statuses.len(),
            overdue_count: count_state(MaintenanceState::Overdue),
            approaching_count: count_state(MaintenanceState::Approaching),
            normal_count: count_state(MaintenanceState::Normal),
            unset_count: count_state(MaintenanceState::Unset),
            open_ticket_count: statuses.iter().filter(|s| s.any_open_ticket).count(),
            alert_summary: self.alert_engine.summarize(&alerts),
            generated_at: Local::now().naive_local(),
        }
    }

    /// 解析后端原始 JSON 并评估
    pub fn evaluate_json(&self, json: &str) -> ApiResult<Vec<EquipmentStatus>> {
        let equipment = parse_equipment_list(json)?;
        Ok(self.evaluate(&equipment))
    }

    /// 当前工单状态下可用的操作
    pub fn ticket_actions(&self, status: TicketStatus) -> Vec<TicketAction> {
        ticket_transition::available_actions(status).to_vec()
    }

    /// 校验工单操作，返回目标状态
    pub fn apply_ticket_action(
        &self,
        status: TicketStatus,
        action: TicketAction,
    ) -> ApiResult<TicketStatus> {
        let next = ticket_transition::apply(status, action)?;
        tracing::info!(from = %status, action = %action, to = %next, "工单状态流转");
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::ApiError;
    use crate::domain::equipment::MaintenanceSchedule;

    fn fleet() -> Vec<Equipment> {
        vec![
            Equipment::new("PUMP-01", "Feed pump")
                .with_usage(MaintenanceUnit::Hours, 450.0)
                .with_schedule(MaintenanceSchedule::new(500.0)),
            Equipment::new("CNC-02", "Lathe")
                .with_usage(MaintenanceUnit::Hours, 530.0)
                .with_schedule(MaintenanceSchedule::new(500.0)),
            Equipment::new("TRUCK-03", "Forklift")
                .with_usage(MaintenanceUnit::Kilometers, 100.0)
                .with_schedule(MaintenanceSchedule::new(1000.0).with_ticket(7)),
            Equipment::new("BENCH-04", "Workbench"),
        ]
    }

    #[test]
    fn test_worklist_sorted_and_filtered() {
        let api = EquipmentApi::default();

        let all = api.build_worklist(&fleet(), &WorklistFilter::default());
        let codes: Vec<&str> = all.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, vec!["CNC-02", "PUMP-01", "TRUCK-03", "BENCH-04"]);

        let filter = WorklistFilter {
            unit: Some(MaintenanceUnit::Hours),
            search: Some("pump".to_string()),
            ..WorklistFilter::default()
        };
        let items = api.build_worklist(&fleet(), &filter);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].code, "PUMP-01");

        let filter = WorklistFilter {
            states: vec![MaintenanceState::Unset],
            ..WorklistFilter::default()
        };
        let items = api.build_worklist(&fleet(), &filter);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].code, "BENCH-04");
    }

    #[test]
    fn test_dashboard_summary() {
        let api = EquipmentApi::default();
        let dashboard = api.dashboard_summary(&fleet());

        assert_eq!(dashboard.total_equipment, 4);
        assert_eq!(dashboard.overdue_count, 1);
        assert_eq!(dashboard.approaching_count, 1);
        assert_eq!(dashboard.normal_count, 1);
        assert_eq!(dashboard.unset_count, 1);
        assert_eq!(dashboard.open_ticket_count, 1);
        assert_eq!(dashboard.alert_summary.total_alerts, 2);
        assert_eq!(dashboard.alert_summary.critical_count, 1);
    }

    #[test]
    fn test_evaluate_json_rejects_malformed() {
        let api = EquipmentApi::default();
        let err = api.evaluate_json("{not json").unwrap_err();
        assert!(matches!(err, ApiError::ImportError(_)));
    }

    #[test]
    fn test_ticket_action_wrappers() {
        let api = EquipmentApi::default();
        assert_eq!(
            api.ticket_actions(TicketStatus::OnHold),
            vec![TicketAction::Resume, TicketAction::Cancel]
        );
        assert_eq!(
            api.apply_ticket_action(TicketStatus::Pending, TicketAction::Start)
                .unwrap(),
            TicketStatus::InProgress
        );
        assert!(api
            .apply_ticket_action(TicketStatus::Completed, TicketAction::Complete)
            .is_err());
    }
}
