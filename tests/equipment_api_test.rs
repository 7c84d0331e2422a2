// ==========================================
// EquipmentApi / PreferenceApi 集成测试
// ==========================================
// 测试目标: 后端 JSON → 规范化 → 评估 → 工作清单/预警/看板 全链路
// ==========================================


use plant_maint::api::{ApiError, EquipmentApi, WorklistFilter};
use plant_maint::app::AppState;
use plant_maint::config::{config_keys, ConfigManager};
use plant_maint::domain::{MaintenanceState, MaintenanceUnit, TicketAction, TicketStatus};
use plant_maint::engine::AlertLevel;
use plant_maint::importer::{load_equipment_file, parse_equipment_list, ImportError};
use std::io::Write;
use test_helpers::{create_test_db, sample_equipment_json};

fn sample() -> Vec<plant_maint::domain::Equipment> {
    parse_equipment_list(sample_equipment_json()).expect("sample should parse")
}

#[test]
fn test_evaluate_json_end_to_end() {
    let api = EquipmentApi::default();
    let statuses = api.evaluate_json(sample_equipment_json()).unwrap();

    let states: Vec<(&str, MaintenanceState)> = statuses
        .iter()
        .map(|s| (s.code.as_str(), s.state()))
        .collect();
    assert_eq!(
        states,
        vec![
            ("CNC-01", MaintenanceState::Approaching),
            ("TRUCK-07", MaintenanceState::Overdue),
            ("PRESS-02", MaintenanceState::Normal),
            ("BENCH-09", MaintenanceState::Unset),
        ]
    );

    let truck = &statuses[1];
    assert_eq!(truck.unit, Some(MaintenanceUnit::Kilometers));
    assert!(truck.any_open_ticket);
    assert_eq!(truck.worst.as_ref().unwrap().schedule_id, Some(21));
}

#[test]
fn test_worklist_order() {
    let api = EquipmentApi::default();
    let items = api.build_worklist(&sample(), &WorklistFilter::default());

    let codes: Vec<&str> = items.iter().map(|s| s.code.as_str()).collect();
    assert_eq!(codes, vec!["TRUCK-07", "PRESS-02", "CNC-01", "BENCH-09"]);
}

#[test]
fn test_worklist_state_filter() {
    let api = EquipmentApi::default();
    let filter = WorklistFilter {
        states: vec![MaintenanceState::Overdue, MaintenanceState::Approaching],
        ..WorklistFilter::default()
    };
    let items = api.build_worklist(&sample(), &filter);

    let codes: Vec<&str> = items.iter().map(|s| s.code.as_str()).collect();
    assert_eq!(codes, vec!["TRUCK-07", "CNC-01"]);
}

#[test]
fn test_alerts_skip_ticketed_schedules() {
    let api = EquipmentApi::default();
    let alerts = api.list_alerts(&sample());

    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0].equipment_code, "TRUCK-07");
    assert_eq!(alerts[0].level, AlertLevel::Critical);
    assert_eq!(alerts[0].alert_key, "2:21");
    assert_eq!(alerts[1].equipment_code, "CNC-01");
    assert_eq!(alerts[1].level, AlertLevel::Warning);
}

#[test]
fn test_server_flagged_equipment_without_usage_is_alerted() {
    let json = r#"[
        {
            "id": 8,
            "code": "PUMP-08",
            "name": "循环泵",
            "maintenanceUnit": "hours",
            "maintenanceSchedules": [
                { "id": 81, "intervalValue": 500, "status": "overdue", "description": "更换密封" }
            ]
        }
    ]"#;
    let equipment = parse_equipment_list(json).unwrap();
    let api = EquipmentApi::default();

    let items = api.build_worklist(&equipment, &WorklistFilter::default());
    assert_eq!(items[0].state(), MaintenanceState::Overdue);

    let alerts = api.list_alerts(&equipment);
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].level, AlertLevel::Critical);
    assert_eq!(alerts[0].remaining, None);
    assert_eq!(alerts[0].message, "设备 PUMP-08 的保养计划「更换密封」已超期（后端标注）");
}

#[test]
fn test_dashboard_counts() {
    let api = EquipmentApi::default();
    let dashboard = api.dashboard_summary(&sample());

    assert_eq!(dashboard.total_equipment, 4);
    assert_eq!(dashboard.overdue_count, 1);
    assert_eq!(dashboard.approaching_count, 1);
    assert_eq!(dashboard.normal_count, 1);
    assert_eq!(dashboard.unset_count, 1);
    assert_eq!(dashboard.open_ticket_count, 1);
    assert_eq!(dashboard.alert_summary.critical_count, 1);
    assert_eq!(dashboard.alert_summary.warning_count, 1);
}

#[test]
fn test_load_equipment_file() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(sample_equipment_json().as_bytes()).unwrap();

    let equipment = load_equipment_file(file.path()).unwrap();
    assert_eq!(equipment.len(), 4);

    let err = load_equipment_file(std::path::Path::new("/nonexistent/equipment.json")).unwrap_err();
    assert!(matches!(err, ImportError::FileNotFound(_)));
}

#[test]
fn test_unexpected_shape_is_import_error() {
    let api = EquipmentApi::default();
    let err = api.evaluate_json(r#"{"total": 3}"#).unwrap_err();
    assert!(matches!(err, ApiError::ImportError(_)));
}

#[test]
fn test_ticket_flow() {
    let api = EquipmentApi::default();
    let status = api
        .apply_ticket_action(TicketStatus::Pending, TicketAction::Start)
        .unwrap();
    let status = api.apply_ticket_action(status, TicketAction::Complete).unwrap();
    assert_eq!(status, TicketStatus::Completed);
    assert_eq!(api.ticket_actions(status), vec![TicketAction::Reopen]);

    let err = api
        .apply_ticket_action(status, TicketAction::Hold)
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidStateTransition { .. }));
}

#[tokio::test]
async fn test_app_state_uses_configured_thresholds() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    {
        let cm = ConfigManager::new(&db_path).unwrap();
        cm.set_global_config_value(config_keys::APPROACHING_USED_FRACTION, "0.95")
            .unwrap();
        cm.set_global_config_value(config_keys::APPROACHING_REMAINING_FRACTION, "0.05")
            .unwrap();
        cm.set_global_config_value(config_keys::LABEL_LOCALE, "en").unwrap();
    }

    let state = AppState::new(db_path, None).await.unwrap();
    let statuses = state.equipment_api.evaluate(&sample());

    // 已用 0.9 < 0.95，剩余 500 > 5000×0.05 且 > 24
    assert_eq!(statuses[0].state(), MaintenanceState::Normal);
    assert_eq!(statuses[0].worst.as_ref().unwrap().status.label, "500 h remaining");
}

#[tokio::test]
async fn test_app_state_preferences_roundtrip() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let filter = WorklistFilter {
        states: vec![MaintenanceState::Overdue],
        unit: None,
        search: Some("truck".to_string()),
    };

    {
        let state = AppState::new(db_path.clone(), None).await.unwrap();
        state.preference_api.set_hide_tips(true).unwrap();
        state.preference_api.set_worklist_filter(&filter).unwrap();
    }

    let state = AppState::new(db_path, None).await.unwrap();
    assert!(state.preference_api.hide_tips().unwrap());

    let saved = state.preference_api.worklist_filter().unwrap();
    assert_eq!(saved, filter);

    let items = state.equipment_api.build_worklist(&sample(), &saved);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].code, "TRUCK-07");
}
