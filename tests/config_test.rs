// ==========================================
// ConfigManager 集成测试
// ==========================================
// 测试目标: 验证阈值配置读取、默认值回退、偏好持久化
// ==========================================


use plant_maint::config::{
    config_keys, ConfigManager, IntervalConfigReader, PreferenceStore, SqlitePreferenceStore,
};
use plant_maint::domain::CycleMode;
use plant_maint::engine::IntervalThresholds;
use plant_maint::repository::PreferenceRepository;
use test_helpers::{create_test_db, insert_test_config, open_test_connection};

#[tokio::test]
async fn test_config_manager_creation() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");

    let config_manager = ConfigManager::new(&db_path);
    assert!(
        config_manager.is_ok(),
        "ConfigManager should be created successfully"
    );
}

#[tokio::test]
async fn test_defaults_without_rows() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config_manager = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");

    let thresholds = config_manager
        .get_interval_thresholds()
        .await
        .expect("Should read thresholds");
    assert_eq!(thresholds, IntervalThresholds::default());
    assert_eq!(config_manager.get_label_locale().await.unwrap(), "zh-CN");
}

#[tokio::test]
async fn test_reads_stored_thresholds() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");
    insert_test_config(
        &conn,
        &[
            (config_keys::APPROACHING_USED_FRACTION, "0.9"),
            (config_keys::APPROACHING_REMAINING_FRACTION, "0.1"),
            (config_keys::APPROACHING_ABSOLUTE_REMAINING, "8"),
            (config_keys::CYCLE_MODE, "ROLLING"),
            (config_keys::LABEL_LOCALE, "en"),
        ],
    )
    .expect("Failed to insert test config");

    let config_manager = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");
    let thresholds = config_manager.get_interval_thresholds().await.unwrap();

    assert_eq!(thresholds.approaching_used_fraction, 0.9);
    assert_eq!(thresholds.approaching_remaining_fraction, 0.1);
    assert_eq!(thresholds.approaching_absolute_remaining, 8.0);
    assert_eq!(thresholds.cycle_mode, CycleMode::Rolling);
    assert_eq!(config_manager.get_label_locale().await.unwrap(), "en");
}

#[tokio::test]
async fn test_out_of_range_values_fall_back() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");
    insert_test_config(
        &conn,
        &[
            (config_keys::APPROACHING_USED_FRACTION, "0"),
            (config_keys::APPROACHING_REMAINING_FRACTION, "1"),
            (config_keys::APPROACHING_ABSOLUTE_REMAINING, "-3"),
        ],
    )
    .expect("Failed to insert test config");

    let config_manager = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");
    let thresholds = config_manager.get_interval_thresholds().await.unwrap();

    assert_eq!(thresholds, IntervalThresholds::default());
}

#[tokio::test]
async fn test_set_value_visible_to_new_manager() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");

    {
        let config_manager = ConfigManager::new(&db_path).unwrap();
        config_manager
            .set_global_config_value(config_keys::APPROACHING_ABSOLUTE_REMAINING, "12")
            .unwrap();
    }

    let config_manager = ConfigManager::new(&db_path).unwrap();
    assert_eq!(
        config_manager.get_approaching_absolute_remaining().await.unwrap(),
        12.0
    );
    assert_eq!(
        config_manager
            .get_global_config_value(config_keys::APPROACHING_ABSOLUTE_REMAINING)
            .unwrap()
            .as_deref(),
        Some("12")
    );
}

#[test]
fn test_preferences_survive_reopen() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");

    {
        let store = SqlitePreferenceStore::new(PreferenceRepository::new(&db_path).unwrap());
        store.set("hide_tips", "true").unwrap();
    }

    let store = SqlitePreferenceStore::new(PreferenceRepository::new(&db_path).unwrap());
    assert_eq!(store.get("hide_tips").unwrap().as_deref(), Some("true"));
    assert_eq!(store.list().unwrap().len(), 1);
}
