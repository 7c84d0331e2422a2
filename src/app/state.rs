// ==========================================
// 工厂设备维护管理系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{EquipmentApi, PreferenceApi};
use crate::config::config_manager::ConfigManager;
use crate::config::preference_store::SqlitePreferenceStore;
use crate::db::{ensure_schema, open_sqlite_connection};
use crate::engine::interval_status::IntervalStatusEngine;
use crate::i18n;
use crate::repository::preference_repo::PreferenceRepository;

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "PLANT_MAINT_DB_PATH";

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 设备保养状态API
    pub equipment_api: Arc<EquipmentApi>,

    /// 界面偏好API
    pub preference_api: Arc<PreferenceApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    /// - locale_override: 命令行指定的标签语言（优先于配置）
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开共享连接并建表
    /// 2. 初始化配置管理器与偏好仓储
    /// 3. 按配置创建状态引擎与API实例
    pub async fn new(db_path: String, locale_override: Option<&str>) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        ensure_schema(&conn).map_err(|e| format!("数据库建表失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("配置管理器初始化失败: {}", e))?,
        );

        let preference_repo = PreferenceRepository::from_connection(conn)
            .map_err(|e| format!("偏好仓储初始化失败: {}", e))?;
        let preference_api = Arc::new(PreferenceApi::new(Arc::new(SqlitePreferenceStore::new(
            preference_repo,
        ))));

        let equipment_api = EquipmentApi::from_config(config_manager.as_ref())
            .await
            .map_err(|e| format!("设备保养状态API初始化失败: {}", e))?;

        // 命令行语言优先
        let equipment_api = match locale_override {
            Some(locale) => {
                let locale = i18n::normalize_locale(locale);
                let engine = IntervalStatusEngine::with_thresholds(*equipment_api.engine().thresholds())
                    .with_locale(locale);
                EquipmentApi::new(engine)
            }
            None => equipment_api,
        };

        tracing::info!(
            locale = equipment_api.engine().locale(),
            "AppState初始化完成"
        );

        Ok(Self {
            db_path,
            config_manager,
            equipment_api: Arc::new(equipment_api),
            preference_api,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 PLANT_MAINT_DB_PATH > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./plant_maint.db");

    if let Some(data_dir) = dirs::data_dir() {
        #[cfg(debug_assertions)]
        {
            path = data_dir.join("plant-maint-dev");
        }

        #[cfg(not(debug_assertions))]
        {
            path = data_dir.join("plant-maint");
        }

        // 目录创建失败时由 SQLite 打开阶段报错
        std::fs::create_dir_all(&path).ok();
        path = path.join("plant_maint.db");
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::config_manager::config_keys;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_app_state_reads_locale_from_config() {
        let temp = NamedTempFile::new().unwrap();
        let db_path = temp.path().to_string_lossy().to_string();

        {
            let cm = ConfigManager::new(&db_path).unwrap();
            cm.set_global_config_value(config_keys::LABEL_LOCALE, "en").unwrap();
        }

        let state = AppState::new(db_path.clone(), None).await.unwrap();
        assert_eq!(state.equipment_api.engine().locale(), "en");

        let state = AppState::new(db_path, Some("zh")).await.unwrap();
        assert_eq!(state.equipment_api.engine().locale(), "zh-CN");
    }
}
