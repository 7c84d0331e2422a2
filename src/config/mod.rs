// ==========================================
// 工厂设备维护管理系统 - 配置层
// ==========================================
// 职责: 系统配置管理（保养阈值、周期模式、标签语言）与界面偏好
// 存储: config_kv 表 / user_preference 表
// ==========================================

pub mod config_manager;
pub mod interval_config_trait;
pub mod preference_store;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use interval_config_trait::{ConfigResult, IntervalConfigReader};
pub use preference_store::{MemoryPreferenceStore, PreferenceStore, SqlitePreferenceStore};
