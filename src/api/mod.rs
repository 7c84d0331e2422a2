// ==========================================
// 工厂设备维护管理系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口，供宿主应用与命令行调用
// ==========================================

pub mod equipment_api;
pub mod error;
pub mod preference_api;

// 重导出核心类型
pub use equipment_api::{EquipmentApi, MaintenanceDashboard, WorklistFilter};
pub use error::{ApiError, ApiResult};
pub use preference_api::{preference_keys, PreferenceApi};
