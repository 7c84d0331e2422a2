// ==========================================
// 工厂设备维护管理系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 本地 SQLite 数据访问（界面偏好）
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod preference_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use preference_repo::{PreferenceEntry, PreferenceRepository};
