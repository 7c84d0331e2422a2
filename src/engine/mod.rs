// ==========================================
// 工厂设备维护管理系统 - 引擎层
// ==========================================
// 职责: 实现业务规则引擎（纯计算，无 I/O）
// 红线: 引擎不访问数据库，不发起网络请求
// ==========================================

pub mod interval_status;
pub mod maintenance_alert;
pub mod ticket_transition;
pub mod worklist;

// 重导出核心引擎
pub use interval_status::{compare_urgency, IntervalPosition, IntervalStatusEngine, IntervalThresholds};
pub use maintenance_alert::{AlertLevel, AlertSummary, MaintenanceAlert, MaintenanceAlertEngine};
pub use ticket_transition::TicketTransitionError;
pub use worklist::{compare_status, sort_worklist};
