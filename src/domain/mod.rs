// ==========================================
// 工厂设备维护管理系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod equipment;
pub mod ticket;
pub mod types;

// 重导出核心类型
pub use equipment::{
    Equipment, EquipmentStatus, MaintenanceSchedule, ScheduleEvaluation, StatusResult,
};
pub use ticket::{TicketAction, TicketStatus};
pub use types::{CycleMode, MaintenanceState, MaintenanceUnit, StatusSource};
