// ==========================================
// 工厂设备维护管理系统 - 导入层
// ==========================================
// 职责: 接口边界的数据规范化（后端 JSON → 领域类型）
// ==========================================

pub mod error;
pub mod normalize;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use normalize::{
    load_equipment_file, normalize_equipment, normalize_schedule, parse_equipment_list,
    RawEquipmentRecord, RawScheduleRecord,
};
