// ==========================================
// 工厂设备维护管理系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 按用量保养的周期状态计算（超期 / 即将到期 / 正常 / 未配置）
// 设备、计划、工单数据以后端为准，本库只做派生计算与本地配置
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 本地偏好
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 导入层 - 后端数据归一化
pub mod importer;

// 配置层 - 系统配置与界面偏好
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{CycleMode, MaintenanceState, MaintenanceUnit, StatusSource};

// 领域实体
pub use domain::{
    Equipment, EquipmentStatus, MaintenanceSchedule, ScheduleEvaluation, StatusResult,
    TicketAction, TicketStatus,
};

// 引擎
pub use engine::{IntervalStatusEngine, IntervalThresholds, MaintenanceAlertEngine};

// API
pub use api::{EquipmentApi, PreferenceApi, WorklistFilter};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "工厂设备维护管理系统";
