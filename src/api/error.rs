// ==========================================
// 工厂设备维护管理系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，将仓储/导入/工单错误转换为用户可读的错误消息
// ==========================================

use crate::config::interval_config_trait::ConfigResult;
use crate::engine::ticket_transition::{invalid_transition_message, TicketTransitionError};
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("{}", invalid_transition_message(.from, .action))]
    InvalidStateTransition { from: String, action: String },

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("配置读取失败: {0}")]
    ConfigError(String),

    // ==========================================
    // 导入错误
    // ==========================================
    #[error("数据导入失败: {0}")]
    ImportError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput(format!("字段{}错误: {}", field, message))
            }
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        ApiError::ImportError(err.to_string())
    }
}

// ==========================================
// 从 TicketTransitionError 转换
// ==========================================
impl From<TicketTransitionError> for ApiError {
    fn from(err: TicketTransitionError) -> Self {
        match err {
            TicketTransitionError::InvalidTransition { from, action } => {
                ApiError::InvalidStateTransition {
                    from: from.to_string(),
                    action: action.to_string(),
                }
            }
        }
    }
}

/// 将配置读取错误转换为 ApiError
pub fn map_config_error<T>(result: ConfigResult<T>) -> ApiResult<T> {
    result.map_err(|e| ApiError::ConfigError(e.to_string()))
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
