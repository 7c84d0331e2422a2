// ==========================================
// 工厂设备维护管理系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 单条记录的字段错误不报错（降级为缺失），只有整体格式错误才报错
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .json）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    // ===== 数据格式错误 =====
    #[error("JSON 解析失败: {0}")]
    JsonParseError(String),

    #[error("数据结构不符合预期: {0}")]
    UnexpectedShape(String),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<serde_json::Error>
impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::JsonParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
