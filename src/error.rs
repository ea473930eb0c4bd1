//! 错误处理模块
//!
//! 定义应用程序的错误类型：远程存储错误与启动阶段的应用错误。

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 远程画像存储错误
///
/// 每个变体对应一个远程操作，携带底层原因。`Display` 输出面向用户的提示。
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreError {
    /// 列表获取失败（传输或解码）
    #[error("Error fetching profiles")]
    Fetch { reason: String },

    /// 创建失败
    #[error("Error creating profile")]
    Create { reason: String },

    /// 更新失败
    #[error("Error updating profile with ID {id}")]
    Update { id: String, reason: String },

    /// 删除失败
    #[error("Error deleting profile with ID {id}")]
    Delete { id: String, reason: String },
}

impl StoreError {
    /// 底层原因
    pub fn reason(&self) -> &str {
        match self {
            Self::Fetch { reason }
            | Self::Create { reason }
            | Self::Update { reason, .. }
            | Self::Delete { reason, .. } => reason,
        }
    }

    /// 操作名称，用于日志
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Fetch { .. } => "list",
            Self::Create { .. } => "create",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
        }
    }
}

/// 应用程序错误类型
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP 客户端错误
    #[error("HTTP 客户端错误: {0}")]
    Http(String),

    /// 日志初始化错误
    #[error("日志初始化错误: {0}")]
    Logging(String),

    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(String),
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Io(e.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Http(e.to_string())
    }
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_messages() {
        let err = StoreError::Update {
            id: "42".to_string(),
            reason: "status 500".to_string(),
        };
        assert_eq!(err.to_string(), "Error updating profile with ID 42");
        assert_eq!(err.reason(), "status 500");
        assert_eq!(err.operation(), "update");

        let err = StoreError::Fetch {
            reason: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "Error fetching profiles");
    }

    #[test]
    fn test_io_error_conversion() {
        let err: AppError = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert!(matches!(err, AppError::Io(ref msg) if msg == "denied"));
    }
}
