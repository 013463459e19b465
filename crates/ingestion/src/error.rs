//! Ingestion 错误类型

use contracts::DeviceRole;
use thiserror::Error;

/// Ingestion 错误
#[derive(Debug, Error)]
pub enum IngestionError {
    /// 日志中没有可用的激活事件
    #[error("no activation events extracted from the {role} log")]
    EmptyStream {
        /// 该日志所属的设备角色
        role: DeviceRole,
    },

    /// 内置行匹配模式编译失败
    #[error("invalid line pattern '{name}': {source}")]
    InvalidPattern {
        /// 模式名称
        name: &'static str,
        #[source]
        source: regex::Error,
    },
}

/// Ingestion Result 类型别名
pub type Result<T> = std::result::Result<T, IngestionError>;
