// ==========================================
// GCP 编辑器 - 导出模块错误类型
// ==========================================
// 说明: 导出错误均为硬失败，需向用户展示
// ==========================================

use crate::domain::types::GcpFormat;
use thiserror::Error;

/// 导出模块错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExportError {
    #[error("第 {index} 个点位的字段 {field} 无法写入 {format} 格式: {reason}")]
    UnencodableField {
        index: usize,
        field: String,
        format: GcpFormat,
        reason: String,
    },

    #[error("格式 {0} 不支持 CRS 声明行")]
    CrsNotSupported(GcpFormat),

    #[error("CRS 声明无效: {0}")]
    InvalidCrs(String),
}

/// Result 类型别名
pub type ExportResult<T> = Result<T, ExportError>;
