// ==========================================
// GCP 编辑器 - 领域模型层
// ==========================================
// 职责: 定义领域实体、值类型
// 红线: 不含解析逻辑,不含存储逻辑
// ==========================================

pub mod gcp;
pub mod types;

// 重导出核心类型
pub use gcp::{
    GcpPoint, GroupedIndex, ImportOutcome, ImportReport, ImportStatus, RejectReason,
    RowRejection,
};
pub use types::{AssociationState, Coordinate, CoordinateInheritance, GcpFormat};
