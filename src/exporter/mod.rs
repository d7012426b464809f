// ==========================================
// GCP 编辑器 - 导出层
// ==========================================
// 职责: 点位 → 可下载文本（导入的逆过程）
// 说明: 触发下载/投递由调用方负责
// ==========================================

pub mod error;
pub mod exported_file;
pub mod gcp_exporter;

pub use error::{ExportError, ExportResult};
pub use exported_file::{export_file_name, ExportedFile, EXPORT_CONTENT_TYPE};
pub use gcp_exporter::{GcpExporter, GcpExporterImpl, LINE_TERMINATOR};
