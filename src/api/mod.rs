// ==========================================
// GCP 编辑器 - API 层
// ==========================================
// 职责: 组合导入/导出/关联与工作区，供 CLI 或宿主界面调用
// ==========================================

pub mod error;
pub mod export_api;
pub mod image_api;
pub mod import_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use export_api::{
    parse_export_request, ExportApi, ExportRequest, GcpPointPayload, INVALID_POINTS_MESSAGE,
};
pub use image_api::{GroupSummary, ImageApi};
pub use import_api::{read_file_text, ImportApi, ImportApiResponse};
