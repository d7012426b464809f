// ==========================================
// GCP 编辑器 - 应用层
// ==========================================
// 职责: 装配存储与 API，提供共享状态
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState, DB_PATH_ENV};
