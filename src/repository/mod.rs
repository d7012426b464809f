// ==========================================
// GCP 编辑器 - 数据仓储层
// ==========================================
// 红线: Repository 不含解析/导出逻辑
// ==========================================
// 职责: 页面切换之间保存点位、分组与 CRS
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod gcp_workspace;
pub mod kv_store;
pub mod sqlite_kv_store;

pub use error::{RepositoryError, RepositoryResult};
pub use gcp_workspace::{workspace_keys, GcpWorkspace};
pub use kv_store::{KvStore, KvWrite, MemoryKvStore, SharedKvStore};
pub use sqlite_kv_store::SqliteKvStore;
