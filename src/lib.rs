// ==========================================
// GCP 编辑器 - 核心库
// ==========================================
// 职责: GCP 文本导入/导出、按名称分组、影像关联
// 技术栈: Rust + SQLite（键值工作区）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 工作区持久化
pub mod repository;

// 导入层 - 文本 → 点位
pub mod importer;

// 导出层 - 点位 → 文本
pub mod exporter;

// 影像关联层
pub mod matcher;

// 配置层
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 导出投递
pub mod delivery;

// API 层
pub mod api;

// 应用层
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    AssociationState, Coordinate, CoordinateInheritance, GcpFormat, GcpPoint, GroupedIndex,
    ImportOutcome, ImportReport, ImportStatus,
};

// 导入/导出
pub use exporter::{ExportedFile, GcpExporter, GcpExporterImpl};
pub use importer::{GcpImporter, GcpImporterImpl};

// 工作区
pub use repository::{GcpWorkspace, KvStore, MemoryKvStore, SqliteKvStore};

// API
pub use api::{ApiError, ExportApi, ImageApi, ImportApi};

// ==========================================
// 系统常量
// ==========================================

/// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 系统名称
pub const APP_NAME: &str = "GCP 编辑器";
