// ==========================================
// GCP 编辑器 - 导入层
// ==========================================
// 职责: 外部文本导入,生成 GcpPoint 与分组
// 支持: csv-7field / text-whitespace-7field / csv-3field / text-3field
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod gcp_importer_impl;
pub mod gcp_importer_trait;

// 重导出核心类型
pub use data_cleaner::DataCleaner as DataCleanerImpl;
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper as FieldMapperImpl;
pub use file_parser::{
    parser_for, prepare_lines, CommaLineParser, CsvRecordParser, PreparedText,
    WhitespaceLineParser, DEFAULT_CRS_PREFIX,
};
pub use gcp_importer_impl::GcpImporterImpl;

// 重导出 Trait 接口
pub use gcp_importer_trait::{DataCleaner, FieldMapper, FileParser, GcpImporter};
