// ==========================================
// GCP 编辑器 - 导出投递层
// ==========================================
// 职责: 把 ExportedFile 送到调用方指定的位置
// 说明: 一次性投递，不重试，失败只上报一次
// ==========================================

pub mod export_sink;

pub use export_sink::{ExportSink, LocalDirSink, SinkError, SinkResult};
