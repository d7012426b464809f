// ==========================================
// GCP 编辑器 - 导出文件描述
// ==========================================
// 文件名: gcp_points_<紧凑 ISO8601 时间戳>.txt
// 时间戳 = ISO 字符串去掉 - T : . Z（精确到毫秒）
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 导出文件 Content-Type
pub const EXPORT_CONTENT_TYPE: &str = "text/plain";

/// 导出文件名前缀
pub const EXPORT_FILE_PREFIX: &str = "gcp_points_";

/// 生成导出文件名
///
/// # 示例
/// 2025-01-20T08:30:15.123Z → gcp_points_20250120083015123.txt
pub fn export_file_name(at: DateTime<Utc>) -> String {
    format!("{}{}.txt", EXPORT_FILE_PREFIX, at.format("%Y%m%d%H%M%S%3f"))
}

/// 导出文件（下载/投递载体）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedFile {
    pub file_name: String,
    pub content_type: String,
    pub body: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

impl ExportedFile {
    pub fn new(body: Vec<u8>, created_at: DateTime<Utc>) -> Self {
        Self {
            file_name: export_file_name(created_at),
            content_type: EXPORT_CONTENT_TYPE.to_string(),
            body,
            created_at,
        }
    }

    /// Content-Disposition 响应头
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename={}", self.file_name)
    }

    /// 文本内容（导出器只产生 UTF-8）
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
