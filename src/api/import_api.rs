// ==========================================
// GCP 导入API
// ==========================================
// 职责: 读取上传文件 → 导入器 → 写入工作区
// 说明: 无有效行时返回 warning，不作为错误
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::domain::gcp::{ImportOutcome, ImportStatus, RowRejection};
use crate::domain::types::GcpFormat;
use crate::importer::{GcpImporter, GcpImporterImpl, ImportError};
use crate::repository::{GcpWorkspace, SharedKvStore};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// 导入API响应
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportApiResponse {
    /// 实际使用的导入格式
    pub format: GcpFormat,
    pub status: ImportStatus,
    /// 参与解析的非空行数（不含 CRS 行）
    pub total_lines: usize,
    pub imported: usize,
    pub rejected: usize,
    /// 分组数（按名称）
    pub group_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crs: Option<String>,
    /// 被丢弃行明细
    pub rejections: Vec<RowRejection>,
    /// 无有效行时的提示
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    /// 导入耗时（毫秒）
    pub elapsed_ms: i64,
}

impl ImportApiResponse {
    fn from_outcome(outcome: &ImportOutcome, format: GcpFormat, started: Instant) -> Self {
        let status = outcome.status();
        let warning = match status {
            ImportStatus::NoValidRows => Some(format!(
                "文件中没有有效的 GCP 记录（共 {} 行均被丢弃）",
                outcome.report.rejected()
            )),
            ImportStatus::EmptyInput => Some("文件中没有点位行".to_string()),
            ImportStatus::Imported => None,
        };

        Self {
            format,
            status,
            total_lines: outcome.report.total_lines,
            imported: outcome.report.imported,
            rejected: outcome.report.rejected(),
            group_count: outcome.groups.len(),
            crs: outcome.crs.clone(),
            rejections: outcome.report.rejections.clone(),
            warning,
            elapsed_ms: started.elapsed().as_millis() as i64,
        }
    }
}

/// 导入API
pub struct ImportApi {
    store: SharedKvStore,
}

impl ImportApi {
    pub fn new(store: SharedKvStore) -> Self {
        Self { store }
    }

    fn workspace(&self) -> GcpWorkspace<SharedKvStore> {
        GcpWorkspace::new(self.store.clone())
    }

    fn config(&self) -> ConfigManager<SharedKvStore> {
        ConfigManager::new(self.store.clone())
    }

    /// 确定导入格式: 显式指定 > 扩展名推断 > 配置默认值
    ///
    /// # 错误
    /// - UnsupportedFormat: 未指定格式且扩展名不是 .csv/.txt（无扩展名时取配置默认值）
    pub fn resolve_format(
        &self,
        file_path: &str,
        format: Option<GcpFormat>,
    ) -> ApiResult<GcpFormat> {
        if let Some(format) = format {
            return Ok(format);
        }
        let path = Path::new(file_path);
        if let Some(format) = GcpFormat::from_file_name(path) {
            return Ok(format);
        }
        match path.extension() {
            Some(ext) => Err(ImportError::UnsupportedFormat(format!(
                "{} (.{})",
                file_path,
                ext.to_string_lossy()
            ))
            .into()),
            None => Ok(self.config().get_default_import_format()?),
        }
    }

    /// 导入 GCP 文件
    ///
    /// # 参数
    /// - file_path: 文件路径
    /// - format: 导入格式（None 时按扩展名/配置推断）
    ///
    /// # 返回
    /// - Ok(ImportApiResponse): 导入结果（含行级丢弃明细）
    /// - Err(ApiError::EmptyInput): 文件为空
    #[instrument(skip_all, fields(file_path = %file_path))]
    pub async fn import_file(
        &self,
        file_path: &str,
        format: Option<GcpFormat>,
    ) -> ApiResult<ImportApiResponse> {
        let format = self.resolve_format(file_path, format)?;
        let raw_text = read_file_text(Path::new(file_path)).await?;
        self.import_text(&raw_text, format)
    }

    /// 导入已读取的文本内容
    pub fn import_text(&self, raw_text: &str, format: GcpFormat) -> ApiResult<ImportApiResponse> {
        let started = Instant::now();
        if raw_text.trim().is_empty() {
            warn!(format = %format, "导入内容为空");
            return Err(ApiError::EmptyInput);
        }

        let importer = GcpImporterImpl::with_crs_prefix(self.config().get_crs_prefix()?);
        let outcome = importer.import(raw_text, format);
        self.workspace().save_import(&outcome)?;

        let response = ImportApiResponse::from_outcome(&outcome, format, started);
        if let Some(warning) = &response.warning {
            warn!(format = %format, warning = %warning, "导入完成但无有效记录");
        } else {
            info!(
                format = %format,
                imported = response.imported,
                rejected = response.rejected,
                groups = response.group_count,
                "导入完成"
            );
        }
        Ok(response)
    }
}

/// 异步读取文件文本
pub async fn read_file_text(path: &Path) -> Result<String, ImportError> {
    let bytes = tokio::fs::read(path).await?;
    if bytes.is_empty() {
        return Err(ImportError::EmptyInput);
    }
    String::from_utf8(bytes).map_err(|e| ImportError::FileReadError(e.to_string()))
}
