// ==========================================
// GCP 编辑器 - GCP 导入器实现
// ==========================================
// 职责: 整合导入流程，从原始文本到点位与分组
// 流程: 切行 → CRS 提取 → 切分 → 映射 → 分组
// ==========================================

use crate::domain::gcp::{
    GroupedIndex, ImportOutcome, ImportReport, RejectReason, RowRejection,
};
use crate::domain::types::GcpFormat;
use crate::importer::error::ImportError;
use crate::importer::field_mapper::FieldMapper as FieldMapperImpl;
use crate::importer::file_parser::{parser_for, prepare_lines, DEFAULT_CRS_PREFIX};
use crate::importer::gcp_importer_trait::{FieldMapper, GcpImporter};
use tracing::{debug, info, instrument, warn};

// ==========================================
// GcpImporterImpl - GCP 导入器实现
// ==========================================
pub struct GcpImporterImpl {
    // CRS 行前缀
    crs_prefix: String,

    // 字段映射器
    field_mapper: Box<dyn FieldMapper>,
}

impl GcpImporterImpl {
    /// 创建新的 GcpImporter 实例
    ///
    /// # 参数
    /// - crs_prefix: CRS 声明行前缀（通常为 "+proj"）
    /// - field_mapper: 字段映射器
    pub fn new(crs_prefix: impl Into<String>, field_mapper: Box<dyn FieldMapper>) -> Self {
        Self {
            crs_prefix: crs_prefix.into(),
            field_mapper,
        }
    }

    /// 使用指定 CRS 前缀与默认映射器
    pub fn with_crs_prefix(crs_prefix: impl Into<String>) -> Self {
        Self::new(crs_prefix, Box::new(FieldMapperImpl::new()))
    }

    /// 行级错误 → RowRejection
    fn to_rejection(line_number: usize, err: &ImportError) -> RowRejection {
        let reason = match err {
            ImportError::FieldCountError {
                expected, actual, ..
            } => RejectReason::InsufficientFields {
                expected: *expected,
                actual: *actual,
            },
            ImportError::TypeConversionError { field, value, .. } => {
                RejectReason::InvalidNumber {
                    field: field.clone(),
                    value: value.clone(),
                }
            }
            other => RejectReason::Unparsable {
                message: other.to_string(),
            },
        };

        RowRejection {
            line_number,
            reason,
            message: err.to_string(),
        }
    }
}

impl Default for GcpImporterImpl {
    fn default() -> Self {
        Self::with_crs_prefix(DEFAULT_CRS_PREFIX)
    }
}

impl GcpImporter for GcpImporterImpl {
    #[instrument(skip_all, fields(format = %format, bytes = raw_text.len()))]
    fn import(&self, raw_text: &str, format: GcpFormat) -> ImportOutcome {
        // === 步骤 1-2: 切行 + CRS 提取 ===
        let parser = parser_for(format);
        let crs_prefix = if parser.supports_crs_header() {
            Some(self.crs_prefix.as_str())
        } else {
            None
        };
        let prepared = prepare_lines(raw_text, crs_prefix);

        if prepared.lines.is_empty() {
            info!(crs = ?prepared.crs, "没有可导入的点位行");
            return ImportOutcome {
                crs: prepared.crs,
                ..ImportOutcome::default()
            };
        }

        if let Some(crs) = &prepared.crs {
            debug!(crs = %crs, "提取 CRS 声明");
        }

        // === 步骤 3-7: 切分 + 映射 ===
        let total_lines = prepared.lines.len();
        let mut points = Vec::with_capacity(total_lines);
        let mut rejections = Vec::new();

        for (line_number, line) in prepared.lines {
            let mapped = parser
                .split_fields(line, line_number)
                .and_then(|fields| self.field_mapper.map_to_point(&fields, format, line_number));

            match mapped {
                Ok(point) => points.push(point),
                Err(e) => {
                    warn!(line_number = line_number, error = %e, "丢弃无效行");
                    rejections.push(Self::to_rejection(line_number, &e));
                }
            }
        }

        // === 步骤 8: 分组 ===
        let groups = GroupedIndex::from_points(&points);

        info!(
            total = total_lines,
            imported = points.len(),
            rejected = rejections.len(),
            groups = groups.len(),
            "GCP 导入完成"
        );

        ImportOutcome {
            report: ImportReport {
                total_lines,
                imported: points.len(),
                rejections,
            },
            points,
            groups,
            crs: prepared.crs,
        }
    }
}
