// ==========================================
// GCP 编辑器 - GCP 导出器
// ==========================================
// 职责: GcpPoint 列表 → 分隔文本（导入格式的逆过程）
// 规则:
// - 每点一行，按传入顺序，\n 连接，无表头，无结尾空行
// - 数值使用 f64 Display（最短往返表示，与区域设置无关）
// - 缺失值写为空字段
// ==========================================

use crate::domain::gcp::GcpPoint;
use crate::domain::types::GcpFormat;
use crate::exporter::error::{ExportError, ExportResult};
use tracing::{debug, instrument};

/// 行分隔符
pub const LINE_TERMINATOR: &str = "\n";

// ==========================================
// GcpExporter Trait
// ==========================================
pub trait GcpExporter: Send + Sync {
    /// 导出点位为文本字节
    ///
    /// # 返回
    /// - Ok(Vec<u8>): UTF-8 文本
    /// - Err(UnencodableField): 字段含换行符或与分隔符冲突
    fn export(&self, points: &[GcpPoint], format: GcpFormat) -> ExportResult<Vec<u8>>;

    /// 导出点位并在首行写入 CRS 声明（仅 text-whitespace-7field）
    fn export_with_crs(
        &self,
        points: &[GcpPoint],
        format: GcpFormat,
        crs: &str,
    ) -> ExportResult<Vec<u8>>;
}

pub struct GcpExporterImpl;

impl GcpExporterImpl {
    /// 字段分隔符
    fn delimiter(format: GcpFormat) -> &'static str {
        match format {
            GcpFormat::TextWhitespace7Field => "\t",
            GcpFormat::Csv7Field => ",",
            GcpFormat::Csv3Field | GcpFormat::Text3Field => ", ",
        }
    }

    fn number(value: Option<f64>) -> String {
        value.map(|v| v.to_string()).unwrap_or_default()
    }

    /// 校验文本字段可被该格式表示，必要时转义
    fn encode_text(
        value: &str,
        field: &str,
        index: usize,
        format: GcpFormat,
    ) -> ExportResult<String> {
        let unencodable = |reason: &str| ExportError::UnencodableField {
            index,
            field: field.to_string(),
            format,
            reason: reason.to_string(),
        };

        if value.contains('\n') || value.contains('\r') {
            return Err(unencodable("包含换行符"));
        }

        match format {
            GcpFormat::TextWhitespace7Field if value.contains('\t') => {
                Err(unencodable("包含制表符"))
            }
            GcpFormat::Csv7Field | GcpFormat::Text3Field if value.contains(',') => {
                Err(unencodable("包含逗号"))
            }
            // csv 库解析的格式使用引号转义
            GcpFormat::Csv3Field if value.contains(',') || value.contains('"') => {
                Ok(format!("\"{}\"", value.replace('"', "\"\"")))
            }
            _ => Ok(value.to_string()),
        }
    }

    /// 输出单行
    fn render_row(point: &GcpPoint, index: usize, format: GcpFormat) -> ExportResult<String> {
        let name = Self::encode_text(&point.name, "name", index, format)?;

        let fields: Vec<String> = if format.is_pixel_mapped() {
            let (x, y) = match point.xy() {
                Some((x, y)) => (Some(x), Some(y)),
                None => (None, None),
            };
            let image_name = Self::encode_text(
                point.image_name.as_deref().unwrap_or(""),
                "imageName",
                index,
                format,
            )?;
            vec![
                Self::number(x),
                Self::number(y),
                Self::number(Some(point.z)),
                Self::number(point.pixel_x),
                Self::number(point.pixel_y),
                image_name,
                name,
            ]
        } else {
            let (lat, lng) = match point.lat_lng() {
                Some((lat, lng)) => (Some(lat), Some(lng)),
                None => (None, None),
            };
            vec![name, Self::number(lat), Self::number(lng)]
        };

        Ok(fields.join(Self::delimiter(format)))
    }

    fn render_rows(points: &[GcpPoint], format: GcpFormat) -> ExportResult<Vec<String>> {
        points
            .iter()
            .enumerate()
            .map(|(index, point)| Self::render_row(point, index, format))
            .collect()
    }
}

impl GcpExporter for GcpExporterImpl {
    #[instrument(skip_all, fields(format = %format, count = points.len()))]
    fn export(&self, points: &[GcpPoint], format: GcpFormat) -> ExportResult<Vec<u8>> {
        let rows = Self::render_rows(points, format)?;
        let text = rows.join(LINE_TERMINATOR);
        debug!(bytes = text.len(), "GCP 导出完成");
        Ok(text.into_bytes())
    }

    #[instrument(skip_all, fields(format = %format, count = points.len()))]
    fn export_with_crs(
        &self,
        points: &[GcpPoint],
        format: GcpFormat,
        crs: &str,
    ) -> ExportResult<Vec<u8>> {
        if !format.supports_crs_header() {
            return Err(ExportError::CrsNotSupported(format));
        }
        let crs = crs.trim();
        if crs.is_empty() || crs.contains('\n') || crs.contains('\r') {
            return Err(ExportError::InvalidCrs(crs.to_string()));
        }

        let mut lines = Vec::with_capacity(points.len() + 1);
        lines.push(crs.to_string());
        lines.extend(Self::render_rows(points, format)?);
        Ok(lines.join(LINE_TERMINATOR).into_bytes())
    }
}
