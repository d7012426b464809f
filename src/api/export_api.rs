// ==========================================
// GCP 导出API
// ==========================================
// 职责: 工作区点位 / JSON 请求体 → ExportedFile → 投递
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::delivery::ExportSink;
use crate::domain::gcp::GcpPoint;
use crate::domain::types::{Coordinate, GcpFormat};
use crate::exporter::{ExportedFile, GcpExporter, GcpExporterImpl};
use crate::repository::{GcpWorkspace, SharedKvStore};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{info, instrument, warn};

/// 请求体校验失败提示
pub const INVALID_POINTS_MESSAGE: &str = "Invalid GCP points format";

/// 导出请求体 `{"gcpPoints": [...]}`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    #[serde(default)]
    pub gcp_points: serde_json::Value,
}

/// 请求体中的单个点位（3 字段）
#[derive(Debug, Clone, Deserialize)]
pub struct GcpPointPayload {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl From<GcpPointPayload> for GcpPoint {
    fn from(payload: GcpPointPayload) -> Self {
        GcpPoint::new(
            payload.name.trim(),
            Some(Coordinate::Geographic {
                lat: payload.lat,
                lng: payload.lng,
            }),
        )
    }
}

/// 导出API
pub struct ExportApi {
    store: SharedKvStore,
    exporter: GcpExporterImpl,
}

impl ExportApi {
    pub fn new(store: SharedKvStore) -> Self {
        Self {
            store,
            exporter: GcpExporterImpl,
        }
    }

    /// 导出工作区中的全部点位
    ///
    /// 说明: 格式支持 CRS 声明且工作区有 CRS 时写入首行
    pub fn export_points(&self, format: GcpFormat) -> ApiResult<ExportedFile> {
        self.export_points_at(format, Utc::now())
    }

    /// 同上，指定导出时间（决定文件名）
    #[instrument(skip_all, fields(format = %format))]
    pub fn export_points_at(
        &self,
        format: GcpFormat,
        at: DateTime<Utc>,
    ) -> ApiResult<ExportedFile> {
        let workspace = GcpWorkspace::new(self.store.clone());
        let points = workspace.points()?;
        if points.is_empty() {
            return Err(ApiError::InvalidInput("没有可导出的点位".to_string()));
        }

        let body = match workspace.crs()? {
            Some(crs) if format.supports_crs_header() => {
                self.exporter.export_with_crs(&points, format, &crs)?
            }
            _ => self.exporter.export(&points, format)?,
        };

        let file = ExportedFile::new(body, at);
        info!(points = points.len(), file_name = %file.file_name, "导出完成");
        Ok(file)
    }

    /// 按 JSON 请求体导出 `name, lat, lng`
    ///
    /// # 错误
    /// - gcpPoints 缺失/非数组/为空 → InvalidInput("Invalid GCP points format")
    pub fn export_json(&self, body: &str) -> ApiResult<ExportedFile> {
        let points = parse_export_request(body)?;
        let bytes = self.exporter.export(&points, GcpFormat::Csv3Field)?;
        let file = ExportedFile::new(bytes, Utc::now());
        info!(points = points.len(), file_name = %file.file_name, "JSON 请求导出完成");
        Ok(file)
    }

    /// 投递导出文件（一次性，不重试）
    pub async fn deliver(&self, file: &ExportedFile, sink: &dyn ExportSink) -> ApiResult<String> {
        match sink.deliver(file).await {
            Ok(location) => Ok(location),
            Err(e) => {
                warn!(file_name = %file.file_name, error = %e, "导出文件投递失败");
                Err(e.into())
            }
        }
    }
}

/// 解析并校验导出请求体
pub fn parse_export_request(body: &str) -> ApiResult<Vec<GcpPoint>> {
    let invalid = || ApiError::InvalidInput(INVALID_POINTS_MESSAGE.to_string());

    let request: ExportRequest = serde_json::from_str(body).map_err(|_| invalid())?;
    let items = match request.gcp_points {
        serde_json::Value::Array(items) if !items.is_empty() => items,
        _ => return Err(invalid()),
    };

    items
        .into_iter()
        .map(|item| {
            serde_json::from_value::<GcpPointPayload>(item)
                .map(GcpPoint::from)
                .map_err(|_| invalid())
        })
        .collect()
}
