// ==========================================
// GCP 编辑器 - 字段映射器实现
// ==========================================
// 职责: 字段位置 → GcpPoint 字段 + 类型转换
// 7 字段: x,y,z,pixelX,pixelY,imageName,name
// 3 字段: name,lat,lng
// ==========================================

use crate::domain::gcp::GcpPoint;
use crate::domain::types::{Coordinate, GcpFormat};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::gcp_importer_trait::{
    DataCleaner as DataCleanerTrait, FieldMapper as FieldMapperTrait,
};

pub struct FieldMapper {
    cleaner: DataCleaner,
}

impl FieldMapper {
    pub fn new() -> Self {
        Self {
            cleaner: DataCleaner,
        }
    }

    /// 取第 idx 个字段（越界返回 None）
    fn field<'a>(fields: &'a [String], idx: usize) -> Option<&'a str> {
        fields.get(idx).map(|f| f.as_str())
    }

    /// 映射 7 字段像素点
    fn map_pixel_point(&self, fields: &[String], line: usize) -> ImportResult<GcpPoint> {
        let x = self
            .cleaner
            .parse_required_number(&fields[0], "x", line)?;
        let y = self
            .cleaner
            .parse_required_number(&fields[1], "y", line)?;

        Ok(GcpPoint {
            id: GcpPoint::generate_id(),
            name: self.cleaner.clean_text(&fields[6]),
            coordinate: Some(Coordinate::Projected { x, y }),
            z: self
                .cleaner
                .parse_optional_number(Self::field(fields, 2))
                .unwrap_or(0.0),
            pixel_x: self.cleaner.parse_optional_number(Self::field(fields, 3)),
            pixel_y: self.cleaner.parse_optional_number(Self::field(fields, 4)),
            image_name: self.cleaner.normalize_null(Self::field(fields, 5)),
        })
    }

    /// 映射 3 字段经纬度点
    fn map_geographic_point(&self, fields: &[String], line: usize) -> ImportResult<GcpPoint> {
        let lat = self
            .cleaner
            .parse_required_number(&fields[1], "lat", line)?;
        let lng = self
            .cleaner
            .parse_required_number(&fields[2], "lng", line)?;

        Ok(GcpPoint::new(
            self.cleaner.clean_text(&fields[0]),
            Some(Coordinate::Geographic { lat, lng }),
        ))
    }
}

impl Default for FieldMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldMapperTrait for FieldMapper {
    fn map_to_point(
        &self,
        fields: &[String],
        format: GcpFormat,
        line_number: usize,
    ) -> ImportResult<GcpPoint> {
        let expected = format.required_fields();
        if fields.len() < expected {
            return Err(ImportError::FieldCountError {
                line: line_number,
                expected,
                actual: fields.len(),
            });
        }

        if format.is_pixel_mapped() {
            self.map_pixel_point(fields, line_number)
        } else {
            self.map_geographic_point(fields, line_number)
        }
    }
}
