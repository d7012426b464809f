// ==========================================
// GCP 编辑器 - 领域类型定义
// ==========================================
// 职责: 文件格式 / 坐标变体 / 关联状态等值类型
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

// ==========================================
// GCP 文件格式 (GcpFormat)
// ==========================================
// 两套点位模式统一在一个标签变体下:
// - 7 字段: x,y,z,pixelX,pixelY,imageName,name（像素映射点）
// - 3 字段: name,lat,lng（经纬度点）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GcpFormat {
    #[serde(rename = "csv-7field")]
    Csv7Field, // 逗号分隔 7 字段
    #[serde(rename = "text-whitespace-7field")]
    TextWhitespace7Field, // 空白分隔 7 字段，可带 +proj 行
    #[serde(rename = "csv-3field")]
    Csv3Field, // csv 库解析 name,lat,lng
    #[serde(rename = "text-3field")]
    Text3Field, // 逐行逗号分隔 name,lat,lng
}

impl GcpFormat {
    /// 全部格式（CLI 帮助与测试使用）
    pub const ALL: [GcpFormat; 4] = [
        GcpFormat::Csv7Field,
        GcpFormat::TextWhitespace7Field,
        GcpFormat::Csv3Field,
        GcpFormat::Text3Field,
    ];

    /// 格式的文本名称
    pub fn as_str(&self) -> &'static str {
        match self {
            GcpFormat::Csv7Field => "csv-7field",
            GcpFormat::TextWhitespace7Field => "text-whitespace-7field",
            GcpFormat::Csv3Field => "csv-3field",
            GcpFormat::Text3Field => "text-3field",
        }
    }

    /// 每行所需的最少字段数
    pub fn required_fields(&self) -> usize {
        match self {
            GcpFormat::Csv7Field | GcpFormat::TextWhitespace7Field => 7,
            GcpFormat::Csv3Field | GcpFormat::Text3Field => 3,
        }
    }

    /// 是否支持首行 CRS 声明
    pub fn supports_crs_header(&self) -> bool {
        matches!(self, GcpFormat::TextWhitespace7Field)
    }

    /// 是否为 7 字段像素映射格式
    pub fn is_pixel_mapped(&self) -> bool {
        self.required_fields() == 7
    }

    /// 根据扩展名推断格式
    ///
    /// # 规则
    /// - .csv → Csv7Field（"从 CSV 创建 GCP 文件"）
    /// - .txt → TextWhitespace7Field（"上传并处理 GCP 文件"）
    /// - 其他 → None
    pub fn from_file_name<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => Some(GcpFormat::Csv7Field),
            "txt" => Some(GcpFormat::TextWhitespace7Field),
            _ => None,
        }
    }
}

impl fmt::Display for GcpFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GcpFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        GcpFormat::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == normalized)
            .ok_or_else(|| format!("未知的 GCP 格式: {}", s.trim()))
    }
}

// ==========================================
// 坐标 (Coordinate)
// ==========================================
// Projected: 平面坐标 (x, y)，来自 7 字段格式
// Geographic: 经纬度 (lat, lng)，来自 3 字段格式
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Coordinate {
    Projected { x: f64, y: f64 },
    Geographic { lat: f64, lng: f64 },
}

impl Coordinate {
    /// 坐标值是否均为有限数
    pub fn is_finite(&self) -> bool {
        match *self {
            Coordinate::Projected { x, y } => x.is_finite() && y.is_finite(),
            Coordinate::Geographic { lat, lng } => lat.is_finite() && lng.is_finite(),
        }
    }

    /// 以 (x, y) 视图读取；经纬度按 (lng, lat) 映射
    pub fn xy(&self) -> (f64, f64) {
        match *self {
            Coordinate::Projected { x, y } => (x, y),
            Coordinate::Geographic { lat, lng } => (lng, lat),
        }
    }

    /// 以 (lat, lng) 视图读取；平面坐标按 (y, x) 映射
    pub fn lat_lng(&self) -> (f64, f64) {
        match *self {
            Coordinate::Projected { x, y } => (y, x),
            Coordinate::Geographic { lat, lng } => (lat, lng),
        }
    }
}

// ==========================================
// 坐标继承策略 (Coordinate Inheritance)
// ==========================================
// 影像关联保存时，新关联影像的坐标来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoordinateInheritance {
    /// 继承该 GCP 组第一条记录的坐标
    #[default]
    InheritFirst,
    /// 不继承，标记为待人工录入
    ManualEntry,
}

impl fmt::Display for CoordinateInheritance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinateInheritance::InheritFirst => write!(f, "INHERIT_FIRST"),
            CoordinateInheritance::ManualEntry => write!(f, "MANUAL_ENTRY"),
        }
    }
}

impl FromStr for CoordinateInheritance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "INHERIT_FIRST" => Ok(CoordinateInheritance::InheritFirst),
            "MANUAL_ENTRY" => Ok(CoordinateInheritance::ManualEntry),
            other => Err(format!("未知的坐标继承策略: {}", other)),
        }
    }
}

// ==========================================
// 影像关联状态 (Association State)
// ==========================================
// Associated 对应界面绿色标题，Unassociated 对应蓝色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssociationState {
    Associated,
    Unassociated,
}

impl AssociationState {
    pub fn toggled(self) -> Self {
        match self {
            AssociationState::Associated => AssociationState::Unassociated,
            AssociationState::Unassociated => AssociationState::Associated,
        }
    }

    pub fn is_selected(&self) -> bool {
        matches!(self, AssociationState::Associated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("csv-7field".parse::<GcpFormat>(), Ok(GcpFormat::Csv7Field));
        assert_eq!(
            " TEXT-WHITESPACE-7FIELD ".parse::<GcpFormat>(),
            Ok(GcpFormat::TextWhitespace7Field)
        );
        assert!("xlsx".parse::<GcpFormat>().is_err());
    }

    #[test]
    fn test_format_serde_names_match_display() {
        for format in GcpFormat::ALL {
            let json = serde_json::to_string(&format).unwrap();
            assert_eq!(json, format!("\"{}\"", format));
        }
    }

    #[test]
    fn test_format_from_file_name() {
        assert_eq!(
            GcpFormat::from_file_name("points.CSV"),
            Some(GcpFormat::Csv7Field)
        );
        assert_eq!(
            GcpFormat::from_file_name("gcp_list.txt"),
            Some(GcpFormat::TextWhitespace7Field)
        );
        assert_eq!(GcpFormat::from_file_name("photo.jpg"), None);
    }

    #[test]
    fn test_coordinate_views() {
        let geo = Coordinate::Geographic { lat: 25.0, lng: -80.0 };
        assert_eq!(geo.xy(), (-80.0, 25.0));
        assert_eq!(geo.lat_lng(), (25.0, -80.0));

        let projected = Coordinate::Projected { x: 1.0, y: 2.0 };
        assert_eq!(projected.lat_lng(), (2.0, 1.0));
        assert!(!Coordinate::Projected { x: f64::NAN, y: 0.0 }.is_finite());
    }

    #[test]
    fn test_association_toggle() {
        let state = AssociationState::Unassociated;
        assert!(!state.is_selected());
        assert!(state.toggled().is_selected());
        assert_eq!(state.toggled().toggled(), state);
    }

    #[test]
    fn test_inheritance_from_str() {
        assert_eq!(
            "manual_entry".parse::<CoordinateInheritance>(),
            Ok(CoordinateInheritance::ManualEntry)
        );
        assert_eq!(
            CoordinateInheritance::default(),
            CoordinateInheritance::InheritFirst
        );
    }
}
