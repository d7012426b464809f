// ==========================================
// GCP 编辑器 - 地面控制点领域模型
// ==========================================
// 职责: GcpPoint / GroupedIndex / 导入报告
// 红线: 不含解析逻辑，不含存储逻辑
// ==========================================

use crate::domain::types::Coordinate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

// ==========================================
// GcpPoint - 地面控制点
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GcpPoint {
    pub id: String,                      // 导入时分配（同批次唯一）
    pub name: String,                    // 分组键（已 TRIM，可为空）
    pub coordinate: Option<Coordinate>,  // None = 待人工录入
    pub z: f64,                          // 高程（缺省 0）
    pub pixel_x: Option<f64>,            // 影像像素 X
    pub pixel_y: Option<f64>,            // 影像像素 Y
    pub image_name: Option<String>,      // 来源影像文件名
}

impl GcpPoint {
    /// 创建新点位并分配新 id
    pub fn new(name: impl Into<String>, coordinate: Option<Coordinate>) -> Self {
        Self {
            id: Self::generate_id(),
            name: name.into(),
            coordinate,
            z: 0.0,
            pixel_x: None,
            pixel_y: None,
            image_name: None,
        }
    }

    /// 生成点位 id（UUID v4）
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// (x, y) 视图
    pub fn xy(&self) -> Option<(f64, f64)> {
        self.coordinate.map(|c| c.xy())
    }

    /// (lat, lng) 视图
    pub fn lat_lng(&self) -> Option<(f64, f64)> {
        self.coordinate.map(|c| c.lat_lng())
    }

    /// 是否缺少坐标（需人工录入）
    pub fn needs_manual_entry(&self) -> bool {
        self.coordinate.is_none()
    }

    /// 比较除 id 外的全部字段
    pub fn eq_ignoring_id(&self, other: &GcpPoint) -> bool {
        self.name == other.name
            && self.coordinate == other.coordinate
            && self.z == other.z
            && self.pixel_x == other.pixel_x
            && self.pixel_y == other.pixel_y
            && self.image_name == other.image_name
    }
}

// ==========================================
// GroupedIndex - 按名称分组的点位索引
// ==========================================
// 每次导入整体重建，不做增量修补
// 组内顺序 = 输入顺序
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupedIndex {
    groups: BTreeMap<String, Vec<GcpPoint>>,
}

impl GroupedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由点位列表构建分组
    pub fn from_points(points: &[GcpPoint]) -> Self {
        let mut index = Self::new();
        for point in points {
            index
                .groups
                .entry(point.name.clone())
                .or_default()
                .push(point.clone());
        }
        index
    }

    pub fn get(&self, name: &str) -> Option<&[GcpPoint]> {
        self.groups.get(name).map(|v| v.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    /// 替换某个名称的整组记录，返回旧记录
    ///
    /// 传入空列表等同于 remove
    pub fn replace(&mut self, name: &str, points: Vec<GcpPoint>) -> Option<Vec<GcpPoint>> {
        if points.is_empty() {
            return self.remove(name);
        }
        self.groups.insert(name.to_string(), points)
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<GcpPoint>> {
        self.groups.remove(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[GcpPoint])> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// 分组数量
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// 全部点位数量
    pub fn point_count(&self) -> usize {
        self.groups.values().map(|v| v.len()).sum()
    }
}

// ==========================================
// RejectReason - 行级拒绝原因
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectReason {
    /// 字段数不足
    InsufficientFields { expected: usize, actual: usize },
    /// 必填数值字段无法解析为有限数
    InvalidNumber { field: String, value: String },
    /// 行无法切分
    Unparsable { message: String },
}

// ==========================================
// RowRejection - 被丢弃的行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowRejection {
    pub line_number: usize,  // 原始文件行号（从 1 开始）
    pub reason: RejectReason,
    pub message: String,     // 可读描述
}

// ==========================================
// ImportStatus - 导入结论
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportStatus {
    EmptyInput,  // 没有可导入内容
    NoValidRows, // 有内容但全部行被丢弃
    Imported,    // 至少一条点位
}

// ==========================================
// ImportReport - 导入汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportReport {
    pub total_lines: usize,            // 参与解析的点位行数（不含空行与 CRS 行）
    pub imported: usize,               // 成功导入
    pub rejections: Vec<RowRejection>, // 丢弃明细
}

impl ImportReport {
    pub fn rejected(&self) -> usize {
        self.rejections.len()
    }
}

// ==========================================
// ImportOutcome - 导入结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub points: Vec<GcpPoint>,
    pub groups: GroupedIndex,
    pub crs: Option<String>,
    pub report: ImportReport,
}

impl ImportOutcome {
    pub fn status(&self) -> ImportStatus {
        if self.report.total_lines == 0 {
            ImportStatus::EmptyInput
        } else if self.points.is_empty() {
            ImportStatus::NoValidRows
        } else {
            ImportStatus::Imported
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(name: &str, image: &str) -> GcpPoint {
        let mut p = GcpPoint::new(name, Some(Coordinate::Projected { x: 1.0, y: 2.0 }));
        p.image_name = Some(image.to_string());
        p
    }

    #[test]
    fn test_grouped_index_preserves_input_order() {
        let points = vec![point("A", "1.jpg"), point("B", "2.jpg"), point("A", "3.jpg")];
        let index = GroupedIndex::from_points(&points);

        assert_eq!(index.len(), 2);
        let a = index.get("A").unwrap();
        assert_eq!(a.len(), 2);
        assert_eq!(a[0].image_name.as_deref(), Some("1.jpg"));
        assert_eq!(a[1].image_name.as_deref(), Some("3.jpg"));
        assert_eq!(index.point_count(), 3);
    }

    #[test]
    fn test_grouped_index_empty_name_is_a_key() {
        let index = GroupedIndex::from_points(&[point("", "x.jpg")]);
        assert!(index.contains(""));
    }

    #[test]
    fn test_replace_with_empty_removes_group() {
        let mut index = GroupedIndex::from_points(&[point("A", "1.jpg")]);
        let old = index.replace("A", Vec::new());
        assert_eq!(old.map(|v| v.len()), Some(1));
        assert!(index.is_empty());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = GcpPoint::new("A", None);
        let b = GcpPoint::new("A", None);
        assert_ne!(a.id, b.id);
        assert!(a.eq_ignoring_id(&b));
        assert!(a.needs_manual_entry());
    }

    #[test]
    fn test_grouped_index_serializes_as_plain_map() {
        let index = GroupedIndex::from_points(&[point("A", "1.jpg")]);
        let json = serde_json::to_value(&index).unwrap();
        assert!(json["A"].is_array());
        assert_eq!(json["A"][0]["imageName"], "1.jpg");
    }

    #[test]
    fn test_outcome_status() {
        let mut outcome = ImportOutcome::default();
        assert_eq!(outcome.status(), ImportStatus::EmptyInput);

        outcome.report.total_lines = 2;
        assert_eq!(outcome.status(), ImportStatus::NoValidRows);

        outcome.points.push(point("A", "1.jpg"));
        assert_eq!(outcome.status(), ImportStatus::Imported);
    }
}
