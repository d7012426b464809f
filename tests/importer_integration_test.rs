// ==========================================
// GcpImporter 集成测试
// ==========================================
// 测试目标: 验证完整的 GCP 文本导入流程
// ==========================================


use gcp_editor::domain::{Coordinate, GcpFormat, ImportStatus, RejectReason};
use gcp_editor::importer::{GcpImporter, GcpImporterImpl};
use gcp_editor::logging;
use std::collections::HashSet;
use test_helpers::{SAMPLE_CSV_7FIELD, WGS84_CRS};

#[test]
fn test_import_sample_csv_7field() {
    logging::init_test();

    let outcome = GcpImporterImpl::default().import(SAMPLE_CSV_7FIELD, GcpFormat::Csv7Field);

    assert_eq!(outcome.status(), ImportStatus::Imported);
    let names: Vec<&str> = outcome.points.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["PointA", "PointB"]);

    assert_eq!(outcome.groups.len(), 2);
    assert_eq!(outcome.groups.get("PointA").map(|g| g.len()), Some(1));
    assert_eq!(outcome.groups.get("PointB").map(|g| g.len()), Some(1));

    let a = &outcome.points[0];
    assert_eq!(a.coordinate, Some(Coordinate::Projected { x: 1.0, y: 2.0 }));
    assert_eq!(a.pixel_x, Some(100.0));
    assert_eq!(a.pixel_y, Some(200.0));
    assert_eq!(a.image_name.as_deref(), Some("img1.jpg"));
}

#[test]
fn test_malformed_rows_are_dropped() {
    logging::init_test();

    // 3 行有效，2 行缺少必需数值，1 行字段不足
    let raw = "\
1,2,0,10,20,a.jpg,A
x,2,0,10,20,a.jpg,Bad
3,4,0,30,40,b.jpg,B
5,,0,50,60,c.jpg,Bad2
7,8,0,70,80,d.jpg,C
9,10,0";

    let outcome = GcpImporterImpl::default().import(raw, GcpFormat::Csv7Field);

    assert_eq!(outcome.points.len(), 3);
    assert_eq!(outcome.report.total_lines, 6);
    assert_eq!(outcome.report.rejected(), 3);

    let lines: Vec<usize> = outcome
        .report
        .rejections
        .iter()
        .map(|r| r.line_number)
        .collect();
    assert_eq!(lines, vec![2, 4, 6]);
    assert!(matches!(
        outcome.report.rejections[2].reason,
        RejectReason::InsufficientFields {
            expected: 7,
            actual: 3
        }
    ));
}

#[test]
fn test_crs_line_is_extracted() {
    let raw = format!("{}\n1 2 0 10 20 a.jpg A\n3 4 0 30 40 b.jpg B", WGS84_CRS);
    let outcome = GcpImporterImpl::default().import(&raw, GcpFormat::TextWhitespace7Field);

    assert_eq!(outcome.crs.as_deref(), Some(WGS84_CRS));
    assert_eq!(outcome.points.len(), 2);
    assert_eq!(outcome.report.total_lines, 2);
    assert!(outcome.points.iter().all(|p| !p.name.contains("proj")));
}

#[test]
fn test_grouping_covers_every_point_once() {
    let raw = "\
1 2 0 10 20 a.jpg A
3 4 0 30 40 b.jpg B
5 6 0 50 60 c.jpg A
7 8 0 70 80 d.jpg C
9 10 0 90 100 e.jpg A";
    let outcome = GcpImporterImpl::default().import(raw, GcpFormat::TextWhitespace7Field);

    assert_eq!(outcome.groups.point_count(), outcome.points.len());

    let mut seen = HashSet::new();
    for (name, points) in outcome.groups.iter() {
        for point in points {
            assert_eq!(point.name, name);
            assert!(seen.insert(point.id.clone()), "点位重复出现: {}", point.id);
        }
    }
    let all: HashSet<String> = outcome.points.iter().map(|p| p.id.clone()).collect();
    assert_eq!(seen, all);

    // 组内保持输入顺序
    let images: Vec<_> = outcome
        .groups
        .get("A")
        .unwrap_or(&[])
        .iter()
        .filter_map(|p| p.image_name.clone())
        .collect();
    assert_eq!(images, vec!["a.jpg", "c.jpg", "e.jpg"]);
}

#[test]
fn test_empty_input_contract() {
    let importer = GcpImporterImpl::default();
    for format in GcpFormat::ALL {
        for raw in ["", "   ", "\n\r\n\t\n"] {
            let outcome = importer.import(raw, format);
            assert!(outcome.points.is_empty());
            assert!(outcome.groups.is_empty());
            assert_eq!(outcome.status(), ImportStatus::EmptyInput);
        }
    }
}

#[test]
fn test_ids_are_unique_and_fresh() {
    let importer = GcpImporterImpl::default();
    let first = importer.import(SAMPLE_CSV_7FIELD, GcpFormat::Csv7Field);
    let second = importer.import(SAMPLE_CSV_7FIELD, GcpFormat::Csv7Field);

    assert_ne!(first.points[0].id, first.points[1].id);
    assert_ne!(first.points[0].id, second.points[0].id);
    assert!(first.points[0].eq_ignoring_id(&second.points[0]));
}

#[test]
fn test_csv_3field_with_quotes_and_crlf() {
    let raw = "\"Point, North\",45.5,-122.25\r\nSouth,44,-121\r\n";
    let outcome = GcpImporterImpl::default().import(raw, GcpFormat::Csv3Field);

    assert_eq!(outcome.points.len(), 2);
    assert_eq!(outcome.points[0].name, "Point, North");
    assert_eq!(outcome.points[0].lat_lng(), Some((45.5, -122.25)));
    assert_eq!(outcome.points[1].lat_lng(), Some((44.0, -121.0)));
}

#[test]
fn test_all_rows_rejected_is_no_valid_rows() {
    let outcome = GcpImporterImpl::default().import("a b c\nd e f", GcpFormat::TextWhitespace7Field);
    assert!(outcome.points.is_empty());
    assert_eq!(outcome.status(), ImportStatus::NoValidRows);
}
