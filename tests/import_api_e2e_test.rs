// ==========================================
// API 端到端测试
// ==========================================
// 模拟宿主界面调用: 导入 → 关联 → 导出 → 投递


use gcp_editor::api::{ApiError, INVALID_POINTS_MESSAGE};
use gcp_editor::app::AppState;
use gcp_editor::delivery::LocalDirSink;
use gcp_editor::domain::{GcpFormat, ImportStatus};
use gcp_editor::logging;
use test_helpers::{create_test_db, write_temp_file};

#[tokio::test]
async fn test_import_fixture_txt() {
    logging::init_test();
    let state = AppState::in_memory();

    let response = state
        .import_api
        .import_file("tests/fixtures/gcp_points.txt", None)
        .await
        .expect("导入失败");

    assert_eq!(response.format, GcpFormat::TextWhitespace7Field);
    assert_eq!(response.status, ImportStatus::Imported);
    assert_eq!(response.imported, 3);
    assert_eq!(response.rejected, 1);
    assert_eq!(response.group_count, 2);
    assert_eq!(
        response.crs.as_deref(),
        Some("+proj=utm +zone=33 +datum=WGS84")
    );
}

#[tokio::test]
async fn test_import_fixture_csv_3field_skips_header() {
    let state = AppState::in_memory();
    let response = state
        .import_api
        .import_file("tests/fixtures/gcp_latlng.csv", Some(GcpFormat::Csv3Field))
        .await
        .expect("导入失败");

    // 表头行的 lat/lng 无法解析为数字
    assert_eq!(response.imported, 2);
    assert_eq!(response.rejected, 1);

    let points = state.workspace().points().unwrap();
    assert_eq!(points[1].name, "Bridge, East");
}

#[tokio::test]
async fn test_empty_file_is_rejected() {
    let state = AppState::in_memory();
    let file = write_temp_file("", ".txt").unwrap();
    let path = file.path().to_str().unwrap().to_string();

    let result = state.import_api.import_file(&path, None).await;
    assert!(matches!(result, Err(ApiError::EmptyInput)));

    let blank = write_temp_file(" \n  \n", ".csv").unwrap();
    let path = blank.path().to_str().unwrap().to_string();
    let result = state.import_api.import_file(&path, None).await;
    assert!(matches!(result, Err(ApiError::EmptyInput)));
}

#[tokio::test]
async fn test_import_match_export_deliver() {
    logging::init_test();
    let (_db_file, db_path) = create_test_db().unwrap();
    let state = AppState::new(db_path).unwrap();

    let upload = write_temp_file(
        "1.0,2.0,0,100,200,img1.jpg,PointA\n3.0,4.0,0,150,250,img2.jpg,PointB",
        ".csv",
    )
    .unwrap();
    let path = upload.path().to_str().unwrap().to_string();
    state.import_api.import_file(&path, None).await.unwrap();

    // PointA 追加关联 img3.jpg
    let mut session = state
        .image_api
        .open_session("PointA", ["img3.jpg", "img1.jpg"])
        .unwrap();
    state.image_api.toggle(&mut session, 1).unwrap();
    let summary = state.image_api.save(&session).unwrap();
    assert_eq!(summary.kept, 1);
    assert_eq!(summary.inherited, 1);

    let file = state
        .export_api
        .export_points(GcpFormat::TextWhitespace7Field)
        .unwrap();
    assert_eq!(
        file.text(),
        "1\t2\t0\t100\t200\timg1.jpg\tPointA\n\
         1\t2\t0\t100\t200\timg3.jpg\tPointA\n\
         3\t4\t0\t150\t250\timg2.jpg\tPointB"
    );
    assert!(file.file_name.starts_with("gcp_points_"));
    assert!(file.file_name.ends_with(".txt"));

    let out_dir = tempfile::tempdir().unwrap();
    let sink = LocalDirSink::new(out_dir.path());
    let location = state.export_api.deliver(&file, &sink).await.unwrap();
    let written = tokio::fs::read_to_string(&location).await.unwrap();
    assert_eq!(written, file.text());
}

#[tokio::test]
async fn test_export_json_rejects_empty_list() {
    let state = AppState::in_memory();
    let result = state.export_api.export_json(r#"{"gcpPoints": []}"#);
    assert!(matches!(result, Err(ApiError::InvalidInput(msg)) if msg == INVALID_POINTS_MESSAGE));
}
