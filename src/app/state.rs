// ==========================================
// GCP 编辑器 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享存储和API实例
// ==========================================

use std::path::PathBuf;
use std::sync::Arc;

use crate::api::{ExportApi, ImageApi, ImportApi};
use crate::config::ConfigManager;
use crate::repository::{GcpWorkspace, MemoryKvStore, SharedKvStore, SqliteKvStore};
use tracing::info;

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "GCP_EDITOR_DB_PATH";

/// 应用状态
///
/// 所有 API 共享同一个 KvStore
pub struct AppState {
    pub db_path: String,
    pub store: SharedKvStore,
    pub import_api: ImportApi,
    pub export_api: ExportApi,
    pub image_api: ImageApi,
}

impl AppState {
    /// 打开数据库文件并装配 API
    pub fn new(db_path: String) -> Result<Self, String> {
        info!(db_path = %db_path, "初始化应用状态");
        let store = SqliteKvStore::new(&db_path)
            .map_err(|e| format!("无法打开数据库 {}: {}", db_path, e))?;
        Ok(Self::with_store(db_path, Arc::new(store)))
    }

    /// 内存存储（测试/临时会话）
    pub fn in_memory() -> Self {
        Self::with_store(":memory:".to_string(), Arc::new(MemoryKvStore::new()))
    }

    pub fn with_store(db_path: String, store: SharedKvStore) -> Self {
        Self {
            db_path,
            import_api: ImportApi::new(store.clone()),
            export_api: ExportApi::new(store.clone()),
            image_api: ImageApi::new(store.clone()),
            store,
        }
    }

    pub fn workspace(&self) -> GcpWorkspace<SharedKvStore> {
        GcpWorkspace::new(self.store.clone())
    }

    pub fn config(&self) -> ConfigManager<SharedKvStore> {
        ConfigManager::new(self.store.clone())
    }
}

/// 获取默认数据库路径
///
/// 顺序: 环境变量 GCP_EDITOR_DB_PATH > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./gcp_editor.db");

    if let Some(data_dir) = dirs::data_dir() {
        // 开发环境使用独立目录，避免污染正式数据
        #[cfg(debug_assertions)]
        {
            path = data_dir.join("gcp-editor-dev");
        }

        #[cfg(not(debug_assertions))]
        {
            path = data_dir.join("gcp-editor");
        }

        std::fs::create_dir_all(&path).ok();
        path = path.join("gcp_editor.db");
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::GcpFormat;

    #[test]
    fn test_get_default_db_path() {
        let path = get_default_db_path();
        assert!(!path.is_empty());
        assert!(path.ends_with(".db"));
    }

    #[test]
    fn test_apis_share_store() {
        let state = AppState::in_memory();
        state
            .import_api
            .import_text("A,1,2", GcpFormat::Text3Field)
            .unwrap();

        assert_eq!(state.workspace().points().unwrap().len(), 1);
        let file = state.export_api.export_points(GcpFormat::Text3Field).unwrap();
        assert_eq!(file.text(), "A, 1, 2");
    }
}
