// ==========================================
// GCP 编辑器 - 导出投递接口
// ==========================================
// 实现者: LocalDirSink（写入本地目录）
// ==========================================

use crate::exporter::ExportedFile;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, instrument};

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("投递目标不可用: {0}")]
    TargetUnavailable(String),

    #[error("文件写入失败 ({path}): {message}")]
    WriteFailed { path: String, message: String },

    #[error("文件名非法: {0}")]
    InvalidFileName(String),
}

pub type SinkResult<T> = Result<T, SinkError>;

// ==========================================
// ExportSink Trait
// ==========================================
#[async_trait]
pub trait ExportSink: Send + Sync {
    /// 投递导出文件
    ///
    /// # 返回
    /// - 投递后的位置描述（本地实现为文件路径）
    async fn deliver(&self, file: &ExportedFile) -> SinkResult<String>;
}

// ==========================================
// LocalDirSink - 本地目录投递
// ==========================================
pub struct LocalDirSink {
    dir: PathBuf,
}

impl LocalDirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn target_path(&self, file_name: &str) -> SinkResult<PathBuf> {
        let name = Path::new(file_name);
        // 只接受单级文件名
        let is_plain = name.components().count() == 1 && name.file_name().is_some();
        if file_name.is_empty() || !is_plain {
            return Err(SinkError::InvalidFileName(file_name.to_string()));
        }
        Ok(self.dir.join(name))
    }
}

#[async_trait]
impl ExportSink for LocalDirSink {
    #[instrument(skip_all, fields(file_name = %file.file_name, bytes = file.body.len()))]
    async fn deliver(&self, file: &ExportedFile) -> SinkResult<String> {
        let path = self.target_path(&file.file_name)?;

        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            SinkError::TargetUnavailable(format!("{}: {}", self.dir.display(), e))
        })?;

        tokio::fs::write(&path, &file.body)
            .await
            .map_err(|e| SinkError::WriteFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        let location = path.display().to_string();
        info!(location = %location, "导出文件已投递");
        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_local_dir_sink_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let sink = LocalDirSink::new(dir.path().join("out"));
        let file = ExportedFile::new(b"A, 1, 2".to_vec(), Utc::now());

        let location = sink.deliver(&file).await.unwrap();

        let written = tokio::fs::read(&location).await.unwrap();
        assert_eq!(written, b"A, 1, 2");
        assert!(location.ends_with(&file.file_name));
    }

    #[tokio::test]
    async fn test_rejects_nested_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let sink = LocalDirSink::new(dir.path());
        let mut file = ExportedFile::new(Vec::new(), Utc::now());
        file.file_name = "../escape.txt".to_string();

        assert!(matches!(
            sink.deliver(&file).await,
            Err(SinkError::InvalidFileName(_))
        ));
    }
}
