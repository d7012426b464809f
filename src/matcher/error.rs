// ==========================================
// GCP 编辑器 - 影像关联错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("影像索引越界: {index}（共 {len} 张）")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("影像不存在: {0}")]
    ImageNotFound(String),
}

pub type MatchResult<T> = Result<T, MatchError>;
