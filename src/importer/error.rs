// ==========================================
// GCP 编辑器 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 行级错误在管道内转换为 RowRejection，不中断批次
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("没有可导入的内容（文件为空或未选择文件）")]
    EmptyInput,

    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .csv/.txt）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("CSV 解析失败 (行 {line}): {message}")]
    CsvParseError { line: usize, message: String },

    // ===== 行级映射错误 =====
    #[error("字段数不足 (行 {line}): 期望 {expected}，实际 {actual}")]
    FieldCountError {
        line: usize,
        expected: usize,
        actual: usize,
    },

    #[error("类型转换失败 (行 {line}, 字段 {field}): 无法解析为有限数: '{value}'")]
    TypeConversionError {
        line: usize,
        field: String,
        value: String,
    },

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    /// 是否为行级错误（丢弃该行，不影响批次）
    pub fn is_row_level(&self) -> bool {
        matches!(
            self,
            ImportError::CsvParseError { .. }
                | ImportError::FieldCountError { .. }
                | ImportError::TypeConversionError { .. }
        )
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => ImportError::FileNotFound(err.to_string()),
            _ => ImportError::FileReadError(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
