// ==========================================
// GCP 编辑器 - 文件解析器实现
// ==========================================
// 阶段 1-3: 行切分 / CRS 提取 / 字段切分
// 支持: 逗号分隔 / 空白分隔 / csv 库解析
// ==========================================

use crate::domain::types::GcpFormat;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::gcp_importer_trait::FileParser;
use csv::ReaderBuilder;

/// 默认 CRS 行前缀
pub const DEFAULT_CRS_PREFIX: &str = "+proj";

const UTF8_BOM: char = '\u{feff}';

// ==========================================
// PreparedText - 预处理后的文本
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedText<'a> {
    /// 首行 CRS 声明（已 TRIM）
    pub crs: Option<String>,
    /// 点位行: (原始行号, 行内容)
    pub lines: Vec<(usize, &'a str)>,
}

/// 按行切分并提取 CRS
///
/// # 规则
/// - 换行符支持 \n 与 \r\n
/// - 去掉文件开头的 UTF-8 BOM
/// - 空白行丢弃（行号仍按原文件计数）
/// - crs_prefix 为 Some 且第一条非空行以该前缀开头时，提取为 CRS
pub fn prepare_lines<'a>(raw_text: &'a str, crs_prefix: Option<&str>) -> PreparedText<'a> {
    let raw_text = raw_text.strip_prefix(UTF8_BOM).unwrap_or(raw_text);
    let mut lines: Vec<(usize, &str)> = raw_text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| (idx + 1, line))
        .collect();

    let mut crs = None;
    if let (Some(prefix), Some((_, first))) = (crs_prefix, lines.first()) {
        if first.trim_start().starts_with(prefix) {
            crs = Some(first.trim().to_string());
            lines.remove(0);
        }
    }

    PreparedText { crs, lines }
}

// ==========================================
// CommaLineParser - 逗号直接切分
// ==========================================
// 用于 csv-7field / text-3field
pub struct CommaLineParser;

impl FileParser for CommaLineParser {
    fn split_fields(&self, line: &str, _line_number: usize) -> ImportResult<Vec<String>> {
        Ok(line.split(',').map(|f| f.to_string()).collect())
    }
}

// ==========================================
// WhitespaceLineParser - 空白分隔
// ==========================================
// 用于 text-whitespace-7field
// - 含制表符的行: 逐个制表符切分，保留空字段位置
//   仅当字段数足够且 x / y 为有限数时采用，否则按空白串切分
// - 空白串切分: 最后一个字段吸收行尾剩余内容
pub struct WhitespaceLineParser {
    max_fields: usize,
}

impl WhitespaceLineParser {
    pub fn new(max_fields: usize) -> Self {
        Self {
            max_fields: max_fields.max(1),
        }
    }
}

impl Default for WhitespaceLineParser {
    fn default() -> Self {
        Self::new(GcpFormat::TextWhitespace7Field.required_fields())
    }
}

impl WhitespaceLineParser {
    /// 逐制表符切分（保留空的可选字段）
    fn split_tabs(&self, line: &str) -> Option<Vec<String>> {
        let fields: Vec<String> = line.split('\t').map(|f| f.trim().to_string()).collect();
        let is_number = |f: &String| f.parse::<f64>().map_or(false, |v| v.is_finite());
        let coordinates_ok = fields.iter().take(2).filter(|f| is_number(f)).count() == 2;
        (fields.len() >= self.max_fields && coordinates_ok).then_some(fields)
    }

    /// 按空白串切分，最后一个字段吸收剩余内容
    fn split_runs(&self, line: &str) -> Vec<String> {
        let mut fields = Vec::new();
        let mut rest = line.trim();
        while fields.len() + 1 < self.max_fields && !rest.is_empty() {
            match rest.find(char::is_whitespace) {
                Some(pos) => {
                    fields.push(rest[..pos].to_string());
                    rest = rest[pos..].trim_start();
                }
                None => {
                    fields.push(rest.to_string());
                    rest = "";
                }
            }
        }
        if !rest.is_empty() {
            fields.push(rest.to_string());
        }
        fields
    }
}

impl FileParser for WhitespaceLineParser {
    fn split_fields(&self, line: &str, _line_number: usize) -> ImportResult<Vec<String>> {
        if line.contains('\t') {
            if let Some(fields) = self.split_tabs(line) {
                return Ok(fields);
            }
        }
        Ok(self.split_runs(line))
    }

    fn supports_crs_header(&self) -> bool {
        true
    }
}

// ==========================================
// CsvRecordParser - csv 库解析
// ==========================================
// 用于 csv-3field（支持引号字段）
pub struct CsvRecordParser;

impl FileParser for CsvRecordParser {
    fn split_fields(&self, line: &str, line_number: usize) -> ImportResult<Vec<String>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_reader(line.as_bytes());

        match reader.records().next() {
            Some(Ok(record)) => Ok(record.iter().map(|f| f.to_string()).collect()),
            Some(Err(e)) => Err(ImportError::CsvParseError {
                line: line_number,
                message: e.to_string(),
            }),
            None => Ok(Vec::new()),
        }
    }
}

// ==========================================
// 按格式选择解析器
// ==========================================
pub fn parser_for(format: GcpFormat) -> Box<dyn FileParser> {
    match format {
        GcpFormat::Csv7Field | GcpFormat::Text3Field => Box::new(CommaLineParser),
        GcpFormat::TextWhitespace7Field => Box::new(WhitespaceLineParser::default()),
        GcpFormat::Csv3Field => Box::new(CsvRecordParser),
    }
}
