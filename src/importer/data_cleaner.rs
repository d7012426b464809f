// ==========================================
// GCP 编辑器 - 数据清洗器实现
// ==========================================
// 职责: TRIM / NULL 标准化 / 有限数解析
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::gcp_importer_trait::DataCleaner as DataCleanerTrait;

pub struct DataCleaner;

impl DataCleanerTrait for DataCleaner {
    fn clean_text(&self, value: &str) -> String {
        value.trim().to_string()
    }

    fn normalize_null(&self, value: Option<&str>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    fn parse_required_number(&self, value: &str, field: &str, line: usize) -> ImportResult<f64> {
        let trimmed = value.trim();
        trimmed
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ImportError::TypeConversionError {
                line,
                field: field.to_string(),
                value: trimmed.to_string(),
            })
    }

    fn parse_optional_number(&self, value: Option<&str>) -> Option<f64> {
        self.normalize_null(value)
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_basic() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.clean_text("  PointA \r"), "PointA");
    }

    #[test]
    fn test_normalize_null() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.normalize_null(Some("  ")), None);
        assert_eq!(cleaner.normalize_null(Some("")), None);
        assert_eq!(
            cleaner.normalize_null(Some("  img.jpg  ")),
            Some("img.jpg".to_string())
        );
        assert_eq!(cleaner.normalize_null(None), None);
    }

    #[test]
    fn test_parse_required_number() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.parse_required_number(" 1.5 ", "x", 1).unwrap(), 1.5);
        assert_eq!(cleaner.parse_required_number("-80", "lng", 1).unwrap(), -80.0);
        assert_eq!(cleaner.parse_required_number("1e3", "x", 1).unwrap(), 1000.0);
    }

    #[test]
    fn test_parse_required_number_rejects_non_finite() {
        let cleaner = DataCleaner;
        assert!(cleaner.parse_required_number("", "x", 1).is_err());
        assert!(cleaner.parse_required_number("abc", "x", 1).is_err());
        assert!(cleaner.parse_required_number("NaN", "x", 1).is_err());
        assert!(cleaner.parse_required_number("inf", "y", 1).is_err());
    }

    #[test]
    fn test_parse_optional_number() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.parse_optional_number(Some("12")), Some(12.0));
        assert_eq!(cleaner.parse_optional_number(Some(" ")), None);
        assert_eq!(cleaner.parse_optional_number(Some("n/a")), None);
        assert_eq!(cleaner.parse_optional_number(None), None);
    }
}
