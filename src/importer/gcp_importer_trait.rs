// ==========================================
// GCP 编辑器 - GCP 导入 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// ==========================================

use crate::domain::gcp::{GcpPoint, ImportOutcome};
use crate::domain::types::GcpFormat;
use crate::importer::error::ImportResult;

// ==========================================
// GcpImporter Trait
// ==========================================
// 用途: GCP 导入主接口
// 实现者: GcpImporterImpl
pub trait GcpImporter: Send + Sync {
    /// 从原始文本导入 GCP 点位
    ///
    /// # 参数
    /// - raw_text: 文件全文
    /// - format: 文件格式
    ///
    /// # 返回
    /// - ImportOutcome: 点位 + 分组 + CRS + 导入报告
    ///
    /// # 说明
    /// - 永不失败: 空输入返回空结果（status = EmptyInput）
    /// - 行级错误只丢弃该行并记入报告
    ///
    /// # 导入流程
    /// 1. 按行切分，丢弃空白行
    /// 2. 提取首行 CRS（仅支持的格式）
    /// 3. 按格式切分字段
    /// 4. 字段数校验
    /// 5. 数值解析（必填字段须为有限数）
    /// 6. 文本字段 TRIM
    /// 7. 分配 id
    /// 8. 按名称分组
    fn import(&self, raw_text: &str, format: GcpFormat) -> ImportOutcome;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 行切分接口（阶段 3）
// 实现者: CommaLineParser, WhitespaceLineParser, CsvRecordParser
pub trait FileParser: Send + Sync {
    /// 将一行切分为字段
    ///
    /// # 参数
    /// - line: 原始行（已去除换行符）
    /// - line_number: 行号（用于错误报告）
    ///
    /// # 返回
    /// - Ok(Vec<String>): 字段列表（未 TRIM）
    /// - Err: 行无法切分（如 CSV 引号错误）
    fn split_fields(&self, line: &str, line_number: usize) -> ImportResult<Vec<String>>;

    /// 是否支持首行 CRS 声明
    fn supports_crs_header(&self) -> bool {
        false
    }
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 字段映射接口（阶段 4-6）
// 实现者: FieldMapperImpl
pub trait FieldMapper: Send + Sync {
    /// 将字段列表映射为 GcpPoint
    ///
    /// # 参数
    /// - fields: 切分后的字段
    /// - format: 决定字段顺序与必填项
    /// - line_number: 行号
    ///
    /// # 返回
    /// - Ok(GcpPoint): 已分配 id 的点位
    /// - Err: 字段数不足 / 必填数值非法
    fn map_to_point(
        &self,
        fields: &[String],
        format: GcpFormat,
        line_number: usize,
    ) -> ImportResult<GcpPoint>;
}

// ==========================================
// DataCleaner Trait
// ==========================================
// 用途: 数据清洗接口
// 实现者: DataCleanerImpl
pub trait DataCleaner: Send + Sync {
    /// 清洗文本字段（TRIM）
    fn clean_text(&self, value: &str) -> String;

    /// 标准化 NULL 值（空字符串/空白 → None）
    fn normalize_null(&self, value: Option<&str>) -> Option<String>;

    /// 解析必填数值（必须为有限数）
    ///
    /// # 返回
    /// - Ok(f64): 解析成功
    /// - Err(TypeConversionError): 空值 / 非数字 / NaN / Infinity
    fn parse_required_number(&self, value: &str, field: &str, line: usize) -> ImportResult<f64>;

    /// 解析可选数值（失败返回 None）
    fn parse_optional_number(&self, value: Option<&str>) -> Option<f64>;
}
