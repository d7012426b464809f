// ==========================================
// GCP 编辑器 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: KvStore 中 config/* 键（字符串值）
// 说明: 缺失或无法解析的值回退到默认值
// ==========================================

use crate::domain::types::{CoordinateInheritance, GcpFormat};
use crate::importer::DEFAULT_CRS_PREFIX;
use crate::repository::error::RepositoryResult;
use crate::repository::kv_store::KvStore;
use serde::{Deserialize, Serialize};
use tracing::warn;

// ==========================================
// GcpConfig - 配置快照
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GcpConfig {
    pub crs_prefix: String,
    pub coordinate_inheritance: CoordinateInheritance,
    pub default_import_format: GcpFormat,
}

impl Default for GcpConfig {
    fn default() -> Self {
        Self {
            crs_prefix: DEFAULT_CRS_PREFIX.to_string(),
            coordinate_inheritance: CoordinateInheritance::default(),
            default_import_format: GcpFormat::Csv7Field,
        }
    }
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager<S: KvStore> {
    store: S,
}

impl<S: KvStore> ConfigManager<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> RepositoryResult<String> {
        Ok(self
            .store
            .get_string(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 写入单个配置值
    pub fn set_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        self.store.set(key, value.as_bytes())
    }

    /// CRS 声明行前缀
    ///
    /// # 默认值
    /// - "+proj"
    pub fn get_crs_prefix(&self) -> RepositoryResult<String> {
        let value = self.get_config_or_default(config_keys::CRS_PREFIX, DEFAULT_CRS_PREFIX)?;
        if value.trim().is_empty() {
            return Ok(DEFAULT_CRS_PREFIX.to_string());
        }
        Ok(value)
    }

    /// 新关联影像的坐标来源
    ///
    /// # 默认值
    /// - INHERIT_FIRST
    pub fn get_coordinate_inheritance(&self) -> RepositoryResult<CoordinateInheritance> {
        let value = self.get_config_or_default(config_keys::COORDINATE_INHERITANCE, "INHERIT_FIRST")?;
        Ok(value.parse::<CoordinateInheritance>().unwrap_or_else(|_| {
            warn!(
                config_key = config_keys::COORDINATE_INHERITANCE,
                value = %value,
                "配置值无法解析,使用默认值"
            );
            CoordinateInheritance::default()
        }))
    }

    /// 未指定格式时的导入格式
    ///
    /// # 默认值
    /// - csv-7field
    pub fn get_default_import_format(&self) -> RepositoryResult<GcpFormat> {
        let value = self.get_config_or_default(config_keys::DEFAULT_IMPORT_FORMAT, "csv-7field")?;
        Ok(value.parse::<GcpFormat>().unwrap_or_else(|_| {
            warn!(
                config_key = config_keys::DEFAULT_IMPORT_FORMAT,
                value = %value,
                "配置值无法解析,使用默认值"
            );
            GcpFormat::Csv7Field
        }))
    }

    /// 读取全部配置
    pub fn snapshot(&self) -> RepositoryResult<GcpConfig> {
        Ok(GcpConfig {
            crs_prefix: self.get_crs_prefix()?,
            coordinate_inheritance: self.get_coordinate_inheritance()?,
            default_import_format: self.get_default_import_format()?,
        })
    }

    /// 整体写入配置
    pub fn apply(&self, config: &GcpConfig) -> RepositoryResult<()> {
        self.set_config_value(config_keys::CRS_PREFIX, &config.crs_prefix)?;
        self.set_config_value(
            config_keys::COORDINATE_INHERITANCE,
            &config.coordinate_inheritance.to_string(),
        )?;
        self.set_config_value(
            config_keys::DEFAULT_IMPORT_FORMAT,
            config.default_import_format.as_str(),
        )
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    pub const CRS_PREFIX: &str = "config/crs_prefix";
    pub const COORDINATE_INHERITANCE: &str = "config/coordinate_inheritance";
    pub const DEFAULT_IMPORT_FORMAT: &str = "config/default_import_format";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::kv_store::MemoryKvStore;

    #[test]
    fn test_defaults_when_store_empty() {
        let manager = ConfigManager::new(MemoryKvStore::new());
        assert_eq!(manager.snapshot().unwrap(), GcpConfig::default());
        assert_eq!(manager.get_crs_prefix().unwrap(), "+proj");
    }

    #[test]
    fn test_overrides_are_read_back() {
        let manager = ConfigManager::new(MemoryKvStore::new());
        let config = GcpConfig {
            crs_prefix: "+init".to_string(),
            coordinate_inheritance: CoordinateInheritance::ManualEntry,
            default_import_format: GcpFormat::Text3Field,
        };
        manager.apply(&config).unwrap();
        assert_eq!(manager.snapshot().unwrap(), config);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let manager = ConfigManager::new(MemoryKvStore::new());
        manager
            .set_config_value(config_keys::COORDINATE_INHERITANCE, "SOMETIMES")
            .unwrap();
        manager
            .set_config_value(config_keys::DEFAULT_IMPORT_FORMAT, "xlsx")
            .unwrap();
        manager.set_config_value(config_keys::CRS_PREFIX, "  ").unwrap();

        assert_eq!(
            manager.get_coordinate_inheritance().unwrap(),
            CoordinateInheritance::InheritFirst
        );
        assert_eq!(
            manager.get_default_import_format().unwrap(),
            GcpFormat::Csv7Field
        );
        assert_eq!(manager.get_crs_prefix().unwrap(), "+proj");
    }
}
