// ==========================================
// GCP 编辑器 - 配置层
// ==========================================
// 职责: 导入/关联行为的可调参数
// 存储: KvStore（config/* 键）
// ==========================================

pub mod config_manager;

pub use config_manager::{config_keys, ConfigManager, GcpConfig};
