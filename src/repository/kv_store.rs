// ==========================================
// GCP 编辑器 - 键值存储接口
// ==========================================
// 职责: 调用方在页面切换之间保存点位/分组
// 说明: 导入器/导出器不直接访问存储
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// 批量写入中的单个操作（None = 删除）
pub type KvWrite<'a> = (&'a str, Option<&'a [u8]>);

// ==========================================
// KvStore Trait
// ==========================================
// 实现者: MemoryKvStore, SqliteKvStore
pub trait KvStore: Send + Sync {
    /// 读取键值（不存在返回 None）
    fn get(&self, key: &str) -> RepositoryResult<Option<Vec<u8>>>;

    /// 写入键值（覆盖）
    fn set(&self, key: &str, value: &[u8]) -> RepositoryResult<()>;

    /// 删除键（不存在时忽略）
    fn remove(&self, key: &str) -> RepositoryResult<()>;

    /// 批量写入/删除
    ///
    /// 默认逐条执行；实现者可覆盖为全部成功或全部不生效
    fn apply_batch(&self, writes: &[KvWrite<'_>]) -> RepositoryResult<()> {
        for (key, value) in writes {
            match value {
                Some(value) => self.set(key, value)?,
                None => self.remove(key)?,
            }
        }
        Ok(())
    }

    /// 以 UTF-8 文本读取
    fn get_string(&self, key: &str) -> RepositoryResult<Option<String>> {
        match self.get(key)? {
            None => Ok(None),
            Some(bytes) => String::from_utf8(bytes).map(Some).map_err(|e| {
                RepositoryError::SerializationError {
                    key: key.to_string(),
                    message: e.to_string(),
                }
            }),
        }
    }
}

/// 跨 API 共享的存储句柄
pub type SharedKvStore = Arc<dyn KvStore>;

impl<S: KvStore + ?Sized> KvStore for Arc<S> {
    fn get(&self, key: &str) -> RepositoryResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> RepositoryResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> RepositoryResult<()> {
        (**self).remove(key)
    }

    fn apply_batch(&self, writes: &[KvWrite<'_>]) -> RepositoryResult<()> {
        (**self).apply_batch(writes)
    }
}

// ==========================================
// MemoryKvStore - 内存实现
// ==========================================
#[derive(Default)]
pub struct MemoryKvStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> RepositoryResult<Option<Vec<u8>>> {
        let entries = self.entries.lock()?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> RepositoryResult<()> {
        let mut entries = self.entries.lock()?;
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> RepositoryResult<()> {
        let mut entries = self.entries.lock()?;
        entries.remove(key);
        Ok(())
    }

    // 持有同一把锁完成全部写入
    fn apply_batch(&self, writes: &[KvWrite<'_>]) -> RepositoryResult<()> {
        let mut entries = self.entries.lock()?;
        for (key, value) in writes {
            match value {
                Some(value) => entries.insert(key.to_string(), value.to_vec()),
                None => entries.remove(*key),
            };
        }
        Ok(())
    }
}
