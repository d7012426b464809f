// ==========================================
// GCP 编辑器 - SQLite 键值存储
// ==========================================
// 存储: kv_store 表 (key-value)
// 约束: 所有查询使用参数化
// ==========================================

use crate::db::{open_in_memory_connection, open_sqlite_connection};
use crate::repository::error::RepositoryResult;
use crate::repository::kv_store::{KvStore, KvWrite};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

pub struct SqliteKvStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteKvStore {
    /// 打开（或创建）数据库文件
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 内存库
    pub fn in_memory() -> RepositoryResult<Self> {
        let conn = open_in_memory_connection()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 全部键（按字母序）
    pub fn keys(&self) -> RepositoryResult<Vec<String>> {
        let conn = self.conn.lock()?;
        let mut stmt = conn.prepare("SELECT key FROM kv_store ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }
}

const UPSERT_SQL: &str = "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
     ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3";

impl KvStore for SqliteKvStore {
    fn get(&self, key: &str) -> RepositoryResult<Option<Vec<u8>>> {
        let conn = self.conn.lock()?;
        let value = conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &[u8]) -> RepositoryResult<()> {
        let conn = self.conn.lock()?;
        conn.execute(UPSERT_SQL, params![key, value, Utc::now().to_rfc3339()])?;
        Ok(())
    }

    fn remove(&self, key: &str) -> RepositoryResult<()> {
        let conn = self.conn.lock()?;
        conn.execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// 批量写入（事务化，失败整体回滚）
    fn apply_batch(&self, writes: &[KvWrite<'_>]) -> RepositoryResult<()> {
        let conn = self.conn.lock()?;
        let tx = conn.unchecked_transaction()?;
        let now = Utc::now().to_rfc3339();

        for (key, value) in writes {
            match value {
                Some(value) => tx.execute(UPSERT_SQL, params![key, value, now])?,
                None => tx.execute("DELETE FROM kv_store WHERE key = ?1", params![key])?,
            };
        }

        tx.commit()?;
        Ok(())
    }
}
