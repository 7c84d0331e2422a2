// ==========================================
// 工厂设备维护管理系统 - 界面偏好数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 存储: user_preference 表 (key-value)
// ==========================================

use crate::db::{configure_sqlite_connection, ensure_schema, open_sqlite_connection};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{Local, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};

/// 偏好记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceEntry {
    pub key: String,
    pub value: String,
    pub updated_at: NaiveDateTime,
}

// ==========================================
// PreferenceRepository - 界面偏好仓储
// ==========================================
pub struct PreferenceRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PreferenceRepository {
    /// 打开数据库并确保表结构存在
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
            ensure_schema(&guard)?;
        }
        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询单个偏好
    pub fn find(&self, key: &str) -> RepositoryResult<Option<PreferenceEntry>> {
        let conn = self.get_conn()?;
        let entry = conn
            .query_row(
                "SELECT key, value, updated_at FROM user_preference WHERE key = ?1",
                params![key],
                |row| {
                    Ok(PreferenceEntry {
                        key: row.get(0)?,
                        value: row.get(1)?,
                        updated_at: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(entry)
    }

    /// 写入偏好（存在则覆盖）
    pub fn upsert(&self, key: &str, value: &str) -> RepositoryResult<()> {
        if key.trim().is_empty() {
            return Err(RepositoryError::FieldValueError {
                field: "key".to_string(),
                message: "偏好键不能为空".to_string(),
            });
        }

        let conn = self.get_conn()?;
        let now = Local::now().naive_local();
        conn.execute(
            "INSERT INTO user_preference (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3",
            params![key, value, now],
        )?;
        Ok(())
    }

    /// 删除偏好
    ///
    /// # 返回
    /// - true: 删除了记录
    /// - false: 记录不存在
    pub fn delete(&self, key: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM user_preference WHERE key = ?1", params![key])?;
        Ok(affected > 0)
    }

    /// 列出全部偏好（按 key 排序）
    pub fn list(&self) -> RepositoryResult<Vec<PreferenceEntry>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value, updated_at FROM user_preference ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok(PreferenceEntry {
                key: row.get(0)?,
                value: row.get(1)?,
                updated_at: row.get(2)?,
            })
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }
}
