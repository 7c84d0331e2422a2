// ==========================================
// 工厂设备维护管理系统 - 界面偏好存储抽象
// ==========================================
// 职责: 持久化"隐藏提示""筛选条件"等小型界面偏好
// 实现: SqlitePreferenceStore（本地库）/ MemoryPreferenceStore（测试、临时会话）
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::preference_repo::PreferenceRepository;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// 偏好存储接口（键值均为字符串，结构化值由调用方序列化）
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> RepositoryResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> RepositoryResult<()>;

    /// 删除偏好，返回是否存在
    fn remove(&self, key: &str) -> RepositoryResult<bool>;

    /// 列出全部偏好（按 key 排序）
    fn list(&self) -> RepositoryResult<Vec<(String, String)>>;
}

// ==========================================
// SqlitePreferenceStore
// ==========================================
pub struct SqlitePreferenceStore {
    repo: PreferenceRepository,
}

impl SqlitePreferenceStore {
    pub fn new(repo: PreferenceRepository) -> Self {
        Self { repo }
    }
}

impl PreferenceStore for SqlitePreferenceStore {
    fn get(&self, key: &str) -> RepositoryResult<Option<String>> {
        Ok(self.repo.find(key)?.map(|entry| entry.value))
    }

    fn set(&self, key: &str, value: &str) -> RepositoryResult<()> {
        self.repo.upsert(key, value)
    }

    fn remove(&self, key: &str) -> RepositoryResult<bool> {
        self.repo.delete(key)
    }

    fn list(&self) -> RepositoryResult<Vec<(String, String)>> {
        Ok(self
            .repo
            .list()?
            .into_iter()
            .map(|entry| (entry.key, entry.value))
            .collect())
    }
}

// ==========================================
// MemoryPreferenceStore
// ==========================================
#[derive(Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> RepositoryResult<std::sync::MutexGuard<'_, BTreeMap<String, String>>> {
        self.values
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> RepositoryResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> RepositoryResult<()> {
        if key.trim().is_empty() {
            return Err(RepositoryError::FieldValueError {
                field: "key".to_string(),
                message: "偏好键不能为空".to_string(),
            });
        }
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> RepositoryResult<bool> {
        Ok(self.lock()?.remove(key).is_some())
    }

    fn list(&self) -> RepositoryResult<Vec<(String, String)>> {
        Ok(self
            .lock()?
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}
