// ==========================================
// 工厂设备维护管理系统 - 界面偏好 API
// ==========================================
// 职责: 为界面提供类型化的偏好读写（隐藏提示、语言、工作清单筛选）
// ==========================================

use crate::api::equipment_api::WorklistFilter;
use crate::api::error::{ApiError, ApiResult};
use crate::config::preference_store::PreferenceStore;
use crate::i18n;
use std::sync::Arc;

/// 偏好键
pub mod preference_keys {
    pub const HIDE_TIPS: &str = "hide_tips";
    pub const LOCALE: &str = "locale";
    pub const WORKLIST_FILTER: &str = "worklist_filter";
}

pub struct PreferenceApi {
    store: Arc<dyn PreferenceStore>,
}

impl PreferenceApi {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self { store }
    }

    // ==========================================
    // 原始键值
    // ==========================================

    pub fn get(&self, key: &str) -> ApiResult<Option<String>> {
        Ok(self.store.get(key)?)
    }

    pub fn set(&self, key: &str, value: &str) -> ApiResult<()> {
        self.store.set(key, value)?;
        tracing::debug!(preference_key = key, "偏好已保存");
        Ok(())
    }

    pub fn remove(&self, key: &str) -> ApiResult<bool> {
        Ok(self.store.remove(key)?)
    }

    pub fn list(&self) -> ApiResult<Vec<(String, String)>> {
        Ok(self.store.list()?)
    }

    // ==========================================
    // 类型化访问
    // ==========================================

    /// 是否隐藏操作提示（缺省 false）
    pub fn hide_tips(&self) -> ApiResult<bool> {
        let value = self.store.get(preference_keys::HIDE_TIPS)?;
        Ok(matches!(
            value.as_deref().map(str::trim),
            Some("true") | Some("1")
        ))
    }

    pub fn set_hide_tips(&self, hide: bool) -> ApiResult<()> {
        self.set(preference_keys::HIDE_TIPS, if hide { "true" } else { "false" })
    }

    /// 界面语言（缺省 zh-CN，存储值会归一化）
    pub fn locale(&self) -> ApiResult<String> {
        let value = self.store.get(preference_keys::LOCALE)?;
        Ok(value
            .as_deref()
            .map(i18n::normalize_locale)
            .unwrap_or(i18n::DEFAULT_LOCALE)
            .to_string())
    }

    /// 保存界面语言，返回归一化后的值
    pub fn set_locale(&self, locale: &str) -> ApiResult<String> {
        if locale.trim().is_empty() {
            return Err(ApiError::InvalidInput("语言不能为空".to_string()));
        }
        let normalized = i18n::normalize_locale(locale);
        self.set(preference_keys::LOCALE, normalized)?;
        Ok(normalized.to_string())
    }

    /// 工作清单筛选条件；存储内容损坏时回退为默认筛选
    pub fn worklist_filter(&self) -> ApiResult<WorklistFilter> {
        let raw = match self.store.get(preference_keys::WORKLIST_FILTER)? {
            Some(raw) => raw,
            None => return Ok(WorklistFilter::default()),
        };

        match serde_json::from_str::<WorklistFilter>(&raw) {
            Ok(filter) => Ok(filter),
            Err(e) => {
                tracing::warn!(error = %e, "工作清单筛选条件解析失败，使用默认值");
                Ok(WorklistFilter::default())
            }
        }
    }

    pub fn set_worklist_filter(&self, filter: &WorklistFilter) -> ApiResult<()> {
        let raw = serde_json::to_string(filter)
            .map_err(|e| ApiError::InternalError(format!("筛选条件序列化失败: {}", e)))?;
        self.set(preference_keys::WORKLIST_FILTER, &raw)
    }
}
