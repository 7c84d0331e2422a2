// ==========================================
// 工厂设备维护管理系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::interval_config_trait::{ConfigResult, IntervalConfigReader};
use crate::db::{configure_sqlite_connection, ensure_schema, open_sqlite_connection};
use crate::domain::types::CycleMode;
use crate::engine::interval_status::IntervalThresholds;
use crate::i18n;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            configure_sqlite_connection(&conn_guard)?;
            ensure_schema(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        tracing::info!(config_key = key, value, "配置已更新");
        Ok(())
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> ConfigResult<String> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 读取数值配置；格式错误或超出范围时回退默认值
    fn get_f64_in_range(
        &self,
        key: &str,
        default: f64,
        valid: impl Fn(f64) -> bool,
    ) -> ConfigResult<f64> {
        let raw = match self.get_config_value(key)? {
            Some(v) => v,
            None => return Ok(default),
        };

        match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() && valid(v) => Ok(v),
            _ => {
                tracing::warn!(
                    config_key = key,
                    raw_value = %raw,
                    default,
                    "配置值无效，使用默认值"
                );
                Ok(default)
            }
        }
    }

    /// 获取所有配置的快照（JSON格式）
    ///
    /// # 用途
    /// - 诊断信息导出
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }
}

// ==========================================
// IntervalConfigReader Trait 实现
// ==========================================
#[async_trait]
impl IntervalConfigReader for ConfigManager {
    async fn get_approaching_used_fraction(&self) -> ConfigResult<f64> {
        self.get_f64_in_range(
            config_keys::APPROACHING_USED_FRACTION,
            IntervalThresholds::DEFAULT_USED_FRACTION,
            |v| v > 0.0 && v <= 1.0,
        )
    }

    async fn get_approaching_remaining_fraction(&self) -> ConfigResult<f64> {
        self.get_f64_in_range(
            config_keys::APPROACHING_REMAINING_FRACTION,
            IntervalThresholds::DEFAULT_REMAINING_FRACTION,
            |v| (0.0..1.0).contains(&v),
        )
    }

    async fn get_approaching_absolute_remaining(&self) -> ConfigResult<f64> {
        self.get_f64_in_range(
            config_keys::APPROACHING_ABSOLUTE_REMAINING,
            IntervalThresholds::DEFAULT_ABSOLUTE_REMAINING,
            |v| v >= 0.0,
        )
    }

    async fn get_cycle_mode(&self) -> ConfigResult<CycleMode> {
        let value = self.get_config_or_default(config_keys::CYCLE_MODE, "since_baseline")?;
        Ok(CycleMode::parse(&value).unwrap_or_else(|| {
            tracing::warn!(
                config_key = config_keys::CYCLE_MODE,
                raw_value = %value,
                "周期计数模式无效，使用 since_baseline"
            );
            CycleMode::SinceBaseline
        }))
    }

    async fn get_label_locale(&self) -> ConfigResult<String> {
        let value = self.get_config_or_default(config_keys::LABEL_LOCALE, i18n::DEFAULT_LOCALE)?;
        Ok(i18n::normalize_locale(&value).to_string())
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 即将到期判定
    pub const APPROACHING_USED_FRACTION: &str = "approaching_used_fraction";
    pub const APPROACHING_REMAINING_FRACTION: &str = "approaching_remaining_fraction";
    pub const APPROACHING_ABSOLUTE_REMAINING: &str = "approaching_absolute_remaining";

    // 周期计数
    pub const CYCLE_MODE: &str = "cycle_mode";

    // 标签语言
    pub const LABEL_LOCALE: &str = "label_locale";
}
