// ==========================================
// 工厂设备维护管理系统 - 保养阈值配置读取 Trait
// ==========================================
// 职责: 定义保养周期状态引擎所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::domain::types::CycleMode;
use crate::engine::interval_status::IntervalThresholds;
use async_trait::async_trait;
use std::error::Error;

/// 配置读取结果
pub type ConfigResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

// ==========================================
// IntervalConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait IntervalConfigReader: Send + Sync {
    /// 获取"即将到期"已用比例阈值
    ///
    /// # 默认值
    /// - 0.8
    ///
    /// # 有效范围
    /// - (0, 1]
    async fn get_approaching_used_fraction(&self) -> ConfigResult<f64>;

    /// 获取"即将到期"剩余比例阈值
    ///
    /// # 默认值
    /// - 0.2
    ///
    /// # 有效范围
    /// - [0, 1)
    async fn get_approaching_remaining_fraction(&self) -> ConfigResult<f64>;

    /// 获取"即将到期"绝对剩余量兜底阈值
    ///
    /// # 默认值
    /// - 24
    ///
    /// # 说明
    /// - 与计量单位无关（24 小时与 24 公里紧急程度不同），保留现有行为
    async fn get_approaching_absolute_remaining(&self) -> ConfigResult<f64>;

    /// 获取周期计数模式
    ///
    /// # 默认值
    /// - since_baseline
    async fn get_cycle_mode(&self) -> ConfigResult<CycleMode>;

    /// 获取状态标签语言
    ///
    /// # 默认值
    /// - zh-CN
    async fn get_label_locale(&self) -> ConfigResult<String>;

    /// 组装引擎阈值
    async fn get_interval_thresholds(&self) -> ConfigResult<IntervalThresholds> {
        Ok(IntervalThresholds {
            approaching_used_fraction: self.get_approaching_used_fraction().await?,
            approaching_remaining_fraction: self.get_approaching_remaining_fraction().await?,
            approaching_absolute_remaining: self.get_approaching_absolute_remaining().await?,
            cycle_mode: self.get_cycle_mode().await?,
        })
    }
}
