// ==========================================
// 工厂设备维护管理系统 - 保养周期状态引擎
// ==========================================
// 职责: 根据设备当前用量与保养计划，判定每个计划的保养状态，
//       并汇总出设备级最紧急状态（用于排序、角标、告警）
// 输入: current_usage + MaintenanceSchedule (+ 计量单位)
// 输出: StatusResult / EquipmentStatus
// 红线: 纯函数，无 I/O，不返回错误；非法数据降级为 Unset
// 红线: 后端已标注的状态优先于本地计算
// ==========================================

use crate::domain::equipment::{
    Equipment, EquipmentStatus, MaintenanceSchedule, ScheduleEvaluation, StatusResult,
};
use crate::domain::types::{CycleMode, MaintenanceState, MaintenanceUnit, StatusSource};
use crate::i18n::{self, format_quantity};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::instrument;

// ==========================================
// IntervalThresholds - 判定阈值
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntervalThresholds {
    /// 已用比例达到该值 → 即将到期
    pub approaching_used_fraction: f64,
    /// 剩余量 ≤ 周期 × 该值 → 即将到期
    pub approaching_remaining_fraction: f64,
    /// 剩余量 ≤ 该绝对值 → 即将到期（与单位无关）
    pub approaching_absolute_remaining: f64,
    /// 周期计数模式
    pub cycle_mode: CycleMode,
}

impl IntervalThresholds {
    pub const DEFAULT_USED_FRACTION: f64 = 0.8;
    pub const DEFAULT_REMAINING_FRACTION: f64 = 0.2;
    pub const DEFAULT_ABSOLUTE_REMAINING: f64 = 24.0;
}

impl Default for IntervalThresholds {
    fn default() -> Self {
        Self {
            approaching_used_fraction: Self::DEFAULT_USED_FRACTION,
            approaching_remaining_fraction: Self::DEFAULT_REMAINING_FRACTION,
            approaching_absolute_remaining: Self::DEFAULT_ABSOLUTE_REMAINING,
            cycle_mode: CycleMode::SinceBaseline,
        }
    }
}

// ==========================================
// IntervalPosition - 周期位置（中间计算结果）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalPosition {
    pub baseline: f64,
    pub completed_cycles: f64,
    pub next_due: f64,
    pub remaining: f64,
    pub used_fraction: f64,
}

// ==========================================
// IntervalStatusEngine - 保养周期状态引擎
// ==========================================
/// 保养周期状态引擎
///
/// 列表页、详情页、设备管理页统一依赖此引擎，不再各自推导阈值。
#[derive(Debug, Clone)]
pub struct IntervalStatusEngine {
    thresholds: IntervalThresholds,
    locale: String,
}

impl IntervalStatusEngine {
    /// 使用默认阈值与默认语言创建引擎
    pub fn new() -> Self {
        Self {
            thresholds: IntervalThresholds::default(),
            locale: i18n::DEFAULT_LOCALE.to_string(),
        }
    }

    /// 使用指定阈值创建引擎
    pub fn with_thresholds(thresholds: IntervalThresholds) -> Self {
        Self {
            thresholds,
            locale: i18n::DEFAULT_LOCALE.to_string(),
        }
    }

    /// 指定标签语言
    pub fn with_locale(mut self, locale: &str) -> Self {
        self.locale = i18n::normalize_locale(locale).to_string();
        self
    }

    pub fn thresholds(&self) -> &IntervalThresholds {
        &self.thresholds
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 评估单个保养计划
    ///
    /// # 参数
    /// - `current_usage`: 设备当前用量（≥ 0）
    /// - `schedule`: 保养计划
    /// - `unit`: 设备计量单位（仅用于标签）
    ///
    /// # 规则
    /// - 后端标注 overdue / approaching / warning → 直接采用；数值可算时仍计算用于排序
    /// - 周期 ≤ 0 或当前用量非法 → Unset（有后端标注时为后端状态，数值为空）
    /// - remaining < 0 → Overdue
    /// - 已用比例 ≥ 0.8 或 remaining ≤ 周期×0.2 或 remaining ≤ 24 → Approaching
    /// - 否则 → Normal
    pub fn evaluate_schedule(
        &self,
        current_usage: f64,
        schedule: &MaintenanceSchedule,
        unit: Option<MaintenanceUnit>,
    ) -> StatusResult {
        self.evaluate_with_usage(Some(current_usage), schedule, unit)
    }

    /// 评估单个保养计划（当前用量可能缺失）
    fn evaluate_with_usage(
        &self,
        current_usage: Option<f64>,
        schedule: &MaintenanceSchedule,
        unit: Option<MaintenanceUnit>,
    ) -> StatusResult {
        let server_state = schedule
            .status
            .as_deref()
            .and_then(MaintenanceState::from_server_annotation);

        let usage = current_usage.filter(|u| u.is_finite() && *u >= 0.0);
        let (usage, interval) = match (usage, schedule.effective_interval()) {
            (Some(usage), Some(interval)) => (usage, interval),
            _ => {
                return match server_state {
                    Some(state) => self.server_only_result(state),
                    None => self.unset_result(),
                }
            }
        };

        let position = self.compute_position(usage, schedule.baseline_usage(), interval);

        let (state, source) = match server_state {
            Some(state) => (state, StatusSource::Server),
            None => (self.classify(position.remaining, interval), StatusSource::Computed),
        };

        let overdue_by = if state == MaintenanceState::Overdue && position.remaining < 0.0 {
            Some(position.remaining.abs())
        } else {
            None
        };

        let label = self.build_label(state, position.remaining, overdue_by, unit);

        StatusResult {
            state,
            remaining: Some(position.remaining),
            overdue_by,
            next_due: Some(position.next_due),
            used_fraction: Some(position.used_fraction),
            source,
            label,
        }
    }

    /// 评估设备（汇总所有保养计划）
    ///
    /// # 规则
    /// - 未设置计量单位或缺少当前用量 → 只保留带后端标注的计划
    /// - 评估结果为 Unset 的计划忽略；全部忽略时 worst = None
    /// - 最紧急: 严重度 Overdue > Approaching > Normal，同级取 remaining 最小
    /// - any_open_ticket: 任一计划挂有工单
    pub fn evaluate_equipment(&self, equipment: &Equipment) -> EquipmentStatus {
        let current_usage = equipment
            .maintenance_unit
            .and(equipment.current_usage);

        let schedules: Vec<ScheduleEvaluation> = equipment
            .maintenance_schedules
            .iter()
            .enumerate()
            .filter_map(|(index, schedule)| {
                let result =
                    self.evaluate_with_usage(current_usage, schedule, equipment.maintenance_unit);
                if result.is_unset() {
                    return None;
                }
                Some(ScheduleEvaluation {
                    schedule_index: index,
                    schedule_id: schedule.id,
                    description: schedule.description.clone(),
                    interval_value: schedule.interval_value,
                    current_ticket_id: schedule.current_ticket_id,
                    status: result,
                })
            })
            .collect();

        let worst = schedules
            .iter()
            .min_by(|a, b| compare_urgency(&a.status, &b.status))
            .cloned();

        EquipmentStatus {
            equipment_id: equipment.id,
            code: equipment.code.clone(),
            name: equipment.name.clone(),
            unit: equipment.maintenance_unit,
            current_usage: equipment.current_usage,
            worst,
            schedules,
            any_open_ticket: equipment.has_open_ticket(),
        }
    }

    /// 批量评估设备
    #[instrument(skip(self, equipment), fields(count = equipment.len()))]
    pub fn evaluate_batch(&self, equipment: &[Equipment]) -> Vec<EquipmentStatus> {
        let results: Vec<EquipmentStatus> =
            equipment.iter().map(|e| self.evaluate_equipment(e)).collect();

        let unset = results.iter().filter(|r| r.worst.is_none()).count();
        tracing::debug!(evaluated = results.len(), unset, "设备保养状态评估完成");

        results
    }

    // ==========================================
    // 计算辅助方法
    // ==========================================

    /// 计算周期位置
    ///
    /// - usage_from_start = current_usage − baseline
    /// - usage_from_start < 0 → 尚未开始计数，下一到期点为 baseline + interval
    /// - SinceBaseline: completed_cycles = 0
    /// - Rolling: completed_cycles = floor(usage_from_start / interval)
    /// - next_due = baseline + (completed_cycles + 1) × interval
    pub fn compute_position(&self, current_usage: f64, baseline: f64, interval: f64) -> IntervalPosition {
        let usage_from_start = current_usage - baseline;

        let completed_cycles = match self.thresholds.cycle_mode {
            CycleMode::Rolling if usage_from_start >= 0.0 => (usage_from_start / interval).floor(),
            _ => 0.0,
        };

        let next_due = baseline + (completed_cycles + 1.0) * interval;
        let remaining = next_due - current_usage;
        let used_fraction = (interval - remaining) / interval;

        IntervalPosition {
            baseline,
            completed_cycles,
            next_due,
            remaining,
            used_fraction,
        }
    }

    /// 按剩余量分级（不考虑后端标注）
    pub fn classify(&self, remaining: f64, interval: f64) -> MaintenanceState {
        if remaining < 0.0 {
            return MaintenanceState::Overdue;
        }

        let t = &self.thresholds;
        let used_fraction = (interval - remaining) / interval;

        if used_fraction >= t.approaching_used_fraction
            || remaining <= interval * t.approaching_remaining_fraction
            || remaining <= t.approaching_absolute_remaining
        {
            MaintenanceState::Approaching
        } else {
            MaintenanceState::Normal
        }
    }

    fn unset_result(&self) -> StatusResult {
        StatusResult::unset(i18n::t_in(&self.locale, "status.unset"))
    }

    /// 只有后端标注、无法本地计算的结果
    fn server_only_result(&self, state: MaintenanceState) -> StatusResult {
        let label = match state {
            MaintenanceState::Overdue => i18n::t_in(&self.locale, "status.overdue_server"),
            _ => i18n::t_in(&self.locale, "status.approaching_server"),
        };
        StatusResult {
            state,
            remaining: None,
            overdue_by: None,
            next_due: None,
            used_fraction: None,
            source: StatusSource::Server,
            label,
        }
    }

    /// 生成状态标签
    fn build_label(
        &self,
        state: MaintenanceState,
        remaining: f64,
        overdue_by: Option<f64>,
        unit: Option<MaintenanceUnit>,
    ) -> String {
        let unit_text = unit
            .map(|u| i18n::t_in(&self.locale, u.i18n_key()))
            .unwrap_or_default();
        let remaining_text = format_quantity(remaining);

        match state {
            MaintenanceState::Overdue => match overdue_by {
                Some(v) => i18n::t_with_args_in(
                    &self.locale,
                    "status.overdue",
                    &[("overdue", &format_quantity(v)), ("unit", &unit_text)],
                ),
                None => i18n::t_in(&self.locale, "status.overdue_server"),
            },
            MaintenanceState::Approaching if remaining >= 0.0 => i18n::t_with_args_in(
                &self.locale,
                "status.approaching",
                &[("remaining", &remaining_text), ("unit", &unit_text)],
            ),
            MaintenanceState::Approaching => i18n::t_in(&self.locale, "status.approaching_server"),
            MaintenanceState::Normal => i18n::t_with_args_in(
                &self.locale,
                "status.normal",
                &[("remaining", &remaining_text), ("unit", &unit_text)],
            ),
            MaintenanceState::Unset => i18n::t_in(&self.locale, "status.unset"),
        }
    }
}

impl Default for IntervalStatusEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 紧急度比较
// ==========================================

/// 紧急度比较：Less 表示 a 更紧急
///
/// 严重度高者优先；同级时 remaining 小者优先；remaining 缺失排最后
pub fn compare_urgency(a: &StatusResult, b: &StatusResult) -> Ordering {
    b.state
        .severity()
        .cmp(&a.state.severity())
        .then_with(|| compare_remaining(a.remaining, b.remaining))
}

/// remaining 升序，None 排最后
pub(crate) fn compare_remaining(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
