// ==========================================
// 工厂设备维护管理系统 - 保养工作清单排序
// ==========================================
// 排序规则:
// 1. 已超期排最前（不论超期量大小）
// 2. 其余有状态的设备按 remaining 升序
// 3. 无状态（未配置）的设备排最后
// ==========================================

use crate::domain::equipment::EquipmentStatus;
use crate::domain::types::MaintenanceState;
use crate::engine::interval_status::compare_remaining;
use std::cmp::Ordering;

/// 工作清单比较器：Less 表示 a 排在前面
pub fn compare_status(a: &EquipmentStatus, b: &EquipmentStatus) -> Ordering {
    rank(a)
        .cmp(&rank(b))
        .then_with(|| compare_remaining(a.remaining(), b.remaining()))
}

/// 分组: 0 = 已超期, 1 = 其他有状态, 2 = 无状态
fn rank(status: &EquipmentStatus) -> u8 {
    match status.worst.as_ref().map(|w| w.status.state) {
        Some(MaintenanceState::Overdue) => 0,
        Some(_) => 1,
        None => 2,
    }
}

/// 原地排序（稳定排序，同等紧急度保持原顺序）
pub fn sort_worklist(items: &mut [EquipmentStatus]) {
    items.sort_by(compare_status);
}
