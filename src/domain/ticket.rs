// ==========================================
// 工厂设备维护管理系统 - 维修工单状态
// ==========================================
// 待处理 → 处理中 → 已完成/挂起/已取消 → 重新打开
// 实际状态变更及其副作用（扣减库存、生成通知）由后端完成
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 工单状态 (Ticket Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Pending,    // 待处理
    InProgress, // 处理中
    Completed,  // 已完成
    OnHold,     // 挂起
    Cancelled,  // 已取消
    Reopened,   // 重新打开
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_api_str())
    }
}

impl TicketStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "pending" => Some(TicketStatus::Pending),
            "in_progress" | "inprogress" => Some(TicketStatus::InProgress),
            "completed" => Some(TicketStatus::Completed),
            "on_hold" | "onhold" => Some(TicketStatus::OnHold),
            "cancelled" | "canceled" => Some(TicketStatus::Cancelled),
            "reopened" => Some(TicketStatus::Reopened),
            _ => None,
        }
    }

    pub fn to_api_str(&self) -> &'static str {
        match self {
            TicketStatus::Pending => "pending",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Completed => "completed",
            TicketStatus::OnHold => "on_hold",
            TicketStatus::Cancelled => "cancelled",
            TicketStatus::Reopened => "reopened",
        }
    }

    /// 是否为终态（只能重新打开）
    pub fn is_closed(&self) -> bool {
        matches!(self, TicketStatus::Completed | TicketStatus::Cancelled)
    }
}

// ==========================================
// 工单操作 (Ticket Action)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketAction {
    Start,    // 开始处理
    Complete, // 完成
    Hold,     // 挂起
    Resume,   // 恢复处理
    Cancel,   // 取消
    Reopen,   // 重新打开
}

impl fmt::Display for TicketAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_api_str())
    }
}

impl TicketAction {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "start" => Some(TicketAction::Start),
            "complete" => Some(TicketAction::Complete),
            "hold" => Some(TicketAction::Hold),
            "resume" => Some(TicketAction::Resume),
            "cancel" => Some(TicketAction::Cancel),
            "reopen" => Some(TicketAction::Reopen),
            _ => None,
        }
    }

    pub fn to_api_str(&self) -> &'static str {
        match self {
            TicketAction::Start => "start",
            TicketAction::Complete => "complete",
            TicketAction::Hold => "hold",
            TicketAction::Resume => "resume",
            TicketAction::Cancel => "cancel",
            TicketAction::Reopen => "reopen",
        }
    }

    /// 操作的目标状态
    pub fn target(&self) -> TicketStatus {
        match self {
            TicketAction::Start | TicketAction::Resume => TicketStatus::InProgress,
            TicketAction::Complete => TicketStatus::Completed,
            TicketAction::Hold => TicketStatus::OnHold,
            TicketAction::Cancel => TicketStatus::Cancelled,
            TicketAction::Reopen => TicketStatus::Reopened,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_status_parse() {
        assert_eq!(TicketStatus::parse("in-progress"), Some(TicketStatus::InProgress));
        assert_eq!(TicketStatus::parse("ON_HOLD"), Some(TicketStatus::OnHold));
        assert_eq!(TicketStatus::parse("canceled"), Some(TicketStatus::Cancelled));
        assert_eq!(TicketStatus::parse("archived"), None);
    }

    #[test]
    fn test_ticket_status_serde() {
        let json = serde_json::to_string(&TicketStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }

    #[test]
    fn test_action_target() {
        assert_eq!(TicketAction::Start.target(), TicketStatus::InProgress);
        assert_eq!(TicketAction::Resume.target(), TicketStatus::InProgress);
        assert_eq!(TicketAction::Reopen.target(), TicketStatus::Reopened);
        assert!(TicketStatus::Completed.is_closed());
        assert!(!TicketStatus::OnHold.is_closed());
    }
}
