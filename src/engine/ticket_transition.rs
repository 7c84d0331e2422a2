// ==========================================
// 工厂设备维护管理系统 - 工单状态流转规则
// ==========================================
// 状态机:
//   pending     → in_progress | on_hold | cancelled
//   in_progress → completed | on_hold | cancelled
//   on_hold     → in_progress | cancelled
//   completed   → reopened
//   cancelled   → reopened
//   reopened    → in_progress | on_hold | cancelled
// 说明: 仅用于前端展示可用操作；实际流转与副作用由后端执行
// ==========================================

use crate::domain::ticket::{TicketAction, TicketStatus};
use crate::i18n;
use std::fmt;
use thiserror::Error;

/// 工单状态流转错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TicketTransitionError {
    #[error("{}", invalid_transition_message(.from, .action))]
    InvalidTransition {
        from: TicketStatus,
        action: TicketAction,
    },
}

/// 状态流转失败提示（默认语言）
pub fn invalid_transition_message(from: &impl fmt::Display, action: &impl fmt::Display) -> String {
    i18n::t_with_args_in(
        i18n::DEFAULT_LOCALE,
        "ticket.invalid_transition",
        &[("from", &from.to_string()), ("action", &action.to_string())],
    )
}

/// 当前状态下可执行的操作（按钮顺序）
pub fn available_actions(status: TicketStatus) -> &'static [TicketAction] {
    match status {
        TicketStatus::Pending => &[TicketAction::Start, TicketAction::Hold, TicketAction::Cancel],
        TicketStatus::InProgress => &[
            TicketAction::Complete,
            TicketAction::Hold,
            TicketAction::Cancel,
        ],
        TicketStatus::OnHold => &[TicketAction::Resume, TicketAction::Cancel],
        TicketStatus::Completed | TicketStatus::Cancelled => &[TicketAction::Reopen],
        TicketStatus::Reopened => &[TicketAction::Start, TicketAction::Hold, TicketAction::Cancel],
    }
}

/// 判断操作是否允许
pub fn can_apply(status: TicketStatus, action: TicketAction) -> bool {
    available_actions(status).contains(&action)
}

/// 执行操作，返回目标状态
pub fn apply(status: TicketStatus, action: TicketAction) -> Result<TicketStatus, TicketTransitionError> {
    if can_apply(status, action) {
        Ok(action.target())
    } else {
        Err(TicketTransitionError::InvalidTransition {
            from: status,
            action,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let s = apply(TicketStatus::Pending, TicketAction::Start).unwrap();
        assert_eq!(s, TicketStatus::InProgress);
        let s = apply(s, TicketAction::Complete).unwrap();
        assert_eq!(s, TicketStatus::Completed);
        let s = apply(s, TicketAction::Reopen).unwrap();
        assert_eq!(s, TicketStatus::Reopened);
        let s = apply(s, TicketAction::Start).unwrap();
        assert_eq!(s, TicketStatus::InProgress);
    }

    #[test]
    fn test_hold_and_resume() {
        let s = apply(TicketStatus::InProgress, TicketAction::Hold).unwrap();
        assert_eq!(s, TicketStatus::OnHold);
        let s = apply(s, TicketAction::Resume).unwrap();
        assert_eq!(s, TicketStatus::InProgress);
    }

    #[test]
    fn test_invalid_transitions() {
        // 待处理不能直接完成
        let err = apply(TicketStatus::Pending, TicketAction::Complete).unwrap_err();
        assert_eq!(
            err,
            TicketTransitionError::InvalidTransition {
                from: TicketStatus::Pending,
                action: TicketAction::Complete,
            }
        );
        assert_eq!(err.to_string(), "工单状态 pending 不允许执行操作 complete");

        assert!(apply(TicketStatus::Completed, TicketAction::Cancel).is_err());
        assert!(apply(TicketStatus::Cancelled, TicketAction::Start).is_err());
        assert!(apply(TicketStatus::OnHold, TicketAction::Complete).is_err());
    }

    #[test]
    fn test_closed_states_only_reopen() {
        assert_eq!(available_actions(TicketStatus::Completed), &[TicketAction::Reopen]);
        assert_eq!(available_actions(TicketStatus::Cancelled), &[TicketAction::Reopen]);
    }
}
