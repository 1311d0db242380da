//! Property-based tests for workflow transitions.

use proptest::prelude::*;
use uuid::Uuid;

use crate::workflow::service::WorkflowService;
use crate::workflow::types::TransactionStatus;

fn arb_status() -> impl Strategy<Value = TransactionStatus> {
    prop_oneof![
        Just(TransactionStatus::Pending),
        Just(TransactionStatus::Approved),
        Just(TransactionStatus::Rejected),
        Just(TransactionStatus::Completed),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Approve succeeds exactly when the status is pending.
    #[test]
    fn approve_only_from_pending(status in arb_status()) {
        let result = WorkflowService::approve(status, Uuid::new_v4());
        prop_assert_eq!(result.is_ok(), status == TransactionStatus::Pending);
        if let Ok(action) = result {
            prop_assert_eq!(action.new_status(), TransactionStatus::Approved);
        }
    }

    /// Reject succeeds exactly when the status is pending.
    #[test]
    fn reject_only_from_pending(status in arb_status()) {
        let result = WorkflowService::reject(status, Uuid::new_v4());
        prop_assert_eq!(result.is_ok(), status == TransactionStatus::Pending);
        if let Ok(action) = result {
            prop_assert_eq!(action.new_status(), TransactionStatus::Rejected);
        }
    }

    /// Editability and deletability agree and hold only for pending.
    #[test]
    fn pending_is_the_only_mutable_state(status in arb_status()) {
        let editable = WorkflowService::ensure_editable(status).is_ok();
        let deletable = WorkflowService::ensure_deletable(status).is_ok();
        prop_assert_eq!(editable, status == TransactionStatus::Pending);
        prop_assert_eq!(editable, deletable);
    }

    /// No transition escapes a terminal state.
    #[test]
    fn terminal_states_have_no_exits(to in arb_status()) {
        prop_assert!(!WorkflowService::is_valid_transition(TransactionStatus::Rejected, to));
        prop_assert!(!WorkflowService::is_valid_transition(TransactionStatus::Completed, to));
    }
}
