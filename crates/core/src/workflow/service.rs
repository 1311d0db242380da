//! Workflow state transitions and create validation.

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::workflow::error::WorkflowError;
use crate::workflow::types::{TransactionStatus, WorkflowAction};

/// The caller-supplied fields checked before a transaction is created.
#[derive(Debug, Clone)]
pub struct TransactionDraft<'a> {
    /// Transaction amount.
    pub amount: Decimal,
    /// Free-text category.
    pub category: &'a str,
    /// Free-text description.
    pub description: &'a str,
}

/// Stateless service for transaction workflow decisions.
///
/// The store layer re-checks the `pending` precondition with a
/// compare-and-set; these functions are the single source of which
/// transitions are legal.
pub struct WorkflowService;

impl WorkflowService {
    /// Validates the fields of a transaction about to be created.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Validation` naming the first field at fault.
    pub fn validate_draft(draft: &TransactionDraft<'_>) -> Result<(), WorkflowError> {
        if draft.amount < Decimal::ZERO {
            return Err(WorkflowError::Validation {
                field: "amount",
                message: "must be a non-negative number".into(),
            });
        }
        if draft.category.trim().len() < 2 {
            return Err(WorkflowError::Validation {
                field: "category",
                message: "must be at least 2 characters".into(),
            });
        }
        if draft.description.trim().len() < 5 {
            return Err(WorkflowError::Validation {
                field: "description",
                message: "must be at least 5 characters".into(),
            });
        }
        Ok(())
    }

    /// Checks that a referenced department/project belongs to the
    /// transaction's institution.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::CrossInstitution` on a mismatch.
    pub fn check_same_institution(
        resource: &'static str,
        transaction_institution: Uuid,
        referenced_institution: Uuid,
    ) -> Result<(), WorkflowError> {
        if transaction_institution == referenced_institution {
            Ok(())
        } else {
            Err(WorkflowError::CrossInstitution { resource })
        }
    }

    /// Approves a pending transaction.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::InvalidTransition` unless the current
    /// status is exactly `pending`.
    pub fn approve(
        current_status: TransactionStatus,
        approved_by: Uuid,
    ) -> Result<WorkflowAction, WorkflowError> {
        match current_status {
            TransactionStatus::Pending => Ok(WorkflowAction::Approve {
                new_status: TransactionStatus::Approved,
                approved_by,
                approved_at: Utc::now(),
            }),
            _ => Err(WorkflowError::InvalidTransition {
                from: current_status,
                to: TransactionStatus::Approved,
            }),
        }
    }

    /// Rejects a pending transaction.
    ///
    /// The budget debit applied at creation is not reversed; see the
    /// repository documentation for the rationale.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::InvalidTransition` unless the current
    /// status is exactly `pending`.
    pub fn reject(
        current_status: TransactionStatus,
        rejected_by: Uuid,
    ) -> Result<WorkflowAction, WorkflowError> {
        match current_status {
            TransactionStatus::Pending => Ok(WorkflowAction::Reject {
                new_status: TransactionStatus::Rejected,
                approved_by: rejected_by,
                approved_at: Utc::now(),
            }),
            _ => Err(WorkflowError::InvalidTransition {
                from: current_status,
                to: TransactionStatus::Rejected,
            }),
        }
    }

    /// Ensures non-status fields may still be modified.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::NotEditable` for any non-pending status.
    pub fn ensure_editable(current_status: TransactionStatus) -> Result<(), WorkflowError> {
        if current_status.is_editable() {
            Ok(())
        } else {
            Err(WorkflowError::NotEditable(current_status))
        }
    }

    /// Ensures the transaction may be deleted.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::NotDeletable` for any non-pending status.
    pub fn ensure_deletable(current_status: TransactionStatus) -> Result<(), WorkflowError> {
        if current_status.is_deletable() {
            Ok(())
        } else {
            Err(WorkflowError::NotDeletable(current_status))
        }
    }

    /// Check if a status transition is valid.
    ///
    /// Valid transitions:
    /// - Pending → Approved (approve)
    /// - Pending → Rejected (reject)
    /// - Approved → Completed (external settlement)
    #[must_use]
    pub fn is_valid_transition(from: TransactionStatus, to: TransactionStatus) -> bool {
        matches!(
            (from, to),
            (
                TransactionStatus::Pending,
                TransactionStatus::Approved | TransactionStatus::Rejected
            ) | (TransactionStatus::Approved, TransactionStatus::Completed)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn valid_draft() -> TransactionDraft<'static> {
        TransactionDraft {
            amount: dec!(100),
            category: "supplies",
            description: "printer paper for Q3",
        }
    }

    #[test]
    fn test_valid_draft_passes() {
        assert!(WorkflowService::validate_draft(&valid_draft()).is_ok());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let draft = TransactionDraft {
            amount: dec!(-1),
            ..valid_draft()
        };
        assert!(matches!(
            WorkflowService::validate_draft(&draft),
            Err(WorkflowError::Validation { field: "amount", .. })
        ));
    }

    #[test]
    fn test_short_category_rejected() {
        let draft = TransactionDraft {
            category: " x ",
            ..valid_draft()
        };
        assert!(matches!(
            WorkflowService::validate_draft(&draft),
            Err(WorkflowError::Validation {
                field: "category",
                ..
            })
        ));
    }

    #[test]
    fn test_short_description_rejected() {
        let draft = TransactionDraft {
            description: "abc",
            ..valid_draft()
        };
        assert!(matches!(
            WorkflowService::validate_draft(&draft),
            Err(WorkflowError::Validation {
                field: "description",
                ..
            })
        ));
    }

    #[test]
    fn test_cross_institution_reference() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert!(WorkflowService::check_same_institution("department", a, a).is_ok());
        assert!(matches!(
            WorkflowService::check_same_institution("department", a, b),
            Err(WorkflowError::CrossInstitution {
                resource: "department"
            })
        ));
    }

    #[test]
    fn test_approve_from_pending() {
        let approver = Uuid::new_v4();
        let action = WorkflowService::approve(TransactionStatus::Pending, approver).unwrap();
        assert_eq!(action.new_status(), TransactionStatus::Approved);
        if let WorkflowAction::Approve { approved_by, .. } = action {
            assert_eq!(approved_by, approver);
        } else {
            panic!("expected Approve action");
        }
    }

    #[test]
    fn test_approve_from_non_pending_fails() {
        for status in [
            TransactionStatus::Approved,
            TransactionStatus::Rejected,
            TransactionStatus::Completed,
        ] {
            assert!(matches!(
                WorkflowService::approve(status, Uuid::new_v4()),
                Err(WorkflowError::InvalidTransition { .. })
            ));
        }
    }

    #[test]
    fn test_reject_from_pending() {
        let action =
            WorkflowService::reject(TransactionStatus::Pending, Uuid::new_v4()).unwrap();
        assert_eq!(action.new_status(), TransactionStatus::Rejected);
    }

    #[test]
    fn test_reject_from_non_pending_fails() {
        for status in [
            TransactionStatus::Approved,
            TransactionStatus::Rejected,
            TransactionStatus::Completed,
        ] {
            assert!(matches!(
                WorkflowService::reject(status, Uuid::new_v4()),
                Err(WorkflowError::InvalidTransition { .. })
            ));
        }
    }

    #[test]
    fn test_editability_gates() {
        assert!(WorkflowService::ensure_editable(TransactionStatus::Pending).is_ok());
        assert!(matches!(
            WorkflowService::ensure_editable(TransactionStatus::Approved),
            Err(WorkflowError::NotEditable(TransactionStatus::Approved))
        ));
        assert!(matches!(
            WorkflowService::ensure_deletable(TransactionStatus::Completed),
            Err(WorkflowError::NotDeletable(TransactionStatus::Completed))
        ));
    }

    #[test]
    fn test_valid_transitions() {
        use TransactionStatus::{Approved, Completed, Pending, Rejected};
        assert!(WorkflowService::is_valid_transition(Pending, Approved));
        assert!(WorkflowService::is_valid_transition(Pending, Rejected));
        assert!(WorkflowService::is_valid_transition(Approved, Completed));
        assert!(!WorkflowService::is_valid_transition(Rejected, Approved));
        assert!(!WorkflowService::is_valid_transition(Completed, Pending));
        assert!(!WorkflowService::is_valid_transition(Approved, Rejected));
    }
}
