//! Workflow domain types for the transaction lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Transaction status in the approval workflow.
///
/// Every transaction starts `pending`. The valid transitions are:
/// - Pending → Approved (approve)
/// - Pending → Rejected (reject)
/// - Approved → Completed (external settlement, not initiated here)
///
/// Approved and completed transactions are immutable; rejected ones are
/// frozen since no operation accepts them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Awaiting approval; the only editable state.
    Pending,
    /// Approved by an authorized actor (immutable).
    Approved,
    /// Rejected by an authorized actor (frozen).
    Rejected,
    /// Settled by an external process (immutable).
    Completed,
}

impl TransactionStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
        }
    }

    /// Parses a status from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Returns true if non-status fields may still be modified.
    #[must_use]
    pub const fn is_editable(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns true if the transaction may be deleted.
    #[must_use]
    pub const fn is_deletable(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transaction type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money out; debits the referenced department/project budgets.
    Expense,
    /// Money in.
    Income,
    /// Movement between internal buckets.
    Transfer,
    /// Correction entry.
    Adjustment,
}

impl TransactionType {
    /// Returns the string representation of the type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
            Self::Transfer => "transfer",
            Self::Adjustment => "adjustment",
        }
    }

    /// Parses a type from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "expense" => Some(Self::Expense),
            "income" => Some(Self::Income),
            "transfer" => Some(Self::Transfer),
            "adjustment" => Some(Self::Adjustment),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Recurrence schedule for recurring transactions (metadata only; no
/// scheduler runs in this system).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurringFrequency {
    /// Every day.
    Daily,
    /// Every week.
    Weekly,
    /// Every month.
    Monthly,
    /// Every quarter.
    Quarterly,
    /// Every year.
    Yearly,
}

impl RecurringFrequency {
    /// Returns the string representation of the frequency.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }
}

/// A validated state transition with its audit data.
#[derive(Debug, Clone)]
pub enum WorkflowAction {
    /// Approve a pending transaction.
    Approve {
        /// The resulting status (`Approved`).
        new_status: TransactionStatus,
        /// The approving user.
        approved_by: Uuid,
        /// When the approval happened.
        approved_at: DateTime<Utc>,
    },
    /// Reject a pending transaction.
    Reject {
        /// The resulting status (`Rejected`).
        new_status: TransactionStatus,
        /// The rejecting user (recorded in the same audit fields).
        approved_by: Uuid,
        /// When the rejection happened.
        approved_at: DateTime<Utc>,
    },
}

impl WorkflowAction {
    /// Returns the new status resulting from this action.
    #[must_use]
    pub const fn new_status(&self) -> TransactionStatus {
        match self {
            Self::Approve { new_status, .. } | Self::Reject { new_status, .. } => *new_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_roundtrip() {
        for status in [
            TransactionStatus::Pending,
            TransactionStatus::Approved,
            TransactionStatus::Rejected,
            TransactionStatus::Completed,
        ] {
            assert_eq!(TransactionStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TransactionStatus::parse("draft"), None);
    }

    #[test]
    fn test_only_pending_is_editable() {
        assert!(TransactionStatus::Pending.is_editable());
        assert!(!TransactionStatus::Approved.is_editable());
        assert!(!TransactionStatus::Rejected.is_editable());
        assert!(!TransactionStatus::Completed.is_editable());
    }

    #[test]
    fn test_only_pending_is_deletable() {
        assert!(TransactionStatus::Pending.is_deletable());
        assert!(!TransactionStatus::Approved.is_deletable());
        assert!(!TransactionStatus::Completed.is_deletable());
    }

    #[test]
    fn test_type_parse_roundtrip() {
        for ty in [
            TransactionType::Expense,
            TransactionType::Income,
            TransactionType::Transfer,
            TransactionType::Adjustment,
        ] {
            assert_eq!(TransactionType::parse(ty.as_str()), Some(ty));
        }
        assert_eq!(TransactionType::parse("refund"), None);
    }
}
