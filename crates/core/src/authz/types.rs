//! Authorization domain types.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::workflow::types::TransactionStatus;

/// User role in the institution hierarchy.
///
/// The closed set replaces the scattered string checks of ad hoc
/// per-route authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Global administrator, unscoped.
    Admin,
    /// Administers a single institution.
    InstitutionAdmin,
    /// Heads a department within an institution.
    DepartmentHead,
    /// Manages one or more projects within an institution.
    ProjectManager,
    /// Read-only access.
    Viewer,
}

impl UserRole {
    /// Parses a role from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "institution_admin" => Some(Self::InstitutionAdmin),
            "department_head" => Some(Self::DepartmentHead),
            "project_manager" => Some(Self::ProjectManager),
            "viewer" => Some(Self::Viewer),
            _ => None,
        }
    }

    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::InstitutionAdmin => "institution_admin",
            Self::DepartmentHead => "department_head",
            Self::ProjectManager => "project_manager",
            Self::Viewer => "viewer",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An action an actor attempts against a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Read a single resource or a list.
    Read,
    /// Create a new resource.
    Create,
    /// Update non-lifecycle fields.
    Update,
    /// Delete the resource.
    Delete,
    /// Approve a pending transaction.
    Approve,
    /// Reject a pending transaction.
    Reject,
    /// Replace a department/project budget allocation.
    SetAllocation,
}

impl Action {
    /// Returns the string representation of the action.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::SetAllocation => "set_allocation",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The kind of resource an action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// A top-level institution.
    Institution,
    /// A department within an institution.
    Department,
    /// A project within an institution.
    Project,
    /// A transaction within an institution.
    Transaction,
}

impl ResourceKind {
    /// Returns the string representation of the resource kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Institution => "institution",
            Self::Department => "department",
            Self::Project => "project",
            Self::Transaction => "transaction",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The acting identity, built from validated JWT claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// The acting user's ID.
    pub user_id: Uuid,
    /// The acting user's role.
    pub role: UserRole,
    /// The actor's home institution (None only for `Admin`).
    pub institution: Option<Uuid>,
}

impl Actor {
    /// Creates a new actor.
    #[must_use]
    pub const fn new(user_id: Uuid, role: UserRole, institution: Option<Uuid>) -> Self {
        Self {
            user_id,
            role,
            institution,
        }
    }
}

/// Context describing the resource an action targets.
///
/// The caller builds this from fetched rows; the policy never touches
/// the store itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceCtx {
    /// Resource kind.
    pub kind: ResourceKind,
    /// Owning institution (None when creating a new institution).
    pub institution: Option<Uuid>,
    /// Whether the resource may be read from outside its institution.
    pub public_read: bool,
    /// Who created the resource (transactions).
    pub created_by: Option<Uuid>,
    /// The recorded head (department) or manager (project).
    pub steward: Option<Uuid>,
    /// Workflow state (transactions).
    pub status: Option<TransactionStatus>,
}

impl ResourceCtx {
    /// Context for an institution.
    #[must_use]
    pub const fn institution(id: Uuid, allow_public_viewing: bool) -> Self {
        Self {
            kind: ResourceKind::Institution,
            institution: Some(id),
            public_read: allow_public_viewing,
            created_by: None,
            steward: None,
            status: None,
        }
    }

    /// Context for a department.
    #[must_use]
    pub const fn department(
        institution: Uuid,
        head: Option<Uuid>,
        institution_public: bool,
    ) -> Self {
        Self {
            kind: ResourceKind::Department,
            institution: Some(institution),
            public_read: institution_public,
            created_by: None,
            steward: head,
            status: None,
        }
    }

    /// Context for a project. Public projects are readable from outside
    /// their institution even when the institution itself is not.
    #[must_use]
    pub const fn project(
        institution: Uuid,
        manager: Option<Uuid>,
        is_public: bool,
        institution_public: bool,
    ) -> Self {
        Self {
            kind: ResourceKind::Project,
            institution: Some(institution),
            public_read: is_public || institution_public,
            created_by: None,
            steward: manager,
            status: None,
        }
    }

    /// Context for a transaction.
    #[must_use]
    pub const fn transaction(
        institution: Uuid,
        created_by: Uuid,
        status: TransactionStatus,
        institution_public: bool,
    ) -> Self {
        Self {
            kind: ResourceKind::Transaction,
            institution: Some(institution),
            public_read: institution_public,
            created_by: Some(created_by),
            steward: None,
            status: Some(status),
        }
    }

    /// Context for creating a new institution. No institution owns it
    /// yet, so only the global admin passes.
    #[must_use]
    pub const fn create_institution() -> Self {
        Self {
            kind: ResourceKind::Institution,
            institution: None,
            public_read: false,
            created_by: None,
            steward: None,
            status: None,
        }
    }

    /// Context for creating a resource of `kind` under an institution.
    #[must_use]
    pub const fn new_resource(kind: ResourceKind, institution: Uuid) -> Self {
        Self {
            kind,
            institution: Some(institution),
            public_read: false,
            created_by: None,
            steward: None,
            status: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_roundtrip() {
        for role in [
            UserRole::Admin,
            UserRole::InstitutionAdmin,
            UserRole::DepartmentHead,
            UserRole::ProjectManager,
            UserRole::Viewer,
        ] {
            assert_eq!(UserRole::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert_eq!(UserRole::parse("superuser"), None);
        assert_eq!(UserRole::parse(""), None);
    }

    #[test]
    fn test_public_project_is_publicly_readable() {
        let inst = Uuid::new_v4();
        let ctx = ResourceCtx::project(inst, None, true, false);
        assert!(ctx.public_read);

        let ctx = ResourceCtx::project(inst, None, false, false);
        assert!(!ctx.public_read);
    }
}
