//! The table-driven authorization decision function.
//!
//! Evaluation order:
//! 1. `admin` is allowed everything, on any institution.
//! 2. Acting outside the home institution denies everything except reads
//!    of publicly viewable resources.
//! 3. Reads inside the home institution are allowed for every role.
//! 4. Mutations are matched against the grants table, with a contextual
//!    constraint (head-of-department, manager-of-project, creator of a
//!    still-pending transaction) where the table says so.
//! 5. Any non-admin may update/delete a transaction they created while it
//!    is still pending.
//!
//! Default deny: anything unmatched is refused.

use thiserror::Error;

use super::types::{Action, Actor, ResourceCtx, ResourceKind, UserRole};
use crate::workflow::types::TransactionStatus;

/// Errors produced by the authorization policy.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// The actor is not allowed to perform the action.
    #[error("role {role} may not {action} this {resource}")]
    Denied {
        /// The actor's role.
        role: UserRole,
        /// The attempted action.
        action: Action,
        /// The resource kind.
        resource: ResourceKind,
    },

    /// The actor belongs to a different institution.
    #[error("access denied to this institution")]
    WrongInstitution,
}

impl PolicyError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        403
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        "AUTHORIZATION_ERROR"
    }
}

/// Contextual condition attached to a grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Constraint {
    /// No condition beyond role and institution scope.
    None,
    /// Actor must be the recorded head/manager of the resource.
    IsSteward,
}

/// A single row of the policy table.
struct Grant {
    role: UserRole,
    action: Action,
    resource: ResourceKind,
    constraint: Constraint,
}

const fn grant(
    role: UserRole,
    action: Action,
    resource: ResourceKind,
    constraint: Constraint,
) -> Grant {
    Grant {
        role,
        action,
        resource,
        constraint,
    }
}

/// Role-specific allowances inside the actor's home institution.
/// `admin` is handled before the table and appears nowhere in it.
static GRANTS: &[Grant] = &[
    // institution_admin: full control over the institution's children,
    // approval authority, and its own institution's settings.
    grant(
        UserRole::InstitutionAdmin,
        Action::Update,
        ResourceKind::Institution,
        Constraint::None,
    ),
    grant(
        UserRole::InstitutionAdmin,
        Action::Create,
        ResourceKind::Department,
        Constraint::None,
    ),
    grant(
        UserRole::InstitutionAdmin,
        Action::Update,
        ResourceKind::Department,
        Constraint::None,
    ),
    grant(
        UserRole::InstitutionAdmin,
        Action::Delete,
        ResourceKind::Department,
        Constraint::None,
    ),
    grant(
        UserRole::InstitutionAdmin,
        Action::SetAllocation,
        ResourceKind::Department,
        Constraint::None,
    ),
    grant(
        UserRole::InstitutionAdmin,
        Action::Create,
        ResourceKind::Project,
        Constraint::None,
    ),
    grant(
        UserRole::InstitutionAdmin,
        Action::Update,
        ResourceKind::Project,
        Constraint::None,
    ),
    grant(
        UserRole::InstitutionAdmin,
        Action::Delete,
        ResourceKind::Project,
        Constraint::None,
    ),
    grant(
        UserRole::InstitutionAdmin,
        Action::SetAllocation,
        ResourceKind::Project,
        Constraint::None,
    ),
    grant(
        UserRole::InstitutionAdmin,
        Action::Create,
        ResourceKind::Transaction,
        Constraint::None,
    ),
    grant(
        UserRole::InstitutionAdmin,
        Action::Update,
        ResourceKind::Transaction,
        Constraint::None,
    ),
    grant(
        UserRole::InstitutionAdmin,
        Action::Delete,
        ResourceKind::Transaction,
        Constraint::None,
    ),
    grant(
        UserRole::InstitutionAdmin,
        Action::Approve,
        ResourceKind::Transaction,
        Constraint::None,
    ),
    grant(
        UserRole::InstitutionAdmin,
        Action::Reject,
        ResourceKind::Transaction,
        Constraint::None,
    ),
    // department_head: creates transactions and projects; manages the
    // department they head, including its allocation.
    grant(
        UserRole::DepartmentHead,
        Action::Create,
        ResourceKind::Transaction,
        Constraint::None,
    ),
    grant(
        UserRole::DepartmentHead,
        Action::Create,
        ResourceKind::Project,
        Constraint::None,
    ),
    grant(
        UserRole::DepartmentHead,
        Action::Update,
        ResourceKind::Department,
        Constraint::IsSteward,
    ),
    grant(
        UserRole::DepartmentHead,
        Action::Delete,
        ResourceKind::Department,
        Constraint::IsSteward,
    ),
    grant(
        UserRole::DepartmentHead,
        Action::SetAllocation,
        ResourceKind::Department,
        Constraint::IsSteward,
    ),
    // project_manager: updates the project they manage, budget included.
    grant(
        UserRole::ProjectManager,
        Action::Update,
        ResourceKind::Project,
        Constraint::IsSteward,
    ),
    grant(
        UserRole::ProjectManager,
        Action::SetAllocation,
        ResourceKind::Project,
        Constraint::IsSteward,
    ),
    // viewer: no mutations (reads are granted before the table).
];

/// Decides whether `actor` may perform `action` on the resource.
#[must_use]
pub fn can_act(actor: &Actor, action: Action, resource: &ResourceCtx) -> bool {
    // 1. Global admin.
    if actor.role == UserRole::Admin {
        return true;
    }

    // 2. Institution scoping. A non-admin with no home institution has no
    // scope at all; public resources stay readable either way.
    let in_home_institution = match (actor.institution, resource.institution) {
        (Some(home), Some(owner)) => home == owner,
        // Creating an institution, or an actor without a home.
        _ => false,
    };

    if !in_home_institution {
        return action == Action::Read && resource.public_read;
    }

    // 3. Reads inside the home institution.
    if action == Action::Read {
        return true;
    }

    // 4. Grants table.
    let granted = GRANTS
        .iter()
        .filter(|g| g.role == actor.role && g.action == action && g.resource == resource.kind)
        .any(|g| match g.constraint {
            Constraint::None => true,
            Constraint::IsSteward => resource.steward == Some(actor.user_id),
        });
    if granted {
        return true;
    }

    // 5. Ownership override: the creator of a still-pending transaction
    // may update or delete it.
    if resource.kind == ResourceKind::Transaction
        && matches!(action, Action::Update | Action::Delete)
        && resource.created_by == Some(actor.user_id)
        && resource.status == Some(TransactionStatus::Pending)
        && actor.role != UserRole::Viewer
    {
        return true;
    }

    false
}

/// Like [`can_act`] but returns a denial reason for the API boundary.
///
/// # Errors
///
/// Returns `PolicyError::WrongInstitution` when the actor is scoped to a
/// different institution, `PolicyError::Denied` otherwise.
pub fn authorize(actor: &Actor, action: Action, resource: &ResourceCtx) -> Result<(), PolicyError> {
    if can_act(actor, action, resource) {
        return Ok(());
    }

    let outside = actor.role != UserRole::Admin
        && match (actor.institution, resource.institution) {
            (Some(home), Some(owner)) => home != owner,
            _ => true,
        };

    if outside {
        Err(PolicyError::WrongInstitution)
    } else {
        Err(PolicyError::Denied {
            role: actor.role,
            action,
            resource: resource.kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn actor(role: UserRole, institution: Option<Uuid>) -> Actor {
        Actor::new(Uuid::new_v4(), role, institution)
    }

    #[test]
    fn test_admin_allowed_everywhere() {
        let inst = Uuid::new_v4();
        let admin = actor(UserRole::Admin, None);
        let ctx = ResourceCtx::institution(inst, false);

        for action in [
            Action::Read,
            Action::Create,
            Action::Update,
            Action::Delete,
        ] {
            assert!(can_act(&admin, action, &ctx));
        }
    }

    #[test]
    fn test_cross_institution_denied() {
        let inst_a = Uuid::new_v4();
        let inst_b = Uuid::new_v4();
        let ia = actor(UserRole::InstitutionAdmin, Some(inst_a));

        let private = ResourceCtx::institution(inst_b, false);
        assert!(!can_act(&ia, Action::Read, &private));
        assert!(!can_act(&ia, Action::Update, &private));

        let public = ResourceCtx::institution(inst_b, true);
        assert!(can_act(&ia, Action::Read, &public));
        assert!(!can_act(&ia, Action::Update, &public));
    }

    #[test]
    fn test_institution_admin_manages_children() {
        let inst = Uuid::new_v4();
        let ia = actor(UserRole::InstitutionAdmin, Some(inst));

        let dept = ResourceCtx::department(inst, None, false);
        assert!(can_act(&ia, Action::Create, &dept));
        assert!(can_act(&ia, Action::Update, &dept));
        assert!(can_act(&ia, Action::Delete, &dept));
        assert!(can_act(&ia, Action::SetAllocation, &dept));

        let txn = ResourceCtx::transaction(
            inst,
            Uuid::new_v4(),
            TransactionStatus::Pending,
            false,
        );
        assert!(can_act(&ia, Action::Approve, &txn));
        assert!(can_act(&ia, Action::Reject, &txn));
    }

    #[test]
    fn test_department_head_scoped_to_their_department() {
        let inst = Uuid::new_v4();
        let head = actor(UserRole::DepartmentHead, Some(inst));

        let own = ResourceCtx::department(inst, Some(head.user_id), false);
        assert!(can_act(&head, Action::Update, &own));
        assert!(can_act(&head, Action::Delete, &own));
        assert!(can_act(&head, Action::SetAllocation, &own));

        let other = ResourceCtx::department(inst, Some(Uuid::new_v4()), false);
        assert!(!can_act(&head, Action::Update, &other));
        assert!(can_act(&head, Action::Read, &other));

        let txn = ResourceCtx::new_resource(ResourceKind::Transaction, inst);
        assert!(can_act(&head, Action::Create, &txn));
        let proj = ResourceCtx::new_resource(ResourceKind::Project, inst);
        assert!(can_act(&head, Action::Create, &proj));
    }

    #[test]
    fn test_project_manager_updates_only_their_project() {
        let inst = Uuid::new_v4();
        let pm = actor(UserRole::ProjectManager, Some(inst));

        let own = ResourceCtx::project(inst, Some(pm.user_id), false, false);
        assert!(can_act(&pm, Action::Update, &own));
        assert!(can_act(&pm, Action::SetAllocation, &own));
        assert!(!can_act(&pm, Action::Delete, &own));

        let other = ResourceCtx::project(inst, Some(Uuid::new_v4()), false, false);
        assert!(!can_act(&pm, Action::Update, &other));
    }

    #[test]
    fn test_viewer_is_read_only_even_as_creator() {
        let inst = Uuid::new_v4();
        let viewer = actor(UserRole::Viewer, Some(inst));

        let own_txn = ResourceCtx::transaction(
            inst,
            viewer.user_id,
            TransactionStatus::Pending,
            false,
        );
        assert!(can_act(&viewer, Action::Read, &own_txn));
        assert!(!can_act(&viewer, Action::Update, &own_txn));
        assert!(!can_act(&viewer, Action::Delete, &own_txn));
    }

    #[test]
    fn test_creator_ownership_override_pending_only() {
        let inst = Uuid::new_v4();
        let head = actor(UserRole::DepartmentHead, Some(inst));

        let pending =
            ResourceCtx::transaction(inst, head.user_id, TransactionStatus::Pending, false);
        assert!(can_act(&head, Action::Update, &pending));
        assert!(can_act(&head, Action::Delete, &pending));

        let approved =
            ResourceCtx::transaction(inst, head.user_id, TransactionStatus::Approved, false);
        assert!(!can_act(&head, Action::Update, &approved));
        assert!(!can_act(&head, Action::Delete, &approved));

        let someone_elses =
            ResourceCtx::transaction(inst, Uuid::new_v4(), TransactionStatus::Pending, false);
        assert!(!can_act(&head, Action::Update, &someone_elses));
    }

    #[test]
    fn test_department_head_cannot_approve() {
        let inst = Uuid::new_v4();
        let head = actor(UserRole::DepartmentHead, Some(inst));
        let txn = ResourceCtx::transaction(
            inst,
            Uuid::new_v4(),
            TransactionStatus::Pending,
            false,
        );
        assert!(!can_act(&head, Action::Approve, &txn));
        assert!(!can_act(&head, Action::Reject, &txn));
    }

    #[test]
    fn test_public_project_readable_across_institutions() {
        let inst_a = Uuid::new_v4();
        let inst_b = Uuid::new_v4();
        let viewer = actor(UserRole::Viewer, Some(inst_a));

        let public_project = ResourceCtx::project(inst_b, None, true, false);
        assert!(can_act(&viewer, Action::Read, &public_project));
        assert!(!can_act(&viewer, Action::Update, &public_project));
    }

    #[test]
    fn test_authorize_distinguishes_wrong_institution() {
        let inst_a = Uuid::new_v4();
        let inst_b = Uuid::new_v4();
        let ia = actor(UserRole::InstitutionAdmin, Some(inst_a));

        let foreign = ResourceCtx::institution(inst_b, false);
        assert!(matches!(
            authorize(&ia, Action::Update, &foreign),
            Err(PolicyError::WrongInstitution)
        ));

        let viewer = actor(UserRole::Viewer, Some(inst_a));
        let home = ResourceCtx::institution(inst_a, false);
        assert!(matches!(
            authorize(&viewer, Action::Update, &home),
            Err(PolicyError::Denied { .. })
        ));
    }

    #[test]
    fn test_non_admin_without_home_institution_denied() {
        let rogue = actor(UserRole::InstitutionAdmin, None);
        let ctx = ResourceCtx::institution(Uuid::new_v4(), false);
        assert!(!can_act(&rogue, Action::Update, &ctx));
        assert!(!can_act(&rogue, Action::Read, &ctx));
    }
}
