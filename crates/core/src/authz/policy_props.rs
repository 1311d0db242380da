//! Property-based tests for the authorization policy.

use proptest::prelude::*;
use uuid::Uuid;

use super::policy::can_act;
use super::types::{Action, Actor, ResourceCtx, ResourceKind, UserRole};
use crate::workflow::types::TransactionStatus;

fn arb_role() -> impl Strategy<Value = UserRole> {
    prop_oneof![
        Just(UserRole::Admin),
        Just(UserRole::InstitutionAdmin),
        Just(UserRole::DepartmentHead),
        Just(UserRole::ProjectManager),
        Just(UserRole::Viewer),
    ]
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        Just(Action::Read),
        Just(Action::Create),
        Just(Action::Update),
        Just(Action::Delete),
        Just(Action::Approve),
        Just(Action::Reject),
        Just(Action::SetAllocation),
    ]
}

fn arb_kind() -> impl Strategy<Value = ResourceKind> {
    prop_oneof![
        Just(ResourceKind::Institution),
        Just(ResourceKind::Department),
        Just(ResourceKind::Project),
        Just(ResourceKind::Transaction),
    ]
}

fn arb_status() -> impl Strategy<Value = TransactionStatus> {
    prop_oneof![
        Just(TransactionStatus::Pending),
        Just(TransactionStatus::Approved),
        Just(TransactionStatus::Rejected),
        Just(TransactionStatus::Completed),
    ]
}

fn arb_uuid() -> impl Strategy<Value = Uuid> {
    any::<u128>().prop_map(Uuid::from_u128)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Admin is never denied, regardless of resource or action.
    #[test]
    fn prop_admin_always_allowed(
        action in arb_action(),
        kind in arb_kind(),
        inst in arb_uuid(),
    ) {
        let admin = Actor::new(Uuid::new_v4(), UserRole::Admin, None);
        let ctx = ResourceCtx::new_resource(kind, inst);
        prop_assert!(can_act(&admin, action, &ctx));
    }

    /// A non-admin acting on a foreign institution is only ever allowed
    /// a read of a publicly viewable resource.
    #[test]
    fn prop_cross_institution_only_public_reads(
        role in arb_role(),
        action in arb_action(),
        kind in arb_kind(),
        public in any::<bool>(),
    ) {
        prop_assume!(role != UserRole::Admin);
        let home = Uuid::from_u128(1);
        let foreign = Uuid::from_u128(2);
        let actor = Actor::new(Uuid::new_v4(), role, Some(home));
        let ctx = ResourceCtx {
            kind,
            institution: Some(foreign),
            public_read: public,
            created_by: None,
            steward: None,
            status: None,
        };

        let allowed = can_act(&actor, action, &ctx);
        if allowed {
            prop_assert_eq!(action, Action::Read);
            prop_assert!(public);
        }
    }

    /// Viewers never mutate anything.
    #[test]
    fn prop_viewer_never_mutates(
        action in arb_action(),
        kind in arb_kind(),
        status in arb_status(),
    ) {
        prop_assume!(action != Action::Read);
        let inst = Uuid::from_u128(7);
        let viewer = Actor::new(Uuid::new_v4(), UserRole::Viewer, Some(inst));
        let ctx = ResourceCtx {
            kind,
            institution: Some(inst),
            public_read: true,
            created_by: Some(viewer.user_id),
            steward: Some(viewer.user_id),
            status: Some(status),
        };
        prop_assert!(!can_act(&viewer, action, &ctx));
    }

    /// Nobody except admin and institution_admin ever approves or rejects.
    #[test]
    fn prop_approval_restricted(
        role in arb_role(),
        status in arb_status(),
        approve in any::<bool>(),
    ) {
        prop_assume!(role != UserRole::Admin && role != UserRole::InstitutionAdmin);
        let inst = Uuid::from_u128(9);
        let actor = Actor::new(Uuid::new_v4(), role, Some(inst));
        let ctx = ResourceCtx::transaction(inst, actor.user_id, status, false);
        let action = if approve { Action::Approve } else { Action::Reject };
        prop_assert!(!can_act(&actor, action, &ctx));
    }

    /// The creator ownership override never extends past pending.
    #[test]
    fn prop_ownership_override_pending_only(
        role in arb_role(),
        status in arb_status(),
    ) {
        prop_assume!(matches!(
            role,
            UserRole::DepartmentHead | UserRole::ProjectManager
        ));
        prop_assume!(status != TransactionStatus::Pending);
        let inst = Uuid::from_u128(11);
        let actor = Actor::new(Uuid::new_v4(), role, Some(inst));
        let ctx = ResourceCtx::transaction(inst, actor.user_id, status, false);
        prop_assert!(!can_act(&actor, Action::Update, &ctx));
        prop_assert!(!can_act(&actor, Action::Delete, &ctx));
    }
}
