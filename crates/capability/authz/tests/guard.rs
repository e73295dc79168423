use domain::permissions::{
    PRIV_ALL, PRIV_CREATE_DOMAIN, PRIV_EDIT_SYSTEM, PRIV_NEVER, PRIV_SET_PERM, PRIV_USER_PROFILE,
    system_privileges,
};
use domain::{Mask, PermissionBit, PermissionCatalog, TenantContext};
use uadm_authz::{DenyReason, PrivilegeGuard};
use uadm_storage::UserRecord;

fn priv_value(key: &str) -> Mask {
    system_privileges().value(key)
}

fn actor(privilege: Mask) -> TenantContext {
    TenantContext::new("system", "actor", privilege)
}

fn target(privilege: Mask) -> UserRecord {
    UserRecord::new("u-2", "target", "target@example.com", privilege)
}

fn operator_mask() -> Mask {
    &priv_value(PRIV_SET_PERM) | &priv_value(PRIV_EDIT_SYSTEM)
}

#[test]
fn super_admin_may_demote_super_admin() {
    let guard = PrivilegeGuard::new();
    let root = actor(priv_value(PRIV_ALL));
    let victim = target(priv_value(PRIV_ALL));
    let requested = vec![priv_value(PRIV_USER_PROFILE)];

    let persisted = guard
        .authorize_system_privilege_change(&root, &victim, &requested)
        .expect("allowed");
    assert_eq!(persisted, priv_value(PRIV_USER_PROFILE));
}

#[test]
fn operator_cannot_touch_super_admin() {
    let guard = PrivilegeGuard::new();
    let operator = actor(operator_mask());
    let victim = target(priv_value(PRIV_ALL));

    let err = guard
        .authorize_system_privilege_change(&operator, &victim, &[priv_value(PRIV_USER_PROFILE)])
        .expect_err("denied");
    assert_eq!(err, DenyReason::DemoteSuperAdmin);
    assert_eq!(err.code(), "PRIV.DEMOTE_SUPER_ADMIN");
}

#[test]
fn operator_cannot_grant_all() {
    let guard = PrivilegeGuard::new();
    let operator = actor(operator_mask());
    let user = target(priv_value(PRIV_USER_PROFILE));

    let err = guard
        .authorize_system_privilege_change(&operator, &user, &[priv_value(PRIV_ALL)])
        .expect_err("denied");
    assert_eq!(err, DenyReason::GrantSuperAdmin);
}

#[test]
fn super_admin_grant_keeps_all() {
    let guard = PrivilegeGuard::new();
    let root = actor(priv_value(PRIV_ALL));
    let user = target(Mask::zero());

    let persisted = guard
        .authorize_system_privilege_change(
            &root,
            &user,
            &[priv_value(PRIV_ALL), priv_value(PRIV_USER_PROFILE)],
        )
        .expect("allowed");
    assert!(system_privileges().holds_all(&persisted));
}

#[test]
fn ordinary_change_is_normalized() {
    let guard = PrivilegeGuard::new();
    let operator = actor(operator_mask());
    let user = target(priv_value(PRIV_USER_PROFILE));
    let requested = vec![
        priv_value(PRIV_USER_PROFILE),
        priv_value(PRIV_CREATE_DOMAIN),
        priv_value(PRIV_NEVER),
        Mask::from(0b11),
        Mask::bit(100),
    ];

    let persisted = guard
        .authorize_system_privilege_change(&operator, &user, &requested)
        .expect("allowed");
    assert_eq!(
        persisted,
        &priv_value(PRIV_USER_PROFILE) | &priv_value(PRIV_CREATE_DOMAIN)
    );
}

#[test]
fn change_allowed_whenever_all_is_not_involved() {
    let guard = PrivilegeGuard::new();
    let editable: Vec<Mask> = system_privileges()
        .editable_bits()
        .into_iter()
        .map(|entry| entry.value.clone())
        .collect();
    let actors = [Mask::zero(), operator_mask(), priv_value(PRIV_USER_PROFILE)];
    for actor_mask in actors {
        for (index, value) in editable.iter().enumerate() {
            let operator = actor(actor_mask.clone());
            let user = target(value.clone());
            let requested = &editable[..=index];
            let persisted = guard
                .authorize_system_privilege_change(&operator, &user, requested)
                .expect("allowed");
            assert_eq!(persisted, requested.iter().cloned().collect::<Mask>());
        }
    }
}

#[test]
fn ban_denied_for_super_admin_regardless_of_actor() {
    let guard = PrivilegeGuard::new();
    let victim = target(priv_value(PRIV_ALL));
    for actor_mask in [priv_value(PRIV_ALL), operator_mask(), Mask::zero()] {
        let err = guard
            .authorize_ban(&actor(actor_mask), &victim)
            .expect_err("denied");
        assert_eq!(err, DenyReason::BanSuperAdmin);
    }
    // 超出 PRIV_ALL 的额外位不影响判定
    let wider = target(&priv_value(PRIV_ALL) | &Mask::bit(200));
    assert!(guard.authorize_ban(&actor(priv_value(PRIV_ALL)), &wider).is_err());
}

#[test]
fn ban_allowed_for_ordinary_user() {
    let guard = PrivilegeGuard::new();
    let user = target(operator_mask());
    assert!(guard.authorize_ban(&actor(operator_mask()), &user).is_ok());
}

#[test]
fn credential_reset_follows_ban_rule() {
    let guard = PrivilegeGuard::new();
    let victim = target(priv_value(PRIV_ALL));
    let err = guard
        .authorize_credential_reset(&actor(priv_value(PRIV_ALL)), &victim)
        .expect_err("denied");
    assert_eq!(err, DenyReason::ResetSuperAdmin);
    assert_eq!(err.to_string(), "cannot reset a super admin's password");

    let user = target(priv_value(PRIV_USER_PROFILE));
    assert!(guard.authorize_credential_reset(&actor(Mask::zero()), &user).is_ok());
}

#[test]
fn custom_catalog_defines_super_admin() {
    let catalog = PermissionCatalog::new(
        "tiny",
        vec![
            PermissionBit::reserved("ALL", Mask::low_bits(3), "Everything"),
            PermissionBit::new("A", Mask::bit(0), "A"),
            PermissionBit::new("B", Mask::bit(1), "B"),
            PermissionBit::new("C", Mask::bit(2), "C"),
        ],
        "ALL",
    )
    .expect("catalog");
    let guard = PrivilegeGuard::with_catalog(&catalog);
    let operator = actor(Mask::bit(0));
    let user = target(Mask::zero());

    // 逐位凑齐全部位等同于请求 ALL
    let requested = [Mask::bit(0), Mask::bit(1), Mask::bit(2)];
    let err = guard
        .authorize_system_privilege_change(&operator, &user, &requested)
        .expect_err("denied");
    assert_eq!(err, DenyReason::GrantSuperAdmin);

    let persisted = guard
        .authorize_system_privilege_change(&operator, &user, &requested[..2])
        .expect("allowed");
    assert_eq!(persisted, Mask::from(0b11));
}

#[test]
fn identity_change_of_super_admin_needs_super_admin() {
    let guard = PrivilegeGuard::new();
    let victim = target(priv_value(PRIV_ALL));
    let err = guard
        .authorize_identity_change(&actor(operator_mask()), &victim)
        .expect_err("denied");
    assert_eq!(err, DenyReason::EditSuperAdmin);
    assert_eq!(err.code(), "PRIV.EDIT_SUPER_ADMIN");

    assert!(guard
        .authorize_identity_change(&actor(priv_value(PRIV_ALL)), &victim)
        .is_ok());
    let user = target(priv_value(PRIV_USER_PROFILE));
    assert!(guard.authorize_identity_change(&actor(Mask::zero()), &user).is_ok());
}
