use domain::Mask;
use domain::permissions::{PERM_ALL, PERM_DEFAULT, PERM_VIEW, domain_permissions};
use std::collections::BTreeMap;
use uadm_authz::{RoleResolver, RoleSource};
use uadm_storage::TenantRecord;

fn tenant() -> TenantRecord {
    TenantRecord::new("t-a", "Alpha")
        .with_role("admin", Mask::from(0b110))
        .with_role("guest", Mask::from(0b1000))
}

#[test]
fn tenant_role_takes_precedence() {
    let resolver = RoleResolver::new();
    let tenant = tenant();
    let resolved = resolver.resolve(Some(&tenant), "admin");
    assert_eq!(resolved.mask, Mask::from(0b110));
    assert_eq!(resolved.source, RoleSource::Tenant);

    // 同名自定义角色覆盖内置角色
    let guest = resolver.resolve(Some(&tenant), "guest");
    assert_eq!(guest.mask, Mask::from(0b1000));
    assert_eq!(guest.source, RoleSource::Tenant);
}

#[test]
fn builtin_role_used_when_tenant_lacks_it() {
    let resolver = RoleResolver::new();
    let tenant = tenant();
    let resolved = resolver.resolve(Some(&tenant), "root");
    assert_eq!(resolved.mask, domain_permissions().value(PERM_ALL));
    assert_eq!(resolved.source, RoleSource::Builtin);

    let without_tenant = resolver.resolve(None, "guest");
    assert_eq!(without_tenant.mask, domain_permissions().value(PERM_VIEW));
    assert_eq!(without_tenant.mask, Mask::from(0b001));
}

#[test]
fn unknown_role_falls_back_to_default() {
    let resolver = RoleResolver::new();
    let tenant = tenant();
    let default_mask = domain_permissions().value(PERM_DEFAULT);
    for role in ["deleted-role", "Admin", "owner"] {
        let resolved = resolver.resolve(Some(&tenant), role);
        assert_eq!(resolved.mask, default_mask, "role {role}");
        assert_eq!(resolved.source, RoleSource::BuiltinDefault);
        assert_eq!(resolved.role, role);
    }
    assert_eq!(resolver.resolve_mask(None, "stale"), default_mask);
}

#[test]
fn empty_role_name_means_default() {
    let resolver = RoleResolver::new();
    let resolved = resolver.resolve(None, "  ");
    assert_eq!(resolved.role, "default");
    assert_eq!(resolved.source, RoleSource::Builtin);
    assert_eq!(resolved.mask, domain_permissions().value(PERM_DEFAULT));
}

#[test]
fn missing_default_yields_empty_mask() {
    let builtin: BTreeMap<&'static str, Mask> = BTreeMap::from([("guest", Mask::from(1))]);
    let resolver = RoleResolver::with_builtin(&builtin);
    let resolved = resolver.resolve(None, "member");
    assert!(resolved.mask.is_zero());
    assert_eq!(resolved.source, RoleSource::Empty);
    assert_eq!(resolver.resolve_mask(None, "guest"), Mask::from(1));
}

#[test]
fn role_source_labels_are_stable() {
    assert_eq!(RoleSource::Tenant.as_str(), "tenant");
    assert_eq!(RoleSource::Builtin.as_str(), "builtin");
    assert_eq!(RoleSource::BuiltinDefault.as_str(), "builtin-default");
    assert_eq!(RoleSource::Empty.as_str(), "empty");
}
