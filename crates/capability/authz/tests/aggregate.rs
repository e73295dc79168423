use async_trait::async_trait;
use domain::permissions::{PERM_ALL, PERM_DEFAULT, domain_permissions};
use domain::{Mask, TenantContext};
use std::sync::Arc;
use uadm_authz::{AdminError, DomainPermissionAggregator, RoleSource};
use uadm_storage::{InMemoryTenantStore, MembershipRecord, StorageError, TenantRecord, TenantStore};

fn aggregator(store: InMemoryTenantStore) -> DomainPermissionAggregator {
    DomainPermissionAggregator::new(Arc::new(store), 4)
}

#[tokio::test]
async fn resolves_custom_and_builtin_roles_per_tenant() {
    let store = InMemoryTenantStore::new();
    store
        .insert_tenant(TenantRecord::new("t-a", "A").with_role("admin", Mask::from(0b110)))
        .expect("tenant");
    store
        .insert_tenant(TenantRecord::new("t-b", "B"))
        .expect("tenant");
    store
        .add_membership("t-a", "u-1", "admin", true)
        .expect("membership");
    store
        .add_membership("t-b", "u-1", "guest", true)
        .expect("membership");

    let report = aggregator(store)
        .aggregate(&TenantContext::default(), "u-1")
        .await
        .expect("aggregate");
    assert_eq!(report.omitted, 0);
    assert_eq!(report.entries.len(), 2);

    let a = &report.entries[0];
    assert_eq!(a.tenant_name, "A");
    assert_eq!(a.role, "admin");
    assert_eq!(a.mask, Mask::from(0b110));
    assert_eq!(a.role_source, RoleSource::Tenant);
    assert_eq!(
        a.capabilities,
        vec!["Edit domain settings", "Show moderator badge"]
    );

    let b = &report.entries[1];
    assert_eq!(b.tenant_name, "B");
    assert_eq!(b.mask, Mask::from(0b001));
    assert_eq!(b.role_source, RoleSource::Builtin);
    assert_eq!(b.capabilities, vec!["View this domain"]);
}

#[tokio::test]
async fn entries_sorted_by_name_bytes() {
    let store = InMemoryTenantStore::new();
    for (id, name) in [("t-1", "Zeta"), ("t-2", "alpha"), ("t-3", "Beta")] {
        store
            .insert_tenant(TenantRecord::new(id, name))
            .expect("tenant");
        store
            .add_membership(id, "u-1", "guest", true)
            .expect("membership");
    }

    let report = aggregator(store)
        .aggregate(&TenantContext::default(), "u-1")
        .await
        .expect("aggregate");
    let names: Vec<&str> = report
        .entries
        .iter()
        .map(|entry| entry.tenant_name.as_str())
        .collect();
    assert_eq!(names, vec!["Beta", "Zeta", "alpha"]);
}

#[tokio::test]
async fn equal_names_ordered_by_tenant_id() {
    let store = InMemoryTenantStore::new();
    for id in ["t-9", "t-2", "t-5"] {
        store
            .insert_tenant(TenantRecord::new(id, "Same"))
            .expect("tenant");
        store
            .add_membership(id, "u-1", "", false)
            .expect("membership");
    }

    let report = DomainPermissionAggregator::new(Arc::new(store), 1)
        .aggregate(&TenantContext::default(), "u-1")
        .await
        .expect("aggregate");
    let ids: Vec<&str> = report
        .entries
        .iter()
        .map(|entry| entry.tenant_id.as_str())
        .collect();
    assert_eq!(ids, vec!["t-2", "t-5", "t-9"]);
    assert!(report.entries.iter().all(|entry| entry.role == "default"));
    assert!(report.entries.iter().all(|entry| !entry.joined));
}

#[tokio::test]
async fn missing_tenant_keeps_entry_with_id_as_name() {
    let store = InMemoryTenantStore::new();
    store
        .insert_tenant(TenantRecord::new("t-gone", "Gone").with_role("admin", Mask::from(0b110)))
        .expect("tenant");
    store
        .add_membership("t-gone", "u-1", "admin", true)
        .expect("membership");
    store
        .add_membership("t-void", "u-1", "root", true)
        .expect("membership");
    assert!(store.remove_tenant("t-gone").expect("remove"));

    let before = uadm_telemetry::metrics().snapshot().missing_tenants;
    let report = aggregator(store)
        .aggregate(&TenantContext::default(), "u-1")
        .await
        .expect("aggregate");
    assert_eq!(report.omitted, 0);
    assert_eq!(report.entries.len(), 2);
    assert!(report.entries.iter().all(|entry| entry.tenant_missing));

    // 自定义角色随租户消失，退化为 default
    let gone = &report.entries[0];
    assert_eq!(gone.tenant_name, "t-gone");
    assert_eq!(gone.role_source, RoleSource::BuiltinDefault);
    assert_eq!(gone.mask, domain_permissions().value(PERM_DEFAULT));

    let void = &report.entries[1];
    assert_eq!(void.tenant_name, "t-void");
    assert_eq!(void.mask, domain_permissions().value(PERM_ALL));
    assert!(void.capabilities.contains(&"View domain audit log"));

    let after = uadm_telemetry::metrics().snapshot().missing_tenants;
    assert!(after >= before + 2);
}

#[tokio::test]
async fn failing_tenant_is_omitted_and_counted() {
    let store = InMemoryTenantStore::new();
    for id in ["t-ok", "t-bad"] {
        store
            .insert_tenant(TenantRecord::new(id, id.to_uppercase()))
            .expect("tenant");
        store
            .add_membership(id, "u-1", "guest", true)
            .expect("membership");
    }
    store.fail_tenant("t-bad").expect("inject");

    let before = uadm_telemetry::metrics().snapshot().omitted_entries;
    let report = aggregator(store)
        .aggregate(&TenantContext::default(), "u-1")
        .await
        .expect("aggregate");
    assert_eq!(report.omitted, 1);
    assert_eq!(report.entries.len(), 1);
    assert_eq!(report.entries[0].tenant_id, "t-ok");
    let after = uadm_telemetry::metrics().snapshot().omitted_entries;
    assert!(after > before);
}

#[tokio::test]
async fn user_without_memberships_gets_empty_report() {
    let report = aggregator(InMemoryTenantStore::new())
        .aggregate(&TenantContext::default(), "nobody")
        .await
        .expect("aggregate");
    assert!(report.entries.is_empty());
    assert_eq!(report.omitted, 0);
}

#[test]
fn zero_concurrency_is_clamped() {
    let aggregator = DomainPermissionAggregator::new(Arc::new(InMemoryTenantStore::new()), 0);
    assert_eq!(aggregator.concurrency(), 1);
}

struct BrokenTenantStore;

#[async_trait]
impl TenantStore for BrokenTenantStore {
    async fn list_memberships_for_user(
        &self,
        _ctx: &TenantContext,
        _user_id: &str,
    ) -> Result<Vec<MembershipRecord>, StorageError> {
        Err(StorageError::new("connection reset"))
    }

    async fn find_tenant(
        &self,
        _ctx: &TenantContext,
        _tenant_id: &str,
    ) -> Result<Option<TenantRecord>, StorageError> {
        Ok(None)
    }
}

#[tokio::test]
async fn membership_listing_failure_fails_the_call() {
    let aggregator = DomainPermissionAggregator::new(Arc::new(BrokenTenantStore), 4);
    let err = aggregator
        .aggregate(&TenantContext::default(), "u-1")
        .await
        .expect_err("store failure");
    assert!(matches!(err, AdminError::Store(message) if message.contains("connection reset")));
}
