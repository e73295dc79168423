use domain::{Mask, TenantContext};
use uadm_storage::{InMemoryTenantStore, TenantRecord, TenantStore};

fn fixture() -> InMemoryTenantStore {
    let store = InMemoryTenantStore::new();
    store
        .insert_tenant(TenantRecord::new("t-a", "Alpha").with_role("admin", Mask::from(0b110)))
        .expect("tenant");
    store
        .add_membership("t-a", "u-1", "admin", true)
        .expect("membership");
    store
        .add_membership("t-b", "u-1", "guest", false)
        .expect("membership");
    store
        .add_membership("t-a", "u-2", "", true)
        .expect("membership");
    store
}

#[tokio::test]
async fn memberships_are_scoped_to_user() {
    let store = fixture();
    let ctx = TenantContext::default();
    let items = store
        .list_memberships_for_user(&ctx, "u-1")
        .await
        .expect("list");
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|item| item.user_id == "u-1"));
    assert!(items.iter().any(|item| item.tenant_id == "t-b" && !item.joined));
}

#[tokio::test]
async fn tenant_carries_custom_roles() {
    let store = fixture();
    let ctx = TenantContext::default();
    let tenant = store
        .find_tenant(&ctx, "t-a")
        .await
        .expect("query")
        .expect("tenant");
    assert_eq!(tenant.name, "Alpha");
    assert_eq!(tenant.roles.get("admin"), Some(&Mask::from(0b110)));
    assert!(store.find_tenant(&ctx, "t-b").await.expect("query").is_none());
}

#[tokio::test]
async fn failing_tenant_returns_error() {
    let store = fixture();
    store.fail_tenant("t-a").expect("inject");
    let ctx = TenantContext::default();
    let err = store.find_tenant(&ctx, "t-a").await.expect_err("failure");
    assert_eq!(err.to_string(), "tenant lookup failed: t-a");
}

#[tokio::test]
async fn removed_tenant_keeps_memberships() {
    let store = fixture();
    assert!(store.remove_tenant("t-a").expect("remove"));
    let ctx = TenantContext::default();
    let items = store
        .list_memberships_for_user(&ctx, "u-2")
        .await
        .expect("list");
    assert_eq!(items.len(), 1);
    assert!(store.find_tenant(&ctx, "t-a").await.expect("query").is_none());
}
