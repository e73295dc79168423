//! 跨域权限聚合：列出用户所有成员关系，逐域解析权限并格式化。
//!
//! 每个成员关系一条分支，有界并发扇出后汇总排序。
//! 单个租户查询失败只丢弃该条目（计入 `omitted`），不影响其他域。

use crate::error::AdminError;
use crate::role::{RoleResolver, RoleSource};
use domain::permissions::domain_permissions;
use domain::{Mask, PermissionCatalog, TenantContext};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uadm_storage::{MembershipRecord, TenantStore};
use uadm_telemetry::{record_aggregation, record_missing_tenant, record_omitted_entry};

/// 默认并发上限。
pub const DEFAULT_AGGREGATE_CONCURRENCY: usize = 8;

/// 单个域的权限视图。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainPermissionEntry {
    pub tenant_id: String,
    /// 租户显示名；租户已不存在时为租户 ID。
    pub tenant_name: String,
    pub role: String,
    pub joined: bool,
    pub mask: Mask,
    /// 掩码完整包含的权限描述（目录声明顺序）。
    pub capabilities: Vec<&'static str>,
    pub tenant_missing: bool,
    pub role_source: RoleSource,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateReport {
    pub entries: Vec<DomainPermissionEntry>,
    /// 因租户查询失败而丢弃的条目数。
    pub omitted: usize,
}

pub struct DomainPermissionAggregator {
    tenants: Arc<dyn TenantStore>,
    resolver: RoleResolver<'static>,
    catalog: &'static PermissionCatalog,
    concurrency: usize,
}

impl DomainPermissionAggregator {
    pub fn new(tenants: Arc<dyn TenantStore>, concurrency: usize) -> Self {
        Self {
            tenants,
            resolver: RoleResolver::new(),
            catalog: domain_permissions(),
            concurrency: concurrency.max(1),
        }
    }

    pub fn with_resolver(mut self, resolver: RoleResolver<'static>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub async fn aggregate(
        &self,
        ctx: &TenantContext,
        user_id: &str,
    ) -> Result<AggregateReport, AdminError> {
        let memberships = self.tenants.list_memberships_for_user(ctx, user_id).await?;
        let total = memberships.len();

        let outcomes: Vec<Option<DomainPermissionEntry>> = stream::iter(memberships)
            .map(|membership| self.resolve_membership(ctx, membership))
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let omitted = outcomes.iter().filter(|outcome| outcome.is_none()).count();
        let mut entries: Vec<DomainPermissionEntry> = outcomes.into_iter().flatten().collect();
        sort_entries(&mut entries);

        record_aggregation(entries.len() as u64);
        info!(
            target: "uadm.authz",
            user_id = %user_id,
            memberships = total,
            entries = entries.len(),
            omitted = omitted,
            "domain_permissions_aggregated"
        );
        Ok(AggregateReport { entries, omitted })
    }

    async fn resolve_membership(
        &self,
        ctx: &TenantContext,
        membership: MembershipRecord,
    ) -> Option<DomainPermissionEntry> {
        let tenant = match self.tenants.find_tenant(ctx, &membership.tenant_id).await {
            Ok(tenant) => tenant,
            Err(err) => {
                warn!(
                    target: "uadm.authz",
                    user_id = %membership.user_id,
                    tenant_id = %membership.tenant_id,
                    error = %err,
                    "tenant_lookup_failed"
                );
                record_omitted_entry();
                return None;
            }
        };

        let tenant_missing = tenant.is_none();
        if tenant_missing {
            debug!(
                target: "uadm.authz",
                tenant_id = %membership.tenant_id,
                "tenant_missing"
            );
            record_missing_tenant();
        }

        // 租户不存在时只按内置角色解析。
        let resolved = self.resolver.resolve(tenant.as_ref(), &membership.role);
        let capabilities = self.catalog.decode(&resolved.mask);
        let tenant_name = tenant
            .map(|record| record.name)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| membership.tenant_id.clone());

        Some(DomainPermissionEntry {
            tenant_id: membership.tenant_id,
            tenant_name,
            role: resolved.role,
            joined: membership.joined,
            mask: resolved.mask,
            capabilities,
            tenant_missing,
            role_source: resolved.source,
        })
    }
}

/// 按显示名字节序升序，同名按租户 ID。
pub fn sort_entries(entries: &mut [DomainPermissionEntry]) {
    entries.sort_by(|a, b| {
        a.tenant_name
            .cmp(&b.tenant_name)
            .then_with(|| a.tenant_id.cmp(&b.tenant_id))
    });
}
