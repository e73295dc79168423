//! Postgres 租户存储实现

use crate::error::StorageError;
use crate::models::{MembershipRecord, TenantRecord};
use crate::traits::TenantStore;
use domain::{Mask, TenantContext};
use sqlx::{PgPool, Row};
use std::collections::BTreeMap;

pub struct PgTenantStore {
    pub pool: PgPool,
}

impl PgTenantStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl TenantStore for PgTenantStore {
    async fn list_memberships_for_user(
        &self,
        _ctx: &TenantContext,
        user_id: &str,
    ) -> Result<Vec<MembershipRecord>, StorageError> {
        let rows = sqlx::query(
            "select tenant_id, user_id, role, joined from tenant_users where user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            let role: Option<String> = row.try_get("role")?;
            items.push(MembershipRecord {
                tenant_id: row.try_get("tenant_id")?,
                user_id: row.try_get("user_id")?,
                role: role.unwrap_or_default(),
                joined: row.try_get("joined")?,
            });
        }
        Ok(items)
    }

    async fn find_tenant(
        &self,
        _ctx: &TenantContext,
        tenant_id: &str,
    ) -> Result<Option<TenantRecord>, StorageError> {
        let row = sqlx::query("select tenant_id, name from tenants where tenant_id = $1")
            .bind(tenant_id)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };

        let rows = sqlx::query("select role, permission from tenant_roles where tenant_id = $1")
            .bind(tenant_id)
            .fetch_all(&self.pool)
            .await?;
        let mut roles = BTreeMap::new();
        for role_row in rows {
            let role: String = role_row.try_get("role")?;
            let permission: String = role_row.try_get("permission")?;
            let mask: Mask = permission.parse()?;
            roles.insert(role, mask);
        }

        Ok(Some(TenantRecord {
            tenant_id: row.try_get("tenant_id")?,
            name: row.try_get("name")?,
            roles,
        }))
    }
}
