//! 租户内存存储实现
//!
//! 仅用于本地演示和测试。
//!
//! 功能：
//! - 租户记录与自定义角色
//! - 用户 ↔ 租户成员关系
//! - 指定租户查询失败（用于验证聚合的部分结果策略）

use crate::error::StorageError;
use crate::models::{MembershipRecord, TenantRecord};
use crate::traits::TenantStore;
use domain::TenantContext;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

/// 租户内存存储
pub struct InMemoryTenantStore {
    tenants: RwLock<HashMap<String, TenantRecord>>,
    memberships: RwLock<Vec<MembershipRecord>>,
    failing: RwLock<HashSet<String>>,
}

impl InMemoryTenantStore {
    pub fn new() -> Self {
        Self {
            tenants: RwLock::new(HashMap::new()),
            memberships: RwLock::new(Vec::new()),
            failing: RwLock::new(HashSet::new()),
        }
    }

    pub fn insert_tenant(&self, record: TenantRecord) -> Result<(), StorageError> {
        let mut map = self
            .tenants
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        map.insert(record.tenant_id.clone(), record);
        Ok(())
    }

    /// 删除租户记录，保留成员关系（模拟已删除的租户）。
    pub fn remove_tenant(&self, tenant_id: &str) -> Result<bool, StorageError> {
        let mut map = self
            .tenants
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(map.remove(tenant_id).is_some())
    }

    pub fn add_membership(
        &self,
        tenant_id: impl Into<String>,
        user_id: impl Into<String>,
        role: impl Into<String>,
        joined: bool,
    ) -> Result<(), StorageError> {
        let mut list = self
            .memberships
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        list.push(MembershipRecord {
            tenant_id: tenant_id.into(),
            user_id: user_id.into(),
            role: role.into(),
            joined,
        });
        Ok(())
    }

    /// 之后对该租户的 find_tenant 调用返回存储错误。
    pub fn fail_tenant(&self, tenant_id: impl Into<String>) -> Result<(), StorageError> {
        let mut set = self
            .failing
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        set.insert(tenant_id.into());
        Ok(())
    }
}

impl Default for InMemoryTenantStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl TenantStore for InMemoryTenantStore {
    async fn list_memberships_for_user(
        &self,
        _ctx: &TenantContext,
        user_id: &str,
    ) -> Result<Vec<MembershipRecord>, StorageError> {
        let list = self
            .memberships
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(list
            .iter()
            .filter(|membership| membership.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_tenant(
        &self,
        _ctx: &TenantContext,
        tenant_id: &str,
    ) -> Result<Option<TenantRecord>, StorageError> {
        let failing = self
            .failing
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        if failing.contains(tenant_id) {
            return Err(StorageError::new(format!("tenant lookup failed: {tenant_id}")));
        }
        drop(failing);
        let map = self
            .tenants
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(map.get(tenant_id).cloned())
    }
}
