//! 特权守卫：修改系统特权、封禁、重置凭据前的纯判定。
//!
//! 判定只读取调用方已取回的记录，不做 I/O、无副作用。
//! 采用最严格的优先级：目标持有或请求涉及 PRIV_ALL 时，操作者必须同样持有。

use crate::error::DenyReason;
use domain::permissions::system_privileges;
use domain::{Mask, PermissionCatalog, PrivilegeHolder};

#[derive(Debug, Clone, Copy)]
pub struct PrivilegeGuard<'c> {
    catalog: &'c PermissionCatalog,
}

impl PrivilegeGuard<'static> {
    /// 使用进程级系统特权目录。
    pub fn new() -> Self {
        Self {
            catalog: system_privileges(),
        }
    }
}

impl Default for PrivilegeGuard<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'c> PrivilegeGuard<'c> {
    pub fn with_catalog(catalog: &'c PermissionCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'c PermissionCatalog {
        self.catalog
    }

    fn holds_all<H: PrivilegeHolder + ?Sized>(&self, holder: &H) -> bool {
        self.catalog.holds_all(holder.privilege())
    }

    /// 判定系统特权修改，放行时返回待持久化的掩码。
    ///
    /// 超级管理员请求 PRIV_ALL 时原样保留；其余请求经目录过滤合并。
    pub fn authorize_system_privilege_change<A, T>(
        &self,
        actor: &A,
        target: &T,
        requested: &[Mask],
    ) -> Result<Mask, DenyReason>
    where
        A: PrivilegeHolder + ?Sized,
        T: PrivilegeHolder + ?Sized,
    {
        let actor_is_root = self.holds_all(actor);
        if self.holds_all(target) && !actor_is_root {
            return Err(DenyReason::DemoteSuperAdmin);
        }
        let requested_union: Mask = requested.iter().cloned().collect();
        if self.catalog.holds_all(&requested_union) {
            if !actor_is_root {
                return Err(DenyReason::GrantSuperAdmin);
            }
            return Ok(self.catalog.reserved_all().clone());
        }
        Ok(self.catalog.normalize(requested))
    }

    /// 超级管理员不可封禁，与操作者无关。
    pub fn authorize_ban<A, T>(&self, _actor: &A, target: &T) -> Result<(), DenyReason>
    where
        A: PrivilegeHolder + ?Sized,
        T: PrivilegeHolder + ?Sized,
    {
        if self.holds_all(target) {
            return Err(DenyReason::BanSuperAdmin);
        }
        Ok(())
    }

    /// 超级管理员的凭据不可经此路径重置，与操作者无关。
    pub fn authorize_credential_reset<A, T>(&self, _actor: &A, target: &T) -> Result<(), DenyReason>
    where
        A: PrivilegeHolder + ?Sized,
        T: PrivilegeHolder + ?Sized,
    {
        if self.holds_all(target) {
            return Err(DenyReason::ResetSuperAdmin);
        }
        Ok(())
    }

    /// 修改用户名或邮箱：目标是超级管理员时，操作者必须同样是。
    ///
    /// 否则可先改邮箱再走找回密码，绕过凭据重置规则。
    pub fn authorize_identity_change<A, T>(&self, actor: &A, target: &T) -> Result<(), DenyReason>
    where
        A: PrivilegeHolder + ?Sized,
        T: PrivilegeHolder + ?Sized,
    {
        if self.holds_all(target) && !self.holds_all(actor) {
            return Err(DenyReason::EditSuperAdmin);
        }
        Ok(())
    }
}
