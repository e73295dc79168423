//! 用户管理服务。
//!
//! 每次写入前都重新读取目标用户，再交给特权守卫判定。
//! 读取与写入之间存在竞态窗口（存储接口不提供 CAS），可接受。

use domain::permissions::PRIV_NONE;
use domain::{Mask, PermissionCatalog, TenantContext};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};
use uadm_auth::{AuthError, hash_password};
use uadm_authz::{
    AdminError, AggregateReport, DEFAULT_AGGREGATE_CONCURRENCY, DenyReason,
    DomainPermissionAggregator, PrivilegeGuard,
};
use uadm_config::AppConfig;
use uadm_storage::{ProfileUpdate, RESERVED_PROFILE_KEYS, TenantStore, UserRecord, UserStore};
use uadm_telemetry::{
    record_ban, record_credential_reset, record_guard_allowed, record_guard_denied,
    record_privilege_write,
};

/// 封禁原因所在的资料字段。
pub const BAN_REASON_KEY: &str = "banReason";
/// 空值即清除的资料字段。
pub const HOMEPAGE_KEY: &str = "homepage";

const DEFAULT_BAN_REASON: &str = "banned";

/// 资料编辑。`None` 表示不修改。
#[derive(Debug, Clone, Default)]
pub struct ProfileEdit {
    pub username: Option<String>,
    pub email: Option<String>,
    pub fields: BTreeMap<String, String>,
}

/// 用户详情：记录、系统特权描述与跨域权限。
#[derive(Debug, Clone)]
pub struct UserDetail {
    pub user: UserRecord,
    pub system_capabilities: Vec<&'static str>,
    pub domains: AggregateReport,
}

/// 组合掩码 → 逐位请求列表；完整持有“全部”时追加保留值。
pub fn requested_from_mask(catalog: &PermissionCatalog, mask: &Mask) -> Vec<Mask> {
    let mut requested = catalog.components(mask);
    if catalog.holds_all(mask) {
        requested.push(catalog.reserved_all().clone());
    }
    requested
}

pub struct UserAdminService {
    users: Arc<dyn UserStore>,
    aggregator: DomainPermissionAggregator,
    guard: PrivilegeGuard<'static>,
    default_privilege: Mask,
}

impl UserAdminService {
    pub fn new(
        users: Arc<dyn UserStore>,
        tenants: Arc<dyn TenantStore>,
        default_privilege: Mask,
    ) -> Self {
        Self {
            users,
            aggregator: DomainPermissionAggregator::new(tenants, DEFAULT_AGGREGATE_CONCURRENCY),
            guard: PrivilegeGuard::new(),
            default_privilege,
        }
    }

    pub fn from_config(
        users: Arc<dyn UserStore>,
        tenants: Arc<dyn TenantStore>,
        config: &AppConfig,
    ) -> Self {
        Self {
            users,
            aggregator: DomainPermissionAggregator::new(tenants, config.aggregate_concurrency),
            guard: PrivilegeGuard::new(),
            default_privilege: config.default_privilege.clone(),
        }
    }

    pub fn aggregator(&self) -> &DomainPermissionAggregator {
        &self.aggregator
    }

    pub fn default_privilege(&self) -> &Mask {
        &self.default_privilege
    }

    /// 按 ID / 用户名 / 邮箱查找用户。含 `@` 的键只按邮箱匹配。
    pub async fn resolve_user(
        &self,
        ctx: &TenantContext,
        key: &str,
    ) -> Result<UserRecord, AdminError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(AdminError::validation("uid", "user key required"));
        }
        let found = if key.contains('@') {
            self.users.find_by_email(ctx, key).await?
        } else {
            match self.users.find_by_id(ctx, key).await? {
                Some(user) => Some(user),
                None => self.users.find_by_username(ctx, key).await?,
            }
        };
        found.ok_or_else(|| AdminError::NotFound(key.to_string()))
    }

    pub async fn user_detail(
        &self,
        ctx: &TenantContext,
        key: &str,
    ) -> Result<UserDetail, AdminError> {
        let user = self.resolve_user(ctx, key).await?;
        let system_capabilities = self.guard.catalog().decode(&user.privilege);
        let domains = self.aggregator.aggregate(ctx, &user.user_id).await?;
        Ok(UserDetail {
            user,
            system_capabilities,
            domains,
        })
    }

    /// 以逐位列表修改系统特权，返回实际写入的掩码。
    pub async fn set_privilege(
        &self,
        ctx: &TenantContext,
        user_id: &str,
        requested: &[Mask],
    ) -> Result<Mask, AdminError> {
        let target = self.load_target(ctx, user_id).await?;
        let decision = self
            .guard
            .authorize_system_privilege_change(ctx, &target, requested);
        let privilege = self.enforce(ctx, &target, "set_privilege", decision)?;
        self.write_privilege(ctx, &target, &privilege).await?;
        Ok(privilege)
    }

    /// 以组合掩码修改系统特权。
    pub async fn set_privilege_mask(
        &self,
        ctx: &TenantContext,
        user_id: &str,
        mask: &Mask,
    ) -> Result<Mask, AdminError> {
        let requested = requested_from_mask(self.guard.catalog(), mask);
        self.set_privilege(ctx, user_id, &requested).await
    }

    pub async fn reset_password(
        &self,
        ctx: &TenantContext,
        user_id: &str,
        password: &str,
    ) -> Result<(), AdminError> {
        if password.is_empty() {
            return Err(AdminError::validation("password", "password required"));
        }
        let target = self.load_target(ctx, user_id).await?;
        let decision = self.guard.authorize_credential_reset(ctx, &target);
        self.enforce(ctx, &target, "reset_password", decision)?;

        let password_hash = hash_password(password).map_err(password_error)?;
        if !self
            .users
            .set_password_hash(ctx, &target.user_id, &password_hash)
            .await?
        {
            return Err(AdminError::NotFound(target.user_id));
        }
        record_credential_reset();
        info!(
            target: "uadm.manage",
            actor_id = %ctx.user_id,
            target_id = %target.user_id,
            "password_reset"
        );
        Ok(())
    }

    /// 封禁：系统特权清零并记录原因。
    pub async fn ban(
        &self,
        ctx: &TenantContext,
        user_id: &str,
        reason: &str,
    ) -> Result<(), AdminError> {
        let target = self.load_target(ctx, user_id).await?;
        let decision = self.guard.authorize_ban(ctx, &target);
        self.enforce(ctx, &target, "ban", decision)?;

        let none = self.guard.catalog().value(PRIV_NONE);
        self.write_privilege(ctx, &target, &none).await?;

        let reason = match reason.trim() {
            "" => DEFAULT_BAN_REASON,
            text => text,
        };
        let mut update = ProfileUpdate::default();
        update
            .set
            .insert(BAN_REASON_KEY.to_string(), reason.to_string());
        self.users
            .update_profile(ctx, &target.user_id, update)
            .await?;

        record_ban();
        info!(
            target: "uadm.manage",
            actor_id = %ctx.user_id,
            target_id = %target.user_id,
            reason = %reason,
            "user_banned"
        );
        Ok(())
    }

    /// 解封：恢复默认系统特权（按特权修改判定）并清除封禁原因。
    pub async fn unban(&self, ctx: &TenantContext, user_id: &str) -> Result<Mask, AdminError> {
        let requested = requested_from_mask(self.guard.catalog(), &self.default_privilege);
        let privilege = self.set_privilege(ctx, user_id, &requested).await?;

        let update = ProfileUpdate {
            set: BTreeMap::new(),
            unset: vec![BAN_REASON_KEY.to_string()],
        };
        self.users.update_profile(ctx, user_id, update).await?;
        info!(
            target: "uadm.manage",
            actor_id = %ctx.user_id,
            target_id = %user_id,
            "user_unbanned"
        );
        Ok(privilege)
    }

    /// 编辑用户名、邮箱与资料字段。全部校验通过后才写入。
    pub async fn edit_profile(
        &self,
        ctx: &TenantContext,
        user_id: &str,
        edit: ProfileEdit,
    ) -> Result<UserRecord, AdminError> {
        let target = self.load_target(ctx, user_id).await?;

        let email = match edit.email.as_deref().map(str::trim) {
            Some(email) if email != target.email => {
                if email.is_empty() || !email.contains('@') {
                    return Err(AdminError::validation("email", "invalid email"));
                }
                let owner = self.users.find_by_email(ctx, email).await?;
                if owner.is_some_and(|other| other.user_id != target.user_id) {
                    return Err(AdminError::validation("email", "email already in use"));
                }
                Some(email.to_string())
            }
            _ => None,
        };

        let username = match edit.username.as_deref().map(str::trim) {
            Some(username) if username != target.username => {
                if username.is_empty() || username.contains('@') {
                    return Err(AdminError::validation("username", "invalid username"));
                }
                let owner = self.users.find_by_username(ctx, username).await?;
                if owner.is_some_and(|other| other.user_id != target.user_id) {
                    return Err(AdminError::validation("username", "username already in use"));
                }
                Some(username.to_string())
            }
            _ => None,
        };

        if email.is_some() || username.is_some() {
            let decision = self.guard.authorize_identity_change(ctx, &target);
            self.enforce(ctx, &target, "edit_identity", decision)?;
        }

        let mut update = ProfileUpdate::default();
        for (key, value) in edit.fields {
            if key.trim().is_empty()
                || key == BAN_REASON_KEY
                || RESERVED_PROFILE_KEYS.contains(&key.as_str())
            {
                return Err(AdminError::validation(key, "field not editable"));
            }
            let value = value.trim();
            if key == HOMEPAGE_KEY && value.is_empty() {
                update.unset.push(key);
            } else {
                update.set.insert(key, value.to_string());
            }
        }

        if let Some(email) = &email {
            self.users.set_email(ctx, &target.user_id, email).await?;
        }
        if let Some(username) = &username {
            self.users
                .set_username(ctx, &target.user_id, username)
                .await?;
        }
        if !update.is_empty() {
            self.users
                .update_profile(ctx, &target.user_id, update)
                .await?;
        }
        info!(
            target: "uadm.manage",
            actor_id = %ctx.user_id,
            target_id = %target.user_id,
            email_changed = email.is_some(),
            username_changed = username.is_some(),
            "profile_edited"
        );
        self.load_target(ctx, &target.user_id).await
    }

    async fn load_target(
        &self,
        ctx: &TenantContext,
        user_id: &str,
    ) -> Result<UserRecord, AdminError> {
        self.users
            .find_by_id(ctx, user_id)
            .await?
            .ok_or_else(|| AdminError::NotFound(user_id.to_string()))
    }

    fn enforce<T>(
        &self,
        ctx: &TenantContext,
        target: &UserRecord,
        action: &'static str,
        decision: Result<T, DenyReason>,
    ) -> Result<T, AdminError> {
        match decision {
            Ok(value) => {
                record_guard_allowed();
                Ok(value)
            }
            Err(reason) => {
                record_guard_denied();
                warn!(
                    target: "uadm.manage",
                    actor_id = %ctx.user_id,
                    target_id = %target.user_id,
                    action = action,
                    reason = reason.code(),
                    "privilege_guard_denied"
                );
                Err(reason.into())
            }
        }
    }

    async fn write_privilege(
        &self,
        ctx: &TenantContext,
        target: &UserRecord,
        privilege: &Mask,
    ) -> Result<(), AdminError> {
        if !self
            .users
            .set_privilege(ctx, &target.user_id, privilege)
            .await?
        {
            return Err(AdminError::NotFound(target.user_id.clone()));
        }
        record_privilege_write();
        info!(
            target: "uadm.manage",
            actor_id = %ctx.user_id,
            target_id = %target.user_id,
            previous = %target.privilege,
            privilege = %privilege,
            "system_privilege_updated"
        );
        Ok(())
    }
}

fn password_error(err: AuthError) -> AdminError {
    match err {
        AuthError::InvalidPassword { .. } => AdminError::validation("password", err.to_string()),
        AuthError::Internal(message) => AdminError::Store(message),
    }
}
