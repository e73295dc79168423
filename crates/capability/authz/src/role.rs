//! 角色 → 权限掩码解析。
//!
//! 解析链：租户自定义角色 → 内置角色 → 内置 default → 空掩码。
//! 过期或已删除的角色名不会报错，而是退化为 default。

use domain::Mask;
use domain::roles::{ROLE_DEFAULT, builtin_roles};
use std::collections::BTreeMap;
use uadm_storage::TenantRecord;

/// 掩码的来源。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleSource {
    Tenant,
    Builtin,
    BuiltinDefault,
    Empty,
}

impl RoleSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tenant => "tenant",
            Self::Builtin => "builtin",
            Self::BuiltinDefault => "builtin-default",
            Self::Empty => "empty",
        }
    }
}

const LOOKUP_CHAIN: [RoleSource; 3] = [
    RoleSource::Tenant,
    RoleSource::Builtin,
    RoleSource::BuiltinDefault,
];

/// 解析结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRole {
    /// 生效的角色名（空名已替换为 default）。
    pub role: String,
    pub mask: Mask,
    pub source: RoleSource,
}

#[derive(Debug, Clone, Copy)]
pub struct RoleResolver<'a> {
    builtin: &'a BTreeMap<&'static str, Mask>,
}

impl RoleResolver<'static> {
    /// 使用进程级内置角色表。
    pub fn new() -> Self {
        Self {
            builtin: builtin_roles(),
        }
    }
}

impl Default for RoleResolver<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> RoleResolver<'a> {
    pub fn with_builtin(builtin: &'a BTreeMap<&'static str, Mask>) -> Self {
        Self { builtin }
    }

    fn lookup(&self, source: RoleSource, tenant: Option<&TenantRecord>, role: &str) -> Option<Mask> {
        match source {
            RoleSource::Tenant => tenant.and_then(|t| t.roles.get(role)).cloned(),
            RoleSource::Builtin => self.builtin.get(role).cloned(),
            RoleSource::BuiltinDefault => self.builtin.get(ROLE_DEFAULT).cloned(),
            RoleSource::Empty => Some(Mask::zero()),
        }
    }

    pub fn resolve(&self, tenant: Option<&TenantRecord>, role: &str) -> ResolvedRole {
        let role = match role.trim() {
            "" => ROLE_DEFAULT,
            name => name,
        };
        LOOKUP_CHAIN
            .iter()
            .find_map(|source| {
                self.lookup(*source, tenant, role)
                    .map(|mask| (mask, *source))
            })
            .map(|(mask, source)| ResolvedRole {
                role: role.to_string(),
                mask,
                source,
            })
            .unwrap_or_else(|| ResolvedRole {
                role: role.to_string(),
                mask: Mask::zero(),
                source: RoleSource::Empty,
            })
    }

    pub fn resolve_mask(&self, tenant: Option<&TenantRecord>, role: &str) -> Mask {
        self.resolve(tenant, role).mask
    }
}
