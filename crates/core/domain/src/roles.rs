//! 内置角色表。
//!
//! 租户可以用同名自定义角色覆盖内置角色；解析顺序由 authz 的 RoleResolver 决定。

use crate::mask::Mask;
use crate::permissions::{PERM_ALL, PERM_DEFAULT, PERM_VIEW, domain_permissions};
use std::collections::BTreeMap;
use std::sync::OnceLock;

pub const ROLE_GUEST: &str = "guest";
pub const ROLE_DEFAULT: &str = "default";
pub const ROLE_ROOT: &str = "root";

static BUILTIN_ROLES: OnceLock<BTreeMap<&'static str, Mask>> = OnceLock::new();

/// 内置角色 → 权限掩码。
pub fn builtin_roles() -> &'static BTreeMap<&'static str, Mask> {
    BUILTIN_ROLES.get_or_init(|| {
        let catalog = domain_permissions();
        BTreeMap::from([
            (ROLE_GUEST, catalog.value(PERM_VIEW)),
            (ROLE_DEFAULT, catalog.value(PERM_DEFAULT)),
            (ROLE_ROOT, catalog.value(PERM_ALL)),
        ])
    })
}

pub fn builtin_role(name: &str) -> Option<&'static Mask> {
    builtin_roles().get(name)
}
