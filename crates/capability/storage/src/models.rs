//! 数据模型
//!
//! 定义外部协作方（用户存储、租户存储）交换的数据结构：
//! - 用户模型：UserRecord, ProfileUpdate
//! - 租户模型：TenantRecord
//! - 成员关系：MembershipRecord

use domain::{Mask, PrivilegeHolder};
use std::collections::BTreeMap;

/// 用户记录（全局，跨租户）。
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    /// 系统特权掩码。
    pub privilege: Mask,
    /// 自由资料字段（school、bio、homepage、banReason 等）。
    pub profile: BTreeMap<String, String>,
}

impl UserRecord {
    /// 构造无资料字段的用户记录。
    pub fn new(
        user_id: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
        privilege: Mask,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            email: email.into(),
            password_hash: String::new(),
            privilege,
            profile: BTreeMap::new(),
        }
    }
}

impl PrivilegeHolder for UserRecord {
    fn privilege(&self) -> &Mask {
        &self.privilege
    }
}

/// 资料字段批量更新（set 与 unset 同时生效）。
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub set: BTreeMap<String, String>,
    pub unset: Vec<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.unset.is_empty()
    }
}

/// 租户记录。
#[derive(Debug, Clone)]
pub struct TenantRecord {
    pub tenant_id: String,
    pub name: String,
    /// 租户自定义角色 → 权限掩码。
    pub roles: BTreeMap<String, Mask>,
}

impl TenantRecord {
    pub fn new(tenant_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            name: name.into(),
            roles: BTreeMap::new(),
        }
    }

    pub fn with_role(mut self, role: impl Into<String>, mask: Mask) -> Self {
        self.roles.insert(role.into(), mask);
        self
    }
}

/// 用户在某租户下的成员关系。
#[derive(Debug, Clone)]
pub struct MembershipRecord {
    pub tenant_id: String,
    pub user_id: String,
    /// 角色名；空字符串视为 default。
    pub role: String,
    /// 是否已正式加入（false 表示待处理）。
    pub joined: bool,
}
