pub mod mask;
pub mod permissions;
pub mod roles;

pub use mask::{Mask, MaskParseError};
pub use permissions::{CatalogError, PermissionBit, PermissionCatalog};

/// 持有系统特权掩码的主体（操作者或目标用户）。
pub trait PrivilegeHolder {
    fn privilege(&self) -> &Mask;

    /// 是否为不受限的超级管理员（完整持有 PRIV_ALL）。
    fn is_super_admin(&self) -> bool {
        permissions::system_privileges().holds_all(self.privilege())
    }
}

/// 租户上下文：调用方已完成认证的操作者身份。
///
/// `privilege` 由宿主解析，本核心只据此做授权判定。
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub tenant_id: String,
    pub user_id: String,
    pub privilege: Mask,
}

impl TenantContext {
    /// 构造显式身份与特权的租户上下文。
    pub fn new(tenant_id: impl Into<String>, user_id: impl Into<String>, privilege: Mask) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            user_id: user_id.into(),
            privilege,
        }
    }
}

impl Default for TenantContext {
    /// 空上下文（仅用于测试或占位）。
    fn default() -> Self {
        Self {
            tenant_id: "".to_string(),
            user_id: "".to_string(),
            privilege: Mask::zero(),
        }
    }
}

impl PrivilegeHolder for TenantContext {
    fn privilege(&self) -> &Mask {
        &self.privilege
    }
}
