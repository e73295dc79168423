//! 授权核心错误分类。

use uadm_storage::StorageError;

/// 特权守卫拒绝原因。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// 目标是超级管理员，操作者不是。
    DemoteSuperAdmin,
    /// 请求授予 PRIV_ALL，操作者不是超级管理员。
    GrantSuperAdmin,
    /// 超级管理员不可被封禁。
    BanSuperAdmin,
    /// 超级管理员的凭据不可经此路径重置。
    ResetSuperAdmin,
    /// 目标是超级管理员，操作者不是；不可修改其用户名或邮箱。
    EditSuperAdmin,
}

impl DenyReason {
    /// 稳定的机器可读代码。
    pub fn code(&self) -> &'static str {
        match self {
            Self::DemoteSuperAdmin => "PRIV.DEMOTE_SUPER_ADMIN",
            Self::GrantSuperAdmin => "PRIV.GRANT_SUPER_ADMIN",
            Self::BanSuperAdmin => "PRIV.BAN_SUPER_ADMIN",
            Self::ResetSuperAdmin => "PRIV.RESET_SUPER_ADMIN",
            Self::EditSuperAdmin => "PRIV.EDIT_SUPER_ADMIN",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::DemoteSuperAdmin => "cannot modify a super admin's privileges unless you are one",
            Self::GrantSuperAdmin => "cannot grant super admin privileges without holding them",
            Self::BanSuperAdmin => "cannot ban a super admin",
            Self::ResetSuperAdmin => "cannot reset a super admin's password",
            Self::EditSuperAdmin => "cannot change a super admin's username or email unless you are one",
        }
    }
}

impl std::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// 用户管理操作的统一错误。
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("denied: {0}")]
    Denied(DenyReason),
    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },
    #[error("storage error: {0}")]
    Store(String),
}

impl AdminError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<StorageError> for AdminError {
    fn from(err: StorageError) -> Self {
        Self::Store(err.to_string())
    }
}

impl From<DenyReason> for AdminError {
    fn from(reason: DenyReason) -> Self {
        Self::Denied(reason)
    }
}
