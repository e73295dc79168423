//! 存储接口 Trait 定义
//!
//! 定义授权核心依赖的外部协作方接口：
//! - UserStore：用户查找与字段写入
//! - TenantStore：租户与成员关系查询
//!
//! 设计原则：
//! - 所有接口显式接收 TenantContext
//! - 记录不存在返回 `Ok(None)` / `Ok(false)`，存储故障返回 StorageError
//! - 使用 async_trait 支持动态分发

use crate::error::StorageError;
use crate::models::{MembershipRecord, ProfileUpdate, TenantRecord, UserRecord};
use async_trait::async_trait;
use domain::{Mask, TenantContext};

/// 用户存储接口
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 根据用户 ID 查找用户
    async fn find_by_id(
        &self,
        ctx: &TenantContext,
        user_id: &str,
    ) -> Result<Option<UserRecord>, StorageError>;

    /// 根据用户名查找用户
    async fn find_by_username(
        &self,
        ctx: &TenantContext,
        username: &str,
    ) -> Result<Option<UserRecord>, StorageError>;

    /// 根据邮箱查找用户
    async fn find_by_email(
        &self,
        ctx: &TenantContext,
        email: &str,
    ) -> Result<Option<UserRecord>, StorageError>;

    /// 写入系统特权掩码
    async fn set_privilege(
        &self,
        ctx: &TenantContext,
        user_id: &str,
        privilege: &Mask,
    ) -> Result<bool, StorageError>;

    /// 写入口令哈希
    async fn set_password_hash(
        &self,
        ctx: &TenantContext,
        user_id: &str,
        password_hash: &str,
    ) -> Result<bool, StorageError>;

    /// 修改用户名（唯一性由调用方预先校验）
    async fn set_username(
        &self,
        ctx: &TenantContext,
        user_id: &str,
        username: &str,
    ) -> Result<bool, StorageError>;

    /// 修改邮箱（唯一性由调用方预先校验）
    async fn set_email(
        &self,
        ctx: &TenantContext,
        user_id: &str,
        email: &str,
    ) -> Result<bool, StorageError>;

    /// 批量设置/清除资料字段
    async fn update_profile(
        &self,
        ctx: &TenantContext,
        user_id: &str,
        update: ProfileUpdate,
    ) -> Result<bool, StorageError>;
}

/// 租户存储接口
#[async_trait]
pub trait TenantStore: Send + Sync {
    /// 列出用户加入（或待加入）的全部租户成员关系
    async fn list_memberships_for_user(
        &self,
        ctx: &TenantContext,
        user_id: &str,
    ) -> Result<Vec<MembershipRecord>, StorageError>;

    /// 查找租户（含自定义角色）
    async fn find_tenant(
        &self,
        ctx: &TenantContext,
        tenant_id: &str,
    ) -> Result<Option<TenantRecord>, StorageError>;
}
