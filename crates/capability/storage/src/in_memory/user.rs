//! 用户内存存储实现
//!
//! 仅用于本地演示和测试。
//!
//! 功能：
//! - 内置 root 账户（用户名：admin，持有 PRIV_ALL）
//! - 按 ID / 用户名 / 邮箱查找（用户名与邮箱忽略大小写）
//! - 特权、口令哈希、资料字段写入

use crate::error::StorageError;
use crate::models::{ProfileUpdate, UserRecord};
use crate::traits::UserStore;
use crate::validation::{ensure_profile_key, ensure_user_id};
use domain::permissions::{PRIV_ALL, system_privileges};
use domain::{Mask, TenantContext};
use std::collections::HashMap;
use std::sync::RwLock;

/// 用户内存存储
///
/// 使用 RwLock + HashMap 提供线程安全的内存存储，按 user_id 索引。
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }

    /// 内置 root 账户
    ///
    /// 创建包含默认超级管理员的存储。
    pub fn with_default_admin() -> Self {
        let store = Self::new();
        let admin = UserRecord::new(
            "user-1",
            "admin",
            "admin@localhost",
            system_privileges().value(PRIV_ALL),
        );
        if let Ok(mut map) = store.users.write() {
            map.insert(admin.user_id.clone(), admin);
        }
        store
    }

    /// 插入或覆盖用户（测试夹具）。
    pub fn insert(&self, record: UserRecord) -> Result<(), StorageError> {
        let mut map = self
            .users
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        map.insert(record.user_id.clone(), record);
        Ok(())
    }

    fn find_by<F>(&self, predicate: F) -> Result<Option<UserRecord>, StorageError>
    where
        F: Fn(&UserRecord) -> bool,
    {
        let map = self
            .users
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(map.values().find(|user| predicate(user)).cloned())
    }

    fn modify<F>(&self, user_id: &str, apply: F) -> Result<bool, StorageError>
    where
        F: FnOnce(&mut UserRecord),
    {
        ensure_user_id(user_id)?;
        let mut map = self
            .users
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        match map.get_mut(user_id) {
            Some(user) => {
                apply(user);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_id(
        &self,
        _ctx: &TenantContext,
        user_id: &str,
    ) -> Result<Option<UserRecord>, StorageError> {
        let map = self
            .users
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(map.get(user_id).cloned())
    }

    async fn find_by_username(
        &self,
        _ctx: &TenantContext,
        username: &str,
    ) -> Result<Option<UserRecord>, StorageError> {
        self.find_by(|user| user.username.eq_ignore_ascii_case(username))
    }

    async fn find_by_email(
        &self,
        _ctx: &TenantContext,
        email: &str,
    ) -> Result<Option<UserRecord>, StorageError> {
        self.find_by(|user| user.email.eq_ignore_ascii_case(email))
    }

    async fn set_privilege(
        &self,
        _ctx: &TenantContext,
        user_id: &str,
        privilege: &Mask,
    ) -> Result<bool, StorageError> {
        self.modify(user_id, |user| user.privilege = privilege.clone())
    }

    async fn set_password_hash(
        &self,
        _ctx: &TenantContext,
        user_id: &str,
        password_hash: &str,
    ) -> Result<bool, StorageError> {
        self.modify(user_id, |user| user.password_hash = password_hash.to_string())
    }

    async fn set_username(
        &self,
        _ctx: &TenantContext,
        user_id: &str,
        username: &str,
    ) -> Result<bool, StorageError> {
        self.modify(user_id, |user| user.username = username.to_string())
    }

    async fn set_email(
        &self,
        _ctx: &TenantContext,
        user_id: &str,
        email: &str,
    ) -> Result<bool, StorageError> {
        self.modify(user_id, |user| user.email = email.to_string())
    }

    async fn update_profile(
        &self,
        _ctx: &TenantContext,
        user_id: &str,
        update: ProfileUpdate,
    ) -> Result<bool, StorageError> {
        for key in update.set.keys().chain(update.unset.iter()) {
            ensure_profile_key(key)?;
        }
        self.modify(user_id, |user| {
            for key in &update.unset {
                user.profile.remove(key);
            }
            user.profile.extend(update.set);
        })
    }
}
