//! Postgres 用户存储实现
//!
//! 用户是全局记录，不按租户过滤；`privilege` 列为十进制文本。

use crate::error::StorageError;
use crate::models::{ProfileUpdate, UserRecord};
use crate::traits::UserStore;
use crate::validation::{ensure_profile_key, ensure_user_id};
use domain::{Mask, TenantContext};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::collections::BTreeMap;

const USER_COLUMNS: &str = "user_id, username, email, password_hash, privilege";

pub struct PgUserStore {
    pub pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_user(&self, row: Option<PgRow>) -> Result<Option<UserRecord>, StorageError> {
        let Some(row) = row else {
            return Ok(None);
        };

        let user_id: String = row.try_get("user_id")?;
        let username: String = row.try_get("username")?;
        let email: String = row.try_get("email")?;
        let password_hash: String = row.try_get("password_hash")?;
        let privilege: String = row.try_get("privilege")?;
        let privilege: Mask = privilege.parse()?;

        let rows = sqlx::query("select key, value from user_profile where user_id = $1")
            .bind(&user_id)
            .fetch_all(&self.pool)
            .await?;
        let mut profile = BTreeMap::new();
        for row in rows {
            let key: String = row.try_get("key")?;
            let value: String = row.try_get("value")?;
            profile.insert(key, value);
        }

        Ok(Some(UserRecord {
            user_id,
            username,
            email,
            password_hash,
            privilege,
            profile,
        }))
    }

    async fn update_column(
        &self,
        column: &'static str,
        user_id: &str,
        value: &str,
    ) -> Result<bool, StorageError> {
        ensure_user_id(user_id)?;
        let sql = format!("update users set {column} = $2 where user_id = $1");
        let result = sqlx::query(&sql)
            .bind(user_id)
            .bind(value)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(
        &self,
        _ctx: &TenantContext,
        user_id: &str,
    ) -> Result<Option<UserRecord>, StorageError> {
        let sql = format!("select {USER_COLUMNS} from users where user_id = $1");
        let row = sqlx::query(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        self.load_user(row).await
    }

    async fn find_by_username(
        &self,
        _ctx: &TenantContext,
        username: &str,
    ) -> Result<Option<UserRecord>, StorageError> {
        let sql = format!("select {USER_COLUMNS} from users where lower(username) = lower($1)");
        let row = sqlx::query(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        self.load_user(row).await
    }

    async fn find_by_email(
        &self,
        _ctx: &TenantContext,
        email: &str,
    ) -> Result<Option<UserRecord>, StorageError> {
        let sql = format!("select {USER_COLUMNS} from users where lower(email) = lower($1)");
        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        self.load_user(row).await
    }

    async fn set_privilege(
        &self,
        _ctx: &TenantContext,
        user_id: &str,
        privilege: &Mask,
    ) -> Result<bool, StorageError> {
        self.update_column("privilege", user_id, &privilege.to_string())
            .await
    }

    async fn set_password_hash(
        &self,
        _ctx: &TenantContext,
        user_id: &str,
        password_hash: &str,
    ) -> Result<bool, StorageError> {
        self.update_column("password_hash", user_id, password_hash)
            .await
    }

    async fn set_username(
        &self,
        _ctx: &TenantContext,
        user_id: &str,
        username: &str,
    ) -> Result<bool, StorageError> {
        self.update_column("username", user_id, username).await
    }

    async fn set_email(
        &self,
        _ctx: &TenantContext,
        user_id: &str,
        email: &str,
    ) -> Result<bool, StorageError> {
        self.update_column("email", user_id, email).await
    }

    async fn update_profile(
        &self,
        _ctx: &TenantContext,
        user_id: &str,
        update: ProfileUpdate,
    ) -> Result<bool, StorageError> {
        ensure_user_id(user_id)?;
        for key in update.set.keys().chain(update.unset.iter()) {
            ensure_profile_key(key)?;
        }

        let mut tx = self.pool.begin().await?;
        let exists: Option<String> =
            sqlx::query_scalar("select user_id from users where user_id = $1 for update")
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            return Ok(false);
        }

        if !update.unset.is_empty() {
            sqlx::query("delete from user_profile where user_id = $1 and key = any($2)")
                .bind(user_id)
                .bind(&update.unset)
                .execute(&mut *tx)
                .await?;
        }
        for (key, value) in &update.set {
            sqlx::query(
                "insert into user_profile (user_id, key, value) values ($1, $2, $3) \
                 on conflict (user_id, key) do update set value = excluded.value",
            )
            .bind(user_id)
            .bind(key)
            .bind(value)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(true)
    }
}
