//! 验证辅助函数
//!
//! - ensure_user_id：验证用户 ID 非空
//! - ensure_profile_key：资料字段不能覆盖结构化列

use crate::error::StorageError;

/// 结构化列，禁止通过资料字段写入。
pub const RESERVED_PROFILE_KEYS: &[&str] =
    &["user_id", "username", "email", "password_hash", "privilege"];

/// 验证用户 ID 非空
pub fn ensure_user_id(user_id: &str) -> Result<(), StorageError> {
    if user_id.trim().is_empty() {
        return Err(StorageError::new("user_id required"));
    }
    Ok(())
}

/// 验证资料字段名
pub fn ensure_profile_key(key: &str) -> Result<(), StorageError> {
    if key.trim().is_empty() {
        return Err(StorageError::new("profile key required"));
    }
    if RESERVED_PROFILE_KEYS.contains(&key) {
        return Err(StorageError::new(format!("profile key not writable: {key}")));
    }
    Ok(())
}
