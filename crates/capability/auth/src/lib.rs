//! 凭据能力：口令策略与 Argon2 哈希。
//!
//! 本核心不负责登录；只在管理员重置密码时生成待持久化的哈希。

mod password;

pub use password::{
    MAX_PASSWORD_LEN, MIN_PASSWORD_LEN, hash_password, validate_password, verify_password,
};

/// 凭据相关错误。
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("password must be {min}-{max} characters")]
    InvalidPassword { min: usize, max: usize },
    #[error("internal error: {0}")]
    Internal(String),
}
