//! 应用运行配置加载。

use domain::Mask;
use domain::permissions::{PRIV_DEFAULT, system_privileges};
use std::env;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    /// 解封时恢复的系统特权。
    pub default_privilege: Mask,
    /// 跨域聚合的并发上限。
    pub aggregate_concurrency: usize,
    /// 启动时校验内置权限目录，失败即退出。
    pub strict_catalog: bool,
    pub log_filter: String,
}

impl AppConfig {
    /// 先加载本地 .env（如存在），再从环境变量读取。
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("UADM_DATABASE_URL")
            .map_err(|_| ConfigError::Missing("UADM_DATABASE_URL".to_string()))?;
        let database_max_connections = read_u32_with_default("UADM_DATABASE_MAX_CONNECTIONS", 8)?;
        let default_privilege = match read_optional("UADM_DEFAULT_PRIV") {
            Some(value) => value
                .parse::<Mask>()
                .map_err(|_| ConfigError::Invalid("UADM_DEFAULT_PRIV".to_string(), value))?,
            None => system_privileges().value(PRIV_DEFAULT),
        };
        let aggregate_concurrency = read_usize_with_default("UADM_AGGREGATE_CONCURRENCY", 8)?;
        if aggregate_concurrency == 0 {
            return Err(ConfigError::Invalid(
                "UADM_AGGREGATE_CONCURRENCY".to_string(),
                "0".to_string(),
            ));
        }
        let strict_catalog = read_bool_with_default("UADM_STRICT_CATALOG", true);
        let log_filter = env::var("UADM_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            database_url,
            database_max_connections,
            default_privilege,
            aggregate_concurrency,
            strict_catalog,
            log_filter,
        })
    }
}

fn read_u32_with_default(key: &str, default: u32) -> Result<u32, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u32>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_usize_with_default(key: &str, default: usize) -> Result<usize, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<usize>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_optional(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

fn read_bool_with_default(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "on"),
        Err(_) => default,
    }
}
