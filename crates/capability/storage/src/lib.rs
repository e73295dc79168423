//! # 用户管理存储模块
//!
//! 授权核心只依赖两类外部协作方：用户存储与租户存储。本模块定义它们的
//! 接口、数据模型，以及两套实现。
//!
//! ## 模块说明
//!
//! - [`models`]：数据模型（用户、租户、成员关系、资料更新）
//! - [`traits`]：存储接口定义（UserStore、TenantStore）
//! - [`error`]：存储错误类型定义
//! - [`validation`]：用户 ID 与资料字段校验
//! - [`connection`]：PostgreSQL 连接池管理
//! - [`in_memory`]：内存实现（`RwLock<HashMap>`，用于测试和演示）
//! - [`postgres`]：PostgreSQL 实现（sqlx，掩码以十进制文本保存）
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use uadm_storage::{InMemoryUserStore, UserStore};
//! use domain::TenantContext;
//!
//! let user_store = InMemoryUserStore::with_default_admin();
//! let ctx = TenantContext::default();
//! let user = user_store.find_by_username(&ctx, "admin").await?;
//! ```
//!
//! ## 约束
//!
//! - 本模块不做授权判定；特权守卫在 authz 中完成，调用方必须先通过守卫再写入
//! - 写操作只有单条语句（资料字段除外，使用事务），不提供乐观并发控制

pub mod connection;
pub mod error;
pub mod in_memory;
pub mod models;
pub mod postgres;
pub mod traits;
pub mod validation;

pub use connection::*;
pub use error::*;
pub use models::*;
pub use traits::*;
pub use validation::*;

pub use in_memory::{InMemoryTenantStore, InMemoryUserStore};
pub use postgres::{PgTenantStore, PgUserStore};
