//! # PostgreSQL 存储实现模块
//!
//! 本模块提供 UserStore / TenantStore 的 PostgreSQL 实现。
//!
//! ## 设计原则
//!
//! 1. **参数化查询**：所有 SQL 查询使用参数绑定，防止 SQL 注入攻击
//! 2. **掩码存储**：特权与角色掩码超过 64 位，以十进制文本列保存，读取时解析为 `Mask`
//! 3. **连接池管理**：使用连接池复用数据库连接
//!
//! ## 数据库模式要求
//!
//! 见 `migrations/0001_user_admin.sql`：
//! - `users`：用户表（user_id, username, email, password_hash, privilege）
//! - `user_profile`：资料字段（user_id, key, value）
//! - `tenants`：租户表（tenant_id, name）
//! - `tenant_roles`：租户自定义角色（tenant_id, role, permission）
//! - `tenant_users`：成员关系（tenant_id, user_id, role, joined）

pub mod tenant;
pub mod user;

pub use tenant::PgTenantStore;
pub use user::PgUserStore;
