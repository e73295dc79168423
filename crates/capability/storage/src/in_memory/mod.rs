//! 内存存储实现模块
//!
//! 仅用于本地演示和测试。
//!
//! 包含以下实现：
//! - UserStore: InMemoryUserStore
//! - TenantStore: InMemoryTenantStore

pub mod tenant;
pub mod user;

pub use tenant::*;
pub use user::*;
