//! 授权计算能力
//!
//! - 角色解析：租户自定义 → 内置 → default → 空
//! - 跨域权限聚合：有界并发扇出，部分失败不影响整体
//! - 特权守卫：涉及超级管理员的修改一律按最严格规则判定

pub mod aggregate;
pub mod error;
pub mod guard;
pub mod role;

pub use aggregate::{
    AggregateReport, DEFAULT_AGGREGATE_CONCURRENCY, DomainPermissionAggregator,
    DomainPermissionEntry, sort_entries,
};
pub use error::{AdminError, DenyReason};
pub use guard::PrivilegeGuard;
pub use role::{ResolvedRole, RoleResolver, RoleSource};
