//! 用户管理能力
//!
//! 组合存储、授权计算与凭据能力：
//! - 用户查找与详情（系统特权描述 + 跨域权限）
//! - 系统特权修改、重置密码、封禁/解封（均经特权守卫判定）
//! - 资料编辑（用户名/邮箱唯一性校验）

pub mod dto;
pub mod service;

pub use dto::*;
pub use service::{
    BAN_REASON_KEY, HOMEPAGE_KEY, ProfileEdit, UserAdminService, UserDetail, requested_from_mask,
};
