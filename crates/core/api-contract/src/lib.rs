//! 稳定的 DTO 与 API 响应契约。
//!
//! 掩码一律以十进制字符串传输，避免 JSON 数字精度截断。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 稳定错误码。
pub mod error_code {
    pub const NOT_FOUND: &str = "RESOURCE.NOT_FOUND";
    pub const FORBIDDEN: &str = "AUTH.FORBIDDEN";
    pub const INVALID_REQUEST: &str = "INVALID.REQUEST";
    pub const INTERNAL: &str = "INTERNAL.ERROR";
}

/// 标准 API 响应封装。
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

/// 失败响应的错误体。
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    /// 拒绝原因代码（仅特权守卫拒绝时出现）。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
                reason: None,
            }),
        }
    }

    /// 携带拒绝原因代码的失败响应。
    pub fn denied(message: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: error_code::FORBIDDEN.to_string(),
                message: message.into(),
                reason: Some(reason.into()),
            }),
        }
    }
}

/// 权限目录条目。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionDto {
    pub key: String,
    pub value: String,
    pub description: String,
    pub reserved: bool,
}

/// 用户在单个域内的权限。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainPermissionDto {
    pub tenant_id: String,
    pub tenant_name: String,
    pub role: String,
    pub joined: bool,
    pub mask: String,
    pub capabilities: Vec<String>,
    pub tenant_missing: bool,
    pub role_source: String,
}

/// 跨域权限汇总。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainPermissionReportDto {
    pub entries: Vec<DomainPermissionDto>,
    pub omitted: usize,
}

/// 用户详情（不含口令哈希）。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetailDto {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub privilege: String,
    pub system_capabilities: Vec<String>,
    pub profile: BTreeMap<String, String>,
    pub domains: DomainPermissionReportDto,
}

/// 修改系统特权请求体。
///
/// `privileges` 为逐位列表；`mask` 为组合值，两者同时提供时取并集。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPrivilegeRequest {
    #[serde(default)]
    pub privileges: Vec<String>,
    #[serde(default)]
    pub mask: Option<String>,
}

/// 编辑资料请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditProfileRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}
