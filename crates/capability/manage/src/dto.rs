//! 记录 → DTO 转换与错误码映射。

use crate::service::{ProfileEdit, UserDetail, requested_from_mask};
use api_contract::{
    ApiResponse, DomainPermissionDto, DomainPermissionReportDto, EditProfileRequest,
    PermissionDto, SetPrivilegeRequest, UserDetailDto, error_code as codes,
};
use domain::{Mask, PermissionBit, PermissionCatalog};
use uadm_authz::{AdminError, AggregateReport, DomainPermissionEntry};

pub fn permission_to_dto(bit: &PermissionBit) -> PermissionDto {
    PermissionDto {
        key: bit.key.to_string(),
        value: bit.value.to_string(),
        description: bit.description.to_string(),
        reserved: bit.reserved,
    }
}

pub fn catalog_to_dto(catalog: &PermissionCatalog) -> Vec<PermissionDto> {
    catalog.entries().iter().map(permission_to_dto).collect()
}

pub fn entry_to_dto(entry: DomainPermissionEntry) -> DomainPermissionDto {
    DomainPermissionDto {
        tenant_id: entry.tenant_id,
        tenant_name: entry.tenant_name,
        role: entry.role,
        joined: entry.joined,
        mask: entry.mask.to_string(),
        capabilities: entry
            .capabilities
            .into_iter()
            .map(str::to_string)
            .collect(),
        tenant_missing: entry.tenant_missing,
        role_source: entry.role_source.as_str().to_string(),
    }
}

pub fn report_to_dto(report: AggregateReport) -> DomainPermissionReportDto {
    DomainPermissionReportDto {
        entries: report.entries.into_iter().map(entry_to_dto).collect(),
        omitted: report.omitted,
    }
}

pub fn user_detail_to_dto(detail: UserDetail) -> UserDetailDto {
    let user = detail.user;
    UserDetailDto {
        user_id: user.user_id,
        username: user.username,
        email: user.email,
        privilege: user.privilege.to_string(),
        system_capabilities: detail
            .system_capabilities
            .into_iter()
            .map(str::to_string)
            .collect(),
        profile: user.profile,
        domains: report_to_dto(detail.domains),
    }
}

/// 解析请求中的掩码字符串；组合值按目录拆分。
pub fn parse_privilege_request(
    catalog: &PermissionCatalog,
    req: &SetPrivilegeRequest,
) -> Result<Vec<Mask>, AdminError> {
    let mut requested = Vec::with_capacity(req.privileges.len());
    for text in &req.privileges {
        let mask = text
            .parse::<Mask>()
            .map_err(|err| AdminError::validation("privileges", err.to_string()))?;
        requested.push(mask);
    }
    if let Some(text) = &req.mask {
        let mask = text
            .parse::<Mask>()
            .map_err(|err| AdminError::validation("mask", err.to_string()))?;
        requested.extend(requested_from_mask(catalog, &mask));
    }
    Ok(requested)
}

pub fn profile_edit_from_request(req: EditProfileRequest) -> ProfileEdit {
    ProfileEdit {
        username: req.username,
        email: req.email,
        fields: req.fields,
    }
}

pub fn error_code(err: &AdminError) -> &'static str {
    match err {
        AdminError::NotFound(_) => codes::NOT_FOUND,
        AdminError::Denied(_) => codes::FORBIDDEN,
        AdminError::Validation { .. } => codes::INVALID_REQUEST,
        AdminError::Store(_) => codes::INTERNAL,
    }
}

/// 错误 → 统一失败响应。存储错误细节不外泄。
pub fn error_response(err: &AdminError) -> ApiResponse<()> {
    match err {
        AdminError::Denied(reason) => ApiResponse::denied(reason.message(), reason.code()),
        AdminError::Store(_) => ApiResponse::error(error_code(err), "internal error"),
        _ => ApiResponse::error(error_code(err), err.to_string()),
    }
}
