use api_contract::{
    DomainPermissionDto, DomainPermissionReportDto, EditProfileRequest, SetPrivilegeRequest,
    UserDetailDto,
};
use serde_json::Value;
use std::collections::BTreeMap;

fn wide_mask() -> String {
    // 2^100 + 1，超出 JSON 安全整数范围
    "1267650600228229401496703205377".to_string()
}

#[test]
fn domain_permission_is_camel_case_with_string_mask() {
    let dto = DomainPermissionDto {
        tenant_id: "t-a".to_string(),
        tenant_name: "Alpha".to_string(),
        role: "admin".to_string(),
        joined: true,
        mask: wide_mask(),
        capabilities: vec!["View this domain".to_string()],
        tenant_missing: false,
        role_source: "tenant".to_string(),
    };
    let value = serde_json::to_value(dto).expect("serialize");
    assert_eq!(value["tenantId"], Value::from("t-a"));
    assert_eq!(value["tenantName"], Value::from("Alpha"));
    assert_eq!(value["mask"], Value::from(wide_mask()));
    assert_eq!(value["tenantMissing"], Value::from(false));
    assert_eq!(value["roleSource"], Value::from("tenant"));
    assert!(value.get("tenant_id").is_none());
}

#[test]
fn user_detail_nests_domain_report() {
    let dto = UserDetailDto {
        user_id: "u-1".to_string(),
        username: "alice".to_string(),
        email: "alice@example.com".to_string(),
        privilege: "0".to_string(),
        system_capabilities: vec![],
        profile: BTreeMap::from([("banReason".to_string(), "spam".to_string())]),
        domains: DomainPermissionReportDto {
            entries: vec![],
            omitted: 2,
        },
    };
    let value = serde_json::to_value(dto).expect("serialize");
    assert_eq!(value["userId"], Value::from("u-1"));
    assert_eq!(value["systemCapabilities"], Value::Array(vec![]));
    assert_eq!(value["profile"]["banReason"], Value::from("spam"));
    assert_eq!(value["domains"]["omitted"], Value::from(2));
    assert!(value.get("passwordHash").is_none());
}

#[test]
fn set_privilege_request_accepts_list_or_mask() {
    let list: SetPrivilegeRequest =
        serde_json::from_str(r#"{"privileges":["1","4"]}"#).expect("parse");
    assert_eq!(list.privileges, vec!["1", "4"]);
    assert!(list.mask.is_none());

    let combined: SetPrivilegeRequest = serde_json::from_str(r#"{"mask":"5"}"#).expect("parse");
    assert!(combined.privileges.is_empty());
    assert_eq!(combined.mask.as_deref(), Some("5"));
}

#[test]
fn edit_profile_request_defaults_fields() {
    let req: EditProfileRequest =
        serde_json::from_str(r#"{"email":"new@example.com"}"#).expect("parse");
    assert_eq!(req.email.as_deref(), Some("new@example.com"));
    assert!(req.username.is_none());
    assert!(req.fields.is_empty());
}
