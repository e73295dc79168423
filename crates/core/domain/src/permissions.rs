//! 权限目录：域内权限位与系统特权位的静态注册表。
//!
//! 每个目录在进程启动后只构建一次（`OnceLock`），之后只读。
//! 目录负责：
//! - 掩码 → 可读能力列表（`decode`）
//! - 可编辑位集合（排除 none/all/default/never 等保留值）
//! - 批量改权请求的过滤与合并（`normalize`）

use crate::mask::Mask;
use std::collections::HashSet;
use std::sync::OnceLock;

/// 掩码位宽：`*_ALL` 覆盖该宽度内的所有位。
pub const SYSTEM_PRIVILEGE_WIDTH: u32 = 128;
pub const DOMAIN_PERMISSION_WIDTH: u32 = 128;

// ---- 域内权限 ----
pub const PERM_NONE: &str = "PERM_NONE";
pub const PERM_VIEW: &str = "PERM_VIEW";
pub const PERM_EDIT_DOMAIN: &str = "PERM_EDIT_DOMAIN";
pub const PERM_MOD_BADGE: &str = "PERM_MOD_BADGE";
pub const PERM_VIEW_PROBLEM: &str = "PERM_VIEW_PROBLEM";
pub const PERM_CREATE_PROBLEM: &str = "PERM_CREATE_PROBLEM";
pub const PERM_EDIT_PROBLEM: &str = "PERM_EDIT_PROBLEM";
pub const PERM_EDIT_PROBLEM_SELF: &str = "PERM_EDIT_PROBLEM_SELF";
pub const PERM_VIEW_PROBLEM_HIDDEN: &str = "PERM_VIEW_PROBLEM_HIDDEN";
pub const PERM_SUBMIT_PROBLEM: &str = "PERM_SUBMIT_PROBLEM";
pub const PERM_READ_RECORD_CODE: &str = "PERM_READ_RECORD_CODE";
pub const PERM_REJUDGE: &str = "PERM_REJUDGE";
pub const PERM_VIEW_DISCUSSION: &str = "PERM_VIEW_DISCUSSION";
pub const PERM_CREATE_DISCUSSION: &str = "PERM_CREATE_DISCUSSION";
pub const PERM_EDIT_DISCUSSION: &str = "PERM_EDIT_DISCUSSION";
pub const PERM_DELETE_DISCUSSION: &str = "PERM_DELETE_DISCUSSION";
pub const PERM_VIEW_CONTEST: &str = "PERM_VIEW_CONTEST";
pub const PERM_ATTEND_CONTEST: &str = "PERM_ATTEND_CONTEST";
pub const PERM_CREATE_CONTEST: &str = "PERM_CREATE_CONTEST";
pub const PERM_EDIT_CONTEST: &str = "PERM_EDIT_CONTEST";
pub const PERM_VIEW_HOMEWORK: &str = "PERM_VIEW_HOMEWORK";
pub const PERM_ATTEND_HOMEWORK: &str = "PERM_ATTEND_HOMEWORK";
pub const PERM_CREATE_HOMEWORK: &str = "PERM_CREATE_HOMEWORK";
pub const PERM_VIEW_TRAINING: &str = "PERM_VIEW_TRAINING";
pub const PERM_CREATE_TRAINING: &str = "PERM_CREATE_TRAINING";
pub const PERM_VIEW_RANKING: &str = "PERM_VIEW_RANKING";
pub const PERM_MANAGE_GROUP: &str = "PERM_MANAGE_GROUP";
pub const PERM_MANAGE_ROLE: &str = "PERM_MANAGE_ROLE";
pub const PERM_VIEW_AUDIT_LOG: &str = "PERM_VIEW_AUDIT_LOG";
pub const PERM_DEFAULT: &str = "PERM_DEFAULT";
pub const PERM_ALL: &str = "PERM_ALL";

// ---- 系统特权 ----
pub const PRIV_NONE: &str = "PRIV_NONE";
pub const PRIV_USER_PROFILE: &str = "PRIV_USER_PROFILE";
pub const PRIV_REGISTER_USER: &str = "PRIV_REGISTER_USER";
pub const PRIV_CREATE_DOMAIN: &str = "PRIV_CREATE_DOMAIN";
pub const PRIV_EDIT_SYSTEM: &str = "PRIV_EDIT_SYSTEM";
pub const PRIV_SET_PERM: &str = "PRIV_SET_PERM";
pub const PRIV_VIEW_ALL_DOMAIN: &str = "PRIV_VIEW_ALL_DOMAIN";
pub const PRIV_MANAGE_ALL_DOMAIN: &str = "PRIV_MANAGE_ALL_DOMAIN";
pub const PRIV_READ_PROBLEM_DATA: &str = "PRIV_READ_PROBLEM_DATA";
pub const PRIV_READ_RECORD_CODE: &str = "PRIV_READ_RECORD_CODE";
pub const PRIV_VIEW_HIDDEN_RECORD: &str = "PRIV_VIEW_HIDDEN_RECORD";
pub const PRIV_JUDGE: &str = "PRIV_JUDGE";
pub const PRIV_REJUDGE: &str = "PRIV_REJUDGE";
pub const PRIV_VIEW_USER_SECRET: &str = "PRIV_VIEW_USER_SECRET";
pub const PRIV_SEND_MESSAGE: &str = "PRIV_SEND_MESSAGE";
pub const PRIV_CREATE_FILE: &str = "PRIV_CREATE_FILE";
pub const PRIV_DELETE_FILE: &str = "PRIV_DELETE_FILE";
pub const PRIV_UNLIMITED_QUOTA: &str = "PRIV_UNLIMITED_QUOTA";
pub const PRIV_MOD_BADGE: &str = "PRIV_MOD_BADGE";
pub const PRIV_VIEW_SYSTEM_NOTIFICATION: &str = "PRIV_VIEW_SYSTEM_NOTIFICATION";
pub const PRIV_NEVER: &str = "PRIV_NEVER";
pub const PRIV_MANAGE_PLUGIN: &str = "PRIV_MANAGE_PLUGIN";
pub const PRIV_DEFAULT: &str = "PRIV_DEFAULT";
pub const PRIV_ALL: &str = "PRIV_ALL";

/// 目录中的一个命名权限位（或命名组合）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionBit {
    pub key: &'static str,
    pub value: Mask,
    pub description: &'static str,
    /// 保留值（none/all/default/never），不可通过批量改权设置。
    pub reserved: bool,
}

impl PermissionBit {
    pub fn new(key: &'static str, value: Mask, description: &'static str) -> Self {
        Self {
            key,
            value,
            description,
            reserved: false,
        }
    }

    pub fn reserved(key: &'static str, value: Mask, description: &'static str) -> Self {
        Self {
            key,
            value,
            description,
            reserved: true,
        }
    }
}

/// 目录构建错误。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate key: {0}")]
    DuplicateKey(String),
    #[error("editable entry {0} has an empty value")]
    EmptyValue(String),
    #[error("entries {0} and {1} share the same value")]
    DuplicateValue(String, String),
    #[error("editable entry {0} collides with reserved entry {1}")]
    ReservedCollision(String, String),
    #[error("reserved all entry missing: {0}")]
    MissingAll(String),
}

/// 权限目录。
#[derive(Debug, Clone)]
pub struct PermissionCatalog {
    name: &'static str,
    entries: Vec<PermissionBit>,
    all: Mask,
}

impl PermissionCatalog {
    /// 校验并构建目录。
    ///
    /// `all_key` 指向表示“全部权限”的保留项，超级管理员判定依赖它。
    pub fn new(
        name: &'static str,
        entries: Vec<PermissionBit>,
        all_key: &str,
    ) -> Result<Self, CatalogError> {
        let mut keys = HashSet::new();
        for entry in &entries {
            if !keys.insert(entry.key) {
                return Err(CatalogError::DuplicateKey(entry.key.to_string()));
            }
        }

        let reserved: Vec<&PermissionBit> = entries.iter().filter(|e| e.reserved).collect();
        let editable: Vec<&PermissionBit> = entries.iter().filter(|e| !e.reserved).collect();
        for (index, entry) in editable.iter().enumerate() {
            if entry.value.is_zero() {
                return Err(CatalogError::EmptyValue(entry.key.to_string()));
            }
            if let Some(other) = editable[..index].iter().find(|o| o.value == entry.value) {
                return Err(CatalogError::DuplicateValue(
                    other.key.to_string(),
                    entry.key.to_string(),
                ));
            }
            if let Some(hit) = reserved.iter().find(|r| r.value == entry.value) {
                return Err(CatalogError::ReservedCollision(
                    entry.key.to_string(),
                    hit.key.to_string(),
                ));
            }
        }

        let all = reserved
            .iter()
            .find(|r| r.key == all_key)
            .map(|r| r.value.clone())
            .ok_or_else(|| CatalogError::MissingAll(all_key.to_string()))?;

        Ok(Self { name, entries, all })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 按声明顺序返回所有条目。
    pub fn entries(&self) -> &[PermissionBit] {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&PermissionBit> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    /// 条目值；未知 key 返回空掩码。
    pub fn value(&self, key: &str) -> Mask {
        self.get(key)
            .map(|entry| entry.value.clone())
            .unwrap_or_default()
    }

    /// 保留的“全部权限”值。
    pub fn reserved_all(&self) -> &Mask {
        &self.all
    }

    /// 掩码是否完整持有“全部权限”。
    pub fn holds_all(&self, mask: &Mask) -> bool {
        mask.contains(&self.all)
    }

    /// 掩码 → 能力描述列表（按目录声明顺序）。
    ///
    /// 值为 0 的条目被任何掩码平凡包含，因此不参与解码。
    pub fn decode(&self, mask: &Mask) -> Vec<&'static str> {
        self.entries
            .iter()
            .filter(|entry| !entry.value.is_zero() && mask.contains(&entry.value))
            .map(|entry| entry.description)
            .collect()
    }

    /// 可编辑位（排除保留项）。
    pub fn editable_bits(&self) -> Vec<&PermissionBit> {
        self.entries.iter().filter(|entry| !entry.reserved).collect()
    }

    pub fn is_editable(&self, value: &Mask) -> bool {
        self.entries
            .iter()
            .any(|entry| !entry.reserved && entry.value == *value)
    }

    /// 过滤请求值并合并为一个掩码。
    ///
    /// 不在可编辑集合中的值被静默丢弃（客户端可能持有过期目录）。
    pub fn normalize<'a, I>(&self, requested: I) -> Mask
    where
        I: IntoIterator<Item = &'a Mask>,
    {
        requested
            .into_iter()
            .filter(|value| self.is_editable(value))
            .cloned()
            .collect()
    }

    /// 将组合掩码拆分为其完整包含的可编辑位。
    pub fn components(&self, mask: &Mask) -> Vec<Mask> {
        self.editable_bits()
            .into_iter()
            .filter(|entry| mask.contains(&entry.value))
            .map(|entry| entry.value.clone())
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
enum BitSpec {
    Empty,
    Bit(u32),
    LowBits(u32),
    Union(&'static [&'static str]),
}

type Decl = (&'static str, BitSpec, &'static str, bool);

const DOMAIN_PERMISSION_TABLE: &[Decl] = &[
    (PERM_NONE, BitSpec::Empty, "No permission", true),
    (PERM_VIEW, BitSpec::Bit(0), "View this domain", false),
    (PERM_EDIT_DOMAIN, BitSpec::Bit(1), "Edit domain settings", false),
    (PERM_MOD_BADGE, BitSpec::Bit(2), "Show moderator badge", false),
    (PERM_VIEW_PROBLEM, BitSpec::Bit(3), "View problems", false),
    (PERM_CREATE_PROBLEM, BitSpec::Bit(4), "Create problems", false),
    (PERM_EDIT_PROBLEM, BitSpec::Bit(5), "Edit any problem", false),
    (PERM_EDIT_PROBLEM_SELF, BitSpec::Bit(6), "Edit own problems", false),
    (PERM_VIEW_PROBLEM_HIDDEN, BitSpec::Bit(7), "View hidden problems", false),
    (PERM_SUBMIT_PROBLEM, BitSpec::Bit(8), "Submit solutions", false),
    (PERM_READ_RECORD_CODE, BitSpec::Bit(9), "Read submitted code", false),
    (PERM_REJUDGE, BitSpec::Bit(10), "Rejudge submissions", false),
    (PERM_VIEW_DISCUSSION, BitSpec::Bit(11), "View discussions", false),
    (PERM_CREATE_DISCUSSION, BitSpec::Bit(12), "Create discussions", false),
    (PERM_EDIT_DISCUSSION, BitSpec::Bit(13), "Edit any discussion", false),
    (PERM_DELETE_DISCUSSION, BitSpec::Bit(14), "Delete discussions", false),
    (PERM_VIEW_CONTEST, BitSpec::Bit(15), "View contests", false),
    (PERM_ATTEND_CONTEST, BitSpec::Bit(16), "Attend contests", false),
    (PERM_CREATE_CONTEST, BitSpec::Bit(17), "Create contests", false),
    (PERM_EDIT_CONTEST, BitSpec::Bit(18), "Edit any contest", false),
    (PERM_VIEW_HOMEWORK, BitSpec::Bit(19), "View homework", false),
    (PERM_ATTEND_HOMEWORK, BitSpec::Bit(20), "Attend homework", false),
    (PERM_CREATE_HOMEWORK, BitSpec::Bit(21), "Create homework", false),
    (PERM_VIEW_TRAINING, BitSpec::Bit(22), "View training plans", false),
    (PERM_CREATE_TRAINING, BitSpec::Bit(23), "Create training plans", false),
    (PERM_VIEW_RANKING, BitSpec::Bit(24), "View ranking", false),
    (PERM_MANAGE_GROUP, BitSpec::Bit(64), "Manage user groups", false),
    (PERM_MANAGE_ROLE, BitSpec::Bit(65), "Manage roles and members", false),
    (PERM_VIEW_AUDIT_LOG, BitSpec::Bit(66), "View domain audit log", false),
    (
        PERM_DEFAULT,
        BitSpec::Union(&[
            PERM_VIEW,
            PERM_VIEW_PROBLEM,
            PERM_SUBMIT_PROBLEM,
            PERM_VIEW_DISCUSSION,
            PERM_CREATE_DISCUSSION,
            PERM_VIEW_CONTEST,
            PERM_ATTEND_CONTEST,
            PERM_VIEW_HOMEWORK,
            PERM_ATTEND_HOMEWORK,
            PERM_VIEW_TRAINING,
            PERM_VIEW_RANKING,
        ]),
        "Default permissions",
        true,
    ),
    (
        PERM_ALL,
        BitSpec::LowBits(DOMAIN_PERMISSION_WIDTH),
        "All permissions",
        true,
    ),
];

const SYSTEM_PRIVILEGE_TABLE: &[Decl] = &[
    (PRIV_NONE, BitSpec::Empty, "No privilege", true),
    (PRIV_USER_PROFILE, BitSpec::Bit(0), "Edit own profile", false),
    (PRIV_REGISTER_USER, BitSpec::Bit(1), "Register users", false),
    (PRIV_CREATE_DOMAIN, BitSpec::Bit(2), "Create domains", false),
    (PRIV_EDIT_SYSTEM, BitSpec::Bit(3), "Manage system settings", false),
    (PRIV_SET_PERM, BitSpec::Bit(4), "Set system privileges", false),
    (PRIV_VIEW_ALL_DOMAIN, BitSpec::Bit(5), "View all domains", false),
    (PRIV_MANAGE_ALL_DOMAIN, BitSpec::Bit(6), "Manage all domains", false),
    (PRIV_READ_PROBLEM_DATA, BitSpec::Bit(7), "Read all problem data", false),
    (PRIV_READ_RECORD_CODE, BitSpec::Bit(8), "Read all submitted code", false),
    (PRIV_VIEW_HIDDEN_RECORD, BitSpec::Bit(9), "View hidden records", false),
    (PRIV_JUDGE, BitSpec::Bit(10), "Act as judge", false),
    (PRIV_REJUDGE, BitSpec::Bit(11), "Rejudge across domains", false),
    (PRIV_VIEW_USER_SECRET, BitSpec::Bit(12), "View user secrets", false),
    (PRIV_SEND_MESSAGE, BitSpec::Bit(13), "Send messages", false),
    (PRIV_CREATE_FILE, BitSpec::Bit(14), "Upload files", false),
    (PRIV_DELETE_FILE, BitSpec::Bit(15), "Delete any file", false),
    (PRIV_UNLIMITED_QUOTA, BitSpec::Bit(16), "Unlimited storage quota", false),
    (PRIV_MOD_BADGE, BitSpec::Bit(17), "Show moderator badge", false),
    (
        PRIV_VIEW_SYSTEM_NOTIFICATION,
        BitSpec::Bit(18),
        "View system notifications",
        false,
    ),
    (PRIV_NEVER, BitSpec::Bit(20), "Never granted", true),
    (PRIV_MANAGE_PLUGIN, BitSpec::Bit(70), "Manage plugins", false),
    (
        PRIV_DEFAULT,
        BitSpec::Union(&[
            PRIV_USER_PROFILE,
            PRIV_CREATE_DOMAIN,
            PRIV_SEND_MESSAGE,
            PRIV_CREATE_FILE,
            PRIV_VIEW_SYSTEM_NOTIFICATION,
        ]),
        "Default privileges",
        true,
    ),
    (
        PRIV_ALL,
        BitSpec::LowBits(SYSTEM_PRIVILEGE_WIDTH),
        "All privileges",
        true,
    ),
];

/// 从声明表构建条目；`Union` 只能引用先前声明的 key。
fn build_entries(table: &[Decl]) -> Vec<PermissionBit> {
    let mut entries: Vec<PermissionBit> = Vec::with_capacity(table.len());
    for &(key, spec, description, reserved) in table {
        let value = match spec {
            BitSpec::Empty => Mask::zero(),
            BitSpec::Bit(index) => Mask::bit(index),
            BitSpec::LowBits(width) => Mask::low_bits(width),
            BitSpec::Union(keys) => keys
                .iter()
                .filter_map(|k| entries.iter().find(|e| e.key == *k))
                .map(|e| e.value.clone())
                .collect(),
        };
        entries.push(PermissionBit {
            key,
            value,
            description,
            reserved,
        });
    }
    entries
}

fn builtin_catalog(name: &'static str, table: &[Decl], all_key: &str) -> PermissionCatalog {
    let entries = build_entries(table);
    // 内置表由测试保证合法；若校验失败仍保留条目，避免启动期 panic。
    PermissionCatalog::new(name, entries.clone(), all_key).unwrap_or_else(|_| PermissionCatalog {
        name,
        all: entries
            .iter()
            .find(|e| e.key == all_key)
            .map(|e| e.value.clone())
            .unwrap_or_default(),
        entries,
    })
}

static DOMAIN_PERMISSIONS: OnceLock<PermissionCatalog> = OnceLock::new();
static SYSTEM_PRIVILEGES: OnceLock<PermissionCatalog> = OnceLock::new();

/// 域内权限目录。
pub fn domain_permissions() -> &'static PermissionCatalog {
    DOMAIN_PERMISSIONS
        .get_or_init(|| builtin_catalog("domain", DOMAIN_PERMISSION_TABLE, PERM_ALL))
}

/// 系统特权目录。
pub fn system_privileges() -> &'static PermissionCatalog {
    SYSTEM_PRIVILEGES
        .get_or_init(|| builtin_catalog("system", SYSTEM_PRIVILEGE_TABLE, PRIV_ALL))
}

/// 重新校验内置目录（用于启动自检与测试）。
pub fn validate_builtin_catalogs() -> Result<(), CatalogError> {
    PermissionCatalog::new("domain", build_entries(DOMAIN_PERMISSION_TABLE), PERM_ALL)?;
    PermissionCatalog::new("system", build_entries(SYSTEM_PRIVILEGE_TABLE), PRIV_ALL)?;
    Ok(())
}
