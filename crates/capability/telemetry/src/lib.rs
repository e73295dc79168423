//! 追踪、请求 ID 与授权计数器。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 计数器快照。
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub aggregations: u64,
    pub aggregated_entries: u64,
    pub omitted_entries: u64,
    pub missing_tenants: u64,
    pub guard_allowed: u64,
    pub guard_denied: u64,
    pub privilege_writes: u64,
    pub credential_resets: u64,
    pub bans: u64,
}

/// 授权核心计数器。
pub struct TelemetryMetrics {
    aggregations: AtomicU64,
    aggregated_entries: AtomicU64,
    omitted_entries: AtomicU64,
    missing_tenants: AtomicU64,
    guard_allowed: AtomicU64,
    guard_denied: AtomicU64,
    privilege_writes: AtomicU64,
    credential_resets: AtomicU64,
    bans: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            aggregations: AtomicU64::new(0),
            aggregated_entries: AtomicU64::new(0),
            omitted_entries: AtomicU64::new(0),
            missing_tenants: AtomicU64::new(0),
            guard_allowed: AtomicU64::new(0),
            guard_denied: AtomicU64::new(0),
            privilege_writes: AtomicU64::new(0),
            credential_resets: AtomicU64::new(0),
            bans: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            aggregations: self.aggregations.load(Ordering::Relaxed),
            aggregated_entries: self.aggregated_entries.load(Ordering::Relaxed),
            omitted_entries: self.omitted_entries.load(Ordering::Relaxed),
            missing_tenants: self.missing_tenants.load(Ordering::Relaxed),
            guard_allowed: self.guard_allowed.load(Ordering::Relaxed),
            guard_denied: self.guard_denied.load(Ordering::Relaxed),
            privilege_writes: self.privilege_writes.load(Ordering::Relaxed),
            credential_resets: self.credential_resets.load(Ordering::Relaxed),
            bans: self.bans.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局指标实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    init_tracing_with_default("info");
}

/// 初始化 tracing；`RUST_LOG` 优先于 `default_filter`。
pub fn init_tracing_with_default(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    if fmt().with_env_filter(filter).try_init().is_ok() {
        tracing::debug!(target: "uadm.telemetry", default_filter, "tracing_initialized");
    }
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 记录一次跨域聚合及其输出条目数。
pub fn record_aggregation(entries: u64) {
    let metrics = metrics();
    metrics.aggregations.fetch_add(1, Ordering::Relaxed);
    metrics
        .aggregated_entries
        .fetch_add(entries, Ordering::Relaxed);
}

/// 记录因租户查询失败而省略的条目。
pub fn record_omitted_entry() {
    metrics().omitted_entries.fetch_add(1, Ordering::Relaxed);
}

/// 记录租户记录已不存在的成员关系。
pub fn record_missing_tenant() {
    metrics().missing_tenants.fetch_add(1, Ordering::Relaxed);
}

/// 记录守卫放行。
pub fn record_guard_allowed() {
    metrics().guard_allowed.fetch_add(1, Ordering::Relaxed);
}

/// 记录守卫拒绝。
pub fn record_guard_denied() {
    metrics().guard_denied.fetch_add(1, Ordering::Relaxed);
}

/// 记录系统特权写入。
pub fn record_privilege_write() {
    metrics().privilege_writes.fetch_add(1, Ordering::Relaxed);
}

/// 记录密码重置。
pub fn record_credential_reset() {
    metrics().credential_resets.fetch_add(1, Ordering::Relaxed);
}

/// 记录封禁。
pub fn record_ban() {
    metrics().bans.fetch_add(1, Ordering::Relaxed);
}
