use uadm_telemetry::init_tracing_with_default;

#[test]
fn repeated_init_is_harmless() {
    init_tracing_with_default("debug");
    init_tracing_with_default("info");
    tracing::info!(target: "uadm.telemetry", "after_init");
}
