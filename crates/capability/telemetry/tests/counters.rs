use uadm_telemetry::{
    TelemetryMetrics, metrics, record_aggregation, record_guard_denied, record_omitted_entry,
};

#[test]
fn fresh_metrics_start_at_zero() {
    let snapshot = TelemetryMetrics::new().snapshot();
    assert_eq!(snapshot.aggregations, 0);
    assert_eq!(snapshot.guard_denied, 0);
}

#[test]
fn counters_accumulate() {
    let before = metrics().snapshot();
    record_aggregation(3);
    record_omitted_entry();
    record_guard_denied();
    let after = metrics().snapshot();
    assert!(after.aggregations >= before.aggregations + 1);
    assert!(after.aggregated_entries >= before.aggregated_entries + 3);
    assert!(after.omitted_entries >= before.omitted_entries + 1);
    assert!(after.guard_denied >= before.guard_denied + 1);
}
