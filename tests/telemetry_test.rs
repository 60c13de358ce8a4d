//! Integration tests for telemetry initialization and span helpers.

use workq::model::WorkId;
use workq::telemetry::{TelemetryConfig, init_telemetry};

#[test]
fn telemetry_initializes_once() {
    // The global subscriber can only be set once per process; the second
    // call must fail rather than panic.
    let first = init_telemetry(TelemetryConfig {
        log_level: "debug".to_string(),
    });
    let second = init_telemetry(TelemetryConfig {
        log_level: "debug".to_string(),
    });
    assert!(first.is_ok());
    assert!(second.is_err());
}

#[test]
fn work_span_records_outcome() {
    let id = WorkId::new();
    let span = workq::telemetry::work::start_work_span("sync", &id);
    workq::telemetry::work::record_outcome(&span, "superseded");

    let metadata = span.metadata().expect("span keeps its metadata");
    assert_eq!(metadata.name(), "work.submit");
    for field in ["work.type", "work.id", "work.outcome"] {
        assert!(metadata.fields().field(field).is_some(), "missing {field}");
    }
}
