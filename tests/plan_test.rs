//! Integration tests for plan replay.

use serde_json::json;
use workq::engine::Engine;
use workq::error::Error;
use workq::plan::{Plan, Step};

#[test]
fn plan_parses_tagged_steps() {
    let plan = Plan::from_toml_str(
        r#"
        [[step]]
        action = "submit"
        work_type = "sync"
        dedup_key = "account=7"
        priority = 3

        [[step]]
        action = "claim"
        worker = "w1"

        [[step]]
        action = "clear"
        "#,
    )
    .unwrap();

    assert_eq!(plan.step.len(), 3);
    assert!(matches!(
        &plan.step[0],
        Step::Submit { work_type, priority: Some(3), source, .. }
            if work_type == "sync" && source == "plan"
    ));
    assert_eq!(
        plan.step[1],
        Step::Claim {
            worker: "w1".to_string()
        }
    );
    assert_eq!(plan.step[2], Step::Clear);
}

#[test]
fn plan_replays_dedup_in_place() {
    let plan = Plan::from_toml_str(
        r#"
        [[step]]
        action = "submit"
        work_type = "a"
        priority = 0

        [[step]]
        action = "submit"
        work_type = "sync"
        dedup_key = "k"
        priority = 0

        [[step]]
        action = "submit"
        work_type = "c"
        priority = 0

        [[step]]
        action = "submit"
        work_type = "sync"
        dedup_key = "k"
        priority = 0
        params = '{"attempt": 2}'

        [[step]]
        action = "submit"
        work_type = "front"
        urgent = true

        [[step]]
        action = "drain"
        "#,
    )
    .unwrap();

    let mut engine = Engine::default();
    let claimed = plan.run(&mut engine).unwrap();

    let order: Vec<_> = claimed.iter().map(|w| w.work_type.as_str()).collect();
    assert_eq!(order, vec!["front", "a", "sync", "c"]);
    assert_eq!(claimed[2].params, json!({"attempt": 2}));
    assert_eq!(engine.pending_count(), 0);
}

#[test]
fn plan_claim_and_clear_leave_expected_state() {
    let plan = Plan::from_toml_str(
        r#"
        [[step]]
        action = "submit"
        work_type = "a"

        [[step]]
        action = "claim"

        [[step]]
        action = "claim"

        [[step]]
        action = "submit"
        work_type = "b"

        [[step]]
        action = "submit"
        work_type = "c"

        [[step]]
        action = "clear"
        "#,
    )
    .unwrap();

    let mut engine = Engine::default();
    let claimed = plan.run(&mut engine).unwrap();

    assert_eq!(claimed.len(), 1);
    assert_eq!(claimed[0].work_type, "a");
    assert_eq!(engine.pending_count(), 0);
    assert_eq!(engine.get_events_since(0).len(), 5);
}

#[test]
fn plan_surfaces_engine_errors() {
    let plan = Plan::from_toml_str(
        r#"
        [[step]]
        action = "submit"
        work_type = "a"

        [[step]]
        action = "submit"
        work_type = "b"
        position = 4
        "#,
    )
    .unwrap();

    let mut engine = Engine::default();
    let err = plan.run(&mut engine).unwrap_err();
    assert!(matches!(err, Error::IndexOutOfRange { index: 4, .. }));
    assert_eq!(engine.pending_count(), 1);
}

#[test]
fn plan_rejects_unknown_action() {
    let err = Plan::from_toml_str(
        r#"
        [[step]]
        action = "explode"
        "#,
    )
    .unwrap_err();
    assert!(matches!(err, Error::Plan(_)));
}

#[test]
fn plan_rejects_misspelled_step_field() {
    let err = Plan::from_toml_str(
        r#"
        [[step]]
        action = "submit"
        work_type = "sync"
        dedupkey = "k"
        "#,
    )
    .unwrap_err();
    assert!(matches!(err, Error::Plan(_)));
}

#[test]
fn plan_rejects_invalid_params_json() {
    let plan = Plan::from_toml_str(
        r#"
        [[step]]
        action = "submit"
        work_type = "a"
        params = "{not json"
        "#,
    )
    .unwrap();

    let mut engine = Engine::default();
    assert!(matches!(plan.run(&mut engine), Err(Error::Json(_))));
}
