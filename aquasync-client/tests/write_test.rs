use aquasync_client::configs::SyncConfig;
use aquasync_client::error::ClientError;
use aquasync_mock::store::WriteOp;
use serde_json::json;

use crate::common::{setup, setup_with};

mod common;

fn config_for(source_id: &str) -> SyncConfig {
    SyncConfig {
        source_id: source_id.to_string(),
        ..SyncConfig::default()
    }
}

#[tokio::test]
async fn test_invalid_input_makes_no_remote_calls() {
    let (store, _sink, controller) = setup();

    for raw in ["", "   ", "abc", "12,5"] {
        let error = controller.submit_measurement(raw).await.unwrap_err();
        assert!(matches!(error, ClientError::InvalidInput), "input {raw:?}");
    }

    assert!(store.writes().is_empty());
}

#[tokio::test]
async fn test_above_threshold_submission_issues_three_ordered_writes() {
    let (store, _sink, controller) = setup_with(config_for("X"));

    controller.submit_measurement("1500").await.unwrap();

    let writes = store.writes();
    assert_eq!(writes.len(), 3);

    let WriteOp::Set { path, value } = &writes[0] else {
        panic!("expected latest write first, got {:?}", writes[0]);
    };
    assert_eq!(path, "latest");
    assert_eq!(value, &json!({ "turbidity": 1500.0 }));

    let WriteOp::SetChild { path, key, value } = &writes[1] else {
        panic!("expected history append second, got {:?}", writes[1]);
    };
    assert_eq!(path, "readings");
    assert_eq!(value["turbidity"], 1500.0);
    assert_eq!(value["unit"], "NTU");
    assert_eq!(value["device_id"], "X");
    assert_eq!(value["timestamp"], json!(key));
    let history_key = key.clone();

    let WriteOp::SetChild { path, key, value } = &writes[2] else {
        panic!("expected alert write last, got {:?}", writes[2]);
    };
    assert_eq!(path, "alerts");
    assert_eq!(key, &history_key);
    assert_eq!(value["type"], "high_turbidity");
    assert_eq!(value["value"], 1500.0);
    assert!(value["message"].as_str().unwrap().contains("1500"));
}

#[tokio::test]
async fn test_below_threshold_submission_skips_the_alert_write() {
    let (store, _sink, controller) = setup_with(config_for("X"));

    controller.submit_measurement("500").await.unwrap();

    let writes = store.writes();
    assert_eq!(writes.len(), 2);
    assert!(!writes.iter().any(|w| matches!(
        w,
        WriteOp::SetChild { path, .. } if path == "alerts"
    )));
}

#[tokio::test]
async fn test_history_failure_aborts_alert_but_keeps_latest() {
    let (store, _sink, controller) = setup();
    store.fail_writes_to("readings");

    let error = controller.submit_measurement("1500").await.unwrap_err();
    assert!(matches!(error, ClientError::RemoteWriteFailed(_)));

    // The completed latest write is not rolled back, and the alert step
    // was never attempted. This is the documented inconsistency window.
    assert_eq!(store.writes().len(), 1);
    assert_eq!(store.value_at("latest"), Some(json!({ "turbidity": 1500.0 })));
    assert_eq!(store.value_at("alerts"), None);
}

#[tokio::test]
async fn test_latest_failure_aborts_the_whole_pipeline() {
    let (store, _sink, controller) = setup();
    store.fail_writes_to("latest");

    let error = controller.submit_measurement("1500").await.unwrap_err();
    assert!(matches!(error, ClientError::RemoteWriteFailed(_)));
    assert!(store.writes().is_empty());
}

#[tokio::test]
async fn test_push_history_entry_uses_store_generated_keys() {
    let (store, _sink, controller) = setup_with(config_for("Android App"));

    controller.push_history_entry("77").await.unwrap();
    controller.push_history_entry("78").await.unwrap();

    let writes = store.writes();
    assert_eq!(writes.len(), 4);
    assert_eq!(
        writes[0],
        WriteOp::Set {
            path: "latest".to_string(),
            value: json!(77),
        }
    );

    let keys: Vec<String> = writes
        .iter()
        .filter_map(|w| match w {
            WriteOp::SetChild { path, key, value } if path == "readings" => {
                assert_eq!(value["source"], "Android App");
                assert!(value["timestamp"].as_i64().unwrap() > 0);
                Some(key.clone())
            }
            _ => None,
        })
        .collect();
    assert_eq!(keys.len(), 2);
    assert!(keys[1] > keys[0]);
}

#[tokio::test]
async fn test_push_history_entry_rejects_non_integer_input() {
    let (store, _sink, controller) = setup();

    let error = controller.push_history_entry("12.5").await.unwrap_err();
    assert!(matches!(error, ClientError::InvalidInput));
    assert!(store.writes().is_empty());
}

#[tokio::test]
async fn test_submission_works_while_stopped_and_echoes_after_start() {
    let (store, sink, controller) = setup();

    // Writes do not require an active subscription set.
    controller.submit_measurement("250.5").await.unwrap();

    controller.start().await.unwrap();
    let current = sink
        .events()
        .into_iter()
        .find_map(|e| match e {
            crate::common::SinkEvent::CurrentValue(m) => Some(m),
            _ => None,
        })
        .unwrap();

    // Local state comes only from the store echo, like any other writer.
    assert_eq!(current.value, 250.5);
    assert_eq!(store.writes().len(), 2);
}
