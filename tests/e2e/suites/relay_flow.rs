//! 检测结果中继测试套件

use crate::setup::TestEnvironment;
use reqwest::StatusCode;
use serde_json::json;
use std::time::Duration;
use uuid::Uuid;

#[tokio::test]
#[ignore = "需要运行服务"]
async fn test_publish_then_visible_in_results() {
    let (relay, _kafka) = TestEnvironment::setup_relay_only().await.unwrap();
    let run_id = Uuid::new_v4().to_string();

    let (status, body) = relay
        .publish(&json!({"runId": run_id, "violations": 3}))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Message published successfully");

    let found = TestEnvironment::wait_for_result(&relay, Duration::from_secs(10), |v| {
        v["runId"] == run_id.as_str()
    })
    .await
    .unwrap();
    assert_eq!(found["violations"], 3);
}

#[tokio::test]
#[ignore = "需要运行服务"]
async fn test_published_result_lands_in_topic() {
    let (relay, kafka) = TestEnvironment::setup_relay_only().await.unwrap();
    let run_id = Uuid::new_v4().to_string();

    let (status, _) = relay.publish(&json!({"runId": run_id})).await.unwrap();
    assert_eq!(status, StatusCode::OK);

    let found = kafka
        .find_in_topic(Duration::from_secs(15), |v| v["runId"] == run_id.as_str())
        .await
        .unwrap();
    assert!(found.is_some(), "topic 中应包含刚发布的结果");
}

#[tokio::test]
#[ignore = "需要运行服务"]
async fn test_external_producer_results_are_buffered() {
    let (relay, kafka) = TestEnvironment::setup_relay_only().await.unwrap();
    let run_id = Uuid::new_v4().to_string();

    kafka
        .send_result(&json!({"runId": run_id, "source": "external"}))
        .await
        .unwrap();

    let found = TestEnvironment::wait_for_result(&relay, Duration::from_secs(10), |v| {
        v["runId"] == run_id.as_str()
    })
    .await
    .unwrap();
    assert_eq!(found["source"], "external");
}

#[tokio::test]
#[ignore = "需要运行服务"]
async fn test_non_json_message_is_skipped() {
    let (relay, kafka) = TestEnvironment::setup_relay_only().await.unwrap();
    let marker = Uuid::new_v4().to_string();

    kafka.send_raw("definitely not json").await.unwrap();
    kafka.send_result(&json!({"marker": marker})).await.unwrap();

    // 后续合法消息仍能被消费，说明消费循环没有因坏消息中断
    TestEnvironment::wait_for_result(&relay, Duration::from_secs(10), |v| {
        v["marker"] == marker.as_str()
    })
    .await
    .unwrap();

    let results = relay.results().await.unwrap();
    assert!(results.iter().all(|v| v != "definitely not json"));
}

#[tokio::test]
#[ignore = "需要运行服务"]
async fn test_malformed_publish_body_rejected() {
    let (relay, _kafka) = TestEnvironment::setup_relay_only().await.unwrap();

    let status = relay
        .publish_raw("{broken", "application/json")
        .await
        .unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
