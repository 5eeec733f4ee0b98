/*
[INPUT]:  Mock Linguo HTTP server
[OUTPUT]: End-to-end checks of the runtime over the real HTTP client
[POS]:    Integration tests - adapter and core wired together
[UPDATE]: When endpoints or error mapping change
*/

use std::sync::Arc;
use std::time::Duration;

use linguo_adapter::{ClientConfig, DisputeStatus, LinguoClient, Ruling};
use linguo_core::{Action, ActionError, LoadingState, Runtime, TxWatchConfig};
use rust_decimal::Decimal;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn runtime_for(server: &MockServer) -> Runtime {
    let client = LinguoClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
        .expect("client init");
    let tx_config = TxWatchConfig {
        poll_interval: Duration::from_millis(1),
        timeout: Duration::from_millis(200),
        confirmations: 1,
    };
    Runtime::new(Arc::new(client), tx_config)
}

#[tokio::test]
async fn test_dispute_fetched_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/7/dispute"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "taskId": 7,
            "status": "appealable",
            "ruling": "translationApproved",
            "appealPeriod": {"start": 1600000000, "end": 1600086400},
            "appealCost": "100",
            "multipliers": {"shared": 10000, "winner": 5000, "loser": 20000, "divisor": 10000},
            "currentRound": {
                "paidFees": {"translator": "0", "challenger": "50"},
                "hasPaid": {"translator": false, "challenger": false}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut runtime = runtime_for(&server);
    runtime.dispatch(Action::fetch_dispute_by_task_id(7)).await;
    runtime.run_until_idle().await;

    let disputes = &runtime.state().disputes;
    assert_eq!(disputes.select_loading_state(7), LoadingState::Succeeded);
    let dispute = disputes.select_by_task_id(7).expect("dispute stored");
    assert_eq!(dispute.status, DisputeStatus::Appealable);
    assert_eq!(dispute.ruling, Ruling::TranslationApproved);
    assert_eq!(dispute.current_round.paid_fees.challenger, Decimal::from(50));
    assert_eq!(disputes.select_task_id_from_dispute_id(42), Some(7));
}

#[tokio::test]
async fn test_http_error_is_stored_on_the_entry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/8/dispute"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "code": 500,
            "message": "backend unavailable"
        })))
        .mount(&server)
        .await;

    let mut runtime = runtime_for(&server);
    runtime.dispatch(Action::fetch_dispute_by_task_id(8)).await;
    runtime.run_until_idle().await;

    let disputes = &runtime.state().disputes;
    assert_eq!(disputes.select_loading_state(8), LoadingState::Failed);
    assert!(matches!(
        disputes.select_error(8),
        Some(ActionError::Api { .. } | ActionError::Network { .. })
    ));
    assert!(disputes.select_by_task_id(8).is_none());
}
