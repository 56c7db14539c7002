//! HTTP pick tests using wiremock for isolated mocking
//!
//! Covers the reqwest transport end to end: success, non-2xx status,
//! timeouts, malformed bodies, header forwarding and connection failures.

use std::collections::HashMap;
use std::time::Duration;

use jsonpick::{
    FetchRequest, HttpTransport, PickError, PickOptions, PickSpec, Picker, Selector, Transport,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// HELPERS
// =============================================================================

fn account() -> Value {
    json!({
        "id": "GBTAPBATU6D76Y6DAU7F7LP7VOU47AIXLDRR67LV5OQNZEDROS6QF3ZX",
        "balances": [
            {"balance": "100.5", "asset_type": "credit_alphanum4"},
            {"balance": "7", "asset_type": "native"}
        ]
    })
}

async fn account_server() -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/accounts/G"))
        .respond_with(ResponseTemplate::new(200).set_body_json(account()))
        .mount(&mock_server)
        .await;
    mock_server
}

fn picker() -> Picker {
    Picker::new().expect("client builds")
}

// =============================================================================
// SUCCESS
// =============================================================================

#[tokio::test]
async fn test_pick_balances_end_to_end() {
    // Arrange
    let mock_server = account_server().await;
    let url = format!("{}/accounts/G", mock_server.uri());
    let selectors = vec![
        Selector::new("balances[0].balance").key("usd_balance"),
        Selector::new("balances[1].balance").key("xlm_balance"),
        Selector::new("balances[*].balance").key("all_balances"),
        Selector::new("memo").key("memo").default(Value::Null),
    ];
    let options = PickOptions {
        parse_numbers: true,
        ..PickOptions::default()
    };

    // Act
    let picked = picker().pick(&url, &selectors, &options).await.unwrap();

    // Assert
    assert_eq!(
        picked.to_json(),
        json!({
            "usd_balance": 100.5,
            "xlm_balance": 7,
            "all_balances": [100.5, 7],
            "memo": null
        })
    );
}

#[tokio::test]
async fn test_pick_without_number_parsing_keeps_strings() {
    let mock_server = account_server().await;
    let url = format!("{}/accounts/G", mock_server.uri());

    let picked = picker()
        .pick(&url, &[Selector::new("balances[*].balance")], &PickOptions::default())
        .await
        .unwrap();

    assert_eq!(picked.get("balances[*].balance"), Some(&json!(["100.5", "7"])));
}

#[tokio::test]
async fn test_transport_returns_parsed_document() {
    let mock_server = account_server().await;
    let transport = HttpTransport::new().unwrap();

    let document = transport
        .fetch_json(&FetchRequest::new(format!("{}/accounts/G", mock_server.uri())))
        .await
        .unwrap();

    assert_eq!(document, account());
}

#[tokio::test]
async fn test_headers_are_forwarded() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/private"))
        .and(header("Authorization", "Bearer s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut headers = HashMap::new();
    headers.insert("Authorization".to_string(), "Bearer s3cret".to_string());
    let options = PickOptions {
        headers,
        ..PickOptions::default()
    };

    let picked = picker()
        .pick(&format!("{}/private", mock_server.uri()), &[Selector::new("ok")], &options)
        .await
        .unwrap();

    assert_eq!(picked.get("ok"), Some(&json!(true)));
}

#[tokio::test]
async fn test_spec_file_runs_against_server() {
    let mock_server = account_server().await;
    let yaml = format!(
        r#"
url: {}/accounts/G
parse_numbers: true
selectors:
  - {{ key: total, path: "balances[*].balance", transform: sum }}
  - {{ key: count, path: balances, transform: length }}
  - {{ key: native, path: "balances[1].asset_type" }}
"#,
        mock_server.uri()
    );
    let spec = PickSpec::from_yaml(&yaml).unwrap();

    let picked = picker()
        .pick(&spec.url, &spec.selectors, &spec.options())
        .await
        .unwrap();

    assert_eq!(
        picked.to_json(),
        json!({"total": 107.5, "count": 2, "native": "native"})
    );
}

// =============================================================================
// FAILURES
// =============================================================================

#[tokio::test]
async fn test_non_success_status_is_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"status": 404})))
        .mount(&mock_server)
        .await;

    let err = picker()
        .pick(
            &format!("{}/missing", mock_server.uri()),
            &[Selector::new("status")],
            &PickOptions::default(),
        )
        .await
        .unwrap_err();

    match err {
        PickError::HttpStatus {
            status,
            status_text,
        } => {
            assert_eq!(status, 404);
            assert_eq!(status_text, "Not Found");
        }
        other => panic!("Expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_status() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let err = picker()
        .pick(&mock_server.uri(), &[], &PickOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "PICK-020: HTTP 500 Internal Server Error");
}

#[tokio::test]
async fn test_timeout_cancels_request() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"late": true}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let options = PickOptions {
        timeout: Duration::from_millis(200),
        ..PickOptions::default()
    };
    let err = picker()
        .pick(&mock_server.uri(), &[Selector::new("late")], &options)
        .await
        .unwrap_err();

    assert!(
        matches!(err, PickError::Timeout { timeout_ms: 200 }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn test_malformed_body_is_invalid_json() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
        .mount(&mock_server)
        .await;

    let err = picker()
        .pick(&mock_server.uri(), &[Selector::new("a")], &PickOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, PickError::InvalidJson { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Bind then drop to get a port nothing listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = picker()
        .pick(&format!("http://{}/x", addr), &[], &PickOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, PickError::Transport(_)), "got {err:?}");
}

#[tokio::test]
async fn test_invalid_url_is_rejected() {
    let err = picker()
        .pick("not a url", &[], &PickOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, PickError::InvalidUrl { .. }));
}
