//! Brickset client integration tests against a local fake SOAP endpoint.
//!
//! The fake answers like the real service: a JSON document immediately
//! followed by the SOAP envelope.

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use serde_json::json;

use brickvault_core::{
    BricksetClient, BricksetConfig, CatalogApi, CatalogApiError, SetRecord, SetsQuery,
};

const XML_TAIL: &str = r#"<?xml version="1.0" encoding="utf-8"?><soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body/></soap:Envelope>"#;

/// One request seen by the fake.
#[derive(Debug, Clone)]
struct SeenRequest {
    soap_action: String,
    content_type: String,
    body: String,
}

#[derive(Clone)]
struct FakeState {
    seen: Arc<Mutex<Vec<SeenRequest>>>,
    login_reply: serde_json::Value,
    fail_with: Option<StatusCode>,
}

async fn handle(State(state): State<FakeState>, headers: HeaderMap, body: String) -> Response {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };
    let soap_action = header("soapaction");

    state.seen.lock().unwrap().push(SeenRequest {
        soap_action: soap_action.clone(),
        content_type: header("content-type"),
        body,
    });

    if let Some(status) = state.fail_with {
        return (status, "Server Error").into_response();
    }

    let payload = match soap_action.as_str() {
        "https://brickset.com/api/login" => state.login_reply.clone(),
        "https://brickset.com/api/getSets" => json!({
            "status": "success",
            "matches": 2,
            "sets": [
                {
                    "setID": 1,
                    "number": "6080",
                    "numberVariant": 1,
                    "name": "King's Castle",
                    "theme": "Castle",
                    "year": 1984,
                    "pieces": 673,
                    "image": { "imageURL": "https://images.brickset.com/sets/images/6080-1.jpg" }
                },
                {
                    "setID": 2,
                    "number": "6081",
                    "numberVariant": 1,
                    "name": "King's Mountain Fortress {Guarded}",
                    "theme": "Castle",
                    "year": 1990
                }
            ]
        }),
        _ => return (StatusCode::BAD_REQUEST, "unknown action").into_response(),
    };

    (StatusCode::OK, format!("{}{}", payload, XML_TAIL)).into_response()
}

struct FakeBrickset {
    base_url: String,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl FakeBrickset {
    async fn start(login_reply: serde_json::Value, fail_with: Option<StatusCode>) -> Self {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let state = FakeState {
            seen: Arc::clone(&seen),
            login_reply,
            fail_with,
        };

        let app = Router::new()
            .route("/api/v3.asmx", post(handle))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake listener");
        let addr = listener.local_addr().expect("Failed to read listener addr");

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{}/api/v3.asmx", addr),
            seen,
        }
    }

    fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }

    fn client(&self, username: Option<&str>) -> BricksetClient {
        BricksetClient::new(BricksetConfig {
            api_key: "test-key".to_string(),
            username: username.map(str::to_string),
            password: username.map(|_| "secret".to_string()),
            base_url: self.base_url.clone(),
            timeout_secs: 5,
        })
        .expect("Failed to create client")
    }
}

fn login_ok() -> serde_json::Value {
    json!({ "status": "success", "hash": "user-hash-123" })
}

#[tokio::test]
async fn test_login_is_performed_once() {
    let fake = FakeBrickset::start(login_ok(), None).await;
    let client = fake.client(Some("builder"));

    assert_eq!(client.authenticate().await.as_deref(), Some("user-hash-123"));
    assert_eq!(client.authenticate().await.as_deref(), Some("user-hash-123"));

    let seen = fake.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].soap_action, "https://brickset.com/api/login");
    assert!(seen[0].content_type.starts_with("text/xml"));
    assert!(seen[0].body.contains("<apiKey>test-key</apiKey>"));
    assert!(seen[0].body.contains("<username>builder</username>"));
    assert!(seen[0].body.contains("<password>secret</password>"));
}

#[tokio::test]
async fn test_rejected_login_returns_none() {
    let fake = FakeBrickset::start(
        json!({ "status": "error", "message": "Invalid username or password" }),
        None,
    )
    .await;
    let client = fake.client(Some("builder"));

    assert_eq!(client.authenticate().await, None);
    assert_eq!(client.user_hash().await, None);
}

#[tokio::test]
async fn test_no_credentials_skips_login() {
    let fake = FakeBrickset::start(login_ok(), None).await;
    let client = fake.client(None);

    assert_eq!(client.authenticate().await, None);
    assert!(fake.seen().is_empty());
}

#[tokio::test]
async fn test_get_sets_decodes_hybrid_reply() {
    let fake = FakeBrickset::start(login_ok(), None).await;
    let client = fake.client(Some("builder"));
    client.authenticate().await;

    let page = client
        .list_sets(&SetsQuery::theme_page("Castle", 500, 1))
        .await
        .unwrap();

    assert!(page.is_success());
    assert_eq!(page.matches, 2);
    assert_eq!(page.sets.len(), 2);

    let first = SetRecord::from_api(&page.sets[0]).unwrap();
    assert_eq!(first.set_number, "6080-1");
    assert_eq!(first.piece_count, 673);
    let second = SetRecord::from_api(&page.sets[1]).unwrap();
    assert_eq!(second.name, "King's Mountain Fortress {Guarded}");
    assert_eq!(second.piece_count, 0);

    let seen = fake.seen();
    let request = &seen[1];
    assert_eq!(request.soap_action, "https://brickset.com/api/getSets");
    assert!(request.body.contains("<userHash>user-hash-123</userHash>"));
    assert!(request.body.contains("<apiKey>test-key</apiKey>"));
    assert!(request.body.contains("&quot;theme&quot;:&quot;Castle&quot;"));
    assert!(request.body.contains("&quot;pageSize&quot;:500"));
    assert!(request.body.contains("&quot;pageNumber&quot;:1"));
    assert!(!request.body.contains("year"));
    assert!(!request.body.contains("&quot;query&quot;"));
}

#[tokio::test]
async fn test_get_sets_without_login_sends_empty_hash() {
    let fake = FakeBrickset::start(login_ok(), None).await;
    let client = fake.client(None);

    client
        .list_sets(&SetsQuery::theme_page("Castle", 500, 1))
        .await
        .unwrap();

    let seen = fake.seen();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].body.contains("<userHash></userHash>"));
}

#[tokio::test]
async fn test_http_error_status() {
    let fake = FakeBrickset::start(login_ok(), Some(StatusCode::INTERNAL_SERVER_ERROR)).await;
    let client = fake.client(None);

    let err = client
        .list_sets(&SetsQuery::theme_page("Castle", 500, 1))
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogApiError::ApiError { status: 500, .. }));
}

#[tokio::test]
async fn test_cleared_session_logs_in_again() {
    let fake = FakeBrickset::start(login_ok(), None).await;
    let client = fake.client(Some("builder"));

    client.authenticate().await;
    client.clear_session().await;
    client.authenticate().await;

    let logins = fake
        .seen()
        .iter()
        .filter(|r| r.soap_action.ends_with("/login"))
        .count();
    assert_eq!(logins, 2);
}
