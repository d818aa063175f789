//! HTTP backend client integration tests.
//!
//! A fake RPC service is started on a local port; the gateway talks to it
//! through `HttpBackendClient`, so these tests cover the full path from the
//! inbound HTTP request to the backend wire format and back.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use tower::ServiceExt;
use url::Url;

use apigw::backend::{CallContext, DeleteLinkRequest, HttpBackendClient, LinksClient, RpcStatus};
use apigw::{create_router, BackendError, RouterConfig};

use super::test_utils::{
    body_bytes, body_json, delete_request, post_json, SAMPLE_LINK, SAMPLE_USER,
};

// =============================================================================
// Fake RPC Service
// =============================================================================

#[derive(Debug, Clone)]
struct ReceivedCall {
    service: String,
    method: String,
    body: serde_json::Value,
    request_id: Option<String>,
}

#[derive(Clone, Default)]
struct FakeService {
    calls: Arc<Mutex<Vec<ReceivedCall>>>,
    reply: Arc<Mutex<Option<(StatusCode, String)>>>,
}

impl FakeService {
    fn reply_with(&self, status: StatusCode, body: impl Into<String>) {
        *self.reply.lock().unwrap() = Some((status, body.into()));
    }

    fn calls(&self) -> Vec<ReceivedCall> {
        self.calls.lock().unwrap().clone()
    }
}

async fn fake_rpc(
    State(service): State<FakeService>,
    Path((name, method)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response {
    service.calls.lock().unwrap().push(ReceivedCall {
        service: name,
        method,
        body,
        request_id: headers
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });

    match service.reply.lock().unwrap().clone() {
        Some((status, body)) => (status, body).into_response(),
        None => Json(serde_json::json!({})).into_response(),
    }
}

/// Start the fake service and return its base URL.
async fn start_fake_service(service: FakeService) -> Url {
    let app = Router::new()
        .route("/rpc/{service}/{method}", post(fake_rpc))
        .with_state(service);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Url::parse(&format!("http://{}/rpc", addr)).unwrap()
}

fn gateway_for(base_url: Url) -> Router {
    let client = Arc::new(HttpBackendClient::new(base_url, Duration::from_secs(2)).unwrap());
    create_router(
        Arc::clone(&client),
        client,
        RouterConfig::default().with_tracing(false),
    )
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_create_link_wire_format() {
    let service = FakeService::default();
    let base_url = start_fake_service(service.clone()).await;
    let gateway = gateway_for(base_url);

    let mut request = post_json("/links", SAMPLE_LINK);
    request
        .headers_mut()
        .insert("x-request-id", "trace-7".parse().unwrap());
    let response = gateway.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let calls = service.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].service, "LinkService");
    assert_eq!(calls[0].method, "CreateLink");
    assert_eq!(calls[0].request_id.as_deref(), Some("trace-7"));
    assert_eq!(
        calls[0].body,
        serde_json::json!({
            "id": "1",
            "title": "Test",
            "url": "http://test.com",
            "images": ["test1", "test2"],
            "tags": ["tag1", "tag2"],
            "userId": "user1"
        })
    );
}

#[tokio::test]
async fn test_create_and_delete_user_wire_format() {
    let service = FakeService::default();
    let base_url = start_fake_service(service.clone()).await;
    let gateway = gateway_for(base_url);

    let response = gateway
        .clone()
        .oneshot(post_json("/users", SAMPLE_USER))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = gateway.oneshot(delete_request("/users/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let calls = service.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].method, "CreateUser");
    assert_eq!(
        calls[0].body,
        serde_json::json!({"id": "1", "username": "test", "password": "123"})
    );
    assert_eq!(calls[1].service, "UserService");
    assert_eq!(calls[1].method, "DeleteUser");
    assert_eq!(calls[1].body, serde_json::json!({"id": "1"}));
}

#[tokio::test]
async fn test_rpc_status_body_classified() {
    let service = FakeService::default();
    service.reply_with(
        StatusCode::INTERNAL_SERVER_ERROR,
        serde_json::to_string(&RpcStatus {
            code: "NOT_FOUND".to_string(),
            message: "link 1 not found".to_string(),
        })
        .unwrap(),
    );
    let base_url = start_fake_service(service.clone()).await;
    let gateway = gateway_for(base_url);

    let response = gateway.oneshot(delete_request("/links/1")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error = body_json(response).await;
    assert_eq!(error["error"], "not_found");
    assert!(error["message"].as_str().unwrap().contains("link 1 not found"));
}

#[tokio::test]
async fn test_plain_status_classified() {
    let service = FakeService::default();
    service.reply_with(StatusCode::CONFLICT, "duplicate id");
    let base_url = start_fake_service(service.clone()).await;
    let gateway = gateway_for(base_url);

    let response = gateway.oneshot(post_json("/links", SAMPLE_LINK)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_unreachable_backend_is_unavailable() {
    // Bind then drop a listener so the port is very likely closed
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let base_url = Url::parse(&format!("http://{}/internal-rpc", addr)).unwrap();
    let client = HttpBackendClient::new(base_url, Duration::from_secs(1)).unwrap();

    let err = client
        .delete_link(&CallContext::new(), DeleteLinkRequest::new("1"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        BackendError::Unavailable("LinkService unreachable".to_string())
    );

    let gateway = gateway_for(client.base_url().clone());
    let response = gateway.oneshot(delete_request("/links/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    // The backend address stays in the logs, never in the response
    let body = String::from_utf8(body_bytes(response).await.to_vec()).unwrap();
    assert!(body.contains("backend_unavailable"));
    assert!(!body.contains("internal-rpc"), "body leaks backend url: {}", body);
    assert!(!body.contains(&addr.to_string()), "body leaks backend address: {}", body);
}

#[tokio::test]
async fn test_large_error_body_is_truncated() {
    let service = FakeService::default();
    service.reply_with(StatusCode::INTERNAL_SERVER_ERROR, "e".repeat(5 * 1024 * 1024));
    let base_url = start_fake_service(service).await;
    let gateway = gateway_for(base_url);

    let response = gateway.oneshot(delete_request("/links/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_bytes(response).await;
    assert!(body.len() < 1024, "response body is {} bytes", body.len());

    let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["error"], "internal");
    let message = error["message"].as_str().unwrap();
    assert!(message.contains("eeee"));
    assert!(message.ends_with("..."));
}

#[tokio::test]
async fn test_probe_reports_status() {
    let service = FakeService::default();
    let base_url = start_fake_service(service).await;
    let client = HttpBackendClient::new(base_url, Duration::from_secs(1)).unwrap();

    // GET on the base path is not routed by the fake service
    let status = client.probe().await.unwrap();
    assert_eq!(status, StatusCode::NOT_FOUND);
}
