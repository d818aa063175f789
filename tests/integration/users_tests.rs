//! Users API integration tests.

use std::sync::Arc;

use axum::http::StatusCode;
use tower::ServiceExt;

use apigw::backend::{CreateUserRequest, DeleteUserRequest, InMemoryBackend};
use apigw::{create_router, BackendError, RouterConfig};

use super::test_utils::{
    body_bytes, body_json, delete_request, post_json, router_with, RecordedCall,
    RecordingBackend, SAMPLE_USER,
};

#[tokio::test]
async fn test_post_users_created() {
    let backend = Arc::new(RecordingBackend::new());
    let router = router_with(&backend);

    let response = router.oneshot(post_json("/users", SAMPLE_USER)).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        backend.calls(),
        vec![RecordedCall::CreateUser(CreateUserRequest {
            id: "1".to_string(),
            username: "test".to_string(),
            password: "123".to_string(),
        })]
    );
}

#[tokio::test]
async fn test_post_users_password_untouched() {
    let backend = Arc::new(RecordingBackend::new());
    let router = router_with(&backend);

    let body = r#"{"id":"2","username":" Mixed Case ","password":"  päss \"q\" "}"#;
    let response = router.oneshot(post_json("/users", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    match backend.calls().as_slice() {
        [RecordedCall::CreateUser(request)] => {
            assert_eq!(request.username, " Mixed Case ");
            assert_eq!(request.password, "  päss \"q\" ");
        }
        calls => panic!("unexpected calls: {:?}", calls),
    }
}

#[tokio::test]
async fn test_post_users_already_exists() {
    let backend = Arc::new(RecordingBackend::failing_with(BackendError::AlreadyExists(
        "user 1 already exists".to_string(),
    )));
    let router = router_with(&backend);

    let response = router.oneshot(post_json("/users", SAMPLE_USER)).await.unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error"], "already_exists");
}

#[tokio::test]
async fn test_delete_users_no_content() {
    let backend = Arc::new(RecordingBackend::new());
    let router = router_with(&backend);

    let response = router.oneshot(delete_request("/users/1")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(response).await.is_empty());
    assert_eq!(
        backend.calls(),
        vec![RecordedCall::DeleteUser(DeleteUserRequest::new("1"))]
    );
}

#[tokio::test]
async fn test_delete_users_not_found() {
    let backend = Arc::new(RecordingBackend::failing_with(BackendError::NotFound(
        "user 9 not found".to_string(),
    )));
    let router = router_with(&backend);

    let response = router.oneshot(delete_request("/users/9")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        backend.calls(),
        vec![RecordedCall::DeleteUser(DeleteUserRequest::new("9"))]
    );
}

#[tokio::test]
async fn test_user_lifecycle_in_memory() {
    let backend = Arc::new(InMemoryBackend::new());
    let router = create_router(
        Arc::clone(&backend),
        Arc::clone(&backend),
        RouterConfig::default().with_tracing(false),
    );

    let response = router
        .clone()
        .oneshot(post_json("/users", SAMPLE_USER))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(backend.user_count().await, 1);

    let response = router
        .clone()
        .oneshot(delete_request("/users/1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = router.oneshot(delete_request("/users/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
