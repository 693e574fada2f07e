//! Additional integration tests for specific request flows.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use secrecy::SecretString;
use std::sync::Arc;
use tower::ServiceExt;

use users_api::api::create_router;
use users_api::app::AppState;
use users_api::domain::{ApiResponse, CreateUserRequest, UserResponse};
use users_api::test_utils::MockDatabaseClient;

fn create_test_state() -> (Arc<AppState>, Arc<MockDatabaseClient>) {
    let db = Arc::new(MockDatabaseClient::new());
    let state = Arc::new(AppState::new(
        Arc::clone(&db) as _,
        SecretString::from("SECRET"),
    ));
    (state, db)
}

fn authorized(method: &str, uri: &str) -> axum::http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("X-API-KEY", "SECRET")
}

#[tokio::test]
async fn test_full_user_lifecycle_flow() {
    let (state, db) = create_test_state();
    let router = create_router(state);

    // 1. POST - Create user
    let create_payload = CreateUserRequest::new("John Doe", "student");

    let create_request = authorized("POST", "/api/users")
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_string(&create_payload).unwrap()))
        .unwrap();

    let create_response = router.clone().oneshot(create_request).await.unwrap();
    assert_eq!(create_response.status(), StatusCode::OK);

    let body_bytes = create_response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes();
    let created: ApiResponse<UserResponse> = serde_json::from_slice(&body_bytes).unwrap();
    let user_id = created.data.id;
    assert_eq!(created.code, 200);
    assert_eq!(created.data.name, "John Doe");

    // 2. GET - Retrieve the created user by id
    let get_request = authorized("GET", &format!("/api/users/{user_id}"))
        .body(Body::empty())
        .unwrap();

    let get_response = router.clone().oneshot(get_request).await.unwrap();
    assert_eq!(get_response.status(), StatusCode::OK);

    let body_bytes = get_response.into_body().collect().await.unwrap().to_bytes();
    let fetched: ApiResponse<UserResponse> = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(fetched.data, created.data);

    // 3. PUT - Rename, occupation is kept
    let update_request = authorized("PUT", &format!("/api/users/{user_id}"))
        .header("Content-Type", "application/json")
        .body(Body::from(r#"{"name": "Jack"}"#))
        .unwrap();

    let update_response = router.clone().oneshot(update_request).await.unwrap();
    assert_eq!(update_response.status(), StatusCode::OK);

    let body_bytes = update_response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes();
    let updated: ApiResponse<UserResponse> = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(updated.data.id, user_id);
    assert_eq!(updated.data.name, "Jack");
    assert_eq!(updated.data.occupation, "student");

    // 4. GET - List shows the renamed user
    let list_request = authorized("GET", "/api/users").body(Body::empty()).unwrap();

    let list_response = router.clone().oneshot(list_request).await.unwrap();
    assert_eq!(list_response.status(), StatusCode::OK);

    let body_bytes = list_response.into_body().collect().await.unwrap().to_bytes();
    let listed: ApiResponse<Vec<UserResponse>> = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(listed.data, vec![updated.data.clone()]);

    // 5. DELETE - Remove the user
    let delete_request = authorized("DELETE", &format!("/api/users/{user_id}"))
        .body(Body::empty())
        .unwrap();

    let delete_response = router.clone().oneshot(delete_request).await.unwrap();
    assert_eq!(delete_response.status(), StatusCode::OK);

    let body_bytes = delete_response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes();
    let deleted: ApiResponse<String> = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(deleted.data, "Deleted successfully");

    // 6. DELETE again - Already gone
    let second_delete = authorized("DELETE", &format!("/api/users/{user_id}"))
        .body(Body::empty())
        .unwrap();

    let second_response = router.clone().oneshot(second_delete).await.unwrap();
    assert_eq!(second_response.status(), StatusCode::NOT_FOUND);

    // 7. GET - No longer retrievable
    let gone_request = authorized("GET", &format!("/api/users/{user_id}"))
        .body(Body::empty())
        .unwrap();

    let gone_response = router.oneshot(gone_request).await.unwrap();
    assert_eq!(gone_response.status(), StatusCode::NOT_FOUND);

    assert!(db.get_all_users().is_empty());
    // The failed delete and the failed get both roll back
    assert_eq!(db.begun_count(), 7);
    assert_eq!(db.committed_count(), 5);
    assert_eq!(db.rolled_back_count(), 2);
}

#[tokio::test]
async fn test_post_bad_request_validation() {
    let (state, db) = create_test_state();
    let router = create_router(state);

    let invalid_payload = CreateUserRequest::new("", "student");

    let request = authorized("POST", "/api/users")
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_string(&invalid_payload).unwrap()))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let envelope: ApiResponse<String> = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(envelope.code, 400);
    assert_eq!(envelope.status, "Bad Request");
    assert!(envelope.data.contains("name"));

    // Rejected before any transaction was opened
    assert_eq!(db.begun_count(), 0);
}

#[tokio::test]
async fn test_created_users_are_listed_in_creation_order() {
    let (state, _db) = create_test_state();
    let router = create_router(state);

    let mut created = Vec::new();
    for (name, occupation) in [("Ann", "pilot"), ("Bob", "chef"), ("Cid", "smith")] {
        let request = authorized("POST", "/api/users")
            .body(Body::from(
                serde_json::to_string(&CreateUserRequest::new(name, occupation)).unwrap(),
            ))
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
        let envelope: ApiResponse<UserResponse> = serde_json::from_slice(&body_bytes).unwrap();
        created.push(envelope.data);
    }

    let ids: Vec<i64> = created.iter().map(|user| user.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let response = router
        .oneshot(authorized("GET", "/api/users").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let listed: ApiResponse<Vec<UserResponse>> = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(listed.data, created);
}
