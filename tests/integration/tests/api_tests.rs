//! REST collaborator tests
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{assert_json, fixtures::*, TestServer};
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.unwrap();
    let response = server.get("/health").await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_fixture_users_are_listed_in_file_order() {
    let server = TestServer::start().await.unwrap();
    let users = assert_json(server.get("/users").await.unwrap(), StatusCode::OK)
        .await
        .unwrap();

    let ids: Vec<&str> = users
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|user| user["id"].as_str())
        .collect();
    assert_eq!(ids, vec!["alice", "bob", "carol"]);
}

#[tokio::test]
async fn test_chat_message_is_stored_and_pushed() {
    let server = TestServer::start().await.unwrap();
    let mut a = server.connect().await.unwrap();
    let mut b = server.connect().await.unwrap();

    let created = assert_json(
        server
            .post("/chat", &json!({"user": "alice", "text": "hello"}))
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();
    assert_eq!(created["_id"], 0);

    for client in [&mut a, &mut b] {
        let push = client.recv_event("message").await.unwrap();
        assert_eq!(push["d"], created);
    }

    let fetched = assert_json(server.get("/chat/0").await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_eq!(fetched["text"], "hello");
}

#[tokio::test]
async fn test_form_encoded_message() {
    let server = TestServer::start().await.unwrap();
    let response = server
        .client
        .post(format!("{}/chat", server.base_url()))
        .header("content-type", "application/x-www-form-urlencoded")
        .body("user=bob&text=hi+there")
        .send()
        .await
        .unwrap();

    let created = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(created["text"], "hi there");
}

#[tokio::test]
async fn test_user_directory_crud() {
    let server = TestServer::start().await.unwrap();

    let created = assert_json(
        server.post("/users", &json!({"id": "erin", "name": "Erin"})).await.unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();
    let record_id = created["_id"].as_u64().unwrap();

    let fetched = assert_json(
        server.get(&format!("/users/{record_id}")).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(fetched["name"], "Erin");

    let duplicate = server.post("/users", &json!({"id": "erin"})).await.unwrap();
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_rest_registered_user_can_type() {
    let server = TestServer::start().await.unwrap();
    server
        .post("/users", &json!({"id": "frank", "name": "Frank"}))
        .await
        .unwrap();

    let mut a = server.connect().await.unwrap();
    a.send_event("typingChange", typing("frank", true)).await.unwrap();
    let push = a.recv_event("typing").await.unwrap();
    assert_eq!(push["d"], json!([{"id": "frank", "name": "Frank"}]));
}

#[tokio::test]
async fn test_participant_status_log() {
    let server = TestServer::start().await.unwrap();

    for state in ["online", "away"] {
        assert_json(
            server.post("/participants", &status("bob", state)).await.unwrap(),
            StatusCode::CREATED,
        )
        .await
        .unwrap();
    }

    let log = assert_json(server.get("/participants").await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_eq!(log.as_array().unwrap().len(), 2);

    let current = assert_json(
        server.get("/participants/current/bob").await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(current["status"], "away");

    let missing = server.get("/participants/current/nobody").await.unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_error_body_shape() {
    let server = TestServer::start().await.unwrap();
    let body = assert_json(server.get("/chat/42").await.unwrap(), StatusCode::NOT_FOUND)
        .await
        .unwrap();
    assert_eq!(body["error"]["code"], "UNKNOWN_RECORD");
    assert!(body["error"]["message"].is_string());
}
