//! WebSocket presence tests
//!
//! Run with: cargo test -p integration-tests --test gateway_tests

use futures_util::StreamExt;
use integration_tests::{fixtures::*, TestServer};
use serde_json::json;

#[tokio::test]
async fn test_hello_carries_connection_id() {
    let server = TestServer::start().await.unwrap();
    let (mut stream, _) = tokio_tungstenite::connect_async(server.ws_url()).await.unwrap();

    let frame = stream.next().await.unwrap().unwrap();
    let hello: serde_json::Value = serde_json::from_str(frame.to_text().unwrap()).unwrap();

    assert_eq!(hello["t"], "hello");
    assert_eq!(hello["s"], 1);
    assert!(hello["d"]["connection_id"].as_str().is_some_and(|id| !id.is_empty()));
    assert_eq!(hello["d"]["heartbeat_interval_ms"], 30_000);
}

#[tokio::test]
async fn test_typing_is_broadcast_to_every_connection() {
    let server = TestServer::start().await.unwrap();
    let mut a = server.connect().await.unwrap();
    let mut b = server.connect().await.unwrap();
    let mut c = server.connect().await.unwrap();

    a.send_event("typingChange", typing("alice", true)).await.unwrap();
    for client in [&mut a, &mut b, &mut c] {
        let push = client.recv_event("typing").await.unwrap();
        assert_eq!(typer_ids(&push), vec!["alice"]);
        assert_eq!(push["d"][0]["name"], "Alice");
    }

    b.send_event("typingChange", typing("bob", true)).await.unwrap();
    for client in [&mut a, &mut b, &mut c] {
        let push = client.recv_event("typing").await.unwrap();
        assert_eq!(typer_ids(&push), vec!["alice", "bob"]);
    }

    a.send_event("typingChange", typing("alice", false)).await.unwrap();
    for client in [&mut a, &mut b, &mut c] {
        let push = client.recv_event("typing").await.unwrap();
        assert_eq!(typer_ids(&push), vec!["bob"]);
    }
}

#[tokio::test]
async fn test_pushes_are_sequenced_per_connection() {
    let server = TestServer::start().await.unwrap();
    let mut a = server.connect().await.unwrap();

    for flag in [true, false, true] {
        a.send_event("typingChange", typing("alice", flag)).await.unwrap();
    }

    let mut sequences = Vec::new();
    for _ in 0..3 {
        sequences.push(a.recv_event("typing").await.unwrap()["s"].as_u64().unwrap());
    }
    assert_eq!(sequences, vec![2, 3, 4]);
}

#[tokio::test]
async fn test_bound_user_may_omit_user_field() {
    let server = TestServer::start().await.unwrap();
    let mut a = server.connect().await.unwrap();

    a.send_event("typingChange", typing("carol", true)).await.unwrap();
    a.recv_event("typing").await.unwrap();

    a.send_event("typing", json!({"typing": false})).await.unwrap();
    let push = a.recv_event("typing").await.unwrap();
    assert!(typer_ids(&push).is_empty());
}

#[tokio::test]
async fn test_status_change_is_recorded_without_push() {
    let server = TestServer::start().await.unwrap();
    let mut a = server.connect().await.unwrap();
    let mut b = server.connect().await.unwrap();

    a.send_event("statusChange", status("alice", "away")).await.unwrap();
    a.expect_silence().await.unwrap();
    b.expect_silence().await.unwrap();

    let current: serde_json::Value = server
        .get("/participants/current/alice")
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(current["status"], "away");
}

#[tokio::test]
async fn test_malformed_event_is_answered_to_sender_only() {
    let server = TestServer::start().await.unwrap();
    let mut a = server.connect().await.unwrap();
    let mut b = server.connect().await.unwrap();

    a.send_event("typingChange", json!({"user": "alice", "typing": "yes"}))
        .await
        .unwrap();

    let reply = a.recv().await.unwrap();
    assert_eq!(reply["t"], "error");
    assert_eq!(reply["d"]["code"], "MALFORMED_EVENT");
    assert_eq!(reply["d"]["event"], "typingChange");
    b.expect_silence().await.unwrap();

    a.send_text("not json").await.unwrap();
    let reply = a.recv().await.unwrap();
    assert_eq!(reply["d"]["code"], "MALFORMED_EVENT");

    // The connection survives rejected events
    a.send_event("typingChange", typing("alice", true)).await.unwrap();
    assert_eq!(typer_ids(&a.recv_event("typing").await.unwrap()), vec!["alice"]);
}

#[tokio::test]
async fn test_unknown_user_is_rejected_by_default() {
    let server = TestServer::start().await.unwrap();
    let mut a = server.connect().await.unwrap();

    a.send_event("typingChange", typing("mallory", true)).await.unwrap();
    let reply = a.recv().await.unwrap();
    assert_eq!(reply["t"], "error");
    assert_eq!(reply["d"]["code"], "UNKNOWN_USER");
}

#[tokio::test]
async fn test_unknown_user_auto_registers_when_configured() {
    let server = TestServer::start_with(&sample_users(), &[("UNKNOWN_USER_POLICY", "auto_register")])
        .await
        .unwrap();
    let mut a = server.connect().await.unwrap();

    a.send_event("typingChange", json!({"user": {"id": "dave", "name": "Dave"}, "typing": true}))
        .await
        .unwrap();
    let push = a.recv_event("typing").await.unwrap();
    assert_eq!(push["d"], json!([{"id": "dave", "name": "Dave"}]));
}

#[tokio::test]
async fn test_user_mismatch_is_rejected() {
    let server = TestServer::start().await.unwrap();
    let mut a = server.connect().await.unwrap();

    a.send_event("typingChange", typing("alice", true)).await.unwrap();
    a.recv_event("typing").await.unwrap();

    a.send_event("typingChange", typing("bob", true)).await.unwrap();
    let reply = a.recv().await.unwrap();
    assert_eq!(reply["d"]["code"], "USER_MISMATCH");
}

#[tokio::test]
async fn test_unknown_event_kind_is_ignored() {
    let server = TestServer::start().await.unwrap();
    let mut a = server.connect().await.unwrap();

    a.send_event("wave", json!({"at": "everyone"})).await.unwrap();
    a.expect_silence().await.unwrap();
}

#[tokio::test]
async fn test_disconnect_clears_typing() {
    let server = TestServer::start().await.unwrap();
    let mut a = server.connect().await.unwrap();
    let mut b = server.connect().await.unwrap();

    a.send_event("typingChange", typing("alice", true)).await.unwrap();
    b.recv_event("typing").await.unwrap();

    a.close().await.unwrap();

    let push = b.recv_event("typing").await.unwrap();
    assert!(typer_ids(&push).is_empty());
}

#[tokio::test]
async fn test_silent_connection_times_out_and_clears_typing() {
    let server = TestServer::start_with(
        &sample_users(),
        &[("HEARTBEAT_INTERVAL_MS", "50"), ("HEARTBEAT_TIMEOUT_MS", "300")],
    )
    .await
    .unwrap();
    let mut a = server.connect().await.unwrap();
    let mut b = server.connect().await.unwrap();

    a.send_event("typingChange", typing("alice", true)).await.unwrap();
    assert_eq!(typer_ids(&b.recv_event("typing").await.unwrap()), vec!["alice"]);

    // `a` stops reading, so its pings go unanswered; `b` keeps reading
    let push = b.recv_event("typing").await.unwrap();
    assert!(typer_ids(&push).is_empty());
    drop(a);
}
