//! Test helpers for integration tests
//!
//! Provides a server that lives for the duration of a test, plus thin HTTP and
//! WebSocket clients.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use chat_common::AppConfig;
use futures_util::{SinkExt, StreamExt};
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::fixtures::sample_users;

/// How long a client waits for a push before giving up
pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Window in which a push must NOT arrive for a "no push" assertion
pub const QUIET_WINDOW: Duration = Duration::from_millis(300);

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    fixture: PathBuf,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl TestServer {
    /// Start a server seeded with [`sample_users`]
    pub async fn start() -> Result<Self> {
        Self::start_with(&sample_users(), &[]).await
    }

    /// Start a server with a custom user directory and extra settings
    pub async fn start_with(users: &Value, overrides: &[(&str, &str)]) -> Result<Self> {
        let fixture = std::env::temp_dir().join(format!("presence-users-{}.json", uuid::Uuid::new_v4()));
        tokio::fs::write(&fixture, serde_json::to_vec(users)?).await?;

        let mut vars: HashMap<String, String> = overrides
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        vars.insert("USERS_FIXTURE".to_string(), fixture.display().to_string());
        vars.entry("STATIC_DIR".to_string())
            .or_insert_with(|| std::env::temp_dir().display().to_string());

        let config = AppConfig::from_source(|key| vars.get(key).cloned())?;
        let app = chat_gateway::create_app(&config).await?;

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let (shutdown, signal) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            let shutdown = async {
                signal.await.ok();
            };
            if let Err(e) = chat_gateway::run_server(listener, app, shutdown).await {
                eprintln!("test server stopped with error: {e}");
            }
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            fixture,
            shutdown: Some(shutdown),
            handle: Some(handle),
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// WebSocket endpoint URL
    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).json(body).send().await?)
    }

    /// Open a WebSocket connection and consume its `hello`
    pub async fn connect(&self) -> Result<WsClient> {
        let (stream, _) = tokio_tungstenite::connect_async(self.ws_url())
            .await
            .context("WebSocket handshake failed")?;
        let mut client = WsClient { stream };

        let hello = client.recv().await?;
        if hello["t"] != "hello" {
            bail!("expected hello, got {hello}");
        }
        Ok(client)
    }

    /// Stop the server and wait for it to exit
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            tx.send(()).ok();
        }
        if let Some(handle) = self.handle.take() {
            tokio::time::timeout(Duration::from_secs(5), handle).await.ok();
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            tx.send(()).ok();
        }
        std::fs::remove_file(&self.fixture).ok();
    }
}

/// WebSocket test client speaking the `{"event","data"}` protocol
pub struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsClient {
    /// Send a client event
    pub async fn send_event(&mut self, event: &str, data: Value) -> Result<()> {
        self.send_text(json!({"event": event, "data": data}).to_string()).await
    }

    /// Send a raw text frame
    pub async fn send_text(&mut self, text: impl Into<String>) -> Result<()> {
        self.stream.send(Message::Text(text.into())).await?;
        Ok(())
    }

    /// Next JSON push, skipping control frames
    pub async fn recv(&mut self) -> Result<Value> {
        self.recv_within(RECV_TIMEOUT)
            .await?
            .ok_or_else(|| anyhow!("no message within {RECV_TIMEOUT:?}"))
    }

    /// Next JSON push, or `None` if nothing arrives within `window`
    pub async fn recv_within(&mut self, window: Duration) -> Result<Option<Value>> {
        let deadline = tokio::time::Instant::now() + window;
        loop {
            let frame = match tokio::time::timeout_at(deadline, self.stream.next()).await {
                Err(_) => return Ok(None),
                Ok(None) => bail!("connection closed"),
                Ok(Some(frame)) => frame?,
            };

            match frame {
                Message::Text(text) => return Ok(Some(serde_json::from_str(&text)?)),
                Message::Close(frame) => bail!("connection closed: {frame:?}"),
                _ => {}
            }
        }
    }

    /// Next push of event type `t`, skipping others
    pub async fn recv_event(&mut self, t: &str) -> Result<Value> {
        loop {
            let message = self.recv().await?;
            if message["t"] == t {
                return Ok(message);
            }
        }
    }

    /// Assert that nothing is pushed for a short while
    pub async fn expect_silence(&mut self) -> Result<()> {
        match self.recv_within(QUIET_WINDOW).await? {
            None => Ok(()),
            Some(message) => bail!("unexpected push: {message}"),
        }
    }

    /// Close the connection
    pub async fn close(mut self) -> Result<()> {
        self.stream.close(None).await?;
        Ok(())
    }
}

/// Assert response status, returning the response body as JSON
pub async fn assert_json(response: Response, expected: StatusCode) -> Result<Value> {
    let status = response.status();
    let body = response.text().await?;

    if status != expected {
        bail!("expected status {expected}, got {status}: {body}");
    }

    Ok(serde_json::from_str(&body)?)
}
