//! NPC dialogue proxy client (plain JSON over HTTP POST)

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::infrastructure::ports::{NpcTalkPort, TransportError};

/// Default proxy endpoint when nothing is configured.
pub const DEFAULT_PROXY_URL: &str = "http://127.0.0.1:5000/api/npc-talk";

/// Default request timeout; model-backed replies can be slow.
pub const DEFAULT_PROXY_TIMEOUT_SECS: u64 = 120;

/// Client for the language-model proxy that answers NPC turns.
#[derive(Clone)]
pub struct NpcProxyClient {
    client: Client,
    proxy_url: String,
}

impl NpcProxyClient {
    pub fn new(proxy_url: &str) -> Self {
        Self::with_timeout(proxy_url, DEFAULT_PROXY_TIMEOUT_SECS)
    }

    /// Create client with custom timeout.
    pub fn with_timeout(proxy_url: &str, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            proxy_url: proxy_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn proxy_url(&self) -> &str {
        &self.proxy_url
    }
}

impl Default for NpcProxyClient {
    fn default() -> Self {
        Self::new(DEFAULT_PROXY_URL)
    }
}

#[async_trait]
impl NpcTalkPort for NpcProxyClient {
    async fn post_json(&self, payload: serde_json::Value) -> Result<String, TransportError> {
        let response = self
            .client
            .post(&self.proxy_url)
            .json(&payload)
            .send()
            .await
            .map_err(TransportError::request_failed)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "NPC proxy returned an error status");
            return Err(TransportError::status(status.as_u16(), body));
        }

        response.text().await.map_err(TransportError::request_failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};

    async fn spawn_proxy(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        format!("http://{}/api/npc-talk", addr)
    }

    #[tokio::test]
    async fn posts_payload_and_returns_raw_body() {
        let router = Router::new().route(
            "/api/npc-talk",
            post(|Json(body): Json<serde_json::Value>| async move {
                let reply = format!("echo: {}", body["player_input"].as_str().unwrap_or(""));
                Json(serde_json::json!({ "reply": reply }))
            }),
        );
        let url = spawn_proxy(router).await;
        let client = NpcProxyClient::with_timeout(&url, 5);

        let raw = client
            .post_json(serde_json::json!({ "player_input": "왜?" }))
            .await
            .expect("proxy call should succeed");

        let parsed: serde_json::Value = serde_json::from_str(&raw).expect("json body");
        assert_eq!(parsed["reply"], "echo: 왜?");
    }

    #[tokio::test]
    async fn error_status_is_reported_with_body() {
        let router = Router::new().route(
            "/api/npc-talk",
            post(|| async { (StatusCode::BAD_GATEWAY, "model offline") }),
        );
        let url = spawn_proxy(router).await;
        let client = NpcProxyClient::with_timeout(&url, 5);

        let err = client
            .post_json(serde_json::json!({}))
            .await
            .expect_err("502 should fail");

        assert_eq!(err, TransportError::status(502, "model offline"));
    }

    #[tokio::test]
    async fn unreachable_proxy_is_a_request_failure() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);

        let client = NpcProxyClient::with_timeout(&format!("http://{}/", addr), 2);
        let err = client
            .post_json(serde_json::json!({}))
            .await
            .expect_err("nothing listening");

        assert!(matches!(err, TransportError::RequestFailed(_)));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = NpcProxyClient::new("http://localhost:5000/api/npc-talk/");
        assert_eq!(client.proxy_url(), "http://localhost:5000/api/npc-talk");
    }
}
