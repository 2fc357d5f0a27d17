// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firebase Realtime Database client over the REST API.
//!
//! Handles:
//! - Point reads and full-record writes (`GET` / `PUT`)
//! - Child merges and atomic multi-path updates (`PATCH`)
//! - Push keys generated server-side (`POST`)
//! - Live subtree subscriptions via server-sent events

use crate::config::ClientConfig;
use crate::db::paths::segments;
use crate::db::tree::{is_empty, set_at, update_at};
use crate::db::{Subscription, TreeStore};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{header, Method, RequestBuilder};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;
use tokio::sync::mpsc;

/// Realtime Database REST client.
#[derive(Clone)]
pub struct RealtimeDb {
    http: reqwest::Client,
    base_url: String,
    auth: Option<String>,
    timeout: Duration,
}

impl RealtimeDb {
    /// Create a client for the database at `config.database_url`.
    ///
    /// No client-wide timeout is set because subscriptions hold their
    /// response open indefinitely; point operations get a per-request one.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build HTTP client: {}", e)))?;

        tracing::info!(url = %config.database_url, "Realtime Database client ready");

        Ok(Self {
            http,
            base_url: config.database_url.trim_end_matches('/').to_string(),
            auth: config.database_auth.clone(),
            timeout: config.provider_timeout,
        })
    }

    /// REST URL for a tree path; each segment is percent-encoded.
    fn url(&self, path: &str) -> String {
        let encoded: Vec<String> = segments(path)
            .into_iter()
            .map(|s| urlencoding::encode(s).into_owned())
            .collect();
        format!("{}/{}.json", self.base_url, encoded.join("/"))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match &self.auth {
            Some(token) => builder.query(&[("auth", token.as_str())]),
            None => builder,
        }
    }

    async fn write(&self, method: Method, path: &str, body: &Value) -> Result<reqwest::Response> {
        let response = self
            .request(method, path)
            .timeout(self.timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::StoreWrite(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::StoreWrite(format!("HTTP {}: {}", status, body)));
        }
        Ok(response)
    }
}

#[async_trait]
impl TreeStore for RealtimeDb {
    async fn get(&self, path: &str) -> Result<Option<Value>> {
        let response = self
            .request(Method::GET, path)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| AppError::StoreRead(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::StoreRead(format!("HTTP {}: {}", status, body)));
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| AppError::StoreRead(format!("JSON parse error: {}", e)))?;
        Ok(Some(value).filter(|v| !v.is_null()))
    }

    async fn set(&self, path: &str, value: Value) -> Result<()> {
        self.write(Method::PUT, path, &value).await?;
        Ok(())
    }

    async fn update(&self, path: &str, fields: Map<String, Value>) -> Result<()> {
        self.write(Method::PATCH, path, &Value::Object(fields)).await?;
        Ok(())
    }

    async fn push(&self, path: &str, value: Value) -> Result<String> {
        #[derive(Deserialize)]
        struct PushResponse {
            name: String,
        }

        let response = self.write(Method::POST, path, &value).await?;
        let pushed: PushResponse = response
            .json()
            .await
            .map_err(|e| AppError::StoreWrite(format!("Unexpected push response: {}", e)))?;
        Ok(pushed.name)
    }

    async fn remove(&self, path: &str) -> Result<()> {
        let response = self
            .request(Method::DELETE, path)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| AppError::StoreWrite(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::StoreWrite(format!("HTTP {}", response.status())));
        }
        Ok(())
    }

    async fn subscribe(&self, path: &str) -> Result<Subscription<Option<Value>>> {
        let response = self
            .request(Method::GET, path)
            .header(header::ACCEPT, "text/event-stream")
            .send()
            .await
            .map_err(|e| AppError::StoreRead(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::StoreRead(format!(
                "Subscription refused: HTTP {}",
                response.status()
            )));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let watched = path.to_string();

        let producer = tokio::spawn(async move {
            let mut body = response.bytes_stream();
            let mut decoder = SseDecoder::default();
            let mut snapshot = Value::Null;

            while let Some(chunk) = body.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        tracing::warn!(path = %watched, error = %e, "Event stream interrupted");
                        return;
                    }
                };

                for event in decoder.feed(&chunk) {
                    match apply_event(&mut snapshot, &event) {
                        EventOutcome::Changed => {
                            let current = Some(snapshot.clone()).filter(|v| !is_empty(v));
                            if tx.send(current).is_err() {
                                return;
                            }
                        }
                        EventOutcome::Unchanged => {}
                        EventOutcome::Closed(reason) => {
                            tracing::warn!(path = %watched, reason, "Event stream closed by server");
                            return;
                        }
                    }
                }
            }
            tracing::debug!(path = %watched, "Event stream ended");
        });

        Ok(Subscription::with_producer(rx, producer))
    }

    fn supports_multi_path(&self) -> bool {
        true
    }

    async fn update_many(&self, updates: Map<String, Value>) -> Result<()> {
        // A root PATCH with path keys is applied atomically by the server
        self.write(Method::PATCH, "", &Value::Object(updates)).await?;
        Ok(())
    }
}

// ─── Event Stream Decoding ───────────────────────────────────

/// One server-sent event.
#[derive(Debug, Clone, PartialEq)]
pub struct SseEvent {
    pub event: String,
    pub data: String,
}

/// Incremental `text/event-stream` decoder; chunks may split anywhere.
#[derive(Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    /// Consume a chunk and return every event it completed.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend(chunk.iter().copied().filter(|b| *b != b'\r'));

        let mut events = Vec::new();
        while let Some(end) = self.buffer.windows(2).position(|w| w == b"\n\n") {
            let block: Vec<u8> = self.buffer.drain(..end + 2).collect();
            let text = String::from_utf8_lossy(&block[..end]);

            let mut event = String::new();
            let mut data: Vec<&str> = Vec::new();
            for line in text.lines() {
                if let Some(value) = line.strip_prefix("event:") {
                    event = value.trim().to_string();
                } else if let Some(value) = line.strip_prefix("data:") {
                    data.push(value.strip_prefix(' ').unwrap_or(value));
                }
            }

            if !event.is_empty() || !data.is_empty() {
                events.push(SseEvent {
                    event,
                    data: data.join("\n"),
                });
            }
        }
        events
    }
}

/// What an event did to the local snapshot.
#[derive(Debug, PartialEq)]
pub enum EventOutcome {
    Changed,
    Unchanged,
    Closed(&'static str),
}

#[derive(Deserialize)]
struct ChangePayload {
    path: String,
    #[serde(default)]
    data: Value,
}

/// Apply a Realtime Database stream event to the watched subtree.
pub fn apply_event(snapshot: &mut Value, event: &SseEvent) -> EventOutcome {
    match event.event.as_str() {
        "put" | "patch" => {
            let payload: ChangePayload = match serde_json::from_str(&event.data) {
                Ok(payload) => payload,
                Err(e) => {
                    tracing::warn!(error = %e, "Malformed stream event ignored");
                    return EventOutcome::Unchanged;
                }
            };
            let at = segments(&payload.path);
            if event.event == "put" {
                set_at(snapshot, &at, payload.data);
            } else if let Value::Object(fields) = payload.data {
                update_at(snapshot, &at, fields);
            }
            EventOutcome::Changed
        }
        "keep-alive" => EventOutcome::Unchanged,
        "cancel" => EventOutcome::Closed("cancelled"),
        "auth_revoked" => EventOutcome::Closed("auth revoked"),
        other => {
            tracing::debug!(event = other, "Unknown stream event ignored");
            EventOutcome::Unchanged
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decoder_handles_split_chunks() {
        let mut decoder = SseDecoder::default();
        let first = decoder.feed(b"event: put\r\ndata: {\"path\":\"/\",");
        assert!(first.is_empty());

        let events = decoder.feed(b"\"data\":null}\r\n\r\nevent: keep-alive\ndata: null\n\n");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event, "put");
        assert_eq!(events[0].data, r#"{"path":"/","data":null}"#);
        assert_eq!(events[1].event, "keep-alive");
    }

    #[test]
    fn test_put_and_patch_build_snapshot() {
        let mut snapshot = Value::Null;
        let put = SseEvent {
            event: "put".to_string(),
            data: json!({ "path": "/", "data": { "t1": { "title": "Kyoto" } } }).to_string(),
        };
        assert_eq!(apply_event(&mut snapshot, &put), EventOutcome::Changed);

        let patch = SseEvent {
            event: "patch".to_string(),
            data: json!({ "path": "/t1", "data": { "isShared": true } }).to_string(),
        };
        apply_event(&mut snapshot, &patch);
        assert_eq!(snapshot["t1"]["title"], "Kyoto");
        assert_eq!(snapshot["t1"]["isShared"], true);

        let delete = SseEvent {
            event: "put".to_string(),
            data: json!({ "path": "/t1", "data": null }).to_string(),
        };
        apply_event(&mut snapshot, &delete);
        assert_eq!(snapshot, json!({}));
    }

    #[test]
    fn test_cancel_closes_stream() {
        let mut snapshot = Value::Null;
        let cancel = SseEvent {
            event: "cancel".to_string(),
            data: "\"permission denied\"".to_string(),
        };
        assert!(matches!(
            apply_event(&mut snapshot, &cancel),
            EventOutcome::Closed(_)
        ));
    }

    #[test]
    fn test_url_encodes_segments() {
        let db = RealtimeDb::new(&ClientConfig {
            database_url: "https://demo.firebaseio.com/".to_string(),
            ..ClientConfig::default()
        })
        .unwrap();
        assert_eq!(
            db.url("trips/user one/-N1"),
            "https://demo.firebaseio.com/trips/user%20one/-N1.json"
        );
        assert_eq!(db.url(""), "https://demo.firebaseio.com/.json");
    }
}
