// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process tree store.
//!
//! Used for offline mode and as the backing store in tests. All writes go
//! through one lock, so multi-path updates are atomic.

use crate::db::paths::segments;
use crate::db::tree::{get_at, set_at, update_at};
use crate::db::{Subscription, TreeStore};
use crate::error::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// In-memory tree store with live subscriptions.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryTree>>,
}

#[derive(Default)]
struct MemoryTree {
    root: Value,
    watchers: Vec<Watcher>,
    push_ids: PushIdGenerator,
}

struct Watcher {
    path: Vec<String>,
    tx: mpsc::UnboundedSender<Option<Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with an existing tree.
    pub fn with_root(root: Value) -> Self {
        let store = Self::default();
        if let Ok(mut tree) = store.inner.try_lock() {
            set_at(&mut tree.root, &[], root);
        }
        store
    }
}

impl MemoryTree {
    fn snapshot(&self, path: &[String]) -> Option<Value> {
        let path: Vec<&str> = path.iter().map(String::as_str).collect();
        get_at(&self.root, &path).cloned()
    }

    /// Deliver fresh snapshots to every watcher whose subtree overlaps one of
    /// the written paths, dropping watchers whose receiver is gone.
    fn notify(&mut self, written: &[Vec<String>]) {
        let watchers = std::mem::take(&mut self.watchers);
        self.watchers = watchers
            .into_iter()
            .filter(|watcher| {
                let overlaps = written
                    .iter()
                    .any(|w| w.starts_with(&watcher.path) || watcher.path.starts_with(w));
                if !overlaps {
                    return !watcher.tx.is_closed();
                }
                watcher.tx.send(self.snapshot(&watcher.path)).is_ok()
            })
            .collect();
    }
}

fn owned_segments(path: &str) -> Vec<String> {
    segments(path).into_iter().map(str::to_string).collect()
}

#[async_trait]
impl TreeStore for MemoryStore {
    async fn get(&self, path: &str) -> Result<Option<Value>> {
        let tree = self.inner.lock().await;
        Ok(get_at(&tree.root, &segments(path)).cloned())
    }

    async fn set(&self, path: &str, value: Value) -> Result<()> {
        let mut tree = self.inner.lock().await;
        set_at(&mut tree.root, &segments(path), value);
        tree.notify(&[owned_segments(path)]);
        Ok(())
    }

    async fn update(&self, path: &str, fields: Map<String, Value>) -> Result<()> {
        let base = owned_segments(path);
        let written: Vec<Vec<String>> = fields
            .keys()
            .map(|k| {
                let mut full = base.clone();
                full.extend(owned_segments(k));
                full
            })
            .collect();

        let mut tree = self.inner.lock().await;
        update_at(&mut tree.root, &segments(path), fields);
        tree.notify(&written);
        Ok(())
    }

    async fn push(&self, path: &str, value: Value) -> Result<String> {
        let mut tree = self.inner.lock().await;
        let key = tree.push_ids.next(chrono::Utc::now().timestamp_millis());

        let mut full = owned_segments(path);
        full.push(key.clone());
        let refs: Vec<&str> = full.iter().map(String::as_str).collect();
        set_at(&mut tree.root, &refs, value);
        tree.notify(&[full]);
        Ok(key)
    }

    async fn remove(&self, path: &str) -> Result<()> {
        self.set(path, Value::Null).await
    }

    async fn subscribe(&self, path: &str) -> Result<Subscription<Option<Value>>> {
        let (tx, rx) = mpsc::unbounded_channel();
        let path = owned_segments(path);

        let mut tree = self.inner.lock().await;
        // Initial snapshot goes out before any later write can
        let _ = tx.send(tree.snapshot(&path));
        tree.watchers.push(Watcher { path, tx });

        Ok(Subscription::from_receiver(rx))
    }

    fn supports_multi_path(&self) -> bool {
        true
    }

    async fn update_many(&self, updates: Map<String, Value>) -> Result<()> {
        self.update("", updates).await
    }
}

const PUSH_CHARS: &[u8] = b"-0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ_abcdefghijklmnopqrstuvwxyz";

/// Chronologically sortable keys in the Realtime Database push-id format:
/// 8 characters of millisecond timestamp followed by a 12-character counter.
#[derive(Default)]
struct PushIdGenerator {
    last_millis: i64,
    counter: u64,
}

impl PushIdGenerator {
    fn next(&mut self, now_millis: i64) -> String {
        // Never go backwards, so keys keep sorting in creation order
        let millis = now_millis.max(self.last_millis);
        if millis != self.last_millis {
            self.last_millis = millis;
            self.counter = 0;
        } else {
            self.counter += 1;
        }

        let mut id = Vec::with_capacity(20);
        id.extend(encode(millis.max(0) as u64, 8));
        id.extend(encode(self.counter, 12));
        String::from_utf8_lossy(&id).into_owned()
    }
}

fn encode(mut value: u64, width: usize) -> Vec<u8> {
    let mut out = vec![PUSH_CHARS[0]; width];
    for slot in out.iter_mut().rev() {
        *slot = PUSH_CHARS[(value % 64) as usize];
        value /= 64;
    }
    out
}
