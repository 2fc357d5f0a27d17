// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer: a tree-structured key-value store with live subscriptions.
//!
//! Two backends implement [`TreeStore`]:
//! - [`RealtimeDb`] talks to the Firebase Realtime Database REST API
//! - [`MemoryStore`] keeps the tree in process (offline mode and tests)

pub mod memory;
pub mod realtime;
pub mod subscription;
pub(crate) mod tree;

pub use memory::MemoryStore;
pub use realtime::RealtimeDb;
pub use subscription::Subscription;

use crate::error::{AppError, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Operations the trip core consumes from the persistent tree store.
///
/// Paths are `/`-separated keys relative to the database root. A `None`
/// read and a `null` write both mean "no data at this path".
#[async_trait]
pub trait TreeStore: Send + Sync {
    /// Point read.
    async fn get(&self, path: &str) -> Result<Option<Value>>;

    /// Full-record replace.
    async fn set(&self, path: &str, value: Value) -> Result<()>;

    /// Merge the given children into the record at `path`.
    async fn update(&self, path: &str, fields: Map<String, Value>) -> Result<()>;

    /// Write `value` under a new store-generated child key and return the key.
    async fn push(&self, path: &str, value: Value) -> Result<String>;

    async fn remove(&self, path: &str) -> Result<()>;

    /// Live view of the subtree at `path`. The current snapshot is delivered
    /// first, then a full snapshot after every change under the subtree.
    async fn subscribe(&self, path: &str) -> Result<Subscription<Option<Value>>>;

    /// Whether [`TreeStore::update_many`] applies all paths atomically.
    fn supports_multi_path(&self) -> bool {
        false
    }

    /// Write several root-relative paths as one atomic operation.
    async fn update_many(&self, _updates: Map<String, Value>) -> Result<()> {
        Err(AppError::StoreWrite(
            "multi-path updates are not supported by this store".to_string(),
        ))
    }
}

/// Tree paths used by the trip core.
pub mod paths {
    use crate::error::{AppError, Result};

    /// Private trip records, `trips/{userId}/{tripId}`
    pub const TRIPS: &str = "trips";
    /// Public projection, `sharedTrips/{tripId}`
    pub const SHARED_TRIPS: &str = "sharedTrips";

    /// Characters the Realtime Database rejects in keys.
    const FORBIDDEN: &[char] = &['.', '$', '#', '[', ']', '/'];

    /// Check that a single key is usable as a path segment.
    pub fn validate_key(key: &str) -> Result<()> {
        if key.is_empty() {
            return Err(AppError::BadRequest("empty key".to_string()));
        }
        if key.chars().any(|c| FORBIDDEN.contains(&c) || c.is_control()) {
            return Err(AppError::BadRequest(format!("invalid key: {key:?}")));
        }
        Ok(())
    }

    pub fn user_trips(user_id: &str) -> Result<String> {
        validate_key(user_id)?;
        Ok(format!("{TRIPS}/{user_id}"))
    }

    pub fn trip(user_id: &str, trip_id: &str) -> Result<String> {
        validate_key(user_id)?;
        validate_key(trip_id)?;
        Ok(format!("{TRIPS}/{user_id}/{trip_id}"))
    }

    pub fn shared_trip(trip_id: &str) -> Result<String> {
        validate_key(trip_id)?;
        Ok(format!("{SHARED_TRIPS}/{trip_id}"))
    }

    /// Split a path into its non-empty segments.
    pub fn segments(path: &str) -> Vec<&str> {
        path.split('/').filter(|s| !s.is_empty()).collect()
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_trip_paths() {
            assert_eq!(trip("u1", "-Nabc").unwrap(), "trips/u1/-Nabc");
            assert_eq!(shared_trip("-Nabc").unwrap(), "sharedTrips/-Nabc");
            assert_eq!(user_trips("guest").unwrap(), "trips/guest");
        }

        #[test]
        fn test_rejects_unsafe_keys() {
            assert!(trip("u1", "a/b").is_err());
            assert!(trip("", "t1").is_err());
            assert!(shared_trip("x.y").is_err());
            assert!(user_trips("a[0]").is_err());
        }

        #[test]
        fn test_segments_skip_empty() {
            assert_eq!(segments("/trips//u1/"), vec!["trips", "u1"]);
            assert!(segments("").is_empty());
        }
    }
}
