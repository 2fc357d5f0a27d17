// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON tree helpers shared by the in-memory store and the stream decoder.
//!
//! Mirrors Realtime Database semantics: writing `null` deletes, and empty
//! objects are never kept.

use serde_json::{Map, Value};

/// Read the node at `segments`, indexing into arrays by numeric segment.
pub fn get_at<'a>(root: &'a Value, segments: &[&str]) -> Option<&'a Value> {
    let mut node = root;
    for segment in segments {
        node = match node {
            Value::Object(map) => map.get(*segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    if is_empty(node) {
        None
    } else {
        Some(node)
    }
}

/// Replace the node at `segments`, creating intermediate objects and
/// pruning anything left empty.
pub fn set_at(node: &mut Value, segments: &[&str], value: Value) {
    let Some((first, rest)) = segments.split_first() else {
        *node = normalize(value);
        return;
    };

    if let Value::Array(items) = node {
        // Arrays are stored as index-keyed objects once written into
        let converted: Map<String, Value> = std::mem::take(items)
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect();
        *node = Value::Object(converted);
    }
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }

    if let Value::Object(map) = node {
        let child = map.entry(first.to_string()).or_insert(Value::Null);
        set_at(child, rest, value);
        if is_empty(child) {
            map.remove(*first);
        }
    }
}

/// Merge children into the node at `segments`. Keys may themselves be
/// `/`-separated paths.
pub fn update_at(node: &mut Value, segments: &[&str], fields: Map<String, Value>) {
    for (key, value) in fields {
        let mut full: Vec<&str> = segments.to_vec();
        full.extend(key.split('/').filter(|s| !s.is_empty()));
        set_at(node, &full, value);
    }
}

/// `null` and `{}` both mean "no data".
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn normalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let cleaned: Map<String, Value> = map
                .into_iter()
                .map(|(k, v)| (k, normalize(v)))
                .filter(|(_, v)| !is_empty(v))
                .collect();
            if cleaned.is_empty() {
                Value::Null
            } else {
                Value::Object(cleaned)
            }
        }
        other => other,
    }
}
