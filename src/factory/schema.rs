//! Document shape detection.

use crate::types::ConfigKind;
use serde_json::Value;

/// Top-level key that marks a partition-aware document.
pub const VBUCKET_SERVER_MAP: &str = "vBucketServerMap";

/// Decide which builder a document needs.
///
/// Only the presence of `vBucketServerMap` is consulted.
pub fn detect_kind(document: &Value) -> ConfigKind {
    let partitioned = document
        .as_object()
        .is_some_and(|object| object.contains_key(VBUCKET_SERVER_MAP));

    if partitioned {
        ConfigKind::Partitioned
    } else {
        ConfigKind::Simple
    }
}
