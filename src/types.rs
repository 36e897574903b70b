//! Core types used throughout the topology crate.

use serde::Serialize;

/// Position of a server in a topology's server list.
pub type ServerIndex = usize;

/// Which document shape a topology was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigKind {
    /// Cache-style cluster: a flat list of servers, no partitioning.
    Simple,

    /// Partition-aware cluster with a vbucket server map.
    Partitioned,
}

impl std::fmt::Display for ConfigKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigKind::Simple => write!(f, "simple"),
            ConfigKind::Partitioned => write!(f, "partitioned"),
        }
    }
}
