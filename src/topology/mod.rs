//! Routing tables built from cluster configuration documents.
//!
//! A [`Config`] is either a flat server list ([`SimpleConfig`]) or a
//! vbucket server map ([`PartitionedConfig`]). Callers match on the variant.
//!
//! ```text
//!   serverList                 vBucketMap
//!   ┌───┬────────────────┐     ┌────┬────────┬─────────────────┐
//!   │ 0 │ 10.0.0.1:11210 │     │ vb │ master │ replicas        │
//!   │ 1 │ 10.0.0.2:11210 │     │ 0  │ 0      │ [1, -, -]       │
//!   │ 2 │ 10.0.0.3:11210 │     │ 1  │ 1      │ [2, -, -]       │
//!   └───┴────────────────┘     │ 2  │ 2      │ [0, -, -]       │
//!                              └────┴────────┴─────────────────┘
//!   key → hash → vb = hash & (vbuckets - 1) → master → server
//! ```

mod partitioned;
mod simple;
mod vbucket;

pub use partitioned::PartitionedConfig;
pub use simple::SimpleConfig;
pub use vbucket::{VBucket, MAX_REPLICAS, MAX_VBUCKETS};

use crate::factory::ConfigFactory;
use crate::types::ConfigKind;
use serde::Serialize;
use std::str::FromStr;

/// A parsed cluster topology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Config {
    /// Cache-style cluster without partitioning.
    Simple(SimpleConfig),

    /// Partition-aware cluster.
    Partitioned(PartitionedConfig),
}

impl Config {
    /// Which document shape this topology came from.
    pub fn kind(&self) -> ConfigKind {
        match self {
            Config::Simple(_) => ConfigKind::Simple,
            Config::Partitioned(_) => ConfigKind::Partitioned,
        }
    }

    /// Server addresses in document order.
    pub fn servers(&self) -> &[String] {
        match self {
            Config::Simple(config) => config.servers(),
            Config::Partitioned(config) => config.servers(),
        }
    }

    /// Number of servers.
    pub fn servers_count(&self) -> usize {
        self.servers().len()
    }

    /// Server at `index`.
    pub fn server(&self, index: usize) -> Option<&str> {
        self.servers().get(index).map(String::as_str)
    }

    /// The partitioned topology, if this is one.
    pub fn as_partitioned(&self) -> Option<&PartitionedConfig> {
        match self {
            Config::Partitioned(config) => Some(config),
            Config::Simple(_) => None,
        }
    }

    /// The simple topology, if this is one.
    pub fn as_simple(&self) -> Option<&SimpleConfig> {
        match self {
            Config::Simple(config) => Some(config),
            Config::Partitioned(_) => None,
        }
    }
}

impl FromStr for Config {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigFactory::new().parse_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_accessors() {
        let config = Config::Simple(SimpleConfig::new(vec![
            "a:11211".to_string(),
            "b:11211".to_string(),
        ]));
        assert_eq!(config.kind(), ConfigKind::Simple);
        assert_eq!(config.servers_count(), 2);
        assert_eq!(config.server(1), Some("b:11211"));
        assert_eq!(config.server(2), None);
        assert!(config.as_partitioned().is_none());
        assert!(config.as_simple().is_some());
    }

    #[test]
    fn test_from_str() {
        let config: Config = r#"{"nodes":[{"hostname":"a:8091","ports":{"direct":11210}}]}"#
            .parse()
            .unwrap();
        assert_eq!(config.servers(), ["a:11210"]);
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_config_is_send_sync() {
        assert_send_sync::<Config>();
        assert_send_sync::<PartitionedConfig>();
        assert_send_sync::<SimpleConfig>();
    }

    #[test]
    fn test_serialize_tagged() {
        let config = Config::Simple(SimpleConfig::new(vec!["a:11211".to_string()]));
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["kind"], "simple");
        assert_eq!(json["servers"][0], "a:11211");
    }
}
