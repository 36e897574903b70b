//! Building topologies from cluster configuration documents.
//!
//! The factory accepts a document in one of three forms and always ends up
//! in [`ConfigFactory::parse_value`]:
//!
//! ```text
//!   parse_file(path) ──read──▶ parse_str(text) ──serde_json──▶ parse_value(doc)
//!                                                                   │
//!                                                            detect_kind(doc)
//!                                                     ┌─────────────┴─────────────┐
//!                                                     ▼                           ▼
//!                                               Simple: nodes             Partitioned:
//!                                               → host:direct             hashAlgorithm, numReplicas,
//!                                                                         serverList, vBucketMap, nodes
//! ```
//!
//! A parse either returns a complete [`Config`] or fails; no partial
//! topology is ever handed out.
//!
//! # Example
//!
//! ```rust
//! use crema_topology::{Config, ConfigFactory};
//!
//! let factory = ConfigFactory::new();
//! let config = factory.parse_str(r#"{
//!     "vBucketServerMap": {
//!         "hashAlgorithm": "CRC",
//!         "numReplicas": 1,
//!         "serverList": ["10.0.0.1:11210", "10.0.0.2:11210"],
//!         "vBucketMap": [[0, 1], [1, 0]]
//!     },
//!     "nodes": []
//! }"#)?;
//!
//! let Config::Partitioned(map) = config else { panic!("expected a vbucket map") };
//! assert_eq!(map.vbuckets_count(), 2);
//! assert_eq!(map.master(1)?, 1);
//! # Ok::<(), crema_topology::Error>(())
//! ```

mod fields;
mod schema;
mod servers;
mod vbuckets;

pub use schema::{detect_kind, VBUCKET_SERVER_MAP};

use crate::config::ParserConfig;
use crate::error::{DocumentError, Error, Result, TopologyError};
use crate::hash::{HashAlgorithmRef, HashAlgorithmRegistry, HashAlgorithmResolver};
use crate::topology::{Config, PartitionedConfig, SimpleConfig};
use crate::types::ConfigKind;
use fields::{get_array, get_object, get_str, get_u64, Object};
use serde_json::Value;
use std::io;
use std::path::Path;
use tracing::debug;

/// Parses cluster configuration documents into [`Config`] values.
///
/// Hash algorithms are looked up through the resolver `R`; the default is
/// the built-in registry.
#[derive(Debug, Clone)]
pub struct ConfigFactory<R = HashAlgorithmRegistry> {
    config: ParserConfig,
    resolver: R,
}

impl ConfigFactory {
    /// Create a factory with the built-in hash algorithms and default bounds.
    pub fn new() -> Self {
        Self::with_resolver(HashAlgorithmRegistry::builtin())
    }
}

impl Default for ConfigFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: HashAlgorithmResolver> ConfigFactory<R> {
    /// Create a factory that resolves hash algorithms through `resolver`.
    pub fn with_resolver(resolver: R) -> Self {
        Self {
            config: ParserConfig::default(),
            resolver,
        }
    }

    /// Set the parser configuration.
    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    /// Parser configuration in use.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Read a whole file and parse its contents.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(Error::Io {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "file name is empty"),
            });
        }

        let data = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), bytes = data.len(), "Read config file");

        self.parse_str(&data)
    }

    /// Parse JSON text.
    pub fn parse_str(&self, data: &str) -> Result<Config> {
        let document: Value = serde_json::from_str(data)?;
        self.parse_value(&document)
    }

    /// Parse an already decoded JSON document.
    pub fn parse_value(&self, document: &Value) -> Result<Config> {
        let root = document
            .as_object()
            .ok_or(DocumentError::NotAnObject)?;

        let kind = detect_kind(document);
        debug!(%kind, "Detected config document kind");

        match kind {
            ConfigKind::Simple => self.parse_simple(root).map(Config::Simple),
            ConfigKind::Partitioned => self.parse_partitioned(root).map(Config::Partitioned),
        }
    }

    fn parse_simple(&self, root: &Object) -> Result<SimpleConfig> {
        let nodes = get_array(root, "nodes", "nodes")?;
        let servers = servers::node_servers(nodes)?;

        debug!(servers = servers.len(), "Built simple config");
        Ok(SimpleConfig::new(servers))
    }

    fn parse_partitioned(&self, root: &Object) -> Result<PartitionedConfig> {
        let map = get_object(root, VBUCKET_SERVER_MAP, VBUCKET_SERVER_MAP)?;

        let name = get_str(map, "hashAlgorithm", "vBucketServerMap.hashAlgorithm")?;
        let algorithm = self
            .resolver
            .resolve(name)
            .ok_or_else(|| Error::UnsupportedAlgorithm(name.to_string()))?;
        let hash_algorithm = HashAlgorithmRef::new(name, algorithm);

        let replicas = get_u64(map, "numReplicas", "vBucketServerMap.numReplicas")?;
        let max_replicas = self.config.replica_bound();
        let replicas_count = usize::try_from(replicas)
            .ok()
            .filter(|&count| count <= max_replicas)
            .ok_or(TopologyError::ReplicaCountExceeded {
                count: replicas,
                max: max_replicas,
            })?;

        let server_list = get_array(map, "serverList", "vBucketServerMap.serverList")?;
        let servers = servers::server_list(server_list)?;

        let rows = get_array(map, "vBucketMap", "vBucketServerMap.vBucketMap")?;
        let vbuckets = vbuckets::vbucket_map(rows, servers.len(), &self.config)?;

        let nodes = get_array(root, "nodes", "nodes")?;
        let couch_servers = servers::couch_servers(nodes)?;

        debug!(
            hash_algorithm = name,
            replicas = replicas_count,
            servers = servers.len(),
            vbuckets = vbuckets.len(),
            couch_servers = couch_servers.len(),
            "Built partitioned config"
        );

        Ok(PartitionedConfig::new(
            hash_algorithm,
            replicas_count,
            servers,
            vbuckets,
            couch_servers,
        ))
    }
}

/// Parse a document with a default [`ConfigFactory`].
pub fn parse_str(data: &str) -> Result<Config> {
    ConfigFactory::new().parse_str(data)
}

/// Read and parse a file with a default [`ConfigFactory`].
pub fn parse_file(path: impl AsRef<Path>) -> Result<Config> {
    ConfigFactory::new().parse_file(path)
}
