//! Testing utilities for topology documents.
//!
//! Builders that produce realistic cluster configuration documents, so
//! tests only spell out the part of the document they care about.
//!
//! # Example
//!
//! ```rust
//! use crema_topology::testing::PartitionedDocument;
//! use crema_topology::ConfigFactory;
//!
//! let doc = PartitionedDocument::new(3, 1).with_vbuckets(16).build();
//! let config = ConfigFactory::new().parse_value(&doc).unwrap();
//! assert_eq!(config.servers_count(), 3);
//! ```

use serde_json::{json, Value};

#[cfg(test)]
mod factory_tests;

/// Builds a cache-style document with a `nodes` array.
#[derive(Debug, Clone)]
pub struct SimpleDocument {
    nodes: Vec<(String, u16)>,
}

impl SimpleDocument {
    /// Document with `count` nodes `10.0.0.{i+1}:8091`, direct port 11210.
    pub fn new(count: usize) -> Self {
        let nodes = (0..count)
            .map(|i| (format!("10.0.0.{}:8091", i + 1), 11210))
            .collect();
        Self { nodes }
    }

    /// Append a node with an explicit hostname and direct port.
    pub fn with_node(mut self, hostname: impl Into<String>, direct: u16) -> Self {
        self.nodes.push((hostname.into(), direct));
        self
    }

    /// Render the document.
    pub fn build(&self) -> Value {
        let nodes: Vec<Value> = self
            .nodes
            .iter()
            .map(|(hostname, direct)| {
                json!({
                    "hostname": hostname,
                    "ports": { "direct": direct, "proxy": 11211 },
                    "status": "healthy",
                })
            })
            .collect();
        json!({ "name": "default", "nodes": nodes })
    }
}

/// Builds a partition-aware document with a `vBucketServerMap`.
///
/// By default vbucket `i` is mastered by server `i % servers` and its
/// replicas are the following servers in ring order.
#[derive(Debug, Clone)]
pub struct PartitionedDocument {
    servers: usize,
    replicas: usize,
    vbuckets: usize,
    hash_algorithm: String,
    rows: Option<Vec<Vec<i64>>>,
    couch_api_base: bool,
}

impl PartitionedDocument {
    /// Document with `servers` servers, `replicas` replicas and 64 vbuckets.
    pub fn new(servers: usize, replicas: usize) -> Self {
        Self {
            servers,
            replicas,
            vbuckets: 64,
            hash_algorithm: "CRC".to_string(),
            rows: None,
            couch_api_base: true,
        }
    }

    /// Set the number of generated vbucket rows.
    pub fn with_vbuckets(mut self, vbuckets: usize) -> Self {
        self.vbuckets = vbuckets;
        self
    }

    /// Set the `hashAlgorithm` name.
    pub fn with_hash_algorithm(mut self, name: impl Into<String>) -> Self {
        self.hash_algorithm = name.into();
        self
    }

    /// Use explicit `vBucketMap` rows instead of generated ones.
    pub fn with_rows(mut self, rows: Vec<Vec<i64>>) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Whether nodes advertise a `couchApiBase`.
    pub fn with_couch_api_base(mut self, enabled: bool) -> Self {
        self.couch_api_base = enabled;
        self
    }

    fn generated_rows(&self) -> Vec<Vec<i64>> {
        (0..self.vbuckets)
            .map(|vb| {
                (0..=self.replicas)
                    .map(|rank| match self.servers {
                        0 => -1,
                        n => ((vb + rank) % n) as i64,
                    })
                    .collect()
            })
            .collect()
    }

    /// Render the document.
    pub fn build(&self) -> Value {
        let server_list: Vec<String> = (0..self.servers)
            .map(|i| format!("10.0.0.{}:11210", i + 1))
            .collect();

        let nodes: Vec<Value> = (0..self.servers)
            .map(|i| {
                let mut node = json!({
                    "hostname": format!("10.0.0.{}:8091", i + 1),
                    "ports": { "direct": 11210, "proxy": 11211 },
                });
                if self.couch_api_base {
                    node["couchApiBase"] = json!(format!("http://10.0.0.{}:8092/default", i + 1));
                }
                node
            })
            .collect();

        let rows = self.rows.clone().unwrap_or_else(|| self.generated_rows());

        json!({
            "name": "default",
            "bucketType": "membase",
            "nodes": nodes,
            "vBucketServerMap": {
                "hashAlgorithm": self.hash_algorithm,
                "numReplicas": self.replicas,
                "serverList": server_list,
                "vBucketMap": rows,
            },
        })
    }
}
