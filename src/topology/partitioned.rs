//! Partition-aware topology: a vbucket server map.

use super::vbucket::VBucket;
use crate::error::{Error, Result};
use crate::hash::HashAlgorithmRef;
use crate::types::ServerIndex;
use serde::Serialize;
use url::Url;

/// Routing table for a partition-aware cluster.
///
/// Built once by the factory and read-only afterwards. The vbucket at
/// position `i` of [`vbuckets`](Self::vbuckets) owns partition `i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionedConfig {
    hash_algorithm: HashAlgorithmRef,
    replicas_count: usize,
    servers: Vec<String>,
    vbuckets: Vec<VBucket>,
    couch_servers: Vec<Url>,
}

impl PartitionedConfig {
    pub(crate) fn new(
        hash_algorithm: HashAlgorithmRef,
        replicas_count: usize,
        servers: Vec<String>,
        vbuckets: Vec<VBucket>,
        couch_servers: Vec<Url>,
    ) -> Self {
        debug_assert!(vbuckets.len().is_power_of_two());
        Self {
            hash_algorithm,
            replicas_count,
            servers,
            vbuckets,
            couch_servers,
        }
    }

    /// Hash algorithm named by the document.
    pub fn hash_algorithm(&self) -> &HashAlgorithmRef {
        &self.hash_algorithm
    }

    /// Number of replicas configured for each vbucket.
    pub fn replicas_count(&self) -> usize {
        self.replicas_count
    }

    /// Number of vbuckets. Always a power of two.
    pub fn vbuckets_count(&self) -> usize {
        self.vbuckets.len()
    }

    /// Number of servers.
    pub fn servers_count(&self) -> usize {
        self.servers.len()
    }

    /// Server addresses in `serverList` order.
    pub fn servers(&self) -> &[String] {
        &self.servers
    }

    /// Server at `index`.
    pub fn server(&self, index: ServerIndex) -> Option<&str> {
        self.servers.get(index).map(String::as_str)
    }

    /// The full partition map.
    pub fn vbuckets(&self) -> &[VBucket] {
        &self.vbuckets
    }

    /// API base URLs of the nodes that advertise one, in `nodes` order.
    pub fn couch_servers(&self) -> &[Url] {
        &self.couch_servers
    }

    /// Vbucket owning partition `index`.
    pub fn vbucket(&self, index: usize) -> Result<&VBucket> {
        self.vbuckets.get(index).ok_or(Error::VBucketNotFound {
            index,
            count: self.vbuckets.len(),
        })
    }

    /// Master server index of vbucket `index`.
    pub fn master(&self, index: usize) -> Result<ServerIndex> {
        self.vbucket(index).map(VBucket::master)
    }

    /// Replica of vbucket `index` at `rank`, `None` when the slot is empty.
    pub fn replica(&self, index: usize, rank: usize) -> Result<Option<ServerIndex>> {
        self.vbucket(index).map(|vb| vb.replica(rank))
    }

    /// Vbucket a key hashes to.
    pub fn vbucket_for_key(&self, key: &[u8]) -> usize {
        let mask = (self.vbuckets.len() - 1) as u64;
        (self.hash_algorithm.hash(key) & mask) as usize
    }

    /// Address of the master server for a key.
    pub fn master_server_for_key(&self, key: &[u8]) -> Result<&str> {
        let master = self.master(self.vbucket_for_key(key))?;
        self.server(master).ok_or(Error::ServerNotFound {
            index: master,
            count: self.servers.len(),
        })
    }
}
