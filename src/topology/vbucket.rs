//! A single vbucket's ownership record.

use crate::types::ServerIndex;
use serde::Serialize;

/// Maximum number of replicas a vbucket can carry.
pub const MAX_REPLICAS: usize = 3;

/// Maximum number of vbuckets in a partition map.
pub const MAX_VBUCKETS: usize = 65536;

/// Ownership of one partition of the key space.
///
/// `replicas` always has [`MAX_REPLICAS`] slots, ranked by position.
/// `None` marks a slot with no replica assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct VBucket {
    master: ServerIndex,
    replicas: [Option<ServerIndex>; MAX_REPLICAS],
}

impl VBucket {
    /// Create a vbucket with the given master and replica slots.
    pub fn new(master: ServerIndex, replicas: [Option<ServerIndex>; MAX_REPLICAS]) -> Self {
        Self { master, replicas }
    }

    /// Create a vbucket with no replicas.
    pub fn with_master(master: ServerIndex) -> Self {
        Self::new(master, [None; MAX_REPLICAS])
    }

    /// Index of the server holding the primary copy.
    pub fn master(&self) -> ServerIndex {
        self.master
    }

    /// All replica slots, including empty ones.
    pub fn replicas(&self) -> &[Option<ServerIndex>; MAX_REPLICAS] {
        &self.replicas
    }

    /// Replica at `rank`, or `None` if the slot is empty or out of range.
    pub fn replica(&self, rank: usize) -> Option<ServerIndex> {
        self.replicas.get(rank).copied().flatten()
    }

    /// Populated replicas in rank order.
    pub fn assigned_replicas(&self) -> impl Iterator<Item = ServerIndex> + '_ {
        self.replicas.iter().filter_map(|r| *r)
    }

    /// Whether `server` holds this vbucket as master or replica.
    pub fn is_owner(&self, server: ServerIndex) -> bool {
        self.master == server || self.replicas.contains(&Some(server))
    }
}
