//! Configuration types for the topology parser.

use crate::topology::{MAX_REPLICAS, MAX_VBUCKETS};

/// Bounds and validation toggles applied while building a topology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Maximum accepted `numReplicas`.
    /// Never larger than [`MAX_REPLICAS`], the size of the replica array.
    pub max_replicas: usize,

    /// Maximum accepted number of vbuckets.
    /// Never larger than [`MAX_VBUCKETS`].
    pub max_vbuckets: usize,

    /// Range-check every master and replica index against the server list
    /// while parsing. When disabled, bad indices only surface at lookup time.
    pub validate_indices: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_replicas: MAX_REPLICAS,
            max_vbuckets: MAX_VBUCKETS,
            validate_indices: true,
        }
    }
}

impl ParserConfig {
    /// Create a configuration with the platform defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum replica count (capped at [`MAX_REPLICAS`]).
    pub fn with_max_replicas(mut self, max_replicas: usize) -> Self {
        self.max_replicas = max_replicas.min(MAX_REPLICAS);
        self
    }

    /// Set the maximum vbucket count (capped at [`MAX_VBUCKETS`]).
    pub fn with_max_vbuckets(mut self, max_vbuckets: usize) -> Self {
        self.max_vbuckets = max_vbuckets.min(MAX_VBUCKETS);
        self
    }

    /// Replica bound enforced while parsing.
    /// Capped at [`MAX_REPLICAS`] even when the field is set directly.
    pub fn replica_bound(&self) -> usize {
        self.max_replicas.min(MAX_REPLICAS)
    }

    /// Vbucket bound enforced while parsing, capped at [`MAX_VBUCKETS`].
    pub fn vbucket_bound(&self) -> usize {
        self.max_vbuckets.min(MAX_VBUCKETS)
    }

    /// Enable or disable eager index validation.
    pub fn with_index_validation(mut self, enabled: bool) -> Self {
        self.validate_indices = enabled;
        self
    }
}
