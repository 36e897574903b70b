//! Cluster topology configuration for crema clients.
//!
//! This crate turns a cluster configuration document into an immutable
//! routing table that a client consults to find the server owning a key:
//! - **Schema detection** between cache-style and partition-aware documents
//! - **Validation** of vbucket counts, replica bounds and server indices
//! - **Vbucket maps** with a master and ranked replicas per partition
//!
//! # Example
//!
//! ```rust,no_run
//! use crema_topology::{Config, ConfigFactory};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let factory = ConfigFactory::new();
//!     let config = factory.parse_file("/etc/crema/bucket.json")?;
//!
//!     match &config {
//!         Config::Simple(simple) => {
//!             println!("{} cache servers", simple.servers_count());
//!         }
//!         Config::Partitioned(map) => {
//!             let vb = map.vbucket_for_key(b"user:123");
//!             println!("user:123 -> vbucket {} on {}", vb, map.master_server_for_key(b"user:123")?);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │      ConfigFactory (file / text / value)    │
//! └─────────────────────────────────────────────┘
//!                     │ detect_kind
//!          ┌──────────┴──────────┐
//!          ▼                     ▼
//! ┌─────────────────┐   ┌─────────────────────────┐
//! │  SimpleConfig   │   │   PartitionedConfig     │
//! │  host:direct    │   │ • HashAlgorithmRef      │
//! │  per node       │   │ • serverList            │
//! └─────────────────┘   │ • VBucket[] (pow2)      │
//!                       │ • couchApiBase URLs     │
//!                       └─────────────────────────┘
//! ```
//!
//! Hash algorithms are resolved through [`HashAlgorithmResolver`], so
//! clients can inject their own set; [`HashAlgorithmRegistry::builtin`]
//! provides `CRC` and `XXHASH64`.

pub mod config;
pub mod error;
pub mod factory;
pub mod hash;
pub mod testing;
pub mod topology;
pub mod types;

// Re-export main types for convenience
pub use config::ParserConfig;
pub use error::{DocumentError, Error, Result, TopologyError};
pub use factory::{detect_kind, parse_file, parse_str, ConfigFactory};
pub use hash::{
    CrcHash, HashAlgorithm, HashAlgorithmRef, HashAlgorithmRegistry, HashAlgorithmResolver,
    XxHash64Hash,
};
pub use topology::{Config, PartitionedConfig, SimpleConfig, VBucket, MAX_REPLICAS, MAX_VBUCKETS};
pub use types::{ConfigKind, ServerIndex};
