//! Error types for topology configuration parsing and lookups.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for topology operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for topology configuration.
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration source could not be read.
    #[error("failed to read config from {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The document is not valid JSON or has missing or mistyped fields.
    #[error("malformed config document: {0}")]
    MalformedDocument(#[from] DocumentError),

    /// A required node or server list is present but empty.
    #[error("empty topology: {0} list is empty")]
    EmptyTopology(&'static str),

    /// A structural invariant of the topology is violated.
    #[error("invalid topology: {0}")]
    InvalidTopology(#[from] TopologyError),

    /// The named hash algorithm is unknown to the resolver.
    #[error("unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Vbucket lookup past the end of the partition map.
    #[error("vbucket not found: {index} (vbucket count {count})")]
    VBucketNotFound { index: usize, count: usize },

    /// Server lookup past the end of the server list.
    #[error("server not found: {index} (server count {count})")]
    ServerNotFound { index: usize, count: usize },
}

/// Document shape errors.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The text is not well-formed JSON.
    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The top-level value is not a JSON object.
    #[error("top-level value is not an object")]
    NotAnObject,

    /// A required field is absent.
    #[error("missing field: {0}")]
    MissingField(String),

    /// A field is present but has the wrong JSON type.
    #[error("field {field} has wrong type, expected {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },

    /// A hostname has nothing before its port suffix.
    #[error("field {0} has an empty host")]
    EmptyHostname(String),

    /// A partition row has no master entry.
    #[error("vbucket {0} has an empty row")]
    EmptyPartitionRow(usize),

    /// A port value does not fit in a u16.
    #[error("field {field} is not a valid port: {value}")]
    InvalidPort { field: String, value: i64 },

    /// A couchApiBase value is not a valid URL.
    #[error("invalid couchApiBase url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Topology invariant violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TopologyError {
    /// More replicas than the replica array can hold.
    #[error("expected at most {max} replicas, got {count}")]
    ReplicaCountExceeded { count: u64, max: usize },

    /// The vbucket count is zero or not a power of two.
    #[error("number of vbuckets must be a power of two and > 0, got {0}")]
    VBucketCountNotPowerOfTwo(usize),

    /// The vbucket count exceeds the configured maximum.
    #[error("number of vbuckets must be <= {max}, got {count}")]
    VBucketCountExceeded { count: usize, max: usize },

    /// A partition row carries more replica entries than the replica array.
    #[error("vbucket {vbucket} row has {len} entries, at most {max} allowed")]
    PartitionRowTooLong {
        vbucket: usize,
        len: usize,
        max: usize,
    },

    /// A partition row points at a server that does not exist.
    #[error("vbucket {vbucket} references server {index}, only {servers} servers")]
    ServerIndexOutOfRange {
        vbucket: usize,
        index: i64,
        servers: usize,
    },
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::MalformedDocument(DocumentError::Json(e))
    }
}
