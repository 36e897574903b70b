//! Hash algorithms used to map keys onto vbuckets.
//!
//! The factory never names a concrete algorithm. It asks an injected
//! [`HashAlgorithmResolver`] for the algorithm named in the document, so
//! tests can hand in a fake set and clients can register their own.

use crc::{Crc, CRC_32_ISO_HDLC};
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hasher;
use std::sync::Arc;
use twox_hash::XxHash64;

const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// A key hash function.
pub trait HashAlgorithm: Send + Sync + fmt::Debug {
    /// Name as it appears in the `hashAlgorithm` field.
    fn name(&self) -> &str;

    /// Hash a key. Only the low bits are used for vbucket selection.
    fn hash(&self, key: &[u8]) -> u64;
}

/// Looks up hash algorithms by name.
pub trait HashAlgorithmResolver {
    /// Resolve a name, or `None` if the algorithm is unknown.
    fn resolve(&self, name: &str) -> Option<Arc<dyn HashAlgorithm>>;
}

impl<R: HashAlgorithmResolver + ?Sized> HashAlgorithmResolver for &R {
    fn resolve(&self, name: &str) -> Option<Arc<dyn HashAlgorithm>> {
        (**self).resolve(name)
    }
}

/// The memcached vbucket hash: CRC-32, upper 15 bits.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrcHash;

impl HashAlgorithm for CrcHash {
    fn name(&self) -> &str {
        "CRC"
    }

    fn hash(&self, key: &[u8]) -> u64 {
        let crc = CRC32.checksum(key);
        u64::from((crc >> 16) & 0x7fff)
    }
}

/// xxHash64 with a zero seed.
#[derive(Debug, Clone, Copy, Default)]
pub struct XxHash64Hash;

impl HashAlgorithm for XxHash64Hash {
    fn name(&self) -> &str {
        "XXHASH64"
    }

    fn hash(&self, key: &[u8]) -> u64 {
        let mut hasher = XxHash64::with_seed(0);
        hasher.write(key);
        hasher.finish()
    }
}

/// Name-keyed set of hash algorithms. Lookups ignore case.
#[derive(Debug, Clone, Default)]
pub struct HashAlgorithmRegistry {
    algorithms: HashMap<String, Arc<dyn HashAlgorithm>>,
}

impl HashAlgorithmRegistry {
    /// Create a registry with no algorithms.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a registry holding `CRC` and `XXHASH64`.
    pub fn builtin() -> Self {
        Self::empty().with(CrcHash).with(XxHash64Hash)
    }

    /// Register an algorithm under its own name, replacing any previous one.
    pub fn register(&mut self, algorithm: Arc<dyn HashAlgorithm>) {
        self.algorithms
            .insert(algorithm.name().to_ascii_uppercase(), algorithm);
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, algorithm: impl HashAlgorithm + 'static) -> Self {
        self.register(Arc::new(algorithm));
        self
    }

    /// Number of registered algorithms.
    pub fn len(&self) -> usize {
        self.algorithms.len()
    }

    /// Whether no algorithm is registered.
    pub fn is_empty(&self) -> bool {
        self.algorithms.is_empty()
    }
}

impl HashAlgorithmResolver for HashAlgorithmRegistry {
    fn resolve(&self, name: &str) -> Option<Arc<dyn HashAlgorithm>> {
        self.algorithms.get(&name.to_ascii_uppercase()).cloned()
    }
}

/// A resolved algorithm together with the name the document used.
///
/// Two references are equal when their names are, so parsing one document
/// twice yields equal topologies.
#[derive(Clone)]
pub struct HashAlgorithmRef {
    name: String,
    algorithm: Arc<dyn HashAlgorithm>,
}

impl HashAlgorithmRef {
    pub(crate) fn new(name: impl Into<String>, algorithm: Arc<dyn HashAlgorithm>) -> Self {
        Self {
            name: name.into(),
            algorithm,
        }
    }

    /// Name from the document.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The resolved algorithm.
    pub fn algorithm(&self) -> &Arc<dyn HashAlgorithm> {
        &self.algorithm
    }

    /// Hash a key with the resolved algorithm.
    pub fn hash(&self, key: &[u8]) -> u64 {
        self.algorithm.hash(key)
    }
}

impl fmt::Debug for HashAlgorithmRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HashAlgorithmRef").field(&self.name).finish()
    }
}

impl PartialEq for HashAlgorithmRef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for HashAlgorithmRef {}

impl Serialize for HashAlgorithmRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}
