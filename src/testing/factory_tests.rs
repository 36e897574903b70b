//! End-to-end tests of the config factory against whole documents.

use super::{PartitionedDocument, SimpleDocument};
use crate::config::ParserConfig;
use crate::error::{DocumentError, Error, TopologyError};
use crate::hash::{HashAlgorithm, HashAlgorithmRegistry, HashAlgorithmResolver};
use crate::topology::{Config, MAX_REPLICAS, MAX_VBUCKETS};
use crate::types::ConfigKind;
use crate::ConfigFactory;
use serde_json::{json, Value};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn parse(doc: &Value) -> crate::Result<Config> {
    ConfigFactory::new().parse_value(doc)
}

fn partitioned(doc: &Value) -> crate::topology::PartitionedConfig {
    match parse(doc).unwrap() {
        Config::Partitioned(config) => config,
        other => panic!("expected partitioned config, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Simple documents
// ---------------------------------------------------------------------------

#[test]
fn test_simple_server_count_and_order() {
    for n in 1..=16 {
        let config = parse(&SimpleDocument::new(n).build()).unwrap();
        assert_eq!(config.kind(), ConfigKind::Simple);
        assert_eq!(config.servers_count(), n);
        for (i, server) in config.servers().iter().enumerate() {
            assert_eq!(server, &format!("10.0.0.{}:11210", i + 1));
        }
    }
}

#[test]
fn test_simple_uses_direct_port_not_web_port() {
    let doc = SimpleDocument::new(0)
        .with_node("cache-b:8091", 11300)
        .with_node("cache-a", 11211)
        .build();
    let config = parse(&doc).unwrap();
    assert_eq!(config.servers(), ["cache-b:11300", "cache-a:11211"]);
}

#[test]
fn test_simple_empty_nodes() {
    let err = parse(&SimpleDocument::new(0).build()).unwrap_err();
    assert!(matches!(err, Error::EmptyTopology("nodes")));
}

#[test]
fn test_simple_node_missing_hostname() {
    let doc = json!({ "nodes": [
        { "hostname": "a:8091", "ports": { "direct": 11210 } },
        { "ports": { "direct": 11210 } },
    ]});
    let err = parse(&doc).unwrap_err();
    assert!(matches!(
        err,
        Error::MalformedDocument(DocumentError::MissingField(ref f)) if f == "nodes[1].hostname"
    ));
}

#[test]
fn test_simple_empty_host_rejected() {
    let doc = SimpleDocument::new(1).with_node(":8091", 11210).build();
    assert!(matches!(
        parse(&doc).unwrap_err(),
        Error::MalformedDocument(DocumentError::EmptyHostname(ref f)) if f == "nodes[1].hostname"
    ));
}

#[test]
fn test_document_without_server_map_is_never_partitioned() {
    // Carries everything a partitioned builder would want except the marker.
    let mut doc = SimpleDocument::new(2).build();
    doc["serverList"] = json!(["10.0.0.1:11210"]);
    doc["vBucketMap"] = json!([[0]]);
    doc["hashAlgorithm"] = json!("not-a-real-algo");

    let config = parse(&doc).unwrap();
    assert!(matches!(config, Config::Simple(_)));
    assert_eq!(config.servers_count(), 2);
}

// ---------------------------------------------------------------------------
// Partitioned documents
// ---------------------------------------------------------------------------

#[test]
fn test_partitioned_basic() {
    let config = partitioned(&PartitionedDocument::new(3, 1).with_vbuckets(1024).build());
    assert_eq!(config.hash_algorithm().name(), "CRC");
    assert_eq!(config.replicas_count(), 1);
    assert_eq!(config.servers_count(), 3);
    assert_eq!(config.vbuckets_count(), 1024);
    assert_eq!(config.vbuckets().len(), config.vbuckets_count());
    assert!(config.vbuckets_count().is_power_of_two());
    assert_eq!(config.servers()[2], "10.0.0.3:11210");
}

#[test]
fn test_partition_count_matches_and_is_power_of_two() {
    for shift in 0..=16 {
        let count = 1usize << shift;
        let config = partitioned(&PartitionedDocument::new(2, 1).with_vbuckets(count).build());
        assert_eq!(config.vbuckets_count(), count);
        assert_eq!(config.vbuckets().len(), count);
    }
}

#[test]
fn test_non_power_of_two_partition_counts_rejected() {
    for count in [0, 3, 5, 6, 7, 9, 100, 1000, 1023] {
        let doc = PartitionedDocument::new(2, 1).with_vbuckets(count).build();
        let err = parse(&doc).unwrap_err();
        assert!(
            matches!(
                err,
                Error::InvalidTopology(TopologyError::VBucketCountNotPowerOfTwo(c)) if c == count
            ),
            "count {count}: {err:?}"
        );
    }
}

#[test]
fn test_partition_count_above_bound_rejected() {
    let factory = ConfigFactory::new().with_config(ParserConfig::new().with_max_vbuckets(256));
    let ok = PartitionedDocument::new(2, 0).with_vbuckets(256).build();
    assert!(factory.parse_value(&ok).is_ok());

    let too_many = PartitionedDocument::new(2, 0).with_vbuckets(512).build();
    assert!(matches!(
        factory.parse_value(&too_many),
        Err(Error::InvalidTopology(TopologyError::VBucketCountExceeded { count: 512, max: 256 }))
    ));
}

#[test]
fn test_replica_count_at_bound_succeeds() {
    let config = partitioned(&PartitionedDocument::new(4, MAX_REPLICAS).build());
    assert_eq!(config.replicas_count(), MAX_REPLICAS);
    assert!(config.vbuckets().iter().all(|vb| vb.assigned_replicas().count() == MAX_REPLICAS));
}

#[test]
fn test_replica_count_above_bound_rejected() {
    let mut doc = PartitionedDocument::new(4, 1).build();
    doc["vBucketServerMap"]["numReplicas"] = json!(MAX_REPLICAS + 1);
    let err = parse(&doc).unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidTopology(TopologyError::ReplicaCountExceeded { count: 4, max: 3 })
    ));
}

#[test]
fn test_replica_bound_from_parser_config() {
    let factory = ConfigFactory::new().with_config(ParserConfig::new().with_max_replicas(1));
    assert!(factory.parse_value(&PartitionedDocument::new(3, 1).build()).is_ok());
    assert!(matches!(
        factory.parse_value(&PartitionedDocument::new(3, 2).build()),
        Err(Error::InvalidTopology(TopologyError::ReplicaCountExceeded { count: 2, max: 1 }))
    ));
}

#[test]
fn test_replica_bound_never_exceeds_replica_array() {
    let config = ParserConfig {
        max_replicas: 10,
        ..Default::default()
    };
    let factory = ConfigFactory::new().with_config(config);

    for replicas in [MAX_REPLICAS + 1, 7] {
        let mut doc = PartitionedDocument::new(4, 1).build();
        doc["vBucketServerMap"]["numReplicas"] = json!(replicas);
        assert!(matches!(
            factory.parse_value(&doc),
            Err(Error::InvalidTopology(TopologyError::ReplicaCountExceeded { max: 3, .. }))
        ));
    }
    assert!(factory.parse_value(&PartitionedDocument::new(4, MAX_REPLICAS).build()).is_ok());
}

#[test]
fn test_vbucket_bound_never_exceeds_platform_limit() {
    let factory = ConfigFactory::new().with_config(ParserConfig::new().with_max_vbuckets(1 << 20));
    let doc = PartitionedDocument::new(2, 0).with_vbuckets(MAX_VBUCKETS * 2).build();
    assert!(matches!(
        factory.parse_value(&doc),
        Err(Error::InvalidTopology(TopologyError::VBucketCountExceeded { count: 131072, max: 65536 }))
    ));
}

#[test]
fn test_negative_replica_count_is_malformed() {
    let mut doc = PartitionedDocument::new(2, 1).build();
    doc["vBucketServerMap"]["numReplicas"] = json!(-1);
    assert!(matches!(
        parse(&doc).unwrap_err(),
        Error::MalformedDocument(DocumentError::WrongType { .. })
    ));
}

#[test]
fn test_row_fills_master_then_replicas() {
    let doc = PartitionedDocument::new(3, 2).with_rows(vec![vec![2, 0, 1]]).build();
    let config = partitioned(&doc);
    let vb = config.vbucket(0).unwrap();
    assert_eq!(vb.master(), 2);
    assert_eq!(vb.replica(0), Some(0));
    assert_eq!(vb.replica(1), Some(1));
    assert_eq!(vb.replica(2), None);
    assert!(config.vbucket(1).is_err());
}

#[test]
fn test_short_rows_keep_sentinel() {
    let doc = PartitionedDocument::new(2, 3)
        .with_rows(vec![vec![0], vec![1, 0], vec![0, -1, -1, -1], vec![1, 0, -1]])
        .build();
    let config = partitioned(&doc);
    assert_eq!(config.vbucket(0).unwrap().replicas(), &[None, None, None]);
    assert_eq!(config.vbucket(1).unwrap().replicas(), &[Some(0), None, None]);
    assert_eq!(config.vbucket(2).unwrap().replicas(), &[None, None, None]);
    assert_eq!(config.replica(3, 0).unwrap(), Some(0));
    assert_eq!(config.replica(3, 2).unwrap(), None);
}

#[test]
fn test_empty_server_list() {
    let err = parse(&PartitionedDocument::new(0, 0).build()).unwrap_err();
    assert!(matches!(err, Error::EmptyTopology("serverList")));
}

#[test]
fn test_unknown_hash_algorithm() {
    let doc = PartitionedDocument::new(2, 1)
        .with_hash_algorithm("not-a-real-algo")
        .build();
    let err = parse(&doc).unwrap_err();
    assert!(matches!(err, Error::UnsupportedAlgorithm(ref name) if name == "not-a-real-algo"));
}

#[test]
fn test_unknown_hash_algorithm_reported_before_other_errors() {
    // Empty server list and a bad partition count would both fail later.
    let doc = PartitionedDocument::new(0, 0)
        .with_vbuckets(3)
        .with_hash_algorithm("MD5")
        .build();
    assert!(matches!(parse(&doc).unwrap_err(), Error::UnsupportedAlgorithm(_)));
}

#[test]
fn test_out_of_range_master_rejected_eagerly() {
    let doc = PartitionedDocument::new(2, 1)
        .with_rows(vec![vec![0, 1], vec![2, 0]])
        .build();
    assert!(matches!(
        parse(&doc).unwrap_err(),
        Error::InvalidTopology(TopologyError::ServerIndexOutOfRange { vbucket: 1, index: 2, servers: 2 })
    ));
}

#[test]
fn test_lenient_mode_defers_to_lookup() {
    let factory = ConfigFactory::new().with_config(ParserConfig::new().with_index_validation(false));
    let doc = PartitionedDocument::new(1, 0).with_rows(vec![vec![4]]).build();
    let config = factory.parse_value(&doc).unwrap();
    let map = config.as_partitioned().unwrap();
    assert_eq!(map.master(0).unwrap(), 4);
    assert!(matches!(
        map.master_server_for_key(b"user:1"),
        Err(Error::ServerNotFound { index: 4, count: 1 })
    ));
}

#[test]
fn test_couch_servers_collected_in_order() {
    let config = partitioned(&PartitionedDocument::new(3, 1).build());
    let hosts: Vec<_> = config
        .couch_servers()
        .iter()
        .map(|url| url.host_str().unwrap().to_string())
        .collect();
    assert_eq!(hosts, vec!["10.0.0.1", "10.0.0.2", "10.0.0.3"]);
}

#[test]
fn test_couch_servers_optional() {
    let config = partitioned(&PartitionedDocument::new(3, 1).with_couch_api_base(false).build());
    assert!(config.couch_servers().is_empty());
}

#[test]
fn test_bad_couch_api_base_fails_whole_parse() {
    let mut doc = PartitionedDocument::new(3, 1).build();
    doc["nodes"][1]["couchApiBase"] = json!("::not a url::");
    assert!(matches!(
        parse(&doc).unwrap_err(),
        Error::MalformedDocument(DocumentError::InvalidUrl { .. })
    ));
}

#[test]
fn test_partitioned_requires_nodes() {
    let mut doc = PartitionedDocument::new(2, 1).build();
    doc.as_object_mut().unwrap().remove("nodes");
    assert!(matches!(
        parse(&doc).unwrap_err(),
        Error::MalformedDocument(DocumentError::MissingField(ref f)) if f == "nodes"
    ));
}

#[test]
fn test_missing_vbucket_map() {
    let mut doc = PartitionedDocument::new(2, 1).build();
    doc["vBucketServerMap"]
        .as_object_mut()
        .unwrap()
        .remove("vBucketMap");
    assert!(matches!(
        parse(&doc).unwrap_err(),
        Error::MalformedDocument(DocumentError::MissingField(ref f))
            if f == "vBucketServerMap.vBucketMap"
    ));
}

// ---------------------------------------------------------------------------
// Idempotence and lookups
// ---------------------------------------------------------------------------

#[test]
fn test_parsing_twice_yields_equal_configs() {
    let factory = ConfigFactory::new();
    for doc in [
        SimpleDocument::new(5).build(),
        PartitionedDocument::new(4, 2).with_vbuckets(256).build(),
    ] {
        let text = doc.to_string();
        let first = factory.parse_str(&text).unwrap();
        let second = factory.parse_str(&text).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, factory.parse_value(&doc).unwrap());
    }
}

#[test]
fn test_keys_route_to_master_server() {
    let config = partitioned(&PartitionedDocument::new(4, 1).with_vbuckets(64).build());
    for i in 0..500 {
        let key = format!("user:{i}");
        let vb = config.vbucket_for_key(key.as_bytes());
        assert!(vb < 64);
        // Generated rows master vbucket i on server i % 4.
        let expected = format!("10.0.0.{}:11210", vb % 4 + 1);
        assert_eq!(config.master_server_for_key(key.as_bytes()).unwrap(), expected);
    }
}

// ---------------------------------------------------------------------------
// Injected resolvers
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct FixedHash(u64);

impl HashAlgorithm for FixedHash {
    fn name(&self) -> &str {
        "FIXED"
    }

    fn hash(&self, _key: &[u8]) -> u64 {
        self.0
    }
}

#[test]
fn test_custom_resolver() {
    let registry = HashAlgorithmRegistry::empty().with(FixedHash(5));
    let factory = ConfigFactory::with_resolver(registry);

    let doc = PartitionedDocument::new(2, 0)
        .with_vbuckets(4)
        .with_hash_algorithm("fixed")
        .build();
    let config = factory.parse_value(&doc).unwrap();
    let map = config.as_partitioned().unwrap();
    assert_eq!(map.hash_algorithm().name(), "fixed");
    assert_eq!(map.vbucket_for_key(b"anything"), 5 & 3);

    // The builtin names are not known to this registry.
    let crc = PartitionedDocument::new(2, 0).build();
    assert!(matches!(
        factory.parse_value(&crc),
        Err(Error::UnsupportedAlgorithm(_))
    ));
}

struct CountingResolver {
    inner: HashAlgorithmRegistry,
    calls: AtomicUsize,
}

impl HashAlgorithmResolver for CountingResolver {
    fn resolve(&self, name: &str) -> Option<Arc<dyn HashAlgorithm>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.resolve(name)
    }
}

#[test]
fn test_resolver_borrowed_and_consulted_once() {
    let resolver = CountingResolver {
        inner: HashAlgorithmRegistry::builtin(),
        calls: AtomicUsize::new(0),
    };
    let factory = ConfigFactory::with_resolver(&resolver);

    factory.parse_value(&PartitionedDocument::new(2, 1).build()).unwrap();
    factory.parse_value(&SimpleDocument::new(2).build()).unwrap();
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

#[test]
fn test_parse_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let doc = PartitionedDocument::new(3, 1).build();
    write!(file, "{}", serde_json::to_string_pretty(&doc).unwrap()).unwrap();

    let from_file = ConfigFactory::new().parse_file(file.path()).unwrap();
    assert_eq!(from_file, parse(&doc).unwrap());
}

#[test]
fn test_parse_missing_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("missing.json");
    match ConfigFactory::new().parse_file(&path).unwrap_err() {
        Error::Io { path: reported, source } => {
            assert_eq!(reported, path);
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("expected io error, got {other:?}"),
    }
}

#[test]
fn test_parse_file_with_invalid_json() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"{ \"nodes\": [ }").unwrap();
    assert!(matches!(
        ConfigFactory::new().parse_file(file.path()).unwrap_err(),
        Error::MalformedDocument(DocumentError::Json(_))
    ));
}
