//! Partition map construction.

use super::fields::as_i64;
use crate::config::ParserConfig;
use crate::error::{DocumentError, Error, Result, TopologyError};
use crate::topology::{VBucket, MAX_REPLICAS};
use crate::types::ServerIndex;
use serde_json::Value;

/// Row value meaning "no server assigned".
const NO_SERVER: i64 = -1;

/// Check that a vbucket count is a power of two in `1..=max`.
pub(crate) fn check_vbuckets_count(count: usize, max: usize) -> std::result::Result<(), TopologyError> {
    if count == 0 || (count & (count - 1)) != 0 {
        return Err(TopologyError::VBucketCountNotPowerOfTwo(count));
    }
    if count > max {
        return Err(TopologyError::VBucketCountExceeded { count, max });
    }
    Ok(())
}

/// Build the partition map from `vBucketMap` rows.
///
/// Row `i` becomes vbucket `i`: the first entry is the master, the rest
/// fill replica slots from rank 0. Unfilled slots stay empty.
pub(crate) fn vbucket_map(
    rows: &[Value],
    servers_count: usize,
    config: &ParserConfig,
) -> Result<Vec<VBucket>> {
    check_vbuckets_count(rows.len(), config.vbucket_bound())?;

    let checker = IndexChecker {
        servers_count,
        validate: config.validate_indices,
    };

    rows.iter()
        .enumerate()
        .map(|(vbucket, row)| parse_row(vbucket, row, &checker))
        .collect()
}

fn parse_row(vbucket: usize, row: &Value, checker: &IndexChecker) -> Result<VBucket> {
    let path = format!("vBucketServerMap.vBucketMap[{vbucket}]");
    let row = row.as_array().ok_or_else(|| DocumentError::WrongType {
        field: path.clone(),
        expected: "array",
    })?;

    let Some((master, replicas)) = row.split_first() else {
        return Err(DocumentError::EmptyPartitionRow(vbucket).into());
    };
    if replicas.len() > MAX_REPLICAS {
        return Err(TopologyError::PartitionRowTooLong {
            vbucket,
            len: row.len(),
            max: MAX_REPLICAS + 1,
        }
        .into());
    }

    let master = as_i64(master, &format!("{path}[0]"))?;
    let master = checker.server(vbucket, master)?;

    let mut slots = [None; MAX_REPLICAS];
    for (rank, value) in replicas.iter().enumerate() {
        let index = as_i64(value, &format!("{path}[{}]", rank + 1))?;
        if index != NO_SERVER {
            slots[rank] = Some(checker.server(vbucket, index)?);
        }
    }

    Ok(VBucket::new(master, slots))
}

/// Converts raw row values into server indices.
struct IndexChecker {
    servers_count: usize,
    validate: bool,
}

impl IndexChecker {
    fn server(&self, vbucket: usize, index: i64) -> Result<ServerIndex> {
        let out_of_range = || {
            Error::from(TopologyError::ServerIndexOutOfRange {
                vbucket,
                index,
                servers: self.servers_count,
            })
        };

        let server = ServerIndex::try_from(index).map_err(|_| out_of_range())?;
        if self.validate && server >= self.servers_count {
            return Err(out_of_range());
        }
        Ok(server)
    }
}
