//! Server list extraction for both document shapes.

use super::fields::{as_object, as_str, get_i64, get_object, get_opt_str, get_str};
use crate::error::{DocumentError, Error, Result};
use serde_json::Value;
use url::Url;

/// Build `host:direct_port` addresses from a `nodes` array, in order.
pub(crate) fn node_servers(nodes: &[Value]) -> Result<Vec<String>> {
    if nodes.is_empty() {
        return Err(Error::EmptyTopology("nodes"));
    }

    nodes
        .iter()
        .enumerate()
        .map(|(i, node)| node_address(i, node))
        .collect()
}

fn node_address(i: usize, node: &Value) -> Result<String> {
    let node = as_object(node, &format!("nodes[{i}]"))?;
    let path = format!("nodes[{i}].hostname");
    let host = strip_port(get_str(node, "hostname", &path)?);
    if host.is_empty() || host == "[]" {
        return Err(DocumentError::EmptyHostname(path).into());
    }
    let ports = get_object(node, "ports", &format!("nodes[{i}].ports"))?;

    let path = format!("nodes[{i}].ports.direct");
    let direct = get_i64(ports, "direct", &path)?;
    let port = u16::try_from(direct).map_err(|_| DocumentError::InvalidPort {
        field: path,
        value: direct,
    })?;

    Ok(format!("{}:{}", host, port))
}

/// Drop the `:port` suffix of a hostname. Bracketed IPv6 hosts keep
/// their brackets.
fn strip_port(hostname: &str) -> &str {
    if let Some(rest) = hostname.strip_prefix('[') {
        if let Some(end) = rest.find(']') {
            return &hostname[..end + 2];
        }
    }

    match hostname.split_once(':') {
        Some((host, _)) => host,
        None => hostname,
    }
}

/// Read a `serverList` array of plain address strings, in order.
pub(crate) fn server_list(servers: &[Value]) -> Result<Vec<String>> {
    if servers.is_empty() {
        return Err(Error::EmptyTopology("serverList"));
    }

    servers
        .iter()
        .enumerate()
        .map(|(i, server)| {
            as_str(server, &format!("vBucketServerMap.serverList[{i}]"))
                .map(str::to_string)
                .map_err(Error::from)
        })
        .collect()
}

/// Collect the `couchApiBase` URL of every node that advertises one.
pub(crate) fn couch_servers(nodes: &[Value]) -> Result<Vec<Url>> {
    let mut urls = Vec::new();

    for (i, node) in nodes.iter().enumerate() {
        let node = as_object(node, &format!("nodes[{i}]"))?;
        let path = format!("nodes[{i}].couchApiBase");
        let Some(base) = get_opt_str(node, "couchApiBase", &path)? else {
            continue;
        };

        let url = Url::parse(base).map_err(|source| DocumentError::InvalidUrl {
            url: base.to_string(),
            source,
        })?;
        urls.push(url);
    }

    Ok(urls)
}
