//! Cache-style topology: a flat, ordered server list.

use serde::Serialize;

/// Servers of an un-partitioned cluster, in document order.
///
/// Position matters: clients that distribute keys over this list rely on
/// the order matching the `nodes` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimpleConfig {
    servers: Vec<String>,
}

impl SimpleConfig {
    pub(crate) fn new(servers: Vec<String>) -> Self {
        Self { servers }
    }

    /// Server addresses as `host:port`.
    pub fn servers(&self) -> &[String] {
        &self.servers
    }

    /// Number of servers.
    pub fn servers_count(&self) -> usize {
        self.servers.len()
    }

    /// Server at `index`.
    pub fn server(&self, index: usize) -> Option<&str> {
        self.servers.get(index).map(String::as_str)
    }
}
