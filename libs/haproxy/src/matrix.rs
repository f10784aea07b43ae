//! Cross-node aggregation of server records.

use std::collections::{BTreeMap, HashMap};

use crate::stats::ServerRecord;

/// Per-server view across every node of a cluster.
///
/// Built in one deterministic step after all fetches complete, so there is
/// no concurrent mutation to guard against. Rows are keyed by server name
/// (alphabetical); column order follows the cluster's node order. Each
/// node's observation is kept distinct: divergent states for one server
/// across nodes (a rolling drain, say) stay visible.
#[derive(Debug, Clone, Default)]
pub struct StatusMatrix {
    nodes: Vec<String>,
    servers: BTreeMap<String, HashMap<String, ServerRecord>>,
    instance_ids: HashMap<String, String>,
}

impl StatusMatrix {
    /// Merge per-node fetch results, in cluster node order.
    pub fn build(per_node: Vec<(String, Vec<ServerRecord>)>) -> Self {
        let mut matrix = Self::default();
        for (node, records) in per_node {
            if let Some(record) = records.first() {
                matrix
                    .instance_ids
                    .insert(node.clone(), record.instance_id.clone());
            }
            for record in records {
                matrix
                    .servers
                    .entry(record.name.clone())
                    .or_default()
                    .insert(node.clone(), record);
            }
            matrix.nodes.push(node);
        }
        matrix
    }

    /// Node addresses in cluster order (the table's column order).
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    /// Server names in alphabetical order (the table's row order).
    pub fn server_names(&self) -> Vec<String> {
        self.servers.keys().cloned().collect()
    }

    /// One node's record for one server, if that node reported it.
    pub fn record(&self, server: &str, node: &str) -> Option<&ServerRecord> {
        self.servers.get(server)?.get(node)
    }

    /// The backend instance id a node reported, used to scope state-change
    /// requests to that node.
    pub fn instance_id(&self, node: &str) -> Option<&str> {
        self.instance_ids.get(node).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}
