//! HTTP client for the per-node HAProxy stats endpoints.

use std::time::Duration;

use anyhow::{Context, Result};

use lbfleet_haproxy::{parse_backend_stats, ServerRecord, TargetState};

use crate::config::Credentials;
use crate::error::CliError;

/// Every request carries a timeout; a stuck node is a fetch failure, not a
/// reason to hang the whole round.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// One load-balancer front-end, addressable over HTTPS.
#[derive(Debug, Clone)]
pub struct NodeEndpoint {
    /// Short node address, used as the table column header and in errors.
    pub name: String,

    /// Base URL of the node's stats interface (no trailing slash).
    pub base_url: String,
}

impl NodeEndpoint {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
        }
    }

    /// Build endpoints for a cluster's nodes under the shared domain suffix.
    pub fn for_cluster(nodes: &[String], domain: &str) -> Vec<Self> {
        nodes
            .iter()
            .map(|node| Self::new(node.clone(), format!("https://{node}{domain}")))
            .collect()
    }

    fn stats_url(&self) -> String {
        format!("{}/haproxy-stats;csv", self.base_url)
    }

    fn update_url(&self) -> String {
        format!("{}/haproxy-stats", self.base_url)
    }
}

/// Authenticated client shared by all nodes of one cluster.
#[derive(Debug, Clone)]
pub struct LbClient {
    http: reqwest::Client,
    credentials: Credentials,
}

impl LbClient {
    pub fn new(credentials: Credentials) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { http, credentials })
    }

    /// Fetch and parse one node's stats feed for `backend`.
    pub async fn fetch_stats(
        &self,
        endpoint: &NodeEndpoint,
        backend: &str,
    ) -> Result<Vec<ServerRecord>, CliError> {
        let response = self
            .http
            .get(endpoint.stats_url())
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .send()
            .await
            .map_err(|e| CliError::node_request(&endpoint.name, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CliError::NodeStatus {
                node: endpoint.name.clone(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| CliError::node_request(&endpoint.name, e))?;

        parse_backend_stats(&body, backend).map_err(|source| CliError::Feed {
            node: endpoint.name.clone(),
            source,
        })
    }

    /// Push a state transition for `servers` to one node.
    ///
    /// The backend selector is the node's own instance id, `#`-prefixed as
    /// the stats endpoint expects.
    pub async fn set_state(
        &self,
        endpoint: &NodeEndpoint,
        servers: &[String],
        instance_id: &str,
        state: TargetState,
    ) -> Result<(), CliError> {
        let mut form: Vec<(&str, String)> = servers
            .iter()
            .map(|server| ("s", server.clone()))
            .collect();
        form.push(("b", format!("#{instance_id}")));
        form.push(("action", state.action().to_string()));

        let response = self
            .http
            .post(endpoint.update_url())
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .form(&form)
            .send()
            .await
            .map_err(|e| CliError::node_request(&endpoint.name, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CliError::NodeStatus {
                node: endpoint.name.clone(),
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}
