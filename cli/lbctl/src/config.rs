//! Cluster registry.
//!
//! A static mapping from cluster name to its front-end nodes, backend name
//! and credentials, loaded once at startup and threaded into every
//! component as an argument. The registry lives in a JSON file:
//!
//! ```json
//! {
//!   "domain": ".lb.example.org",
//!   "clusters": {
//!     "edge": {
//!       "nodes": ["lb1", "lb2"],
//!       "backend": "www-pool",
//!       "credentials": { "username": "ops", "password": "..." }
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::CliError;

/// Registry file name.
const REGISTRY_FILE: &str = "clusters.json";

/// Get the default registry file path.
fn default_registry_path() -> Result<PathBuf> {
    ProjectDirs::from("dev", "lbfleet", "lbctl")
        .map(|dirs| dirs.config_dir().join(REGISTRY_FILE))
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
}

/// The full cluster registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registry {
    /// Domain suffix appended to every node address when building its URL.
    pub domain: String,

    /// Known clusters by name.
    pub clusters: BTreeMap<String, Cluster>,
}

/// One named group of load-balancer front-ends sharing a backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    /// Node addresses, in the order the status table shows them.
    pub nodes: Vec<String>,

    /// Backend (server pool) name on every node.
    pub backend: String,

    /// Credential pair shared by all nodes of the cluster.
    pub credentials: Credentials,
}

/// HTTP basic auth credentials for a cluster's stats endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Registry {
    /// Load the registry, from `path` if given, else the default location.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => default_registry_path()?,
        };

        if !path.exists() {
            anyhow::bail!(
                "Cluster registry not found at {:?}. Create it or pass --registry.",
                path
            );
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cluster registry from {:?}", path))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cluster registry from {:?}", path))
    }

    /// Look up a cluster by name.
    pub fn cluster(&self, name: &str) -> Result<&Cluster, CliError> {
        self.clusters
            .get(name)
            .ok_or_else(|| CliError::UnknownCluster {
                name: name.to_string(),
                known: self
                    .clusters
                    .keys()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}
