//! Error handling and display for the CLI.

use colored::Colorize;
use thiserror::Error;

use lbfleet_haproxy::{ResolveError, StatsError};

/// CLI-specific errors.
///
/// Everything that could lead to mutating the wrong server set (unknown
/// cluster, failed or malformed fetch, bad token) is fatal and surfaces
/// before any state change is dispatched. Per-node apply failures are
/// reported inline by the controller instead; there is no rollback.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("unknown cluster '{name}' (known clusters: {known})")]
    UnknownCluster { name: String, known: String },

    #[error("{node}: request failed: {source}")]
    NodeRequest {
        node: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{node}: stats endpoint returned HTTP {status}")]
    NodeStatus { node: String, status: u16 },

    #[error("{node}: {source}")]
    Feed {
        node: String,
        #[source]
        source: StatsError,
    },

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("state change aborted by operator")]
    ConfirmationDeclined,

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Tag a transport-level failure with the node it came from.
    pub fn node_request(node: impl Into<String>, source: reqwest::Error) -> Self {
        Self::NodeRequest {
            node: node.into(),
            source,
        }
    }
}

/// Print an error in a user-friendly format.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {}", "Error:".red().bold(), err);

    // Check for specific error types and provide hints
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        match cli_err {
            CliError::NodeStatus { status, .. } if *status == 401 || *status == 403 => {
                eprintln!(
                    "\n{}",
                    "Hint: Check the cluster credentials in the registry.".yellow()
                );
            }
            CliError::NodeRequest { .. } => {
                eprintln!(
                    "\n{}",
                    "Hint: Check your network connection and the node address.".yellow()
                );
            }
            CliError::Resolve(ResolveError::AmbiguousServer(_)) => {
                eprintln!(
                    "\n{}",
                    "Hint: Use a longer fragment or the exact server name.".yellow()
                );
            }
            _ => {}
        }
    }
}
