//! Command surface.

pub mod update;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser};

use lbfleet_haproxy::TargetState;

use crate::config::Registry;
use crate::output;

/// Inspect and control the server states of an HAProxy cluster.
///
/// Without a state flag, only the current status table is shown.
#[derive(Debug, Parser)]
#[command(name = "lbctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Cluster name from the registry.
    cluster: String,

    /// Server names, exact or unambiguous fragments. Defaults to all servers.
    servers: Vec<String>,

    #[command(flatten)]
    state: StateFlags,

    /// Path to the cluster registry file.
    #[arg(long, env = "LBCTL_REGISTRY", value_name = "FILE")]
    registry: Option<PathBuf>,
}

/// Mutually exclusive target-state flags.
#[derive(Debug, Args)]
#[group(multiple = false)]
struct StateFlags {
    /// Set state to READY.
    #[arg(long)]
    ready: bool,

    /// Set state to DRAIN.
    #[arg(long)]
    drain: bool,

    /// Set state to MAINT.
    #[arg(long)]
    maint: bool,
}

impl StateFlags {
    fn target(&self) -> Option<TargetState> {
        if self.ready {
            Some(TargetState::Ready)
        } else if self.drain {
            Some(TargetState::Drain)
        } else if self.maint {
            Some(TargetState::Maint)
        } else {
            None
        }
    }
}

impl Cli {
    /// Run the CLI command.
    pub async fn run(self) -> Result<()> {
        let registry = Registry::load(self.registry.as_deref())?;
        let cluster = registry.cluster(&self.cluster)?;
        let target = self.state.target();

        if !self.servers.is_empty() && target.is_none() {
            output::print_notice("No state update requested; ignoring server list");
            println!();
        }

        update::run(&registry.domain, cluster, &self.servers, target).await
    }
}
