//! The status/update sequence.
//!
//! fetch + aggregate -> render "before" -> resolve tokens -> confirm a
//! full-set non-READY transition -> apply to every node -> fetch again ->
//! render "after".
//!
//! A fetch round is all-or-nothing: any node failing fails the round, since
//! a partial matrix could make the resolver under- or over-select servers.
//! Apply is best-effort broadcast: per-node failures are reported, the
//! remaining nodes proceed, and the re-fetch shows the resulting state.

use anyhow::Result;
use dialoguer::Confirm;
use futures_util::future;

use lbfleet_haproxy::{resolve_servers, Selection, StatusMatrix, TargetState};

use crate::client::{LbClient, NodeEndpoint};
use crate::config::Cluster;
use crate::error::CliError;
use crate::output;

/// Entry point used by the command surface.
pub async fn run(
    domain: &str,
    cluster: &Cluster,
    tokens: &[String],
    target: Option<TargetState>,
) -> Result<()> {
    let endpoints = NodeEndpoint::for_cluster(&cluster.nodes, domain);
    let client = LbClient::new(cluster.credentials.clone())?;

    let confirm = |state: TargetState| -> Result<bool> {
        let accepted = Confirm::new()
            .with_prompt(format!("Really set ALL servers to {}?", state.action()))
            .default(false)
            .interact()?;
        Ok(accepted)
    };

    run_update(&client, &endpoints, &cluster.backend, tokens, target, &confirm).await?;
    Ok(())
}

/// The full controller sequence, with the confirmation prompt injected so
/// it stays testable.
pub async fn run_update(
    client: &LbClient,
    endpoints: &[NodeEndpoint],
    backend: &str,
    tokens: &[String],
    target: Option<TargetState>,
    confirm: &dyn Fn(TargetState) -> Result<bool>,
) -> Result<(), CliError> {
    let matrix = fetch_round(client, endpoints, backend).await?;
    output::print_matrix("Current status", &matrix);

    let Some(state) = target else {
        return Ok(());
    };
    println!();

    let selection = resolve_servers(&matrix.server_names(), tokens)?;

    if needs_confirmation(&selection, state) {
        let accepted = confirm(state).map_err(CliError::Other)?;
        if !accepted {
            return Err(CliError::ConfirmationDeclined);
        }
    }

    let results = apply_state(client, endpoints, &matrix, &selection.servers, state).await;
    for (node, result) in &results {
        if let Err(e) = result {
            output::print_warning(&format!("{node}: state change failed: {e}"));
        }
    }

    // Always re-fetch after dispatch, even if some nodes failed: the
    // "after" table is the operator's source of truth.
    println!();
    let after = fetch_round(client, endpoints, backend).await?;
    output::print_matrix("New status", &after);
    Ok(())
}

/// Query every node concurrently and merge the results.
pub async fn fetch_round(
    client: &LbClient,
    endpoints: &[NodeEndpoint],
    backend: &str,
) -> Result<StatusMatrix, CliError> {
    let per_node = future::try_join_all(endpoints.iter().map(|endpoint| async move {
        let records = client.fetch_stats(endpoint, backend).await?;
        Ok::<_, CliError>((endpoint.name.clone(), records))
    }))
    .await?;

    Ok(StatusMatrix::build(per_node))
}

/// A bulk non-READY transition must never fire from an accidental
/// empty-argument invocation.
pub fn needs_confirmation(selection: &Selection, state: TargetState) -> bool {
    selection.is_full_set && state != TargetState::Ready
}

/// Broadcast the state change to every node, each request scoped by that
/// node's own backend instance id.
pub async fn apply_state(
    client: &LbClient,
    endpoints: &[NodeEndpoint],
    matrix: &StatusMatrix,
    servers: &[String],
    state: TargetState,
) -> Vec<(String, Result<(), CliError>)> {
    for endpoint in endpoints {
        for server in servers {
            output::print_apply_progress(&endpoint.name, server, state);
        }
    }

    future::join_all(endpoints.iter().map(|endpoint| async move {
        let result = match matrix.instance_id(&endpoint.name) {
            Some(instance_id) => client.set_state(endpoint, servers, instance_id, state).await,
            None => Err(CliError::Other(anyhow::anyhow!(
                "no backend instance id observed for this node"
            ))),
        };
        (endpoint.name.clone(), result)
    }))
    .await
}
