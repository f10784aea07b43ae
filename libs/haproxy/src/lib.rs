//! HAProxy fleet primitives for lbfleet.
//!
//! This library contains the pure (no I/O) half of the load-balancer state
//! controller:
//!
//! - **Stats parsing**: turn one node's CSV stats feed into typed per-server
//!   records for a specific backend.
//! - **Aggregation**: merge per-node records into a status matrix keyed by
//!   server name, keeping each node's view distinct.
//! - **Name resolution**: map operator-supplied tokens (exact or unambiguous
//!   substring) onto the aggregated server set.
//! - **State vocabulary**: the READY/DRAIN/MAINT target states and the
//!   display-only status emphasis classification.
//!
//! # Invariants
//!
//! - Every record parsed from one node's feed carries the same backend
//!   instance id; a feed that disagrees with itself is a parse error.
//! - Aggregation never reconciles divergent per-node states for a server;
//!   both views stay visible.
//! - Control decisions compare raw status strings; emphasis classification
//!   is cosmetic only.

mod matrix;
mod resolve;
mod state;
mod stats;

pub use matrix::StatusMatrix;
pub use resolve::{resolve_servers, ResolveError, Selection};
pub use stats::{parse_backend_stats, ServerRecord, StatsError};
pub use state::{StatusEmphasis, TargetState};
