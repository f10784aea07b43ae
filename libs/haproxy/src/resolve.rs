//! Operator token → server name resolution.
//!
//! Operators rarely type full server names under incident pressure, so a
//! token may be either an exact name or a substring that matches exactly
//! one available name. Anything ambiguous or unknown aborts the whole
//! batch before any state change is issued.

use std::collections::BTreeSet;

use thiserror::Error;

/// Resolution failures. Each names the offending token.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("invalid server name: {0}")]
    UnknownServer(String),

    #[error("ambiguous server name: {0}")]
    AmbiguousServer(String),
}

/// A validated server selection, sorted and deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub servers: Vec<String>,

    /// True when the selection came from an empty token list and therefore
    /// covers every available server. Gates the bulk-action confirmation.
    pub is_full_set: bool,
}

/// Resolve `requested` tokens against the `available` server names.
///
/// An empty token list selects everything. Exact matches win outright;
/// substring matching is only consulted for tokens that match no name
/// exactly. The first bad token fails the whole batch.
pub fn resolve_servers(available: &[String], requested: &[String]) -> Result<Selection, ResolveError> {
    if requested.is_empty() {
        return Ok(Selection {
            servers: available.iter().cloned().collect::<BTreeSet<_>>().into_iter().collect(),
            is_full_set: true,
        });
    }

    let mut selected = BTreeSet::new();
    for token in requested {
        if available.contains(token) {
            selected.insert(token.clone());
            continue;
        }
        let mut candidates = available.iter().filter(|name| name.contains(token.as_str()));
        match (candidates.next(), candidates.next()) {
            (Some(only), None) => {
                selected.insert(only.clone());
            }
            (None, _) => return Err(ResolveError::UnknownServer(token.clone())),
            (Some(_), Some(_)) => return Err(ResolveError::AmbiguousServer(token.clone())),
        }
    }

    Ok(Selection {
        servers: selected.into_iter().collect(),
        is_full_set: false,
    })
}
