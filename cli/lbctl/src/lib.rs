//! lbctl - operator CLI for HAProxy fleet state control.
//!
//! Polls every front-end of a named cluster, renders the merged per-server
//! status matrix, and pushes READY/DRAIN/MAINT transitions to the whole
//! fleet. The pure aggregation and resolution logic lives in
//! `lbfleet-haproxy`; this crate owns the HTTP client, the cluster
//! registry, rendering and the orchestration sequence.

pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
