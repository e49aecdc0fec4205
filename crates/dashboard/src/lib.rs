//! Dashboard - command line and JSON API for threadlens
//!
//! Wires the `ingest` and `perspective` crates to a clap CLI and an axum
//! server.

pub mod cli;
pub mod commands;
pub mod server;
