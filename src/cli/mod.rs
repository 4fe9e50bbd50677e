//! CLI module for Cairn Gateway
//!
//! Subcommands:
//! - `serve`: run the HTTP service
//! - `key`: print the cache key a pattern maps to

pub mod key;
pub mod serve;

use clap::{Parser, Subcommand};

/// Cairn Gateway - pattern-keyed cache and dispatch for generated artifacts
#[derive(Parser)]
#[command(name = "cairn-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP service
    Serve,

    /// Print the cache key for a namespace and coordinates
    Key(key::KeyArgs),
}
