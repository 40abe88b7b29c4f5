//! CLI module for the bandit allocator
//!
//! - `serve`: run the HTTP server
//! - `policies`: list the registered selection policies

pub mod policies;
pub mod serve;

use clap::{Parser, Subcommand};

/// Bandit allocator - assigns experiment arms with multi-armed bandit policies
#[derive(Parser)]
#[command(name = "bandit-allocator")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// List registered selection policies (`*` marks policies without a selection rule)
    Policies(policies::PoliciesArgs),
}
