//! CLI module for the Acorn authentication service
//!
//! - `serve`: run the HTTP API
//! - `hash-password`: print an Argon2 hash for provisioning records by hand

pub mod hash_password;
pub mod serve;

use clap::{Parser, Subcommand};

/// Acorn authentication service
#[derive(Parser)]
#[command(name = "acorn-auth")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Serve(serve::ServeArgs),

    /// Hash a password with the server's Argon2 parameters
    HashPassword(hash_password::HashPasswordArgs),
}
