//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// Snaplink - a small URL shortener
#[derive(Parser, Debug)]
#[command(name = "snaplink")]
#[command(version)]
#[command(about = "A small URL shortener with identity-scoped listings", long_about = None)]
pub struct Cli {
    /// Configuration file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Run one sweep pass over the link store and exit
    Sweep,

    /// Write a sample configuration file
    GenerateConfig {
        /// Output path (default: config.example.toml)
        path: Option<String>,
    },
}

impl Cli {
    pub fn command(&self) -> &Commands {
        self.command.as_ref().unwrap_or(&Commands::Serve)
    }
}
