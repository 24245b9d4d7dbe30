//! Defines the command line interface of the relay bot.

use clap::{Args, Parser, Subcommand};

/// The command line interface of the relay bot.
#[derive(Debug, Parser)]
#[command(name = "header-relay", about = "Cross-chain header relay bot")]
pub struct RelayCli {
    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// The commands of the relay bot.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a relay strategy to completion.
    Start(StartArgs),
}

/// The arguments of the `start` command.
#[derive(Debug, Args)]
pub struct StartArgs {
    /// The path to the JSON configuration file.
    #[arg(long, short)]
    pub config: String,

    /// Overrides the strategy from the configuration file.
    #[arg(long)]
    pub strategy: Option<String>,

    /// Prepends the prerequisite transaction family ahead of the requested
    /// operation.
    #[arg(long)]
    pub dynamic: bool,
}
