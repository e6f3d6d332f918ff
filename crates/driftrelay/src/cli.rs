use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Driftrelay – forwards AWS Config compliance notifications to Slack
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Activate verbose output (-v, -vv, etc.)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Defaults to `serve` so the binary can be used directly as a Lambda bootstrap
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the Lambda event loop
    Serve,
    /// Relay a single event read from a JSON file
    Invoke {
        /// SNS event payload
        #[arg(short, long, value_name = "FILE")]
        event: PathBuf,

        /// Print the Slack payload instead of posting it
        #[arg(long)]
        dry_run: bool,
    },
    /// Print build information
    Version {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
