//! CLI parse: clap types for backstack. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Backstack CLI - replay navigation scripts against an in-memory host
#[derive(Parser)]
#[command(name = "backstack")]
#[command(about = "Replay and check multi-container navigation scripts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Project root used for config discovery
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a navigation script and print the transcript
    Replay {
        /// Script file
        file: PathBuf,

        /// Save the final navigation state to this file
        #[arg(long)]
        save_state: Option<PathBuf>,
    },
    /// Parse a navigation script without running it
    Check {
        /// Script file
        file: PathBuf,
    },
    /// Print the stacks of a saved navigation state
    Inspect {
        /// State file written by `replay --save-state`
        file: PathBuf,
    },
}
