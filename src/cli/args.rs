//! Command-line argument parsing for TinderMate
//!
//! Running without a subcommand starts the terminal UI. The `auth`
//! subcommands manage the stored tokens without entering the UI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// TinderMate - validate your tokens, then get to work
#[derive(Parser, Debug)]
#[command(
    name = "tindermate",
    version,
    about = "Terminal front-end for TinderMate",
    long_about = "Terminal front-end for TinderMate.
Loads the stored OpenAI and Tinder tokens, checks them against both services and
asks for new ones when they are missing or rejected."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Credential file path
    #[arg(long, global = true, value_name = "FILE")]
    pub credentials: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the terminal UI (default)
    Run,

    /// Manage the stored tokens
    Auth(AuthArgs),
}

/// Arguments for token management
#[derive(Args, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub action: AuthAction,
}

/// Token management actions
#[derive(Subcommand, Debug)]
pub enum AuthAction {
    /// Enter both tokens, validate them and store them
    Setup {
        /// Replace tokens that are already stored
        #[arg(short, long)]
        force: bool,
    },

    /// Validate the stored tokens against both services
    Verify,

    /// Show which tokens are stored
    Status,

    /// Delete the stored tokens
    Clear,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The subcommand to run, `run` when none was given
    pub fn command(&self) -> &Commands {
        self.command.as_ref().unwrap_or(&Commands::Run)
    }

    /// Get the logging level based on global arguments
    pub fn log_level(&self) -> Option<tracing::Level> {
        if self.global.quiet {
            Some(tracing::Level::ERROR)
        } else if self.global.very_verbose {
            Some(tracing::Level::DEBUG)
        } else if self.global.verbose {
            Some(tracing::Level::INFO)
        } else {
            None
        }
    }

    /// Whether the terminal UI will own the screen
    pub fn is_tui(&self) -> bool {
        matches!(self.command(), Commands::Run)
    }
}
