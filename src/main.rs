//! TinderMate CLI application
//!
//! Starts the terminal UI by default; `auth` subcommands manage the stored
//! tokens from the shell.

use std::fs::OpenOptions;
use std::process;
use std::sync::Mutex;

use tracing::{error, info, warn};
use tracing_subscriber::{filter::Directive, fmt, EnvFilter};

use tindermate::cli::{handle_auth, handle_run, Cli, Commands};
use tindermate::config::AppConfig;
use tindermate::errors::Result;

#[tokio::main]
async fn main() {
    // Initialize program
    let result = run().await;

    // Handle any errors that occurred
    if let Err(e) = result {
        error!("{} error: {}", e.category(), e);
        eprintln!("Error: {}", e);
        if let Some(hint) = e.recovery_hint() {
            eprintln!("{}", hint);
        }
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok(); // Ignore errors if file doesn't exist

    // Parse command line arguments
    let cli = Cli::parse_args();
    let explicit_config = cli.global.config.is_some();

    let mut config = AppConfig::load(cli.global.config.clone()).await?;

    // Initialize logging based on verbosity and config
    init_logging(&cli, &config);

    info!("TinderMate v{} starting", env!("CARGO_PKG_VERSION"));

    if !explicit_config {
        if let Err(e) = AppConfig::initialize_first_run().await {
            warn!("Could not create default configuration file: {}", e);
        }
    }

    // CLI overrides
    if let Some(path) = &cli.global.credentials {
        config.storage.credentials_path = Some(path.clone());
    }

    // Execute the appropriate command
    match cli.command {
        None | Some(Commands::Run) => handle_run(&config).await,
        Some(Commands::Auth(args)) => {
            info!("Executing auth command");
            handle_auth(args, &config).await
        }
    }
}

/// Initialize logging based on CLI verbosity settings
///
/// Subcommands log to stderr. The terminal UI owns the screen, so it logs to
/// a file instead, and logs nothing if that file cannot be opened.
fn init_logging(cli: &Cli, config: &AppConfig) {
    let level = cli
        .log_level()
        .map(|level| level.to_string().to_lowercase())
        .unwrap_or_else(|| config.logging.level.clone());

    let directive: Directive = format!("tindermate={}", level)
        .parse()
        .unwrap_or_else(|_| "tindermate=info".parse().expect("static directive is valid"));
    let filter = EnvFilter::from_default_env().add_directive(directive);

    if !cli.is_tui() {
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_level(cli.global.very_verbose) // Show levels only in very verbose mode
            .with_writer(std::io::stderr)
            .init();
        return;
    }

    let log_file = config.logging.log_file_path().ok().and_then(|path| {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok()?;
        }
        OpenOptions::new().create(true).append(true).open(path).ok()
    });

    match log_file {
        Some(file) => fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init(),
        None => fmt().with_writer(std::io::sink).init(),
    }
}
