//! Command handlers for TinderMate
//!
//! `run` hands the terminal to the UI. The `auth` handlers are the
//! non-interactive counterparts of the authentication form: they load, check,
//! store and delete the same credential file the UI uses.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::auth::{
    CredentialPair, CredentialStatus, CredentialStore, CredentialValidator, FileCredentialStore,
    Service, TokenValidator, ValidationOutcome,
};
use crate::cli::{AuthAction, AuthArgs};
use crate::config::AppConfig;
use crate::errors::{AppError, Result};

/// Start the terminal UI
pub async fn handle_run(config: &AppConfig) -> Result<()> {
    info!("Starting terminal UI");
    crate::ui::run(config).await
}

/// Handle token management commands
pub async fn handle_auth(args: AuthArgs, config: &AppConfig) -> Result<()> {
    let store = FileCredentialStore::new(config.credentials_path()?);
    debug!("Using credential file {}", store.path().display());

    match args.action {
        AuthAction::Setup { force } => handle_auth_setup(&store, config, force).await,
        AuthAction::Verify => handle_auth_verify(&store, config).await,
        AuthAction::Status => handle_auth_status(&store),
        AuthAction::Clear => handle_auth_clear(&store),
    }
}

/// Prompt for both tokens, validate them and store them
async fn handle_auth_setup(store: &FileCredentialStore, config: &AppConfig, force: bool) -> Result<()> {
    let stored = store.load()?;

    if stored.is_complete() && !force {
        println!("Tokens already configured. Use --force to replace them.");
        return Ok(());
    }

    println!("Token setup");
    println!("===========");
    if !stored.is_empty() {
        println!("Press Enter to keep a stored token.");
    }
    println!();

    let openai = prompt_token(Service::OpenAi, stored.present_token(Service::OpenAi))?;
    let tinder = prompt_token(Service::Tinder, stored.present_token(Service::Tinder))?;
    let pair = CredentialPair::from_input(&openai, &tinder);

    match validate_with_spinner(&pair, config).await? {
        ValidationOutcome::Valid => {
            store.save(&pair)?;
            println!("The tokens are valid and were saved to {}", store.path().display());
            Ok(())
        }
        ValidationOutcome::Invalid { reason } => {
            Err(AppError::generic(format!("Tokens were not saved: {}", reason)))
        }
    }
}

/// Validate the stored tokens
async fn handle_auth_verify(store: &FileCredentialStore, config: &AppConfig) -> Result<()> {
    let pair = store.load()?;
    let mut status = CredentialStatus::from_pair(&pair, store.exists());

    let outcome = validate_with_spinner(&pair, config).await?;
    status.record_outcome(&outcome);
    println!("{}", status.status_message());

    match outcome {
        ValidationOutcome::Valid => Ok(()),
        ValidationOutcome::Invalid { reason } => Err(AppError::generic(reason)),
    }
}

/// Show which tokens are stored, masked
fn handle_auth_status(store: &FileCredentialStore) -> Result<()> {
    let pair = store.load()?;
    let status = CredentialStatus::from_pair(&pair, store.exists());

    println!("Token status");
    println!("============");
    println!("Credential file: {}", store.path().display());
    if !status.file_exists {
        println!("  (not created yet)");
    }
    for service in Service::ALL {
        println!("{:>8}: {}", service.display_name(), pair.masked(service));
    }
    println!();
    println!("{}", status.status_message());

    Ok(())
}

/// Delete the credential file
fn handle_auth_clear(store: &FileCredentialStore) -> Result<()> {
    if store.clear()? {
        println!("Removed {}", store.path().display());
    } else {
        println!("No stored tokens to remove");
    }
    Ok(())
}

/// Read one token without echoing it; blank input keeps `current`
fn prompt_token(service: Service, current: Option<&str>) -> Result<String> {
    let prompt = match current {
        Some(token) => format!("{} token [{}]: ", service, crate::auth::mask_token(token)),
        None => format!("{} token: ", service),
    };

    let input = rpassword::prompt_password(prompt)?;
    if input.trim().is_empty() {
        Ok(current.unwrap_or_default().to_string())
    } else {
        Ok(input)
    }
}

/// Run a validation while showing a spinner
async fn validate_with_spinner(pair: &CredentialPair, config: &AppConfig) -> Result<ValidationOutcome> {
    let validator = TokenValidator::from_config(&config.validator_config()?)?;

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style.tick_strings(&["◐", "◓", "◑", "◒", "✓"]));
    }
    spinner.set_message("Checking the tokens...");
    spinner.enable_steady_tick(Duration::from_millis(120));

    let result = validator.validate(pair).await;
    spinner.finish_and_clear();

    Ok(result?)
}
