//! Prelude module for the TinderMate library
//!
//! Re-exports the items needed to embed the bootstrap flow with a single
//! `use tindermate::prelude::*;` statement.
//!
//! # Usage
//!
//! ```rust,no_run
//! use tindermate::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = AppConfig::load(None).await?;
//!     let store = FileCredentialStore::new(config.credentials_path()?);
//!     let validator = TokenValidator::from_config(&config.validator_config()?)?;
//!     let (notifier, _notifications) = ChannelNotificationSink::new();
//!
//!     let mut bootstrap = Bootstrap::new(store, validator, notifier, |pair: CredentialPair| pair);
//!     bootstrap.start();
//!     bootstrap.settle().await;
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, Result};

// Bootstrap flow
pub use crate::app::{
    Bootstrap, BootstrapEvent, BootstrapMachine, ChannelNotificationSink, Effect, Notification,
    NotificationSink, ScreenFactory, ScreenState, Severity,
};

// Credentials
pub use crate::auth::{
    CredentialPair, CredentialStore, CredentialValidator, FileCredentialStore, Service,
    TokenValidator, ValidationOutcome, ValidatorConfig,
};

// Configuration
pub use crate::config::AppConfig;

// Commonly used constants
pub use crate::constants::{TOKENS_VALID, USER_AGENT};

pub use std::sync::Arc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_imports() {
        let machine = BootstrapMachine::new();
        assert_eq!(machine.screen(), &ScreenState::Loading);

        let config = AppConfig::default();
        assert!(config.validator_config().is_ok());

        assert!(!CredentialPair::empty().is_complete());
        assert!(USER_AGENT.contains("TinderMate"));
    }
}
