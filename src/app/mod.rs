//! Bootstrap flow for TinderMate
//!
//! This module decides what the user sees at startup and after submitting the
//! authentication form: a loading indicator, the form, or the authenticated
//! application screen.
//!
//! - `state`: the pure state machine (`(machine, event) -> (machine, effects)`)
//! - `bootstrap`: the runtime that executes effects against a store, a
//!   validator, a notification sink and a screen factory
//! - `notify`: notification values and the sink trait
//! - `screen`: hand-off to the authenticated application screen
//!
//! # Examples
//!
//! ```rust,no_run
//! use tindermate::app::{Bootstrap, ChannelNotificationSink, ScreenState};
//! use tindermate::auth::{CredentialPair, FileCredentialStore, TokenValidator, ValidatorConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FileCredentialStore::default_location()?;
//! let validator = TokenValidator::from_config(&ValidatorConfig::default())?;
//! let (notifier, _notifications) = ChannelNotificationSink::new();
//!
//! let mut bootstrap = Bootstrap::new(store, validator, notifier, |pair: CredentialPair| pair);
//! bootstrap.start();
//! bootstrap.settle().await;
//!
//! if let ScreenState::AuthForm { prefill } = bootstrap.screen() {
//!     println!("Need tokens, starting from {:?}", prefill);
//! }
//! # Ok(())
//! # }
//! ```

pub mod bootstrap;
pub mod notify;
pub mod screen;
pub mod state;

// Re-export main public API
pub use bootstrap::Bootstrap;
pub use notify::{ChannelNotificationSink, Notification, NotificationSink, Severity};
pub use screen::ScreenFactory;
pub use state::{apply, AttemptId, BootstrapEvent, BootstrapMachine, Effect, ScreenState};
