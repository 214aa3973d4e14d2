//! Bootstrap state machine
//!
//! The machine is a plain value. [`BootstrapMachine::transition`] takes the
//! current machine and an event and returns the next machine plus the
//! [`Effect`]s the caller must carry out. It performs no I/O, which keeps every
//! transition testable without a store, a network, or a terminal.
//!
//! ```text
//!   Loading ──Valid──────────────────────────────▶ Authenticated
//!      │                                                 ▲
//!      └─Invalid / transport error─▶ AuthForm ──Valid────┘
//!                                      │  ▲
//!                                      └──┘ Invalid / transport error
//! ```
//!
//! Every validation runs as a numbered attempt. Only the result of the most
//! recent attempt is acted upon; a result carrying any other number is stale
//! and dropped.

use std::mem;

use crate::app::notify::Notification;
use crate::auth::{CredentialPair, ValidationOutcome};
use crate::constants::notifications;
use crate::errors::{StoreError, StoreResult, ValidationResult};

/// Identifier of one validate-then-act attempt
pub type AttemptId = u64;

/// Screen the bootstrap flow currently shows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ScreenState {
    /// Credentials are being loaded and checked
    #[default]
    Loading,
    /// The user must (re-)enter credentials; fields start from `prefill`
    AuthForm { prefill: CredentialPair },
    /// Credentials are valid and the application screen owns the terminal
    Authenticated,
}

impl ScreenState {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            ScreenState::Loading => "loading",
            ScreenState::AuthForm { .. } => "auth-form",
            ScreenState::Authenticated => "authenticated",
        }
    }
}

/// Inputs to the state machine
#[derive(Debug)]
pub enum BootstrapEvent {
    /// Process start
    Started,
    /// Result of loading the stored pair
    CredentialsLoaded(StoreResult<CredentialPair>),
    /// The user submitted the form
    Submitted(CredentialPair),
    /// A validation attempt finished
    ValidationCompleted {
        attempt: AttemptId,
        pair: CredentialPair,
        result: ValidationResult<ValidationOutcome>,
    },
    /// Result of persisting a validated pair
    CredentialsSaved(StoreResult<()>),
}

/// Side effects requested by a transition, to be run in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Load the stored pair and report it with `CredentialsLoaded`
    LoadCredentials,
    /// Validate `pair` and report it with `ValidationCompleted`
    Validate {
        attempt: AttemptId,
        pair: CredentialPair,
    },
    /// Stop the given attempt; its result will be ignored regardless
    CancelValidation { attempt: AttemptId },
    /// Persist the pair and report it with `CredentialsSaved`
    SaveCredentials(CredentialPair),
    /// Show a notification
    Notify(Notification),
    /// Build the authenticated application screen from the validated pair
    EnterApplication(CredentialPair),
}

/// The bootstrap flow's state: the visible screen plus attempt bookkeeping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapMachine {
    screen: ScreenState,
    started: bool,
    in_flight: Option<AttemptId>,
    last_attempt: AttemptId,
}

impl BootstrapMachine {
    /// A machine in `Loading` that has not started yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Current screen
    pub fn screen(&self) -> &ScreenState {
        &self.screen
    }

    /// Attempt whose result is awaited, if any
    pub fn in_flight(&self) -> Option<AttemptId> {
        self.in_flight
    }

    /// Whether a validation is currently awaited
    pub fn is_validating(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether the flow can make progress without new input.
    ///
    /// True while loading (before the form is shown) or while an attempt is
    /// in flight.
    pub fn is_busy(&self) -> bool {
        self.is_validating() || (self.started && self.screen == ScreenState::Loading)
    }

    /// Apply one event, returning the next machine and the effects to run
    pub fn transition(mut self, event: BootstrapEvent) -> (Self, Vec<Effect>) {
        let mut effects = Vec::new();

        match event {
            BootstrapEvent::Started => self.on_started(&mut effects),
            BootstrapEvent::CredentialsLoaded(result) => self.on_loaded(result, &mut effects),
            BootstrapEvent::Submitted(pair) => self.on_submitted(pair, &mut effects),
            BootstrapEvent::ValidationCompleted {
                attempt,
                pair,
                result,
            } => self.on_validated(attempt, pair, result, &mut effects),
            BootstrapEvent::CredentialsSaved(result) => self.on_saved(result, &mut effects),
        }

        (self, effects)
    }

    fn begin_attempt(&mut self, pair: CredentialPair, effects: &mut Vec<Effect>) {
        if let Some(stale) = self.in_flight.take() {
            tracing::info!("Attempt {} superseded by a newer submission", stale);
            effects.push(Effect::CancelValidation { attempt: stale });
        }

        self.last_attempt += 1;
        let attempt = self.last_attempt;
        self.in_flight = Some(attempt);
        tracing::debug!("Starting validation attempt {} for {:?}", attempt, pair);
        effects.push(Effect::Validate { attempt, pair });
    }

    fn on_started(&mut self, effects: &mut Vec<Effect>) {
        if self.started || self.screen != ScreenState::Loading {
            tracing::debug!("Ignoring repeated start in {} state", self.screen.name());
            return;
        }
        self.started = true;
        tracing::info!("Bootstrap started, loading stored credentials");
        effects.push(Effect::LoadCredentials);
    }

    fn on_loaded(&mut self, result: StoreResult<CredentialPair>, effects: &mut Vec<Effect>) {
        if !self.started || self.screen != ScreenState::Loading || self.in_flight.is_some() {
            tracing::debug!("Ignoring credentials loaded in {} state", self.screen.name());
            return;
        }

        match result {
            Ok(pair) => self.begin_attempt(pair, effects),
            Err(e) => {
                // Nothing to validate, the read warning is the only notification
                tracing::warn!("Could not load stored credentials, asking for new ones: {}", e);
                effects.push(Effect::Notify(Notification::warning(read_warning(&e))));
                self.screen = ScreenState::AuthForm {
                    prefill: CredentialPair::empty(),
                };
            }
        }
    }

    fn on_submitted(&mut self, pair: CredentialPair, effects: &mut Vec<Effect>) {
        if !matches!(self.screen, ScreenState::AuthForm { .. }) {
            tracing::debug!("Ignoring submission in {} state", self.screen.name());
            return;
        }

        // The form keeps showing what the user typed while it is checked
        self.screen = ScreenState::AuthForm {
            prefill: pair.clone(),
        };
        self.begin_attempt(pair, effects);
    }

    fn on_validated(
        &mut self,
        attempt: AttemptId,
        pair: CredentialPair,
        result: ValidationResult<ValidationOutcome>,
        effects: &mut Vec<Effect>,
    ) {
        if self.in_flight != Some(attempt) {
            tracing::debug!(
                "Dropping stale result of attempt {} (current: {:?})",
                attempt,
                self.in_flight
            );
            return;
        }
        self.in_flight = None;

        let from_form = match &self.screen {
            ScreenState::Loading => false,
            ScreenState::AuthForm { .. } => true,
            ScreenState::Authenticated => return,
        };

        match result {
            Ok(ValidationOutcome::Valid) => {
                tracing::info!("Attempt {} validated, entering application", attempt);
                if from_form {
                    // Saved on every successful submission, changed or not
                    effects.push(Effect::SaveCredentials(pair.clone()));
                } else {
                    effects.push(Effect::Notify(Notification::info(
                        notifications::TOKENS_VALID,
                    )));
                }
                effects.push(Effect::EnterApplication(pair));
                self.screen = ScreenState::Authenticated;
            }
            Ok(ValidationOutcome::Invalid { reason }) => {
                tracing::info!("Attempt {} invalid: {}", attempt, reason);
                let notification = if from_form {
                    Notification::prominent_error(reason)
                } else {
                    Notification::warning(reason)
                };
                effects.push(Effect::Notify(notification));
                self.screen = ScreenState::AuthForm { prefill: pair };
            }
            Err(e) => {
                tracing::warn!("Attempt {} could not be checked: {}", attempt, e);
                let message = format!(
                    "Could not check the tokens: {}. Please try again in a moment.",
                    e
                );
                let notification = if from_form {
                    Notification::prominent_error(message)
                } else {
                    Notification::error(message)
                };
                effects.push(Effect::Notify(notification));
                self.screen = ScreenState::AuthForm { prefill: pair };
            }
        }
    }

    fn on_saved(&mut self, result: StoreResult<()>, effects: &mut Vec<Effect>) {
        match result {
            Ok(()) => tracing::debug!("Validated credentials persisted"),
            Err(e) => {
                tracing::error!("Failed to persist validated credentials: {}", e);
                effects.push(Effect::Notify(Notification::warning(format!(
                    "The tokens are valid but could not be saved ({}). You will need to enter them again next time.",
                    e
                ))));
            }
        }
    }
}

/// Applies `event` to the machine behind `machine` in place
pub fn apply(machine: &mut BootstrapMachine, event: BootstrapEvent) -> Vec<Effect> {
    let (next, effects) = mem::take(machine).transition(event);
    *machine = next;
    effects
}

fn read_warning(error: &StoreError) -> String {
    format!("Could not read the saved tokens ({}). Please enter them again.", error)
}
