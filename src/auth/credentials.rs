//! Credential pair value type
//!
//! A [`CredentialPair`] holds the OpenAI and Tinder tokens. It is an
//! immutable value: callers build a new pair instead of editing one, which is
//! what lets the bootstrap state machine hand pairs between attempts without
//! any shared mutable state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::auth::validator::ValidationOutcome;
use crate::constants::{services, ui};

/// One of the two services a pair carries a token for.
///
/// The declaration order is the tie-break order used when both services
/// reject their tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Service {
    /// Service A
    OpenAi,
    /// Service B
    Tinder,
}

impl Service {
    /// Both services in tie-break order
    pub const ALL: [Service; 2] = [Service::OpenAi, Service::Tinder];

    /// Human-readable service name
    pub fn display_name(&self) -> &'static str {
        match self {
            Service::OpenAi => services::OPENAI_NAME,
            Service::Tinder => services::TINDER_NAME,
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// The two tokens required to authenticate against both services.
///
/// `Debug` never prints the tokens in clear, so pairs can be logged freely.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPair {
    #[serde(default)]
    openai_token: Option<String>,
    #[serde(default)]
    tinder_token: Option<String>,
}

impl CredentialPair {
    /// Build a pair from optional tokens, kept exactly as given
    pub fn new(openai_token: Option<String>, tinder_token: Option<String>) -> Self {
        Self {
            openai_token,
            tinder_token,
        }
    }

    /// A pair with both tokens unset
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a pair from raw form input.
    ///
    /// Surrounding whitespace is dropped and blank fields become unset.
    pub fn from_input(openai_token: &str, tinder_token: &str) -> Self {
        Self {
            openai_token: normalize(openai_token),
            tinder_token: normalize(tinder_token),
        }
    }

    /// OpenAI token, if set
    pub fn openai_token(&self) -> Option<&str> {
        self.openai_token.as_deref()
    }

    /// Tinder token, if set
    pub fn tinder_token(&self) -> Option<&str> {
        self.tinder_token.as_deref()
    }

    /// Token for the given service, if set
    pub fn token(&self, service: Service) -> Option<&str> {
        match service {
            Service::OpenAi => self.openai_token(),
            Service::Tinder => self.tinder_token(),
        }
    }

    /// Token for the given service only if it is non-blank
    pub fn present_token(&self, service: Service) -> Option<&str> {
        self.token(service).filter(|token| !token.trim().is_empty())
    }

    /// Services whose token is unset or blank, in tie-break order
    pub fn missing(&self) -> Vec<Service> {
        Service::ALL
            .into_iter()
            .filter(|service| self.present_token(*service).is_none())
            .collect()
    }

    /// Both tokens are non-blank. Necessary, not sufficient, for validity.
    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    /// Neither token is set
    pub fn is_empty(&self) -> bool {
        self.missing().len() == Service::ALL.len()
    }

    /// Masked rendering of one token, for logs and status output
    pub fn masked(&self, service: Service) -> String {
        match self.token(service) {
            Some(token) => mask_token(token),
            None => "<unset>".to_string(),
        }
    }
}

impl fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPair")
            .field("openai_token", &self.masked(Service::OpenAi))
            .field("tinder_token", &self.masked(Service::Tinder))
            .finish()
    }
}

fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Mask a token so that only its first few characters are visible
///
/// Tokens too short to hide most of their length are masked completely.
pub fn mask_token(token: &str) -> String {
    if token.is_empty() {
        return "<empty>".to_string();
    }
    let length = token.chars().count();
    if length <= 2 * ui::MASK_VISIBLE_CHARS {
        "*".repeat(length)
    } else {
        let visible: String = token.chars().take(ui::MASK_VISIBLE_CHARS).collect();
        format!("{}…", visible)
    }
}

/// Which tokens are stored, for status reporting
#[derive(Debug, Clone)]
pub struct CredentialStatus {
    /// Whether an OpenAI token is stored
    pub openai_set: bool,
    /// Whether a Tinder token is stored
    pub tinder_set: bool,
    /// Whether the credential file exists
    pub file_exists: bool,
    /// Whether the pair has been verified (None = not tested)
    pub credentials_valid: Option<bool>,
}

impl CredentialStatus {
    /// Summarize a loaded pair
    pub fn from_pair(pair: &CredentialPair, file_exists: bool) -> Self {
        Self {
            openai_set: pair.present_token(Service::OpenAi).is_some(),
            tinder_set: pair.present_token(Service::Tinder).is_some(),
            file_exists,
            credentials_valid: None,
        }
    }

    /// Record the result of checking the pair against the services
    pub fn record_outcome(&mut self, outcome: &ValidationOutcome) {
        self.credentials_valid = Some(outcome.is_valid());
    }

    /// Check if both tokens are stored
    pub fn has_credentials(&self) -> bool {
        self.openai_set && self.tinder_set
    }

    /// Get descriptive status message for display
    pub fn status_message(&self) -> String {
        match (self.has_credentials(), self.credentials_valid) {
            (false, _) => "Missing tokens - run 'auth setup' to configure".to_string(),
            (true, None) => "Tokens configured but not verified".to_string(),
            (true, Some(true)) => "Tokens configured and verified".to_string(),
            (true, Some(false)) => "Tokens configured but invalid".to_string(),
        }
    }
}
