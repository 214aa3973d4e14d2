//! Credential pair validation
//!
//! [`TokenValidator`] checks both tokens of a pair concurrently and folds the
//! two verdicts into a single [`ValidationOutcome`]:
//!
//! - an incomplete pair is `Invalid` immediately, without any network call;
//! - both accepted is `Valid`;
//! - any rejection is `Invalid`, naming the first rejecting service in
//!   [`Service::ALL`] order (OpenAI before Tinder);
//! - no rejection but a failed check is a [`ValidationError`]: the pair could
//!   not be checked, which is not the same as being wrong.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::auth::credentials::{CredentialPair, Service};
use crate::auth::service::{
    build_http_client, CheckVerdict, HttpServiceCheck, ServiceCheck, ServiceEndpoint,
};
use crate::constants::http;
use crate::errors::{ValidationError, ValidationResult};

/// Result of checking a complete or incomplete pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// Both services accepted their tokens
    Valid,
    /// At least one token is missing or was rejected
    Invalid { reason: String },
}

impl ValidationOutcome {
    /// Whether the outcome is `Valid`
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid)
    }
}

/// Checks a credential pair against the external services
#[async_trait]
pub trait CredentialValidator: Send + Sync {
    /// Validate `pair`.
    ///
    /// Rejected or missing tokens are reported as `Ok(Invalid { .. })`. An
    /// `Err` means the pair could not be checked at all.
    async fn validate(&self, pair: &CredentialPair) -> ValidationResult<ValidationOutcome>;
}

#[async_trait]
impl<V: CredentialValidator + ?Sized> CredentialValidator for Arc<V> {
    async fn validate(&self, pair: &CredentialPair) -> ValidationResult<ValidationOutcome> {
        (**self).validate(pair).await
    }
}

/// Runtime settings for [`TokenValidator`]
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Upper bound for each service check
    pub timeout: Duration,
    /// TCP connect timeout for the HTTP client
    pub connect_timeout: Duration,
    /// OpenAI endpoint
    pub openai: ServiceEndpoint,
    /// Tinder endpoint
    pub tinder: ServiceEndpoint,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            timeout: http::DEFAULT_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            openai: ServiceEndpoint::default_for(Service::OpenAi),
            tinder: ServiceEndpoint::default_for(Service::Tinder),
        }
    }
}

/// Validates a pair by running one [`ServiceCheck`] per service
pub struct TokenValidator {
    openai: Box<dyn ServiceCheck>,
    tinder: Box<dyn ServiceCheck>,
    timeout: Duration,
}

impl TokenValidator {
    /// Creates a validator from explicit checks
    pub fn new(
        openai: Box<dyn ServiceCheck>,
        tinder: Box<dyn ServiceCheck>,
        timeout: Duration,
    ) -> Self {
        debug_assert_eq!(openai.service(), Service::OpenAi);
        debug_assert_eq!(tinder.service(), Service::Tinder);
        Self {
            openai,
            tinder,
            timeout,
        }
    }

    /// Creates an HTTP-backed validator
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Client` if the HTTP client cannot be built
    pub fn from_config(config: &ValidatorConfig) -> ValidationResult<Self> {
        // The per-check timeout is enforced here too so a hung body read
        // cannot outlive it
        let client = build_http_client(config.timeout, config.connect_timeout)?;

        Ok(Self::new(
            Box::new(HttpServiceCheck::new(
                Service::OpenAi,
                config.openai.clone(),
                client.clone(),
            )),
            Box::new(HttpServiceCheck::new(
                Service::Tinder,
                config.tinder.clone(),
                client,
            )),
            config.timeout,
        ))
    }

    /// Per-check timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn run_check(
        &self,
        check: &dyn ServiceCheck,
        token: &str,
    ) -> ValidationResult<CheckVerdict> {
        match tokio::time::timeout(self.timeout, check.check(token)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    "{} check timed out after {:?}",
                    check.service(),
                    self.timeout
                );
                Err(ValidationError::Timeout {
                    service: check.service().to_string(),
                    timeout: self.timeout,
                })
            }
        }
    }
}

#[async_trait]
impl CredentialValidator for TokenValidator {
    async fn validate(&self, pair: &CredentialPair) -> ValidationResult<ValidationOutcome> {
        let (openai_token, tinder_token) = match (
            pair.present_token(Service::OpenAi),
            pair.present_token(Service::Tinder),
        ) {
            (Some(openai), Some(tinder)) => (openai, tinder),
            _ => {
                let reason = missing_reason(&pair.missing());
                tracing::info!("Skipping service checks: {}", reason);
                return Ok(ValidationOutcome::Invalid { reason });
            }
        };

        let (openai, tinder) = tokio::join!(
            self.run_check(self.openai.as_ref(), openai_token),
            self.run_check(self.tinder.as_ref(), tinder_token),
        );

        combine([(Service::OpenAi, openai), (Service::Tinder, tinder)])
    }
}

/// Folds per-service results, given in tie-break order, into one outcome
fn combine(
    results: [(Service, ValidationResult<CheckVerdict>); 2],
) -> ValidationResult<ValidationOutcome> {
    let mut first_error: Option<ValidationError> = None;

    for (service, result) in results {
        match result {
            Ok(CheckVerdict::Accepted) => {
                tracing::debug!("{} accepted its token", service);
            }
            Ok(CheckVerdict::Rejected { detail }) => {
                tracing::info!("{} rejected its token: {}", service, detail);
                return Ok(ValidationOutcome::Invalid {
                    reason: format!("Invalid {} token: {}", service, detail),
                });
            }
            Err(e) => {
                tracing::warn!("{} check failed: {}", service, e);
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(ValidationOutcome::Valid),
    }
}

/// User-facing reason for missing tokens
fn missing_reason(missing: &[Service]) -> String {
    match missing {
        [] => "No tokens are missing".to_string(),
        [service] => format!("The {} token is missing", service),
        [first, second] => format!("The {} and {} tokens are missing", first, second),
        _ => "Tokens are missing".to_string(),
    }
}
