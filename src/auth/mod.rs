//! Credential management for the OpenAI and Tinder tokens
//!
//! This module provides the credential pair value, its durable storage, and
//! validation against both services.
//!
//! # Examples
//!
//! ```rust,no_run
//! use tindermate::auth::{
//!     CredentialStore, CredentialValidator, FileCredentialStore, TokenValidator, ValidatorConfig,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FileCredentialStore::default_location()?;
//! let pair = store.load()?;
//!
//! let validator = TokenValidator::from_config(&ValidatorConfig::default())?;
//! if validator.validate(&pair).await?.is_valid() {
//!     store.save(&pair)?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod credentials;
pub mod service;
pub mod store;
pub mod validator;

// Re-export main public API
pub use credentials::{mask_token, CredentialPair, CredentialStatus, Service};
pub use service::{build_http_client, CheckVerdict, HttpServiceCheck, ServiceCheck, ServiceEndpoint};
pub use store::{default_credentials_path, CredentialStore, FileCredentialStore};
pub use validator::{CredentialValidator, TokenValidator, ValidationOutcome, ValidatorConfig};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_structure() {
        // Ensure public API is accessible
        let pair = CredentialPair::empty();
        assert!(!pair.is_complete());
        assert_eq!(ValidatorConfig::default().openai, ServiceEndpoint::default_for(Service::OpenAi));
    }
}
