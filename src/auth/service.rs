//! Per-service token checks
//!
//! A [`ServiceCheck`] answers one question: does this service accept this
//! token? The answer is a [`CheckVerdict`]; anything that prevents an answer
//! (network failure, overloaded server) is a [`ValidationError`] instead.

use async_trait::async_trait;
use reqwest::header::HeaderValue;
use reqwest::{Client, StatusCode};
use url::Url;

use crate::auth::credentials::Service;
use crate::constants::{http, services};
use crate::errors::{ValidationError, ValidationResult};

/// Verdict of a single service on a single token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckVerdict {
    /// The service accepted the token
    Accepted,
    /// The service rejected the token; `detail` explains why
    Rejected { detail: String },
}

/// Checks one token against one external service
#[async_trait]
pub trait ServiceCheck: Send + Sync {
    /// Service this check talks to
    fn service(&self) -> Service;

    /// Ask the service whether it accepts `token`.
    ///
    /// Callers never pass an empty token.
    async fn check(&self, token: &str) -> ValidationResult<CheckVerdict>;
}

/// Where and how a token is presented to a service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoint {
    /// Authenticated endpoint that answers 2xx for a good token
    pub check_url: Url,
    /// Header carrying the token
    pub auth_header: String,
    /// Optional scheme placed before the token (e.g. `Bearer`)
    pub auth_scheme: Option<String>,
}

impl ServiceEndpoint {
    /// Built-in endpoint for a service
    pub fn default_for(service: Service) -> Self {
        let (url, header, scheme) = match service {
            Service::OpenAi => (
                services::OPENAI_CHECK_URL,
                services::OPENAI_AUTH_HEADER,
                Some(services::OPENAI_AUTH_SCHEME),
            ),
            Service::Tinder => (
                services::TINDER_CHECK_URL,
                services::TINDER_AUTH_HEADER,
                None,
            ),
        };

        Self {
            check_url: Url::parse(url).expect("built-in service URL should be valid"),
            auth_header: header.to_string(),
            auth_scheme: scheme.map(str::to_string),
        }
    }

    /// Header value presenting `token`
    fn header_value(&self, token: &str) -> String {
        match &self.auth_scheme {
            Some(scheme) if !scheme.is_empty() => format!("{} {}", scheme, token),
            _ => token.to_string(),
        }
    }
}

/// Token check performed with an authenticated HTTP GET
#[derive(Debug, Clone)]
pub struct HttpServiceCheck {
    service: Service,
    endpoint: ServiceEndpoint,
    client: Client,
}

impl HttpServiceCheck {
    /// Creates a check for `service` sharing the given client
    pub fn new(service: Service, endpoint: ServiceEndpoint, client: Client) -> Self {
        Self {
            service,
            endpoint,
            client,
        }
    }

    /// Endpoint this check targets
    pub fn endpoint(&self) -> &ServiceEndpoint {
        &self.endpoint
    }

    /// Maps a response status (and body, for rejections) to a verdict
    async fn verdict_from_response(
        &self,
        response: reqwest::Response,
    ) -> ValidationResult<CheckVerdict> {
        let status = response.status();
        tracing::debug!("{} check answered HTTP {}", self.service, status);

        if status.is_success() {
            return Ok(CheckVerdict::Accepted);
        }

        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            return Err(ValidationError::UnexpectedStatus {
                service: self.service.to_string(),
                status: status.as_u16(),
            });
        }

        // Any other non-success answer is a verdict on the token
        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| extract_error_message(&body));

        let detail = match message {
            Some(message) => format!("{} (HTTP {})", message, status.as_u16()),
            None => format!("the service refused it (HTTP {})", status.as_u16()),
        };
        Ok(CheckVerdict::Rejected { detail })
    }
}

#[async_trait]
impl ServiceCheck for HttpServiceCheck {
    fn service(&self) -> Service {
        self.service
    }

    async fn check(&self, token: &str) -> ValidationResult<CheckVerdict> {
        let value = self.endpoint.header_value(token);
        if HeaderValue::from_str(&value).is_err() {
            return Ok(CheckVerdict::Rejected {
                detail: "the token contains characters that cannot be sent".to_string(),
            });
        }

        tracing::info!(
            "Checking {} token against {}",
            self.service,
            self.endpoint.check_url
        );

        let response = self
            .client
            .get(self.endpoint.check_url.clone())
            .header(self.endpoint.auth_header.as_str(), value)
            .send()
            .await
            .map_err(|source| ValidationError::Http {
                service: self.service.to_string(),
                source,
            })?;

        self.verdict_from_response(response).await
    }
}

/// Pulls a human-readable message out of common JSON error bodies
fn extract_error_message(body: &serde_json::Value) -> Option<String> {
    let candidates = [
        body.pointer("/error/message"),
        body.pointer("/message"),
        body.pointer("/error"),
        body.pointer("/meta/message"),
    ];

    candidates
        .into_iter()
        .flatten()
        .filter_map(|value| value.as_str())
        .map(str::trim)
        .find(|message| !message.is_empty())
        .map(str::to_string)
}

/// Builds the HTTP client shared by both service checks
pub fn build_http_client(
    request_timeout: std::time::Duration,
    connect_timeout: std::time::Duration,
) -> ValidationResult<Client> {
    Client::builder()
        .timeout(request_timeout)
        .connect_timeout(connect_timeout)
        .user_agent(http::USER_AGENT)
        .build()
        .map_err(ValidationError::Client)
}
