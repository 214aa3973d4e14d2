//! Application constants for TinderMate
//!
//! Centralizes the constants used throughout the application, organized by
//! functional domain.

use std::time::Duration;

/// Service endpoints and credential header conventions
pub mod services {
    /// Display name of service A
    pub const OPENAI_NAME: &str = "OpenAI";

    /// Endpoint used to check an OpenAI token (any authenticated read works)
    pub const OPENAI_CHECK_URL: &str = "https://api.openai.com/v1/models";

    /// Header carrying the OpenAI token
    pub const OPENAI_AUTH_HEADER: &str = "Authorization";

    /// Scheme prefixed to the OpenAI token inside the header
    pub const OPENAI_AUTH_SCHEME: &str = "Bearer";

    /// Display name of service B
    pub const TINDER_NAME: &str = "Tinder";

    /// Endpoint used to check a Tinder token
    pub const TINDER_CHECK_URL: &str = "https://api.gotinder.com/v2/profile";

    /// Header carrying the Tinder token
    pub const TINDER_AUTH_HEADER: &str = "X-Auth-Token";
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = concat!("TinderMate/", env!("CARGO_PKG_VERSION"));

    /// Default timeout for a single service check
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
}

/// Credential file constants
pub mod files {
    /// Application directory name under the user's config dir
    pub const APP_DIR_NAME: &str = "tindermate";

    /// Credential file name
    pub const CREDENTIALS_FILE_NAME: &str = "tokens.json";

    /// Config file name
    pub const CONFIG_FILE_NAME: &str = "config.toml";

    /// Project-local config file name
    pub const LOCAL_CONFIG_FILE_NAME: &str = "tindermate.toml";

    /// Default log file name used while the TUI owns the terminal
    pub const LOG_FILE_NAME: &str = "tindermate.log";

    /// File permissions for the credential file (Unix only) - owner read/write only
    #[cfg(unix)]
    pub const CREDENTIALS_FILE_PERMISSIONS: u32 = 0o600;
}

/// Notification wording and lifetimes
pub mod notifications {
    use super::Duration;

    /// Shown once when stored tokens validate at startup
    pub const TOKENS_VALID: &str = "The tokens are valid";

    /// Prefix emphasized in front of form errors
    pub const ERROR_PREFIX: &str = "ERROR: ";

    /// Default display time when a notification asks for none
    pub const DEFAULT_DURATION: Duration = Duration::from_secs(4);

    /// Minimum display time for form errors
    pub const ERROR_MIN_DURATION: Duration = Duration::from_secs(10);

    /// Maximum notifications kept on screen at once
    pub const MAX_VISIBLE: usize = 3;
}

/// Terminal UI constants
pub mod ui {
    /// Redraw / housekeeping tick
    pub const TICK_RATE_MS: u64 = 250;

    /// Text shown while the bootstrap is loading
    pub const LOADING_TEXT: &str = "The application is loading...";

    /// Characters of a token left visible when masking
    pub const MASK_VISIBLE_CHARS: usize = 4;
}

/// Logging and debugging constants
pub mod logging {
    /// Default log level
    pub const DEFAULT_LOG_LEVEL: &str = "info";
}

// Re-export commonly used constants for convenience
pub use http::{DEFAULT_TIMEOUT as HTTP_TIMEOUT, USER_AGENT};
pub use notifications::{ERROR_MIN_DURATION, TOKENS_VALID};
pub use services::{OPENAI_NAME, TINDER_NAME};
