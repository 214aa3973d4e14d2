//! TinderMate Library
//!
//! Terminal front-end bootstrap for TinderMate: loads the stored OpenAI and
//! Tinder tokens, validates them against both services and either hands over
//! to the application screen or asks the user for new tokens.

pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;
pub mod ui;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};
