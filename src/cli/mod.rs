//! Command-line interface components
//!
//! This module contains the argument definitions and the handlers for the
//! `run` and `auth` commands.

pub mod args;
pub mod commands;

pub use args::{AuthAction, AuthArgs, Cli, Commands, GlobalArgs};
pub use commands::{handle_auth, handle_run};
