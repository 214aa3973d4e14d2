//! Terminal user interface
//!
//! A thin ratatui front-end over the bootstrap flow: it draws the loading
//! text, the token form and the authenticated home screen, and shows
//! notifications in a strip at the bottom.

pub mod form;
pub mod home;
pub mod render;
pub mod terminal;
pub mod toast;

pub use form::{AuthForm, FormAction};
pub use home::HomeScreen;
pub use terminal::run;
pub use toast::NotificationQueue;
