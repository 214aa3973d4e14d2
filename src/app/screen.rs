//! Hand-off to the authenticated application screen

use crate::auth::CredentialPair;

/// Builds the screen shown once the credentials are valid.
///
/// The bootstrap calls this exactly once, with the pair that was just
/// validated, and never looks inside the result.
pub trait ScreenFactory {
    /// Screen type handed back to the caller
    type Screen;

    /// Create the authenticated application screen
    fn create_authenticated_screen(&self, pair: CredentialPair) -> Self::Screen;
}

impl<F, S> ScreenFactory for F
where
    F: Fn(CredentialPair) -> S,
{
    type Screen = S;

    fn create_authenticated_screen(&self, pair: CredentialPair) -> S {
        self(pair)
    }
}
