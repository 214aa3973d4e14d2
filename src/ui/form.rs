//! Authentication form input state
//!
//! Holds the text of the two token fields and which one has focus. Key
//! handling is kept here, away from drawing, so it can be tested with plain
//! `KeyEvent` values.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::auth::{CredentialPair, Service};

/// What the caller should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    /// Nothing beyond redrawing
    None,
    /// Submit the current values
    Submit,
}

/// The two-field token form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthForm {
    openai: String,
    tinder: String,
    focus: Service,
}

impl AuthForm {
    /// Form prefilled from `prefill`, focused on the first field
    pub fn new(prefill: &CredentialPair) -> Self {
        Self {
            openai: prefill.openai_token().unwrap_or_default().to_string(),
            tinder: prefill.tinder_token().unwrap_or_default().to_string(),
            focus: Service::OpenAi,
        }
    }

    /// Field that receives typed characters
    pub fn focus(&self) -> Service {
        self.focus
    }

    /// Current text of a field
    pub fn value(&self, field: Service) -> &str {
        match field {
            Service::OpenAi => &self.openai,
            Service::Tinder => &self.tinder,
        }
    }

    /// The pair to submit; blank fields become missing tokens
    pub fn to_pair(&self) -> CredentialPair {
        CredentialPair::from_input(&self.openai, &self.tinder)
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            Service::OpenAi => Service::Tinder,
            Service::Tinder => Service::OpenAi,
        };
    }

    pub fn focus_previous(&mut self) {
        // Two fields: previous and next coincide
        self.focus_next();
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            Service::OpenAi => &mut self.openai,
            Service::Tinder => &mut self.tinder,
        }
    }

    /// Apply a key press
    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Enter => {
                if self.focus == Service::Tinder {
                    return FormAction::Submit;
                }
                self.focus_next();
            }
            KeyCode::Tab | KeyCode::Down => self.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.focus_previous(),
            KeyCode::Backspace => {
                self.focused_mut().pop();
            }
            KeyCode::Char('u') if ctrl => self.focused_mut().clear(),
            KeyCode::Char(c) if !ctrl => self.focused_mut().push(c),
            _ => {}
        }

        FormAction::None
    }
}
