//! Authenticated home screen
//!
//! Placeholder for the conversation UI that takes over once both tokens are
//! valid. It shows which tokens are in use (masked) and when the session
//! began.

use chrono::{DateTime, Local};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::auth::{CredentialPair, Service};

/// Screen shown after authentication
#[derive(Debug, Clone)]
pub struct HomeScreen {
    credentials: CredentialPair,
    signed_in_at: DateTime<Local>,
}

impl HomeScreen {
    /// Create the screen for a validated pair
    pub fn new(credentials: CredentialPair) -> Self {
        Self {
            credentials,
            signed_in_at: Local::now(),
        }
    }

    /// The validated pair the screen was created with
    pub fn credentials(&self) -> &CredentialPair {
        &self.credentials
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let label = Style::default().fg(Color::DarkGray);
        let mut lines = vec![
            Line::from(Span::styled(
                "Signed in",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        for service in Service::ALL {
            lines.push(Line::from(vec![
                Span::styled(format!("{:>8} token: ", service.display_name()), label),
                Span::raw(self.credentials.masked(service)),
            ]));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("   Since: ", label),
            Span::raw(self.signed_in_at.format("%Y-%m-%d %H:%M:%S").to_string()),
        ]));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Press Ctrl-Q to quit", label)));

        let paragraph = Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" TinderMate "),
        );
        f.render_widget(paragraph, area);
    }
}
