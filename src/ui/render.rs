//! Drawing for the bootstrap screens and the notification area

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{Notification, ScreenState, Severity};
use crate::auth::Service;
use crate::constants::ui;
use crate::ui::form::AuthForm;
use crate::ui::home::HomeScreen;
use crate::ui::toast::NotificationQueue;

/// Everything needed to draw one frame
pub struct View<'a> {
    pub screen: &'a ScreenState,
    pub form: Option<&'a AuthForm>,
    pub home: Option<&'a HomeScreen>,
    pub validating: bool,
    pub toasts: &'a NotificationQueue,
}

/// Draw a full frame
pub fn draw(f: &mut Frame, view: &View) {
    let toast_lines = view.toasts.visible().count() as u16;
    let toast_height = if toast_lines == 0 { 0 } else { toast_lines + 2 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),               // Screen
            Constraint::Length(toast_height), // Notifications
        ])
        .split(f.size());

    match (view.screen, view.form, view.home) {
        (ScreenState::AuthForm { .. }, Some(form), _) => {
            render_form(f, form, view.validating, chunks[0])
        }
        (ScreenState::Authenticated, _, Some(home)) => home.render(f, chunks[0]),
        _ => render_loading(f, chunks[0]),
    }

    if toast_height > 0 {
        render_toasts(f, view.toasts, chunks[1]);
    }
}

fn render_loading(f: &mut Frame, area: Rect) {
    let area = centered(area, 60, 3);
    let text = Paragraph::new(ui::LOADING_TEXT)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Cyan));
    f.render_widget(text, area);
}

/// Render the two labelled inputs, the submit hint and the cursor
fn render_form(f: &mut Frame, form: &AuthForm, validating: bool, area: Rect) {
    let area = centered(area, 70, 12);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Authentication ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // OpenAI token
            Constraint::Length(3), // Tinder token
            Constraint::Length(1), // Hint
            Constraint::Min(0),
        ])
        .split(inner);

    for (service, row) in Service::ALL.into_iter().zip(rows.iter()) {
        let focused = form.focus() == service;
        let border_style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let value = form.value(service);
        let content = if value.is_empty() {
            Span::styled(
                format!("{} token", service),
                Style::default().fg(Color::DarkGray),
            )
        } else {
            Span::raw(value)
        };

        let input = Paragraph::new(Line::from(content)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(format!(" {} token ", service)),
        );
        f.render_widget(input, *row);

        if focused {
            let width = value.chars().count() as u16;
            let max_x = row.x + row.width.saturating_sub(2);
            f.set_cursor((row.x + 1 + width).min(max_x), row.y + 1);
        }
    }

    let hint = if validating {
        Line::from(Span::styled(
            "Validating...",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
        ))
    } else {
        Line::from(Span::styled(
            "Tab: switch field   Enter: submit   Ctrl-Q: quit",
            Style::default().fg(Color::DarkGray),
        ))
    };
    f.render_widget(Paragraph::new(hint).alignment(Alignment::Center), rows[2]);
}

fn render_toasts(f: &mut Frame, toasts: &NotificationQueue, area: Rect) {
    let lines: Vec<Line> = toasts.visible().map(toast_line).collect();
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::TOP));
    f.render_widget(paragraph, area);
}

fn toast_line(notification: &Notification) -> Line<'_> {
    let color = match notification.severity {
        Severity::Info => Color::Green,
        Severity::Warning => Color::Yellow,
        Severity::Error => Color::Red,
    };

    let mut spans = Vec::with_capacity(2);
    if let Some(prefix) = &notification.emphasis {
        spans.push(Span::styled(
            prefix.as_str(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }
    spans.push(Span::styled(
        notification.message.as_str(),
        Style::default().fg(color),
    ));
    Line::from(spans)
}

/// A `width` x `height` rectangle centered in `area`, clamped to it
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
