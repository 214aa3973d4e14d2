//! Terminal event loop
//!
//! Owns the terminal while the UI runs: raw mode plus the alternate screen,
//! restored by [`TerminalGuard`] on every exit path. The loop multiplexes
//! keyboard input, bootstrap events from background validations and a
//! housekeeping tick.

use std::io::{self, Stdout};
use std::time::Instant;

use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::app::{Bootstrap, BootstrapEvent, ChannelNotificationSink, Notification, ScreenState};
use crate::auth::{CredentialPair, FileCredentialStore, TokenValidator};
use crate::config::AppConfig;
use crate::errors::{Result, TuiError};
use crate::ui::form::{AuthForm, FormAction};
use crate::ui::home::HomeScreen;
use crate::ui::render::{self, View};
use crate::ui::toast::NotificationQueue;

type AppBootstrap = Bootstrap<
    FileCredentialStore,
    TokenValidator,
    ChannelNotificationSink,
    fn(CredentialPair) -> HomeScreen,
>;

/// Restores the terminal when dropped
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> std::result::Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = stdout.execute(EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e.into());
        }
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            warn!("Failed to disable raw mode: {}", e);
        }
        if let Err(e) = self.terminal.backend_mut().execute(LeaveAlternateScreen) {
            warn!("Failed to leave alternate screen: {}", e);
        }
        let _ = self.terminal.show_cursor();
    }
}

/// One wake-up of the event loop
enum LoopEvent {
    Input(Option<io::Result<Event>>),
    Bootstrap(BootstrapEvent),
    Tick,
}

/// UI state that is not part of the bootstrap machine
struct TerminalApp {
    bootstrap: AppBootstrap,
    notifications: mpsc::UnboundedReceiver<Notification>,
    toasts: NotificationQueue,
    form: Option<AuthForm>,
    should_quit: bool,
}

impl TerminalApp {
    fn new(config: &AppConfig) -> Result<Self> {
        let store = FileCredentialStore::new(config.credentials_path()?);
        let validator = TokenValidator::from_config(&config.validator_config()?)?;
        let (notifier, notifications) = ChannelNotificationSink::new();
        let factory: fn(CredentialPair) -> HomeScreen = HomeScreen::new;

        Ok(Self {
            bootstrap: Bootstrap::new(store, validator, notifier, factory),
            notifications,
            toasts: NotificationQueue::new(config.ui.notification_duration()),
            form: None,
            should_quit: false,
        })
    }

    /// Bring UI-side state in line with the bootstrap after any change
    fn sync(&mut self) {
        self.toasts.drain(&mut self.notifications, Instant::now());

        match self.bootstrap.screen() {
            ScreenState::AuthForm { prefill } => {
                // Created once on entry; later prefills match what the user typed
                if self.form.is_none() {
                    self.form = Some(AuthForm::new(prefill));
                }
            }
            _ => self.form = None,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
            info!("Quit requested");
            self.should_quit = true;
            return;
        }

        let Some(form) = self.form.as_mut() else {
            return;
        };

        if form.handle_key(key) == FormAction::Submit {
            let pair = form.to_pair();
            debug!(
                "Form submitted (openai: {}, tinder: {})",
                pair.masked(crate::auth::Service::OpenAi),
                pair.masked(crate::auth::Service::Tinder)
            );
            self.bootstrap.submit(pair);
        }
    }

    fn view(&self) -> View<'_> {
        View {
            screen: self.bootstrap.screen(),
            form: self.form.as_ref(),
            home: self.bootstrap.authenticated_screen(),
            validating: self.bootstrap.machine().is_validating(),
            toasts: &self.toasts,
        }
    }
}

/// Run the terminal UI until the user quits
pub async fn run(config: &AppConfig) -> Result<()> {
    let mut app = TerminalApp::new(config)?;
    let mut guard = TerminalGuard::enter()?;
    let mut input = EventStream::new();
    let mut tick = tokio::time::interval(config.ui.tick_rate());

    app.bootstrap.start();
    app.sync();

    loop {
        guard
            .terminal
            .draw(|f| render::draw(f, &app.view()))
            .map_err(TuiError::from)?;

        let event = tokio::select! {
            maybe_input = input.next() => LoopEvent::Input(maybe_input),
            event = app.bootstrap.next_event() => LoopEvent::Bootstrap(event),
            _ = tick.tick() => LoopEvent::Tick,
        };

        match event {
            LoopEvent::Input(Some(Ok(Event::Key(key)))) if key.kind == KeyEventKind::Press => {
                app.handle_key(key);
            }
            LoopEvent::Input(Some(Ok(_))) => {}
            LoopEvent::Input(Some(Err(e))) => return Err(TuiError::from(e).into()),
            LoopEvent::Input(None) => return Err(TuiError::InputClosed.into()),
            LoopEvent::Bootstrap(event) => app.bootstrap.dispatch(event),
            LoopEvent::Tick => {
                app.toasts.prune(Instant::now());
            }
        }

        app.sync();

        if app.should_quit {
            break;
        }
    }

    drop(guard);
    info!("Terminal restored, exiting");
    Ok(())
}
