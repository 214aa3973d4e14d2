//! Bootstrap runtime
//!
//! [`Bootstrap`] owns a [`BootstrapMachine`] together with the collaborators
//! it needs and carries out the effects each transition asks for:
//!
//! - store operations run inline (they are local and fast);
//! - validations run as spawned tasks that report back through an internal
//!   channel, so the caller's event loop never blocks on the network;
//! - a superseded validation task is aborted, and should its result still
//!   arrive the machine discards it as stale.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::app::notify::NotificationSink;
use crate::app::screen::ScreenFactory;
use crate::app::state::{apply, AttemptId, BootstrapEvent, BootstrapMachine, Effect, ScreenState};
use crate::auth::{CredentialPair, CredentialStore, CredentialValidator};

/// Drives the bootstrap flow against real collaborators
pub struct Bootstrap<S, V, N, F>
where
    F: ScreenFactory,
{
    machine: BootstrapMachine,
    store: S,
    validator: Arc<V>,
    notifier: N,
    factory: F,
    events_tx: mpsc::UnboundedSender<BootstrapEvent>,
    events_rx: mpsc::UnboundedReceiver<BootstrapEvent>,
    validation_task: Option<(AttemptId, JoinHandle<()>)>,
    authenticated: Option<F::Screen>,
}

impl<S, V, N, F> Bootstrap<S, V, N, F>
where
    S: CredentialStore,
    V: CredentialValidator + 'static,
    N: NotificationSink,
    F: ScreenFactory,
{
    /// Creates a bootstrap in `Loading`. Call [`Bootstrap::start`] to begin.
    pub fn new(store: S, validator: V, notifier: N, factory: F) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            machine: BootstrapMachine::new(),
            store,
            validator: Arc::new(validator),
            notifier,
            factory,
            events_tx,
            events_rx,
            validation_task: None,
            authenticated: None,
        }
    }

    /// Current screen
    pub fn screen(&self) -> &ScreenState {
        self.machine.screen()
    }

    /// Underlying machine
    pub fn machine(&self) -> &BootstrapMachine {
        &self.machine
    }

    /// Whether results are still expected without further user input
    pub fn is_busy(&self) -> bool {
        self.machine.is_busy()
    }

    /// The authenticated application screen, once created
    pub fn authenticated_screen(&self) -> Option<&F::Screen> {
        self.authenticated.as_ref()
    }

    /// Take ownership of the authenticated application screen
    pub fn take_authenticated_screen(&mut self) -> Option<F::Screen> {
        self.authenticated.take()
    }

    /// Begin the flow: load stored credentials and validate them
    pub fn start(&mut self) {
        self.dispatch(BootstrapEvent::Started);
    }

    /// Submit a pair entered in the authentication form
    pub fn submit(&mut self, pair: CredentialPair) {
        self.dispatch(BootstrapEvent::Submitted(pair));
    }

    /// Wait for the next event produced by a background validation.
    ///
    /// Pending forever while nothing is in flight, so it composes with
    /// `tokio::select!` in an event loop.
    pub async fn next_event(&mut self) -> BootstrapEvent {
        match self.events_rx.recv().await {
            Some(event) => event,
            // The sender half lives in `self`, so the channel cannot close
            None => std::future::pending().await,
        }
    }

    /// Process background events until the flow needs user input or is done
    pub async fn settle(&mut self) {
        while self.is_busy() {
            let event = self.next_event().await;
            self.dispatch(event);
        }
    }

    /// Apply an event and run the effects it produces, including any
    /// follow-up events those effects yield synchronously
    pub fn dispatch(&mut self, event: BootstrapEvent) {
        let mut pending = VecDeque::from([event]);

        while let Some(event) = pending.pop_front() {
            if let BootstrapEvent::ValidationCompleted { attempt, .. } = &event {
                if matches!(&self.validation_task, Some((id, _)) if id == attempt) {
                    self.validation_task = None;
                }
            }

            let before = self.machine.screen().name();
            let effects = apply(&mut self.machine, event);
            let after = self.machine.screen().name();
            if before != after {
                tracing::info!("Screen transition: {} -> {}", before, after);
            }

            for effect in effects {
                if let Some(follow_up) = self.run_effect(effect) {
                    pending.push_back(follow_up);
                }
            }
        }
    }

    fn run_effect(&mut self, effect: Effect) -> Option<BootstrapEvent> {
        match effect {
            Effect::LoadCredentials => Some(BootstrapEvent::CredentialsLoaded(self.store.load())),
            Effect::Validate { attempt, pair } => {
                self.spawn_validation(attempt, pair);
                None
            }
            Effect::CancelValidation { attempt } => {
                match self.validation_task.take() {
                    Some((id, handle)) if id == attempt => {
                        tracing::debug!("Aborting validation attempt {}", attempt);
                        handle.abort();
                    }
                    other => self.validation_task = other,
                }
                None
            }
            Effect::SaveCredentials(pair) => {
                Some(BootstrapEvent::CredentialsSaved(self.store.save(&pair)))
            }
            Effect::Notify(notification) => {
                self.notifier.show(notification);
                None
            }
            Effect::EnterApplication(pair) => {
                if self.authenticated.is_none() {
                    self.authenticated = Some(self.factory.create_authenticated_screen(pair));
                }
                None
            }
        }
    }

    fn spawn_validation(&mut self, attempt: AttemptId, pair: CredentialPair) {
        let validator = Arc::clone(&self.validator);
        let events_tx = self.events_tx.clone();

        let handle = tokio::spawn(async move {
            let result = validator.validate(&pair).await;
            // The receiver only disappears with the bootstrap itself
            let _ = events_tx.send(BootstrapEvent::ValidationCompleted {
                attempt,
                pair,
                result,
            });
        });

        if let Some((stale, old)) = self.validation_task.replace((attempt, handle)) {
            tracing::debug!("Aborting validation attempt {}", stale);
            old.abort();
        }
    }
}

impl<S, V, N, F> Drop for Bootstrap<S, V, N, F>
where
    F: ScreenFactory,
{
    fn drop(&mut self) {
        if let Some((_, handle)) = self.validation_task.take() {
            handle.abort();
        }
    }
}
