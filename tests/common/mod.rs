//! Shared fakes for the bootstrap integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use tindermate::app::{Notification, NotificationSink, ScreenFactory};
use tindermate::auth::{
    CheckVerdict, CredentialPair, CredentialStore, Service, ServiceCheck, TokenValidator,
};
use tindermate::errors::{StoreError, StoreResult, ValidationError, ValidationResult};

/// How a fake service answers for one token
#[derive(Debug, Clone)]
pub enum Reply {
    Accept,
    Reject(&'static str),
    Unavailable,
}

/// Service check answering from a table, counting every call
pub struct FakeCheck {
    service: Service,
    replies: HashMap<String, (Duration, Reply)>,
    calls: Arc<AtomicUsize>,
}

impl FakeCheck {
    pub fn new(service: Service, calls: Arc<AtomicUsize>) -> Self {
        Self {
            service,
            replies: HashMap::new(),
            calls,
        }
    }

    pub fn reply(self, token: &str, reply: Reply) -> Self {
        self.reply_after(token, Duration::ZERO, reply)
    }

    pub fn reply_after(mut self, token: &str, delay: Duration, reply: Reply) -> Self {
        self.replies.insert(token.to_string(), (delay, reply));
        self
    }
}

#[async_trait]
impl ServiceCheck for FakeCheck {
    fn service(&self) -> Service {
        self.service
    }

    async fn check(&self, token: &str) -> ValidationResult<CheckVerdict> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let (delay, reply) = self
            .replies
            .get(token)
            .cloned()
            .unwrap_or((Duration::ZERO, Reply::Reject("unknown token")));

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match reply {
            Reply::Accept => Ok(CheckVerdict::Accepted),
            Reply::Reject(detail) => Ok(CheckVerdict::Rejected {
                detail: detail.to_string(),
            }),
            Reply::Unavailable => Err(ValidationError::UnexpectedStatus {
                service: self.service.to_string(),
                status: 503,
            }),
        }
    }
}

/// Builder for a [`TokenValidator`] over two fake checks sharing a call counter
pub struct FakeServices {
    pub openai: FakeCheck,
    pub tinder: FakeCheck,
    pub calls: Arc<AtomicUsize>,
}

impl FakeServices {
    pub fn new() -> Self {
        let calls = Arc::new(AtomicUsize::new(0));
        Self {
            openai: FakeCheck::new(Service::OpenAi, Arc::clone(&calls)),
            tinder: FakeCheck::new(Service::Tinder, Arc::clone(&calls)),
            calls,
        }
    }

    /// Both services accept `openai` / `tinder` respectively
    pub fn accepting(openai: &str, tinder: &str) -> Self {
        let mut services = Self::new();
        services.openai = services.openai.reply(openai, Reply::Accept);
        services.tinder = services.tinder.reply(tinder, Reply::Accept);
        services
    }

    pub fn into_validator(self) -> (TokenValidator, Arc<AtomicUsize>) {
        let validator = TokenValidator::new(
            Box::new(self.openai),
            Box::new(self.tinder),
            Duration::from_secs(10),
        );
        (validator, self.calls)
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    stored: Option<CredentialPair>,
    fail_read: bool,
    fail_write: bool,
    loads: usize,
    saves: Vec<CredentialPair>,
}

/// In-memory store; clones share state so tests can inspect it
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with(pair: CredentialPair) -> Self {
        let store = Self::default();
        store.state.lock().unwrap().stored = Some(pair);
        store
    }

    pub fn unreadable() -> Self {
        let store = Self::default();
        store.state.lock().unwrap().fail_read = true;
        store
    }

    pub fn fail_writes(self) -> Self {
        self.state.lock().unwrap().fail_write = true;
        self
    }

    pub fn stored(&self) -> Option<CredentialPair> {
        self.state.lock().unwrap().stored.clone()
    }

    pub fn loads(&self) -> usize {
        self.state.lock().unwrap().loads
    }

    pub fn saves(&self) -> Vec<CredentialPair> {
        self.state.lock().unwrap().saves.clone()
    }
}

impl CredentialStore for MemoryStore {
    fn load(&self) -> StoreResult<CredentialPair> {
        let mut state = self.state.lock().unwrap();
        state.loads += 1;
        if state.fail_read {
            return Err(StoreError::Read {
                path: PathBuf::from("memory"),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            });
        }
        Ok(state.stored.clone().unwrap_or_default())
    }

    fn save(&self, pair: &CredentialPair) -> StoreResult<()> {
        let mut state = self.state.lock().unwrap();
        state.saves.push(pair.clone());
        if state.fail_write {
            return Err(StoreError::Write {
                path: PathBuf::from("memory"),
                source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
            });
        }
        state.stored = Some(pair.clone());
        Ok(())
    }
}

/// Sink recording every notification
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    shown: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingSink {
    pub fn shown(&self) -> Vec<Notification> {
        self.shown.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.shown().iter().map(Notification::text).collect()
    }
}

impl NotificationSink for RecordingSink {
    fn show(&self, notification: Notification) {
        self.shown.lock().unwrap().push(notification);
    }
}

/// Screen factory counting how often it is asked for a screen
#[derive(Debug, Clone, Default)]
pub struct CountingFactory {
    created: Arc<Mutex<Vec<CredentialPair>>>,
}

impl CountingFactory {
    pub fn created(&self) -> Vec<CredentialPair> {
        self.created.lock().unwrap().clone()
    }
}

impl ScreenFactory for CountingFactory {
    type Screen = CredentialPair;

    fn create_authenticated_screen(&self, pair: CredentialPair) -> CredentialPair {
        self.created.lock().unwrap().push(pair.clone());
        pair
    }
}

pub fn pair(openai: &str, tinder: &str) -> CredentialPair {
    CredentialPair::from_input(openai, tinder)
}
