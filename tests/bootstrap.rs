//! Integration tests for the bootstrap flow
//!
//! These drive [`Bootstrap`] end to end with the real [`TokenValidator`] over
//! fake service checks, an in-memory store, a recording notification sink and
//! a counting screen factory.

mod common;

use std::sync::atomic::Ordering;
use std::time::Duration;

use tempfile::TempDir;
use tindermate::app::{Bootstrap, ScreenState, Severity};
use tindermate::auth::{CredentialStore, FileCredentialStore};

use common::{pair, CountingFactory, FakeServices, MemoryStore, RecordingSink, Reply};

#[tokio::test]
async fn test_empty_store_shows_blank_form_without_network() {
    let store = MemoryStore::empty();
    let (validator, calls) = FakeServices::new().into_validator();
    let sink = RecordingSink::default();
    let factory = CountingFactory::default();

    let mut bootstrap = Bootstrap::new(store.clone(), validator, sink.clone(), factory.clone());
    assert_eq!(bootstrap.screen(), &ScreenState::Loading);

    bootstrap.start();
    bootstrap.settle().await;

    assert_eq!(
        bootstrap.screen(),
        &ScreenState::AuthForm {
            prefill: pair("", "")
        }
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(store.loads(), 1);
    assert_eq!(sink.texts(), vec!["The OpenAI and Tinder tokens are missing"]);
    assert!(factory.created().is_empty());
}

#[tokio::test]
async fn test_valid_stored_pair_authenticates() {
    let store = MemoryStore::with(pair("x", "y"));
    let (validator, calls) = FakeServices::accepting("x", "y").into_validator();
    let sink = RecordingSink::default();
    let factory = CountingFactory::default();

    let mut bootstrap = Bootstrap::new(store.clone(), validator, sink.clone(), factory.clone());
    bootstrap.start();
    bootstrap.settle().await;

    assert_eq!(bootstrap.screen(), &ScreenState::Authenticated);
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    let valid_count = sink
        .texts()
        .iter()
        .filter(|text| text.as_str() == "The tokens are valid")
        .count();
    assert_eq!(valid_count, 1);
    assert_eq!(sink.shown().len(), 1);

    assert_eq!(factory.created(), vec![pair("x", "y")]);
    assert_eq!(bootstrap.authenticated_screen(), Some(&pair("x", "y")));
    // Startup validation does not rewrite the store
    assert!(store.saves().is_empty());
}

#[tokio::test]
async fn test_rejected_stored_pair_prefills_form() {
    let mut services = FakeServices::new();
    services.openai = services.openai.reply("x", Reply::Accept);
    services.tinder = services.tinder.reply("y", Reply::Reject("token expired (HTTP 401)"));
    let (validator, _calls) = services.into_validator();

    let sink = RecordingSink::default();
    let factory = CountingFactory::default();
    let mut bootstrap = Bootstrap::new(
        MemoryStore::with(pair("x", "y")),
        validator,
        sink.clone(),
        factory.clone(),
    );
    bootstrap.start();
    bootstrap.settle().await;

    assert_eq!(
        bootstrap.screen(),
        &ScreenState::AuthForm {
            prefill: pair("x", "y")
        }
    );
    let texts = sink.texts();
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("Invalid Tinder token"));
    assert!(texts[0].contains("token expired"));
    assert!(factory.created().is_empty());
}

#[tokio::test]
async fn test_submission_missing_token_stays_on_form() {
    let (validator, calls) = FakeServices::new().into_validator();
    let sink = RecordingSink::default();
    let factory = CountingFactory::default();
    let mut bootstrap = Bootstrap::new(MemoryStore::empty(), validator, sink.clone(), factory.clone());
    bootstrap.start();
    bootstrap.settle().await;

    bootstrap.submit(pair("", "y"));
    bootstrap.settle().await;

    assert_eq!(
        bootstrap.screen(),
        &ScreenState::AuthForm {
            prefill: pair("", "y")
        }
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let last = sink.shown().pop().unwrap();
    assert_eq!(last.severity, Severity::Error);
    assert_eq!(last.text(), "ERROR: The OpenAI token is missing");
    assert_eq!(last.min_duration, Some(Duration::from_secs(10)));
    assert!(factory.created().is_empty());
}

#[tokio::test]
async fn test_valid_submission_saves_and_enters() {
    let store = MemoryStore::empty();
    let (validator, _calls) = FakeServices::accepting("sk-new", "tinder-new").into_validator();
    let factory = CountingFactory::default();
    let mut bootstrap = Bootstrap::new(store.clone(), validator, RecordingSink::default(), factory.clone());
    bootstrap.start();
    bootstrap.settle().await;

    bootstrap.submit(pair("sk-new", "tinder-new"));
    bootstrap.settle().await;

    assert_eq!(bootstrap.screen(), &ScreenState::Authenticated);
    assert_eq!(store.saves(), vec![pair("sk-new", "tinder-new")]);
    assert_eq!(store.stored(), Some(pair("sk-new", "tinder-new")));
    assert_eq!(factory.created().len(), 1);
}

#[tokio::test]
async fn test_failed_save_still_authenticates_with_warning() {
    let store = MemoryStore::empty().fail_writes();
    let (validator, _calls) = FakeServices::accepting("a", "b").into_validator();
    let sink = RecordingSink::default();
    let mut bootstrap = Bootstrap::new(store, validator, sink.clone(), CountingFactory::default());
    bootstrap.start();
    bootstrap.settle().await;

    bootstrap.submit(pair("a", "b"));
    bootstrap.settle().await;

    assert_eq!(bootstrap.screen(), &ScreenState::Authenticated);
    let last = sink.shown().pop().unwrap();
    assert_eq!(last.severity, Severity::Warning);
    assert!(last.message.contains("could not be saved"));
}

#[tokio::test]
async fn test_unreadable_store_degrades_to_form() {
    let (validator, calls) = FakeServices::new().into_validator();
    let sink = RecordingSink::default();
    let mut bootstrap = Bootstrap::new(
        MemoryStore::unreadable(),
        validator,
        sink.clone(),
        CountingFactory::default(),
    );
    bootstrap.start();
    bootstrap.settle().await;

    assert_eq!(
        bootstrap.screen(),
        &ScreenState::AuthForm {
            prefill: pair("", "")
        }
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(!bootstrap.is_busy());

    let shown = sink.shown();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].severity, Severity::Warning);
    assert!(shown[0].message.contains("Could not read the saved tokens"));
}

#[tokio::test]
async fn test_unavailable_service_fails_safe_to_form() {
    let mut services = FakeServices::new();
    services.openai = services.openai.reply("x", Reply::Accept);
    services.tinder = services.tinder.reply("y", Reply::Unavailable);
    let (validator, _calls) = services.into_validator();

    let sink = RecordingSink::default();
    let mut bootstrap = Bootstrap::new(
        MemoryStore::with(pair("x", "y")),
        validator,
        sink.clone(),
        CountingFactory::default(),
    );
    bootstrap.start();
    bootstrap.settle().await;

    assert_eq!(
        bootstrap.screen(),
        &ScreenState::AuthForm {
            prefill: pair("x", "y")
        }
    );
    let shown = sink.shown();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].severity, Severity::Error);
}

#[tokio::test(start_paused = true)]
async fn test_second_submission_supersedes_first() {
    let mut services = FakeServices::new();
    // First submission would be valid, but only after a long wait
    services.openai = services
        .openai
        .reply_after("slow", Duration::from_secs(5), Reply::Accept)
        .reply("fast", Reply::Accept);
    services.tinder = services
        .tinder
        .reply_after("t1", Duration::from_secs(5), Reply::Accept)
        .reply("t2", Reply::Reject("account banned"));
    let (validator, _calls) = services.into_validator();

    let store = MemoryStore::empty();
    let sink = RecordingSink::default();
    let factory = CountingFactory::default();
    let mut bootstrap = Bootstrap::new(store.clone(), validator, sink.clone(), factory.clone());
    bootstrap.start();
    bootstrap.settle().await;

    bootstrap.submit(pair("slow", "t1"));
    assert!(bootstrap.machine().is_validating());
    bootstrap.submit(pair("fast", "t2"));
    bootstrap.settle().await;

    assert_eq!(
        bootstrap.screen(),
        &ScreenState::AuthForm {
            prefill: pair("fast", "t2")
        }
    );
    assert!(sink.texts().last().unwrap().contains("account banned"));

    // The superseded attempt never reports back
    let late = tokio::time::timeout(Duration::from_secs(30), bootstrap.next_event()).await;
    assert!(late.is_err());

    assert_eq!(
        bootstrap.screen(),
        &ScreenState::AuthForm {
            prefill: pair("fast", "t2")
        }
    );
    assert!(factory.created().is_empty());
    assert!(store.saves().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_superseding_submission_can_authenticate() {
    let mut services = FakeServices::new();
    services.openai = services
        .openai
        .reply_after("bad", Duration::from_secs(5), Reply::Reject("revoked"))
        .reply("good", Reply::Accept);
    services.tinder = services.tinder.reply("t", Reply::Accept);
    let (validator, _calls) = services.into_validator();

    let store = MemoryStore::empty();
    let sink = RecordingSink::default();
    let factory = CountingFactory::default();
    let mut bootstrap = Bootstrap::new(store.clone(), validator, sink.clone(), factory.clone());
    bootstrap.start();
    bootstrap.settle().await;

    bootstrap.submit(pair("bad", "t"));
    bootstrap.submit(pair("good", "t"));
    bootstrap.settle().await;

    assert_eq!(bootstrap.screen(), &ScreenState::Authenticated);
    assert_eq!(factory.created(), vec![pair("good", "t")]);
    assert_eq!(store.saves(), vec![pair("good", "t")]);
    assert!(sink.texts().iter().all(|text| !text.contains("revoked")));
}

#[tokio::test]
async fn test_file_store_round_trip_through_flow() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("tokens.json");

    let (validator, _calls) = FakeServices::accepting("sk-file", "tinder-file").into_validator();
    let mut bootstrap = Bootstrap::new(
        FileCredentialStore::new(&path),
        validator,
        RecordingSink::default(),
        CountingFactory::default(),
    );
    bootstrap.start();
    bootstrap.settle().await;
    bootstrap.submit(pair("sk-file", "tinder-file"));
    bootstrap.settle().await;
    assert_eq!(bootstrap.screen(), &ScreenState::Authenticated);

    // A fresh process finds the saved pair and authenticates from it
    let store = FileCredentialStore::new(&path);
    assert_eq!(store.load().unwrap(), pair("sk-file", "tinder-file"));

    let (validator, calls) = FakeServices::accepting("sk-file", "tinder-file").into_validator();
    let sink = RecordingSink::default();
    let mut bootstrap = Bootstrap::new(store, validator, sink.clone(), CountingFactory::default());
    bootstrap.start();
    bootstrap.settle().await;

    assert_eq!(bootstrap.screen(), &ScreenState::Authenticated);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(sink.texts(), vec!["The tokens are valid"]);
}
