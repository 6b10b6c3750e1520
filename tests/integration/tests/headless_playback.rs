//! End-to-end tests with the headless engine
//!
//! These tests verify:
//! - Engine events flowing back into the controller
//! - Sibling playlists and automatic advance
//! - Session persistence on disk across controller lifetimes
//! - The engine clock running on a tokio runtime

use anyhow::Result;
use ezplayer::engine::{EngineClock, EngineEvent, HeadlessEngine, PlaybackEngine};
use ezplayer::player::{JsonSessionStore, PlayerConfig, SessionController, SessionStore};
use ezplayer::utils::config::EngineConfig;
use ezplayer_integration_tests::mocks::*;
use ezplayer_integration_tests::TestFixture;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Advance the engine and hand its events to the controller, as the event
/// loop does
fn pump(
    controller: &mut SessionController,
    clock: &EngineClock,
    events: &impl Fn() -> Vec<EngineEvent>,
    step: Duration,
) {
    clock.advance(step);
    for event in events() {
        controller.handle_engine_event(event);
    }
}

fn engine_config() -> EngineConfig {
    EngineConfig {
        nominal_duration_secs: 10,
        tick_ms: 250,
    }
}

struct Shell {
    controller: SessionController,
    view: Arc<Mutex<ViewProbe>>,
}

fn shell(engine: HeadlessEngine, store: JsonSessionStore) -> Shell {
    let view = Arc::new(Mutex::new(ViewProbe::default()));
    let controller = SessionController::builder(PlayerConfig::default())
        .with_engine(Box::new(engine))
        .with_view(Box::new(RecordingView(Arc::clone(&view))))
        .with_chrome(Box::new(RecordingChrome(Arc::new(Mutex::new(ChromeProbe::default())))))
        .with_store(Box::new(store))
        .with_idle_clock(Box::new(SettableIdle(Arc::new(Mutex::new(Some(Duration::ZERO))))))
        .with_sleep_control(Box::new(CountingSleep(Arc::new(Mutex::new(SleepCounts::default())))))
        .build()
        .expect("shell has every required collaborator");
    Shell { controller, view }
}

#[test]
fn test_playback_advances_through_siblings_and_resumes() -> Result<()> {
    let fixture = TestFixture::new(&["a.mp4", "b.mp4", "notes.txt"])?;
    let store_path = fixture.path().join("state").join("lastplay.json");

    let (engine, rx) = HeadlessEngine::new(&engine_config());
    let clock = engine.clock();
    let drain = || rx.try_iter().collect::<Vec<_>>();
    let mut first = shell(engine, JsonSessionStore::new(&store_path));

    first.controller.drop_files(vec![fixture.media[0].clone()]);
    assert_eq!(first.view.lock().title(), Some("a"));

    pump(&mut first.controller, &clock, &drain, Duration::from_secs(1));
    assert_eq!(first.view.lock().label.as_deref(), Some("00:00:01 / 00:00:10"));
    assert_eq!(first.view.lock().position, 0.1);

    // Running past the end moves on to the next sibling, never the .txt
    pump(&mut first.controller, &clock, &drain, Duration::from_secs(10));
    assert_eq!(first.view.lock().title(), Some("b"));

    pump(&mut first.controller, &clock, &drain, Duration::from_secs(1));
    first.controller.shutdown();

    let saved = JsonSessionStore::new(&store_path).load().expect("session saved");
    assert_eq!(saved.file_path, fixture.media[1]);
    assert_eq!(saved.position, 0.1);

    // A fresh shell picks the session up where it was left
    let (engine, rx) = HeadlessEngine::new(&engine_config());
    let clock = engine.clock();
    let drain = || rx.try_iter().collect::<Vec<_>>();
    let mut second = shell(engine, JsonSessionStore::new(&store_path));

    second.controller.play_or_resume();
    assert_eq!(second.view.lock().title(), Some("b"));
    assert!(second.controller.state().is_playing);

    pump(&mut second.controller, &clock, &drain, Duration::ZERO);
    assert_eq!(second.view.lock().label.as_deref(), Some("00:00:01 / 00:00:10"));
    Ok(())
}

#[test]
fn test_missing_media_is_not_opened() -> Result<()> {
    let fixture = TestFixture::new(&[])?;
    let (engine, _rx) = HeadlessEngine::new(&engine_config());
    let mut app = shell(engine, JsonSessionStore::new(fixture.path().join("lastplay.json")));

    app.controller.drop_files(vec![fixture.path().join("missing.mp4")]);

    assert!(!app.controller.state().has_media());
    assert!(app.view.lock().titles.is_empty());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_clock_drives_engine_on_runtime() -> Result<()> {
    let fixture = TestFixture::new(&["a.mp4"])?;
    let (mut engine, rx) = HeadlessEngine::new(&engine_config());
    let task = engine
        .clock()
        .spawn(&tokio::runtime::Handle::current(), Duration::from_millis(250));

    engine.load_list(&fixture.media)?;
    engine.play();
    tokio::time::sleep(Duration::from_secs(2)).await;
    task.abort();

    let events: Vec<_> = rx.try_iter().collect();
    assert_eq!(
        events.first(),
        Some(&EngineEvent::MediaParsed {
            media: fixture.media[0].clone()
        })
    );
    assert!(events
        .iter()
        .any(|e| matches!(e, EngineEvent::TimeChanged { elapsed } if *elapsed >= Duration::from_secs(1))));
    assert!(engine.position() > 0.0);
    Ok(())
}
