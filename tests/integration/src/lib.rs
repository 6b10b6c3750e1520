//! Integration test utilities for EZPlayer
//!
//! This module provides common utilities for integration testing:
//! - Media file fixtures in a temporary directory
//! - Recording implementations of every controller collaborator
//! - A rig that wires them into a session controller

use anyhow::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test fixture with empty media files on disk
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub media: Vec<PathBuf>,
}

impl TestFixture {
    /// Create the named files in a fresh temporary directory
    pub fn new(names: &[&str]) -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let mut media = Vec::with_capacity(names.len());
        for name in names {
            let path = temp_dir.path().join(name);
            std::fs::write(&path, b"")?;
            media.push(path);
        }
        Ok(Self { temp_dir, media })
    }

    /// Get the path to the temporary directory
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }
}

/// Recording collaborators
///
/// Each mock writes into a probe shared with the test, so the test keeps
/// observing after the mock has been moved into the controller.
pub mod mocks {
    use ezplayer::engine::{PlaybackEngine, PlaylistSource, SubtitlePreparer};
    use ezplayer::player::{ConsoleView, FilePicker, SessionRecord, SessionStore};
    use ezplayer::system::{IdleClock, SleepControl};
    use ezplayer::utils::error::{PlayerError, Result};
    use ezplayer::window::{ChromeStyle, WindowChrome};
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use std::time::Duration;

    /// Engine call, in order of issue
    #[derive(Debug, Clone, PartialEq)]
    pub enum EngineCall {
        Load(Vec<PathBuf>),
        Play,
        Pause,
        Stop,
        Next,
        Previous,
        Seek(f32),
        SetVolume(u8),
    }

    #[derive(Debug)]
    pub struct EngineProbe {
        pub calls: Vec<EngineCall>,
        pub playlist: Vec<PathBuf>,
        pub index: Option<usize>,
        pub playing: bool,
        pub position: f32,
        pub volume: u8,
        pub duration: Duration,
        /// Paths the engine refuses to load
        pub unloadable: Vec<PathBuf>,
    }

    impl Default for EngineProbe {
        fn default() -> Self {
            Self {
                calls: Vec::new(),
                playlist: Vec::new(),
                index: None,
                playing: false,
                position: 0.0,
                volume: 100,
                duration: Duration::from_secs(100),
                unloadable: Vec::new(),
            }
        }
    }

    impl EngineProbe {
        pub fn seeks(&self) -> Vec<f32> {
            self.calls
                .iter()
                .filter_map(|call| match call {
                    EngineCall::Seek(f) => Some(*f),
                    _ => None,
                })
                .collect()
        }

        pub fn count(&self, wanted: &EngineCall) -> usize {
            self.calls.iter().filter(|call| *call == wanted).count()
        }
    }

    pub struct RecordingEngine(pub Arc<Mutex<EngineProbe>>);

    impl PlaybackEngine for RecordingEngine {
        fn load_list(&mut self, paths: &[PathBuf]) -> Result<()> {
            let mut probe = self.0.lock();
            probe.calls.push(EngineCall::Load(paths.to_vec()));
            if paths.first().is_some_and(|anchor| probe.unloadable.contains(anchor)) {
                return Err(PlayerError::engine_error("cannot load"));
            }
            probe.playlist = paths.to_vec();
            probe.index = Some(0);
            probe.playing = false;
            probe.position = 0.0;
            Ok(())
        }

        fn play(&mut self) {
            let mut probe = self.0.lock();
            probe.calls.push(EngineCall::Play);
            probe.playing = true;
        }

        fn pause(&mut self) {
            let mut probe = self.0.lock();
            probe.calls.push(EngineCall::Pause);
            probe.playing = false;
        }

        fn stop(&mut self) {
            let mut probe = self.0.lock();
            probe.calls.push(EngineCall::Stop);
            probe.playing = false;
            probe.position = 0.0;
        }

        fn next(&mut self) {
            let mut probe = self.0.lock();
            probe.calls.push(EngineCall::Next);
            probe.index = probe.index.map(|i| i + 1);
        }

        fn previous(&mut self) {
            let mut probe = self.0.lock();
            probe.calls.push(EngineCall::Previous);
            probe.index = probe.index.map(|i| i - 1);
        }

        fn seek(&mut self, fraction: f32) {
            let mut probe = self.0.lock();
            probe.calls.push(EngineCall::Seek(fraction));
            probe.position = fraction;
        }

        fn position(&self) -> f32 {
            self.0.lock().position
        }

        fn volume(&self) -> u8 {
            self.0.lock().volume
        }

        fn set_volume(&mut self, volume: u8) {
            let mut probe = self.0.lock();
            probe.calls.push(EngineCall::SetVolume(volume));
            probe.volume = volume;
        }

        fn is_playing(&self) -> bool {
            self.0.lock().playing
        }

        fn current_media(&self) -> Option<PathBuf> {
            let probe = self.0.lock();
            probe.index.and_then(|i| probe.playlist.get(i).cloned())
        }

        fn playlist_index(&self) -> Option<usize> {
            self.0.lock().index
        }

        fn playlist_len(&self) -> usize {
            self.0.lock().playlist.len()
        }

        fn duration(&self) -> Duration {
            self.0.lock().duration
        }
    }

    #[derive(Debug, Default)]
    pub struct ViewProbe {
        pub titles: Vec<String>,
        pub label: Option<String>,
        pub position: f32,
        pub volume: f64,
        pub playing: bool,
        pub console_visible: Option<bool>,
        pub cursor_visible: Option<bool>,
        pub pointer_inside: bool,
    }

    impl ViewProbe {
        pub fn title(&self) -> Option<&str> {
            self.titles.last().map(String::as_str)
        }
    }

    pub struct RecordingView(pub Arc<Mutex<ViewProbe>>);

    impl ConsoleView for RecordingView {
        fn set_title(&mut self, title: &str) {
            self.0.lock().titles.push(title.to_string());
        }

        fn set_time_label(&mut self, label: &str) {
            self.0.lock().label = Some(label.to_string());
        }

        fn set_position(&mut self, fraction: f32) {
            self.0.lock().position = fraction;
        }

        fn set_volume(&mut self, volume: f64) {
            self.0.lock().volume = volume;
        }

        fn set_playing(&mut self, playing: bool) {
            self.0.lock().playing = playing;
        }

        fn set_console_visible(&mut self, visible: bool) {
            self.0.lock().console_visible = Some(visible);
        }

        fn set_cursor_visible(&mut self, visible: bool) {
            self.0.lock().cursor_visible = Some(visible);
        }

        fn pointer_in_console(&self) -> bool {
            self.0.lock().pointer_inside
        }
    }

    #[derive(Debug)]
    pub struct ChromeProbe {
        pub style: ChromeStyle,
        pub maximized: bool,
        pub on_top: bool,
    }

    impl Default for ChromeProbe {
        fn default() -> Self {
            Self {
                style: ChromeStyle::Bordered,
                maximized: false,
                on_top: false,
            }
        }
    }

    pub struct RecordingChrome(pub Arc<Mutex<ChromeProbe>>);

    impl WindowChrome for RecordingChrome {
        fn style(&self) -> ChromeStyle {
            self.0.lock().style
        }

        fn set_style(&mut self, style: ChromeStyle) {
            self.0.lock().style = style;
        }

        fn is_maximized(&self) -> bool {
            self.0.lock().maximized
        }

        fn set_maximized(&mut self, maximized: bool) {
            self.0.lock().maximized = maximized;
        }

        fn set_always_on_top(&mut self, on_top: bool) {
            self.0.lock().on_top = on_top;
        }
    }

    /// Picker answering from a script; an exhausted script cancels
    pub struct ScriptedPicker {
        pub answers: Arc<Mutex<VecDeque<Option<PathBuf>>>>,
        pub shown: Arc<Mutex<u32>>,
    }

    impl FilePicker for ScriptedPicker {
        fn pick_media(&mut self) -> Option<PathBuf> {
            *self.shown.lock() += 1;
            self.answers.lock().pop_front().flatten()
        }
    }

    /// Idle clock answering a settable value; `None` fails the query
    pub struct SettableIdle(pub Arc<Mutex<Option<Duration>>>);

    impl IdleClock for SettableIdle {
        fn idle_for(&self) -> Result<Duration> {
            self.0
                .lock()
                .ok_or_else(|| PlayerError::System("idle query refused".to_string()))
        }
    }

    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct SleepCounts {
        pub prevented: u32,
        pub allowed: u32,
    }

    pub struct CountingSleep(pub Arc<Mutex<SleepCounts>>);

    impl SleepControl for CountingSleep {
        fn prevent_sleep(&mut self) -> Result<()> {
            self.0.lock().prevented += 1;
            Ok(())
        }

        fn allow_sleep(&mut self) -> Result<()> {
            self.0.lock().allowed += 1;
            Ok(())
        }
    }

    /// In-memory session store
    pub struct MemoryStore(pub Arc<Mutex<Option<SessionRecord>>>);

    impl SessionStore for MemoryStore {
        fn save(&mut self, record: &SessionRecord) -> Result<()> {
            *self.0.lock() = Some(record.clone());
            Ok(())
        }

        fn load(&self) -> Option<SessionRecord> {
            self.0.lock().clone()
        }
    }

    /// Playlist of the anchor followed by fixed siblings
    pub struct FixedPlaylist(pub Vec<PathBuf>);

    impl PlaylistSource for FixedPlaylist {
        fn build_playlist(&self, anchor: &Path) -> Vec<PathBuf> {
            let mut list = vec![anchor.to_path_buf()];
            list.extend(self.0.iter().filter(|p| p.as_path() != anchor).cloned());
            list
        }
    }

    /// Subtitle preparer recording its anchors
    pub struct RecordingSubtitles(pub Arc<Mutex<Vec<PathBuf>>>);

    impl SubtitlePreparer for RecordingSubtitles {
        fn prepare(&self, anchor: &Path) {
            self.0.lock().push(anchor.to_path_buf());
        }
    }
}

/// Controller wired to recording collaborators
pub mod rig {
    use crate::mocks::*;
    use ezplayer::player::{PlayerConfig, SessionController, SessionRecord};
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::Duration;

    pub struct Rig {
        pub controller: SessionController,
        pub engine: Arc<Mutex<EngineProbe>>,
        pub view: Arc<Mutex<ViewProbe>>,
        pub chrome: Arc<Mutex<ChromeProbe>>,
        pub picks: Arc<Mutex<VecDeque<Option<PathBuf>>>>,
        pub pickers_shown: Arc<Mutex<u32>>,
        pub idle: Arc<Mutex<Option<Duration>>>,
        pub sleep: Arc<Mutex<SleepCounts>>,
        pub store: Arc<Mutex<Option<SessionRecord>>>,
        pub subtitles: Arc<Mutex<Vec<PathBuf>>>,
    }

    impl Rig {
        pub fn new() -> Self {
            Self::build(PlayerConfig::default(), Vec::new(), None)
        }

        /// Rig whose single-file playlists continue with `siblings`
        pub fn with_siblings(siblings: Vec<PathBuf>) -> Self {
            Self::build(PlayerConfig::default(), siblings, None)
        }

        /// Rig with a previously saved session
        pub fn with_saved(record: SessionRecord) -> Self {
            Self::build(PlayerConfig::default(), Vec::new(), Some(record))
        }

        pub fn build(config: PlayerConfig, siblings: Vec<PathBuf>, saved: Option<SessionRecord>) -> Self {
            let engine = Arc::new(Mutex::new(EngineProbe::default()));
            let view = Arc::new(Mutex::new(ViewProbe::default()));
            let chrome = Arc::new(Mutex::new(ChromeProbe::default()));
            let picks = Arc::new(Mutex::new(VecDeque::new()));
            let pickers_shown = Arc::new(Mutex::new(0));
            let idle = Arc::new(Mutex::new(Some(Duration::ZERO)));
            let sleep = Arc::new(Mutex::new(SleepCounts::default()));
            let store = Arc::new(Mutex::new(saved));
            let subtitles = Arc::new(Mutex::new(Vec::new()));

            let controller = SessionController::builder(config)
                .with_engine(Box::new(RecordingEngine(Arc::clone(&engine))))
                .with_view(Box::new(RecordingView(Arc::clone(&view))))
                .with_chrome(Box::new(RecordingChrome(Arc::clone(&chrome))))
                .with_playlist(Box::new(FixedPlaylist(siblings)))
                .with_subtitles(Box::new(RecordingSubtitles(Arc::clone(&subtitles))))
                .with_store(Box::new(MemoryStore(Arc::clone(&store))))
                .with_picker(Box::new(ScriptedPicker {
                    answers: Arc::clone(&picks),
                    shown: Arc::clone(&pickers_shown),
                }))
                .with_idle_clock(Box::new(SettableIdle(Arc::clone(&idle))))
                .with_sleep_control(Box::new(CountingSleep(Arc::clone(&sleep))))
                .build()
                .expect("rig has every required collaborator");

            Self {
                controller,
                engine,
                view,
                chrome,
                picks,
                pickers_shown,
                idle,
                sleep,
                store,
                subtitles,
            }
        }

        /// Queue the picker's next answer
        pub fn pick(&self, answer: Option<PathBuf>) {
            self.picks.lock().push_back(answer);
        }

        pub fn sleep_counts(&self) -> SleepCounts {
            *self.sleep.lock()
        }
    }

    impl Default for Rig {
        fn default() -> Self {
            Self::new()
        }
    }
}
