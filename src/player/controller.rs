//! Playback session controller for EZPlayer
//!
//! The controller is the one place where user intents, engine callbacks
//! and timer deadlines meet. It owns the UI-bound `PlaybackState` and the
//! small state machines around it, and fans every change out to the
//! engine, the console view, the window chrome and the sleep barricade.
//!
//! Everything runs on the UI thread. Engine events must be marshalled onto
//! that thread before they are handed to `handle_engine_event`.

use crate::engine::{
    media_title, EngineEvent, PlaybackEngine, PlaylistSource, SiblingPlaylist, SidecarSubtitles,
    SubtitlePreparer,
};
use crate::player::click::{ClickDisambiguator, ClickIntent};
use crate::player::idle::{ConsoleVisibility, CursorState, IdleMonitor, Visibility};
use crate::player::session::{SessionRecord, SessionStore};
use crate::player::state::{Lifecycle, PlaybackState};
use crate::player::sync::{fraction_at, PositionSynchronizer, PositionUpdate, Reconciled};
use crate::player::{ConsoleView, FilePicker, ShellCommand};
use crate::system::{
    platform_idle_clock, platform_sleep_control, IdleClock, InputActivityClock, SleepBarricade,
    SleepControl,
};
use crate::utils::clamp_fraction;
use crate::utils::config::PlayerConfig;
use crate::utils::error::{PlayerError, Result};
use crate::window::{display_mode, set_display_mode, DisplayMode, WindowChrome};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Picker used when none is configured
struct NoPicker;

impl FilePicker for NoPicker {
    fn pick_media(&mut self) -> Option<PathBuf> {
        debug!("No file picker configured");
        None
    }
}

/// Builder for `SessionController`
///
/// The engine, the console view and the window chrome are required. The
/// other collaborators default to the sibling-file playlist, sidecar
/// subtitles, no session store, no picker and the platform idle/sleep
/// primitives.
pub struct SessionControllerBuilder {
    config: PlayerConfig,
    engine: Option<Box<dyn PlaybackEngine>>,
    view: Option<Box<dyn ConsoleView>>,
    chrome: Option<Box<dyn WindowChrome>>,
    playlist: Box<dyn PlaylistSource>,
    subtitles: Box<dyn SubtitlePreparer>,
    store: Option<Box<dyn SessionStore>>,
    picker: Box<dyn FilePicker>,
    idle_clock: Option<Box<dyn IdleClock>>,
    sleep_control: Option<Box<dyn SleepControl>>,
}

impl SessionControllerBuilder {
    pub fn new(config: PlayerConfig) -> Self {
        Self {
            config,
            engine: None,
            view: None,
            chrome: None,
            playlist: Box::new(SiblingPlaylist),
            subtitles: Box::new(SidecarSubtitles),
            store: None,
            picker: Box::new(NoPicker),
            idle_clock: None,
            sleep_control: None,
        }
    }

    pub fn with_engine(mut self, engine: Box<dyn PlaybackEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn with_view(mut self, view: Box<dyn ConsoleView>) -> Self {
        self.view = Some(view);
        self
    }

    pub fn with_chrome(mut self, chrome: Box<dyn WindowChrome>) -> Self {
        self.chrome = Some(chrome);
        self
    }

    pub fn with_playlist(mut self, playlist: Box<dyn PlaylistSource>) -> Self {
        self.playlist = playlist;
        self
    }

    pub fn with_subtitles(mut self, subtitles: Box<dyn SubtitlePreparer>) -> Self {
        self.subtitles = subtitles;
        self
    }

    pub fn with_store(mut self, store: Box<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_picker(mut self, picker: Box<dyn FilePicker>) -> Self {
        self.picker = picker;
        self
    }

    pub fn with_idle_clock(mut self, idle_clock: Box<dyn IdleClock>) -> Self {
        self.idle_clock = Some(idle_clock);
        self
    }

    pub fn with_sleep_control(mut self, sleep_control: Box<dyn SleepControl>) -> Self {
        self.sleep_control = Some(sleep_control);
        self
    }

    /// Assemble the controller
    ///
    /// # Returns
    ///
    /// Returns an error if a required collaborator is missing
    pub fn build(self) -> Result<SessionController> {
        let engine = self
            .engine
            .ok_or_else(|| PlayerError::InvalidInput("Session controller needs an engine".to_string()))?;
        let view = self
            .view
            .ok_or_else(|| PlayerError::InvalidInput("Session controller needs a console view".to_string()))?;
        let chrome = self
            .chrome
            .ok_or_else(|| PlayerError::InvalidInput("Session controller needs window chrome".to_string()))?;

        let idle_clock = self
            .idle_clock
            .unwrap_or_else(|| platform_idle_clock(InputActivityClock::new()));
        let sleep_control = self.sleep_control.unwrap_or_else(platform_sleep_control);

        let now = Instant::now();
        let mut controller = SessionController {
            clicks: ClickDisambiguator::new(self.config.click_settle()),
            idle: IdleMonitor::new(self.config.idle_cadence(), self.config.idle_threshold(), now),
            barricade: SleepBarricade::new(sleep_control),
            state: PlaybackState::default(),
            sync: PositionSynchronizer::new(),
            parsed_for: None,
            shut_down: false,
            engine,
            view,
            chrome,
            playlist: self.playlist,
            subtitles: self.subtitles,
            store: self.store,
            picker: self.picker,
            idle_clock,
            config: self.config,
        };

        controller.set_volume(controller.config.initial_volume);
        Ok(controller)
    }
}

/// Playback session controller
pub struct SessionController {
    // Collaborators
    engine: Box<dyn PlaybackEngine>,
    view: Box<dyn ConsoleView>,
    chrome: Box<dyn WindowChrome>,
    playlist: Box<dyn PlaylistSource>,
    subtitles: Box<dyn SubtitlePreparer>,
    store: Option<Box<dyn SessionStore>>,
    picker: Box<dyn FilePicker>,
    idle_clock: Box<dyn IdleClock>,

    // Owned state machines
    state: PlaybackState,
    sync: PositionSynchronizer,
    clicks: ClickDisambiguator,
    idle: IdleMonitor,
    barricade: SleepBarricade,

    /// Media whose "parsed" notification is attached
    parsed_for: Option<PathBuf>,

    shut_down: bool,
    config: PlayerConfig,
}

impl SessionController {
    pub fn builder(config: PlayerConfig) -> SessionControllerBuilder {
        SessionControllerBuilder::new(config)
    }

    /// Route a user intent to its entry point
    pub fn dispatch(&mut self, command: ShellCommand) {
        debug!("Command: {:?}", command);
        match command {
            ShellCommand::PlayOrResume => self.play_or_resume(),
            ShellCommand::TogglePause => self.toggle_pause(),
            ShellCommand::Stop => self.stop(),
            ShellCommand::Next => self.next(),
            ShellCommand::Previous => self.previous(),
            ShellCommand::Open => self.open(),
            ShellCommand::DropFiles(paths) => self.drop_files(paths),
            ShellCommand::Rewind => self.nudge(-self.config.nudge_fraction),
            ShellCommand::Forward => self.nudge(self.config.nudge_fraction),
            ShellCommand::VolumeUp => {
                self.set_volume(self.state.volume + self.config.volume_step);
            }
            ShellCommand::VolumeDown => {
                self.set_volume(self.state.volume - self.config.volume_step);
            }
            ShellCommand::SetVolume(volume) => {
                self.set_volume(volume);
            }
            ShellCommand::ToggleFullScreen => self.toggle_full_screen(),
            ShellCommand::ExitFullScreen => self.exit_full_screen(),
        }
    }

    /// Ask the user for a file and play it
    ///
    /// Playback is paused while the picker is up; on cancel it resumes if
    /// it was playing before.
    pub fn open(&mut self) {
        let was_playing = self.state.is_playing;
        if was_playing {
            self.engine.pause();
            self.set_playing(false);
        }

        match self.picker.pick_media() {
            Some(path) => {
                let playlist = self.playlist.build_playlist(&path);
                self.play_list(&path, playlist);
            }
            None => {
                debug!("Open cancelled");
                if was_playing {
                    self.engine.play();
                    self.set_playing(true);
                }
            }
        }
    }

    /// Play files dropped onto the window
    ///
    /// A single file seeds a playlist from its directory. Several files are
    /// played as dropped, sorted, the first one being the anchor.
    pub fn drop_files(&mut self, mut paths: Vec<PathBuf>) {
        match paths.len() {
            0 => {}
            1 => {
                let anchor = paths.remove(0);
                let playlist = self.playlist.build_playlist(&anchor);
                self.play_list(&anchor, playlist);
            }
            _ => {
                paths.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
                let anchor = paths[0].clone();
                self.play_list(&anchor, paths);
            }
        }
    }

    /// Play button: toggle play/pause, or resume the last session when
    /// nothing is loaded, or fall back to the picker
    pub fn play_or_resume(&mut self) {
        if self.state.has_media() {
            self.toggle_pause();
            return;
        }
        if self.config.resume_last_session && self.try_resume() {
            return;
        }
        self.open();
    }

    pub fn toggle_pause(&mut self) {
        if !self.state.has_media() {
            return;
        }
        if self.engine.is_playing() {
            self.engine.pause();
        } else {
            self.engine.play();
        }
        self.set_playing(!self.state.is_playing);
    }

    pub fn stop(&mut self) {
        self.set_playing(false);
        if !self.state.has_media() {
            return;
        }
        info!("Stopping playback");
        self.engine.stop();
        self.state.mark_stopped();
        self.write_slider(0.0);
    }

    pub fn next(&mut self) {
        if !self.state.has_media() {
            self.open();
            return;
        }
        let len = self.engine.playlist_len();
        match self.engine.playlist_index() {
            Some(index) if index + 1 < len => {
                self.engine.next();
                self.follow_engine_media();
            }
            _ => debug!("Already at the last playlist entry"),
        }
    }

    pub fn previous(&mut self) {
        if !self.state.has_media() {
            self.open();
            return;
        }
        match self.engine.playlist_index() {
            Some(index) if index > 0 => {
                self.engine.previous();
                self.follow_engine_media();
            }
            _ => debug!("Already at the first playlist entry"),
        }
    }

    /// The single volume setter
    ///
    /// # Returns
    ///
    /// Returns the applied volume, clamped to [0, 100]
    pub fn set_volume(&mut self, volume: f64) -> f64 {
        let applied = self.state.set_volume(volume);
        self.engine.set_volume(applied.round() as u8);
        self.view.set_volume(applied);
        applied
    }

    /// Move the playhead by `delta`, clamped to [0, 1]
    pub fn nudge(&mut self, delta: f32) {
        if !self.state.has_media() {
            return;
        }
        let target = clamp_fraction(self.engine.position() + delta);
        self.apply_position(PositionUpdate::user(target));
        self.write_slider(target);
    }

    pub fn toggle_full_screen(&mut self) {
        let mode = display_mode(&*self.chrome).toggled();
        set_display_mode(&mut *self.chrome, mode);
    }

    pub fn exit_full_screen(&mut self) {
        if display_mode(&*self.chrome) == DisplayMode::FullScreen {
            set_display_mode(&mut *self.chrome, DisplayMode::Windowed);
        }
    }

    /// Primary button pressed on the video surface
    pub fn on_click(&mut self, count: u32, now: Instant) {
        if let Some(intent) = self.clicks.on_click(count, now) {
            self.apply_click(intent);
        }
    }

    /// Raw pointer movement over the window
    pub fn on_pointer_moved(&mut self) {
        let inside = self.view.pointer_in_console();
        if let Some(visibility) = self.idle.on_pointer_moved(inside) {
            self.apply_visibility(visibility);
        }
    }

    /// Mouse wheel over the window; positive notches raise the volume
    pub fn on_wheel(&mut self, notches: f32) {
        let delta = notches as f64 * self.config.wheel_step;
        self.set_volume(self.state.volume + delta);
    }

    /// Value-changed notification from the position slider
    pub fn on_slider_value_changed(&mut self, fraction: f32) {
        if let Some(update) = self.sync.classify(fraction) {
            self.apply_position(update);
        }
    }

    /// Pointer released on the position slider track
    pub fn on_slider_released(&mut self, x: f64, track_width: f64) {
        let fraction = fraction_at(x, track_width);
        self.apply_position(PositionUpdate::user(fraction));
        self.write_slider(fraction);
    }

    /// Engine callback, already marshalled onto the UI thread
    pub fn handle_engine_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::PositionChanged { fraction } => {
                let update = PositionUpdate::engine(fraction);
                self.state.set_position(update.fraction);
                self.write_slider(update.fraction);
                self.apply_position(update);
            }
            EngineEvent::TimeChanged { elapsed } => {
                if let Some(label) = PositionSynchronizer::time_label(elapsed, self.state.media_duration()) {
                    self.view.set_time_label(&label);
                }
                let engine_playing = self.engine.is_playing();
                if engine_playing != self.state.is_playing {
                    debug!("Engine reports playing={}, following it", engine_playing);
                    self.set_playing(engine_playing);
                }
            }
            EngineEvent::MediaParsed { media } => {
                if self.parsed_for.as_deref() != Some(media.as_path()) {
                    debug!("Ignoring parse notification for detached media {:?}", media);
                    return;
                }
                let duration = self.engine.duration();
                self.state.duration = duration;
                self.view.set_time_label(&PositionSynchronizer::duration_label(duration));

                let volume = self.engine.volume() as f64;
                let applied = self.state.set_volume(volume);
                self.view.set_volume(applied);
            }
            EngineEvent::MediaChanged { media } => {
                info!("Engine moved on to {:?}", media);
                self.follow_engine_media();
            }
        }
    }

    /// Run whatever timer deadlines have passed
    pub fn poll_timers(&mut self, now: Instant) {
        if let Some(intent) = self.clicks.poll(now) {
            self.apply_click(intent);
        }

        if self.idle.is_due(now) {
            let idle = match self.idle_clock.idle_for() {
                Ok(idle) => Some(idle),
                Err(e) => {
                    warn!("Idle query failed: {}", e);
                    None
                }
            };
            let pointer_inside = self.view.pointer_in_console();
            if let Some(visibility) = self.idle.tick(now, idle, pointer_inside, self.state.is_playing) {
                self.apply_visibility(visibility);
            }
        }

        // Retries a refused assertion; a no-op otherwise.
        self.barricade.sync(self.state.is_playing);
    }

    /// Earliest instant `poll_timers` needs to run again
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.clicks.next_deadline(), self.idle.next_due()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Persist the session and release process-wide resources
    ///
    /// Safe to call more than once; only the first call does anything.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        self.idle.cancel();

        if let Some(media) = self.engine.current_media().or_else(|| self.state.current_media.clone()) {
            let record = SessionRecord::new(&media, self.engine.position(), self.state.volume);
            if let Some(store) = self.store.as_mut() {
                if let Err(e) = store.save(&record) {
                    warn!("Could not save session: {}", e);
                }
            }
        }

        self.barricade.release();
        info!("Session shut down");
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.state.lifecycle()
    }

    pub fn visibility(&self) -> Visibility {
        self.idle.visibility()
    }

    pub fn display_mode(&self) -> DisplayMode {
        display_mode(&*self.chrome)
    }

    pub fn is_sleep_prevented(&self) -> bool {
        self.barricade.is_held()
    }

    /// Resume the persisted session; false if there is none or it fails
    fn try_resume(&mut self) -> bool {
        let Some(record) = self.store.as_ref().and_then(|store| store.load()) else {
            return false;
        };
        info!("Resuming {:?} at {:.3}", record.file_path, record.position);

        self.set_volume(record.volume);
        let playlist = self.playlist.build_playlist(&record.file_path);
        if !self.play_list(&record.file_path, playlist) {
            return false;
        }

        let position = clamp_fraction(record.position);
        self.apply_position(PositionUpdate::user(position));
        self.write_slider(position);
        true
    }

    /// Load a playlist anchored at `anchor` and start playing it
    fn play_list(&mut self, anchor: &Path, playlist: Vec<PathBuf>) -> bool {
        match self.load_list(anchor, playlist) {
            Ok(()) => {
                self.engine.play();
                self.set_playing(true);
                true
            }
            Err(e) => {
                error!("Could not open {:?}: {}", anchor, e);
                false
            }
        }
    }

    fn load_list(&mut self, anchor: &Path, mut playlist: Vec<PathBuf>) -> Result<()> {
        if self.state.has_media() {
            self.engine.stop();
            self.set_playing(false);
        }
        self.parsed_for = None;

        if playlist.first().map(PathBuf::as_path) != Some(anchor) {
            playlist.retain(|path| path != anchor);
            playlist.insert(0, anchor.to_path_buf());
        }

        self.subtitles.prepare(anchor);
        self.engine.load_list(&playlist)?;
        info!("Opened {:?} ({} entries)", anchor, playlist.len());

        self.state.load(anchor.to_path_buf());
        self.parsed_for = Some(anchor.to_path_buf());
        self.refresh_title();
        self.write_slider(0.0);
        Ok(())
    }

    /// Track the engine's current media after it changed entries
    fn follow_engine_media(&mut self) {
        if let Some(media) = self.engine.current_media() {
            self.state.load(media.clone());
            self.parsed_for = Some(media);
            self.refresh_title();
            self.write_slider(0.0);
        }
    }

    fn refresh_title(&mut self) {
        if let Some(title) = self.state.current_media.as_deref().and_then(media_title) {
            self.view.set_title(&title);
        }
    }

    /// Route a tagged position update through reconciliation
    fn apply_position(&mut self, update: PositionUpdate) {
        match self.sync.reconcile(update, self.state.media_duration()) {
            Reconciled::Seek(fraction) => {
                if !self.state.has_media() {
                    debug!("Ignoring seek with no media loaded");
                    return;
                }
                self.engine.seek(fraction);
                self.state.set_position(fraction);
            }
            Reconciled::ShowTime(label) => self.view.set_time_label(&label),
            Reconciled::Quiet => {}
        }
    }

    /// Programmatic slider write; its echo will be consumed
    fn write_slider(&mut self, fraction: f32) {
        self.sync.record_write(fraction);
        self.view.set_position(fraction);
    }

    fn apply_click(&mut self, intent: ClickIntent) {
        debug!("Click intent: {:?}", intent);
        match intent {
            ClickIntent::SingleClick => self.toggle_pause(),
            ClickIntent::DoubleClick => self.toggle_full_screen(),
        }
    }

    fn apply_visibility(&mut self, visibility: Visibility) {
        self.view
            .set_console_visible(visibility.console == ConsoleVisibility::Visible);
        self.view.set_cursor_visible(visibility.cursor == CursorState::Shown);
    }

    /// Fan an `is_playing` change out to everything bound to it
    fn set_playing(&mut self, playing: bool) {
        if !self.state.set_playing(playing) {
            return;
        }
        debug!("Playing: {}", playing);
        self.view.set_playing(playing);
        self.chrome.set_always_on_top(playing);
        self.barricade.sync(playing);
        if !playing {
            if let Some(visibility) = self.idle.on_playback_inactive() {
                self.apply_visibility(visibility);
            }
        }
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.barricade.release();
    }
}
