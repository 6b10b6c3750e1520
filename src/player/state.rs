//! Player state for EZPlayer
//!
//! The UI-bound playback state lives in one owned struct. Setters clamp
//! and report whether anything changed; the controller fans changes out to
//! the engine and the display layer.

use crate::utils::{clamp, clamp_fraction};
use std::path::PathBuf;
use std::time::Duration;

/// Lifecycle of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// No media loaded
    NoMedia,

    /// Media loaded and playing
    Playing,

    /// Media loaded, paused
    Paused,

    /// Media loaded, stopped and rewound
    Stopped,
}

/// UI-bound playback state
#[derive(Debug, Clone)]
pub struct PlaybackState {
    /// Whether playback is active as far as the UI is concerned
    pub is_playing: bool,

    /// Volume (0 - 100)
    pub volume: f64,

    /// Slider position
    pub position_fraction: f32,

    /// Current media, if any
    pub current_media: Option<PathBuf>,

    /// Duration of the current media (zero until parsed)
    pub duration: Duration,

    /// Set by stop(), cleared when playback starts again
    stopped: bool,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            is_playing: false,
            volume: 100.0,
            position_fraction: 0.0,
            current_media: None,
            duration: Duration::ZERO,
            stopped: false,
        }
    }
}

impl PlaybackState {
    pub fn lifecycle(&self) -> Lifecycle {
        match (&self.current_media, self.is_playing, self.stopped) {
            (None, _, _) => Lifecycle::NoMedia,
            (Some(_), true, _) => Lifecycle::Playing,
            (Some(_), false, true) => Lifecycle::Stopped,
            (Some(_), false, false) => Lifecycle::Paused,
        }
    }

    pub fn has_media(&self) -> bool {
        self.current_media.is_some()
    }

    /// Duration of the current media, `None` when nothing is loaded
    pub fn media_duration(&self) -> Option<Duration> {
        self.current_media.as_ref().map(|_| self.duration)
    }

    /// Update the playing flag; returns true on change
    pub fn set_playing(&mut self, playing: bool) -> bool {
        if playing {
            self.stopped = false;
        }
        let changed = self.is_playing != playing;
        self.is_playing = playing;
        changed
    }

    /// Mark the session stopped
    pub fn mark_stopped(&mut self) {
        self.stopped = true;
        self.position_fraction = 0.0;
    }

    /// Set the volume, clamped to [0, 100]; returns the applied value
    pub fn set_volume(&mut self, volume: f64) -> f64 {
        let volume = if volume.is_nan() { 0.0 } else { clamp(volume, 0.0, 100.0) };
        self.volume = volume;
        volume
    }

    /// Set the slider position, clamped to [0, 1]
    pub fn set_position(&mut self, fraction: f32) -> f32 {
        self.position_fraction = clamp_fraction(fraction);
        self.position_fraction
    }

    /// Switch to newly loaded media
    pub fn load(&mut self, media: PathBuf) {
        self.current_media = Some(media);
        self.duration = Duration::ZERO;
        self.position_fraction = 0.0;
        self.stopped = false;
    }
}
