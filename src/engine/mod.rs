//! Playback engine module for EZPlayer
//!
//! The shell never decodes or renders anything itself. This module defines
//! the narrow contract it consumes from an embedded playback engine, the
//! events such an engine pushes back, and the two media-preparation
//! collaborators used when a file is opened (playlist assembly and
//! subtitle preparation).

mod headless;
mod playlist;

pub use headless::{EngineClock, HeadlessEngine};
pub use playlist::{SidecarSubtitles, SiblingPlaylist};

use crate::utils::error::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Playback engine trait consumed by the session controller
///
/// Transport commands are infallible: the controller guards every call
/// (media loaded, playlist bounds) before issuing it, so calling one in an
/// invalid state is a programming error rather than a runtime condition.
pub trait PlaybackEngine {
    /// Replace the current playlist and make its first entry current
    ///
    /// # Arguments
    ///
    /// * `paths` - Ordered playlist; the first entry is the anchor
    ///
    /// # Returns
    ///
    /// Returns an error if the anchor cannot be loaded
    fn load_list(&mut self, paths: &[PathBuf]) -> Result<()>;

    /// Start or resume playback of the current media
    fn play(&mut self);

    /// Pause playback
    fn pause(&mut self);

    /// Stop playback and rewind
    fn stop(&mut self);

    /// Advance to the next playlist entry
    fn next(&mut self);

    /// Go back to the previous playlist entry
    fn previous(&mut self);

    /// Seek to a position
    ///
    /// # Arguments
    ///
    /// * `fraction` - Target position in [0, 1] of the media duration
    fn seek(&mut self, fraction: f32);

    /// Current position as a fraction of the duration
    fn position(&self) -> f32;

    /// Current volume (0 - 100)
    fn volume(&self) -> u8;

    /// Set volume (0 - 100)
    fn set_volume(&mut self, volume: u8);

    /// Whether the engine is actually playing right now
    fn is_playing(&self) -> bool;

    /// Path of the current media, if any
    fn current_media(&self) -> Option<PathBuf>;

    /// Index of the current media within the playlist
    fn playlist_index(&self) -> Option<usize>;

    /// Number of entries in the playlist
    fn playlist_len(&self) -> usize;

    /// Duration of the current media; zero until it has been parsed
    fn duration(&self) -> Duration;
}

/// Events pushed by the engine
///
/// Engines may raise these from any thread. They must be marshalled onto
/// the UI thread before they reach the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Playback position moved
    PositionChanged { fraction: f32 },

    /// Elapsed playback time moved
    TimeChanged { elapsed: Duration },

    /// Metadata (duration) of the given media is available
    MediaParsed { media: PathBuf },

    /// The engine moved to another playlist entry on its own
    MediaChanged { media: PathBuf },
}

/// Playlist assembly collaborator
pub trait PlaylistSource {
    /// Build the ordered playlist seeded by an anchor file
    ///
    /// The anchor must be the first entry. The result is deterministic for
    /// given directory contents.
    fn build_playlist(&self, anchor: &Path) -> Vec<PathBuf>;
}

/// Subtitle preparation collaborator
pub trait SubtitlePreparer {
    /// Prepare subtitles for the anchor file; best effort, never fails
    fn prepare(&self, anchor: &Path);
}

/// Display name for a media path: its file name without extension
pub fn media_title(path: &Path) -> Option<String> {
    path.file_stem().map(|stem| stem.to_string_lossy().into_owned())
}
