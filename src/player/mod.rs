//! Playback session module for EZPlayer
//!
//! This module holds the session controller that sits between the user,
//! the windowing system and the playback engine, together with the
//! smaller state machines it owns: position synchronization, click
//! disambiguation, idle monitoring and session persistence.

mod controller;
mod state;
pub mod click;
pub mod idle;
pub mod session;
pub mod sync;

pub use controller::{SessionController, SessionControllerBuilder};
pub use state::{Lifecycle, PlaybackState};
pub use click::{ClickDisambiguator, ClickIntent};
pub use idle::{Cadence, ConsoleVisibility, CursorState, IdleMonitor, Visibility};
pub use session::{JsonSessionStore, SessionRecord, SessionStore};
pub use sync::{Origin, PositionSynchronizer, PositionUpdate, Reconciled};
pub use crate::utils::config::PlayerConfig;

use std::path::PathBuf;

/// Display layer the controller writes UI-bound state to
///
/// Every method is a plain display write. Slider widgets that raise their
/// value-changed notification for programmatic writes should route it back
/// through `SessionController::on_slider_value_changed`; the echo is
/// recognised and consumed.
pub trait ConsoleView {
    /// Window title
    fn set_title(&mut self, title: &str);

    /// Time label next to the slider
    fn set_time_label(&mut self, label: &str);

    /// Position slider value in [0, 1]
    fn set_position(&mut self, fraction: f32);

    /// Volume slider value in [0, 100]
    fn set_volume(&mut self, volume: f64);

    /// Playing state; the console is dimmed while playing
    fn set_playing(&mut self, playing: bool);

    /// Console overlay visibility
    fn set_console_visible(&mut self, visible: bool);

    /// Cursor visibility over the window
    fn set_cursor_visible(&mut self, visible: bool);

    /// Whether the pointer is currently over the console region
    fn pointer_in_console(&self) -> bool;
}

/// File-open dialog
pub trait FilePicker {
    /// Ask the user for a media file; `None` if cancelled
    fn pick_media(&mut self) -> Option<PathBuf>;
}

/// User intents, whatever input produced them
///
/// Buttons, keyboard shortcuts and mouse gestures all map onto these so
/// they share one entry point each.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    /// Play button: resume the last session or toggle play/pause
    PlayOrResume,

    /// Pause button, space bar, single click
    TogglePause,

    /// Stop button
    Stop,

    /// Next playlist entry
    Next,

    /// Previous playlist entry
    Previous,

    /// Open a file through the picker
    Open,

    /// Files dropped onto the window
    DropFiles(Vec<PathBuf>),

    /// Nudge the position back
    Rewind,

    /// Nudge the position forward
    Forward,

    /// Volume up by one step
    VolumeUp,

    /// Volume down by one step
    VolumeDown,

    /// Volume slider moved
    SetVolume(f64),

    /// Toggle full-screen mode
    ToggleFullScreen,

    /// Leave full-screen mode if in it
    ExitFullScreen,
}
