//! Window management module for EZPlayer
//!
//! Full-screen mode is not a property of its own: it is the combination of
//! two window-chrome properties (a borderless style and the maximized
//! state). This module wraps them behind one `set_display_mode` call so
//! observers never see half a transition, and maps raw keyboard input onto
//! shell commands.

pub mod events;
pub mod winit_window;

pub use events::{shortcut_for, EventHandler, Key, KeyModifiers, ShellInput};
pub use winit_window::{RfdPicker, ShellApp, ShellEvent, WinitChrome, WinitConsole};

use log::debug;

/// Window decoration style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromeStyle {
    /// Normal title bar and border
    Bordered,

    /// No decorations
    Borderless,
}

/// Window chrome trait implemented by the windowing backend
pub trait WindowChrome {
    /// Current decoration style
    fn style(&self) -> ChromeStyle;

    /// Set decoration style
    fn set_style(&mut self, style: ChromeStyle);

    /// Whether the window is maximized
    fn is_maximized(&self) -> bool;

    /// Maximize or restore the window
    fn set_maximized(&mut self, maximized: bool);

    /// Keep the window above others
    fn set_always_on_top(&mut self, on_top: bool);
}

/// How the player window is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Windowed,
    FullScreen,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Windowed => DisplayMode::FullScreen,
            DisplayMode::FullScreen => DisplayMode::Windowed,
        }
    }
}

/// Current display mode, derived from the chrome
///
/// Full screen only when the window is both borderless and maximized.
pub fn display_mode(chrome: &dyn WindowChrome) -> DisplayMode {
    if chrome.style() == ChromeStyle::Borderless && chrome.is_maximized() {
        DisplayMode::FullScreen
    } else {
        DisplayMode::Windowed
    }
}

/// Switch display mode, setting both chrome properties together
pub fn set_display_mode(chrome: &mut dyn WindowChrome, mode: DisplayMode) {
    debug!("Display mode -> {:?}", mode);
    match mode {
        DisplayMode::FullScreen => {
            chrome.set_style(ChromeStyle::Borderless);
            // Restore first so a window that was already maximized with a
            // border is re-laid out over the taskbar.
            if chrome.is_maximized() {
                chrome.set_maximized(false);
            }
            chrome.set_maximized(true);
        }
        DisplayMode::Windowed => {
            chrome.set_style(ChromeStyle::Bordered);
            chrome.set_maximized(false);
        }
    }
}
