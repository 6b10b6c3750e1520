//! Input translation for the winit window
//!
//! This module converts winit events into shell inputs: commands for
//! keyboard shortcuts, and raw clicks, pointer and wheel notifications for
//! the controller's own state machines.

use crate::player::ShellCommand;
use std::path::PathBuf;
use winit::event::{
    ElementState,
    Modifiers,
    MouseButton as WinitMouseButton,
    MouseScrollDelta,
    WindowEvent as WinitWindowEvent,
};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};

/// Pixels per wheel notch for pixel-precise devices
const PIXELS_PER_NOTCH: f64 = 120.0;

/// Keyboard keys the shell reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    Enter,
    Escape,
    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,
    VolumeUp,
    VolumeDown,
    MediaPlayPause,
    MediaStop,
    MediaNext,
    MediaPrevious,
    F,
    O,
    S,
}

/// Keyboard modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyModifiers {
    pub ctrl: bool,
    pub alt: bool,
}

/// Shell-level input produced from a window event
#[derive(Debug, Clone, PartialEq)]
pub enum ShellInput {
    /// A keyboard shortcut
    Command(ShellCommand),

    /// Primary button pressed on the video surface
    Click { count: u32 },

    /// Pointer moved over the window
    PointerMoved,

    /// Wheel turned by this many notches (positive is up)
    Wheel { notches: f32 },

    /// One file dropped; winit delivers multi-file drops one event per file
    FileDropped(PathBuf),

    /// The user asked to close the window
    CloseRequested,

    /// Any other input, only relevant for idle tracking
    Activity,
}

/// Event handler for converting winit events to shell inputs
pub struct EventHandler {
    /// Current keyboard modifiers state
    modifiers: ModifiersState,

    /// Whether the pointer is over the window
    pointer_inside: bool,
}

impl EventHandler {
    /// Create a new event handler
    pub fn new() -> Self {
        Self {
            modifiers: ModifiersState::empty(),
            pointer_inside: false,
        }
    }

    /// Handle a winit window event and convert it to a shell input
    pub fn handle_event(&mut self, event: &WinitWindowEvent) -> Option<ShellInput> {
        match event {
            WinitWindowEvent::CloseRequested => Some(ShellInput::CloseRequested),

            WinitWindowEvent::CursorEntered { .. } => {
                self.pointer_inside = true;
                Some(ShellInput::PointerMoved)
            }

            WinitWindowEvent::CursorLeft { .. } => {
                self.pointer_inside = false;
                Some(ShellInput::Activity)
            }

            WinitWindowEvent::CursorMoved { .. } => {
                self.pointer_inside = true;
                Some(ShellInput::PointerMoved)
            }

            WinitWindowEvent::MouseInput { state, button, .. } => {
                match (state, button) {
                    (ElementState::Pressed, WinitMouseButton::Left) => Some(ShellInput::Click { count: 1 }),
                    _ => Some(ShellInput::Activity),
                }
            }

            WinitWindowEvent::MouseWheel { delta, .. } => Some(ShellInput::Wheel {
                notches: wheel_notches(*delta),
            }),

            WinitWindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers_state(modifiers);
                None
            }

            WinitWindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return Some(ShellInput::Activity);
                }
                let command = match event.physical_key {
                    PhysicalKey::Code(code) => convert_key_code(code)
                        .and_then(|key| shortcut_for(key, convert_modifiers(self.modifiers))),
                    PhysicalKey::Unidentified(_) => None,
                };
                Some(command.map(ShellInput::Command).unwrap_or(ShellInput::Activity))
            }

            WinitWindowEvent::DroppedFile(path) => Some(ShellInput::FileDropped(path.clone())),

            _ => None,
        }
    }

    /// Whether the pointer is over the window
    pub fn pointer_inside(&self) -> bool {
        self.pointer_inside
    }

    /// Get current modifiers state
    pub fn modifiers(&self) -> ModifiersState {
        self.modifiers
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn modifiers_state(modifiers: &Modifiers) -> ModifiersState {
    modifiers.state()
}

/// Map a key press onto a shell command
pub fn shortcut_for(key: Key, modifiers: KeyModifiers) -> Option<ShellCommand> {
    match key {
        Key::Space | Key::MediaPlayPause => Some(ShellCommand::TogglePause),
        Key::Enter if modifiers.alt => Some(ShellCommand::ToggleFullScreen),
        Key::Enter => Some(ShellCommand::PlayOrResume),
        Key::F => Some(ShellCommand::ToggleFullScreen),
        Key::Escape => Some(ShellCommand::ExitFullScreen),
        Key::Left => Some(ShellCommand::Rewind),
        Key::Right => Some(ShellCommand::Forward),
        Key::Up | Key::VolumeUp => Some(ShellCommand::VolumeUp),
        Key::Down | Key::VolumeDown => Some(ShellCommand::VolumeDown),
        Key::PageDown | Key::MediaNext => Some(ShellCommand::Next),
        Key::PageUp | Key::MediaPrevious => Some(ShellCommand::Previous),
        Key::O if modifiers.ctrl => Some(ShellCommand::Open),
        Key::S | Key::MediaStop => Some(ShellCommand::Stop),
        _ => None,
    }
}

/// Convert a wheel delta to notches
pub fn wheel_notches(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_NOTCH) as f32,
    }
}

/// Convert winit key code to a shell key
fn convert_key_code(keycode: KeyCode) -> Option<Key> {
    match keycode {
        KeyCode::Space => Some(Key::Space),
        KeyCode::Enter | KeyCode::NumpadEnter => Some(Key::Enter),
        KeyCode::Escape => Some(Key::Escape),

        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::ArrowDown => Some(Key::Down),

        KeyCode::PageUp => Some(Key::PageUp),
        KeyCode::PageDown => Some(Key::PageDown),

        KeyCode::AudioVolumeUp => Some(Key::VolumeUp),
        KeyCode::AudioVolumeDown => Some(Key::VolumeDown),
        KeyCode::MediaPlayPause => Some(Key::MediaPlayPause),
        KeyCode::MediaStop => Some(Key::MediaStop),
        KeyCode::MediaTrackNext => Some(Key::MediaNext),
        KeyCode::MediaTrackPrevious => Some(Key::MediaPrevious),

        KeyCode::KeyF => Some(Key::F),
        KeyCode::KeyO => Some(Key::O),
        KeyCode::KeyS => Some(Key::S),

        _ => None,
    }
}

/// Convert winit modifiers to shell modifiers
fn convert_modifiers(modifiers: ModifiersState) -> KeyModifiers {
    KeyModifiers {
        ctrl: modifiers.control_key(),
        alt: modifiers.alt_key(),
    }
}
