//! Winit window implementation for EZPlayer
//!
//! This module provides the winit-backed window chrome and console view,
//! the native file picker, and the application handler that feeds window
//! input, engine events and timer deadlines into the session controller.

use crate::engine::{EngineEvent, PlaybackEngine};
use crate::player::{ConsoleView, FilePicker, SessionController, SessionStore};
use crate::system::{platform_idle_clock, platform_sleep_control, InputActivityClock};
use crate::utils::config::Config;
use crate::utils::error::{IntoPlayerError, PlayerError, Result};
use crate::window::events::{EventHandler, ShellInput};
use crate::window::{ChromeStyle, WindowChrome};
use log::{debug, error, info};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent as WinitWindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow},
    window::{Window as WinitWindow, WindowId, WindowLevel},
};

/// Events delivered to the event loop from other threads
#[derive(Debug, Clone)]
pub enum ShellEvent {
    /// Engine callback, marshalled onto the UI thread
    Engine(EngineEvent),
}

/// Window chrome backed by a winit window
pub struct WinitChrome {
    window: Arc<WinitWindow>,
}

impl WinitChrome {
    pub fn new(window: Arc<WinitWindow>) -> Self {
        Self { window }
    }
}

impl WindowChrome for WinitChrome {
    fn style(&self) -> ChromeStyle {
        if self.window.is_decorated() {
            ChromeStyle::Bordered
        } else {
            ChromeStyle::Borderless
        }
    }

    fn set_style(&mut self, style: ChromeStyle) {
        self.window.set_decorations(style == ChromeStyle::Bordered);
    }

    fn is_maximized(&self) -> bool {
        self.window.is_maximized()
    }

    fn set_maximized(&mut self, maximized: bool) {
        self.window.set_maximized(maximized);
    }

    fn set_always_on_top(&mut self, on_top: bool) {
        let level = if on_top {
            WindowLevel::AlwaysOnTop
        } else {
            WindowLevel::Normal
        };
        self.window.set_window_level(level);
    }
}

/// Console view for a plain winit window
///
/// A display stand-in that only logs. No console overlay is drawn: the title
/// goes to the window and the cursor is hidden over it, while the time label
/// and volume are written to the log. There is no slider, so `set_position`
/// does nothing and this shell never produces slider value or release
/// input.
pub struct WinitConsole {
    window: Arc<WinitWindow>,
    pointer_inside: Arc<AtomicBool>,
    time_label: String,
    volume: f64,
    console_visible: bool,
}

impl WinitConsole {
    pub fn new(window: Arc<WinitWindow>, pointer_inside: Arc<AtomicBool>) -> Self {
        Self {
            window,
            pointer_inside,
            time_label: String::new(),
            volume: 0.0,
            console_visible: true,
        }
    }
}

impl ConsoleView for WinitConsole {
    fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
    }

    fn set_time_label(&mut self, label: &str) {
        if self.time_label != label {
            self.time_label = label.to_string();
            debug!("Time: {}", self.time_label);
        }
    }

    fn set_position(&mut self, _fraction: f32) {}

    fn set_volume(&mut self, volume: f64) {
        if self.volume != volume {
            self.volume = volume;
            info!("Volume: {:.0}", volume);
        }
    }

    fn set_playing(&mut self, playing: bool) {
        debug!("Console {}", if playing { "dimmed" } else { "opaque" });
    }

    fn set_console_visible(&mut self, visible: bool) {
        self.console_visible = visible;
        debug!("Console visible: {}", visible);
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        self.window.set_cursor_visible(visible);
    }

    fn pointer_in_console(&self) -> bool {
        self.pointer_inside.load(Ordering::Relaxed)
    }
}

/// Native file-open dialog
#[derive(Debug, Default)]
pub struct RfdPicker;

impl FilePicker for RfdPicker {
    fn pick_media(&mut self) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Open media file for playback")
            .pick_file()
    }
}

/// Winit application driving one session controller
pub struct ShellApp {
    config: Config,

    /// Collaborators handed to the controller once the window exists
    engine: Option<Box<dyn PlaybackEngine>>,
    store: Option<Box<dyn SessionStore>>,

    /// Files to open at startup
    initial_files: Vec<PathBuf>,

    window: Option<Arc<WinitWindow>>,
    controller: Option<SessionController>,

    events: EventHandler,
    activity: InputActivityClock,
    pointer_inside: Arc<AtomicBool>,

    /// Files from the drop in progress; winit delivers one event per file
    dropped: Vec<PathBuf>,
}

impl ShellApp {
    pub fn new(config: Config, engine: Box<dyn PlaybackEngine>) -> Self {
        Self {
            config,
            engine: Some(engine),
            store: None,
            initial_files: Vec::new(),
            window: None,
            controller: None,
            events: EventHandler::new(),
            activity: InputActivityClock::new(),
            pointer_inside: Arc::new(AtomicBool::new(false)),
            dropped: Vec::new(),
        }
    }

    pub fn with_store(mut self, store: Box<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_files(mut self, files: Vec<PathBuf>) -> Self {
        self.initial_files = files;
        self
    }

    /// Create the window and the controller around it
    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attributes = WinitWindow::default_attributes()
            .with_title(self.config.window.title.as_str())
            .with_inner_size(LogicalSize::new(
                self.config.window.width as f64,
                self.config.window.height as f64,
            ));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .window_err("Failed to create window")?,
        );

        let engine = self
            .engine
            .take()
            .ok_or_else(|| PlayerError::Window("Engine already handed over".to_string()))?;

        let mut builder = SessionController::builder(self.config.player.clone())
            .with_engine(engine)
            .with_view(Box::new(WinitConsole::new(
                Arc::clone(&window),
                Arc::clone(&self.pointer_inside),
            )))
            .with_chrome(Box::new(WinitChrome::new(Arc::clone(&window))))
            .with_picker(Box::new(RfdPicker))
            .with_idle_clock(platform_idle_clock(self.activity.clone()))
            .with_sleep_control(platform_sleep_control());
        if let Some(store) = self.store.take() {
            builder = builder.with_store(store);
        }
        let mut controller = builder.build()?;

        if self.config.window.fullscreen {
            controller.toggle_full_screen();
        }
        if !self.initial_files.is_empty() {
            controller.drop_files(std::mem::take(&mut self.initial_files));
        }

        info!("Window ready");
        self.window = Some(window);
        self.controller = Some(controller);
        Ok(())
    }

    fn handle_input(&mut self, event_loop: &ActiveEventLoop, input: ShellInput) {
        if input != ShellInput::CloseRequested {
            self.activity.touch();
        }
        self.pointer_inside
            .store(self.events.pointer_inside(), Ordering::Relaxed);

        let Some(controller) = self.controller.as_mut() else {
            return;
        };
        match input {
            ShellInput::Command(command) => controller.dispatch(command),
            ShellInput::Click { count } => controller.on_click(count, Instant::now()),
            ShellInput::PointerMoved => controller.on_pointer_moved(),
            ShellInput::Wheel { notches } => controller.on_wheel(notches),
            ShellInput::FileDropped(path) => self.dropped.push(path),
            ShellInput::CloseRequested => {
                info!("Close requested");
                controller.shutdown();
                event_loop.exit();
            }
            ShellInput::Activity => {}
        }
    }
}

impl ApplicationHandler<ShellEvent> for ShellApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.start(event_loop) {
            error!("Failed to start: {}", e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WinitWindowEvent) {
        if let Some(input) = self.events.handle_event(&event) {
            self.handle_input(event_loop, input);
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: ShellEvent) {
        match event {
            ShellEvent::Engine(event) => {
                if let Some(controller) = self.controller.as_mut() {
                    controller.handle_engine_event(event);
                }
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(controller) = self.controller.as_mut() else {
            return;
        };

        if !self.dropped.is_empty() {
            controller.drop_files(std::mem::take(&mut self.dropped));
        }

        controller.poll_timers(Instant::now());
        match controller.next_deadline() {
            Some(deadline) => event_loop.set_control_flow(ControlFlow::WaitUntil(deadline)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(controller) = self.controller.as_mut() {
            controller.shutdown();
        }
    }
}
