//! Operating system collaborators for EZPlayer
//!
//! Two process-wide primitives the shell depends on: how long the user has
//! been idle (any input, system wide) and whether the machine may sleep.
//! On Windows both go straight to Win32; elsewhere the shell falls back to
//! tracking its own input and to logging sleep assertions.

mod barricade;

pub use barricade::SleepBarricade;

use crate::utils::error::Result;
use log::{debug, info};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// System-wide input idleness query
pub trait IdleClock {
    /// Time elapsed since the last user input
    ///
    /// # Returns
    ///
    /// Returns an error if the system refuses the query
    fn idle_for(&self) -> Result<Duration>;
}

/// System sleep prevention
///
/// Both calls are idempotent at the OS level; the `SleepBarricade` still
/// makes sure each is only issued on a real transition.
pub trait SleepControl {
    /// Assert that the system and display must stay awake
    fn prevent_sleep(&mut self) -> Result<()>;

    /// Withdraw the assertion
    fn allow_sleep(&mut self) -> Result<()>;
}

/// Idle clock fed by the shell's own input events
///
/// Only sees input delivered to the player window, which is what matters
/// for the console overlay when the window has focus.
#[derive(Debug, Clone)]
pub struct InputActivityClock {
    last_input: Arc<Mutex<Instant>>,
}

impl InputActivityClock {
    pub fn new() -> Self {
        Self {
            last_input: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Record an input event
    pub fn touch(&self) {
        self.touch_at(Instant::now());
    }

    pub fn touch_at(&self, at: Instant) {
        *self.last_input.lock() = at;
    }
}

impl Default for InputActivityClock {
    fn default() -> Self {
        Self::new()
    }
}

impl IdleClock for InputActivityClock {
    fn idle_for(&self) -> Result<Duration> {
        Ok(self.last_input.lock().elapsed())
    }
}

/// Sleep control that only records the assertion in the log
#[derive(Debug, Default)]
pub struct LoggingSleepControl {
    held: bool,
}

impl SleepControl for LoggingSleepControl {
    fn prevent_sleep(&mut self) -> Result<()> {
        self.held = true;
        info!("Sleep prevention requested (no system backend on this platform)");
        Ok(())
    }

    fn allow_sleep(&mut self) -> Result<()> {
        self.held = false;
        debug!("Sleep prevention withdrawn");
        Ok(())
    }
}

#[cfg(windows)]
pub use self::win32::{Win32IdleClock, Win32SleepControl};

#[cfg(windows)]
mod win32 {
    use super::{IdleClock, SleepControl};
    use crate::utils::error::{PlayerError, Result};
    use std::time::Duration;
    use windows::Win32::System::Power::{
        SetThreadExecutionState, ES_CONTINUOUS, ES_DISPLAY_REQUIRED, ES_SYSTEM_REQUIRED,
    };
    use windows::Win32::System::SystemInformation::GetTickCount;
    use windows::Win32::UI::Input::KeyboardAndMouse::{GetLastInputInfo, LASTINPUTINFO};

    /// Idle clock backed by `GetLastInputInfo`
    #[derive(Debug, Default, Clone, Copy)]
    pub struct Win32IdleClock;

    impl IdleClock for Win32IdleClock {
        fn idle_for(&self) -> Result<Duration> {
            let mut info = LASTINPUTINFO {
                cbSize: std::mem::size_of::<LASTINPUTINFO>() as u32,
                dwTime: 0,
            };
            // SAFETY: `info` is a properly sized LASTINPUTINFO owned by this frame.
            let ok = unsafe { GetLastInputInfo(&mut info) };
            if !ok.as_bool() {
                return Err(PlayerError::System("GetLastInputInfo failed".to_string()));
            }
            // Both counters wrap after ~49.7 days.
            let now = unsafe { GetTickCount() };
            Ok(Duration::from_millis(now.wrapping_sub(info.dwTime) as u64))
        }
    }

    /// Sleep control backed by `SetThreadExecutionState`
    ///
    /// Must be driven from the UI thread: the execution state belongs to the
    /// calling thread.
    #[derive(Debug, Default)]
    pub struct Win32SleepControl;

    impl SleepControl for Win32SleepControl {
        fn prevent_sleep(&mut self) -> Result<()> {
            let flags = ES_CONTINUOUS | ES_SYSTEM_REQUIRED | ES_DISPLAY_REQUIRED;
            let previous = unsafe { SetThreadExecutionState(flags) };
            if previous.0 == 0 {
                return Err(PlayerError::System("SetThreadExecutionState refused".to_string()));
            }
            Ok(())
        }

        fn allow_sleep(&mut self) -> Result<()> {
            let previous = unsafe { SetThreadExecutionState(ES_CONTINUOUS) };
            if previous.0 == 0 {
                return Err(PlayerError::System("SetThreadExecutionState refused".to_string()));
            }
            Ok(())
        }
    }
}

/// Idle clock for the current platform
///
/// `activity` is the shell's own input tracker, used where the system
/// cannot be asked.
#[cfg(windows)]
pub fn platform_idle_clock(_activity: InputActivityClock) -> Box<dyn IdleClock> {
    Box::new(Win32IdleClock)
}

#[cfg(not(windows))]
pub fn platform_idle_clock(activity: InputActivityClock) -> Box<dyn IdleClock> {
    Box::new(activity)
}

/// Sleep control for the current platform
#[cfg(windows)]
pub fn platform_sleep_control() -> Box<dyn SleepControl> {
    Box::new(Win32SleepControl)
}

#[cfg(not(windows))]
pub fn platform_sleep_control() -> Box<dyn SleepControl> {
    Box::new(LoggingSleepControl::default())
}
