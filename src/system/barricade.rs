//! Sleep barricade
//!
//! Holds the system "prevent sleep" assertion exactly while playback is
//! active. The barricade is the only component allowed to toggle the
//! assertion, and it releases it on drop so no exit path can leak it.

use crate::system::SleepControl;
use log::{debug, warn};

/// Sleep prevention bound to the playback-active state
pub struct SleepBarricade {
    control: Box<dyn SleepControl>,
    held: bool,
}

impl SleepBarricade {
    pub fn new(control: Box<dyn SleepControl>) -> Self {
        Self {
            control,
            held: false,
        }
    }

    /// Re-evaluate against the current playback-active state
    ///
    /// Repeated calls with the same state are no-ops. A refused assertion
    /// leaves the barricade unheld so the next evaluation retries it.
    pub fn sync(&mut self, active: bool) {
        match (active, self.held) {
            (true, false) => match self.control.prevent_sleep() {
                Ok(()) => {
                    self.held = true;
                    debug!("Sleep barricade raised");
                }
                Err(e) => warn!("Could not prevent system sleep: {}", e),
            },
            (false, true) => self.release(),
            _ => {}
        }
    }

    /// Drop the assertion if it is held
    pub fn release(&mut self) {
        if !self.held {
            return;
        }
        // Consider it released even if the OS call fails; retrying would
        // only double-release.
        self.held = false;
        match self.control.allow_sleep() {
            Ok(()) => debug!("Sleep barricade lowered"),
            Err(e) => warn!("Could not release sleep prevention: {}", e),
        }
    }

    pub fn is_held(&self) -> bool {
        self.held
    }
}

impl Drop for SleepBarricade {
    fn drop(&mut self) {
        self.release();
    }
}
