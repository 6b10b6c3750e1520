//! Idle/activity monitoring
//!
//! Decides when the console overlay and the mouse cursor are shown. A tick
//! on a fixed cadence handles decay to hidden; raw pointer movement brings
//! both back immediately, between ticks.

use log::debug;
use std::time::{Duration, Instant};

/// Console overlay visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleVisibility {
    Visible,
    Hidden,
}

/// Cursor visibility over the player window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    Shown,
    Hidden,
}

/// Visibility after a monitor decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    pub console: ConsoleVisibility,
    pub cursor: CursorState,
}

/// Explicit periodic task
///
/// Each completed tick schedules the next one a full period later, so a
/// slow tick shifts the cadence instead of bunching up. Cancelling stops
/// it for good.
#[derive(Debug, Clone)]
pub struct Cadence {
    period: Duration,
    next: Option<Instant>,
}

impl Cadence {
    pub fn start(period: Duration, now: Instant) -> Self {
        Self {
            period,
            next: Some(now + period),
        }
    }

    /// Whether a tick is due at `now`
    pub fn is_due(&self, now: Instant) -> bool {
        self.next.is_some_and(|next| now >= next)
    }

    /// Schedule the next tick after one has run
    pub fn reschedule(&mut self, now: Instant) {
        if self.next.is_some() {
            self.next = Some(now + self.period);
        }
    }

    pub fn cancel(&mut self) {
        self.next = None;
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.next
    }

    pub fn is_cancelled(&self) -> bool {
        self.next.is_none()
    }
}

/// Console/cursor auto-hide state machine
#[derive(Debug)]
pub struct IdleMonitor {
    threshold: Duration,
    cadence: Cadence,
    console: ConsoleVisibility,
    cursor: CursorState,
}

impl IdleMonitor {
    pub fn new(cadence: Duration, threshold: Duration, now: Instant) -> Self {
        Self {
            threshold,
            cadence: Cadence::start(cadence, now),
            console: ConsoleVisibility::Visible,
            cursor: CursorState::Shown,
        }
    }

    pub fn visibility(&self) -> Visibility {
        Visibility {
            console: self.console,
            cursor: self.cursor,
        }
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.cadence.is_due(now)
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.cadence.next_due()
    }

    /// Run one monitoring decision
    ///
    /// # Arguments
    ///
    /// * `now` - Tick time, used to reschedule
    /// * `idle` - System idle duration, or `None` if the query failed
    /// * `pointer_inside` - Whether the pointer is over the console region
    /// * `playing` - Whether playback is active
    ///
    /// # Returns
    ///
    /// Returns the new visibility if it changed. A failed idle query skips
    /// the decision but the next tick is still scheduled.
    pub fn tick(
        &mut self,
        now: Instant,
        idle: Option<Duration>,
        pointer_inside: bool,
        playing: bool,
    ) -> Option<Visibility> {
        if self.cadence.is_cancelled() {
            return None;
        }
        self.cadence.reschedule(now);

        let idle = match idle {
            Some(idle) => idle,
            None => {
                debug!("Idle query failed; keeping console state");
                return None;
            }
        };

        let before = self.visibility();
        if !pointer_inside || idle > self.threshold {
            if playing {
                self.console = ConsoleVisibility::Hidden;
                self.cursor = CursorState::Hidden;
            }
        } else {
            self.cursor = CursorState::Shown;
            self.console = ConsoleVisibility::Visible;
        }

        self.changed_from(before)
    }

    /// Raw pointer movement, independent of the cadence
    pub fn on_pointer_moved(&mut self, pointer_inside: bool) -> Option<Visibility> {
        if !pointer_inside {
            return None;
        }
        let before = self.visibility();
        self.cursor = CursorState::Shown;
        self.console = ConsoleVisibility::Visible;
        self.changed_from(before)
    }

    /// Playback stopped or paused: the cursor may only stay hidden while playing
    pub fn on_playback_inactive(&mut self) -> Option<Visibility> {
        let before = self.visibility();
        self.cursor = CursorState::Shown;
        self.changed_from(before)
    }

    /// Stop monitoring for good
    pub fn cancel(&mut self) {
        self.cadence.cancel();
    }

    fn changed_from(&self, before: Visibility) -> Option<Visibility> {
        let after = self.visibility();
        (after != before).then_some(after)
    }
}
