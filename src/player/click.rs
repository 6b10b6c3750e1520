//! Click disambiguation
//!
//! A click on the video surface is ambiguous until the settle delay has
//! passed: it may be the first half of a double-click. Single clicks map to
//! pause/resume, double clicks to the full-screen toggle, and a double
//! click must never also produce a single click.

use std::time::{Duration, Instant};

/// Resolved meaning of a click sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickIntent {
    SingleClick,
    DoubleClick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClickState {
    Idle,

    /// One click seen; becomes a single click at `deadline`
    Pending { deadline: Instant },

    /// A double click resolved; further clicks until `until` are absorbed
    Settling { until: Instant },
}

/// Turns raw clicks into single/double click intents
#[derive(Debug)]
pub struct ClickDisambiguator {
    settle: Duration,
    state: ClickState,
}

impl ClickDisambiguator {
    pub fn new(settle: Duration) -> Self {
        Self {
            settle,
            state: ClickState::Idle,
        }
    }

    /// Feed a click
    ///
    /// # Arguments
    ///
    /// * `count` - Click count reported by the windowing system; toolkits
    ///   that do not count clicks report 1 for every press
    /// * `now` - Time of the click
    ///
    /// # Returns
    ///
    /// Returns a double click as soon as one is recognised. Single clicks
    /// only come out of `poll`.
    pub fn on_click(&mut self, count: u32, now: Instant) -> Option<ClickIntent> {
        self.expire_settling(now);

        match (count, self.state) {
            (0, _) => None,
            (2, _) => self.resolve_double(now),
            (1, ClickState::Idle) => {
                self.state = ClickState::Pending {
                    deadline: now + self.settle,
                };
                None
            }
            (1, ClickState::Pending { deadline }) if now < deadline => self.resolve_double(now),
            (1, ClickState::Pending { .. }) => {
                // The deadline passed without a poll; the earlier click
                // stands on its own and this one starts a new sequence.
                self.state = ClickState::Pending {
                    deadline: now + self.settle,
                };
                Some(ClickIntent::SingleClick)
            }
            // Triple and later clicks collapse into the double already sent.
            _ => None,
        }
    }

    /// Emit a single click once the settle delay has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<ClickIntent> {
        self.expire_settling(now);

        match self.state {
            ClickState::Pending { deadline } if now >= deadline => {
                self.state = ClickState::Idle;
                Some(ClickIntent::SingleClick)
            }
            _ => None,
        }
    }

    /// When `poll` next needs to run
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.state {
            ClickState::Pending { deadline } => Some(deadline),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, ClickState::Pending { .. })
    }

    fn resolve_double(&mut self, now: Instant) -> Option<ClickIntent> {
        match self.state {
            ClickState::Settling { .. } => None,
            ClickState::Pending { deadline } => {
                self.state = ClickState::Settling { until: deadline.max(now) };
                Some(ClickIntent::DoubleClick)
            }
            ClickState::Idle => {
                self.state = ClickState::Settling { until: now + self.settle };
                Some(ClickIntent::DoubleClick)
            }
        }
    }

    fn expire_settling(&mut self, now: Instant) {
        if let ClickState::Settling { until } = self.state {
            if now >= until {
                self.state = ClickState::Idle;
            }
        }
    }
}
