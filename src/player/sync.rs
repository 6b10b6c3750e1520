//! Clock/position synchronization
//!
//! The position slider is written by two parties: the engine (as playback
//! advances) and the user (dragging or clicking the slider). Each write is
//! tagged with its origin so that an engine-originated write never turns
//! into a seek back into the engine.

use crate::utils::{clamp_fraction, format_clock, format_time_label, scale_duration};
use std::time::Duration;

/// Who produced a position change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Pushed by the playback engine
    Engine,

    /// Caused by direct manipulation of the slider
    User,
}

/// A tagged position change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionUpdate {
    pub origin: Origin,
    pub fraction: f32,
}

impl PositionUpdate {
    pub fn engine(fraction: f32) -> Self {
        Self {
            origin: Origin::Engine,
            fraction: clamp_fraction(fraction),
        }
    }

    pub fn user(fraction: f32) -> Self {
        Self {
            origin: Origin::User,
            fraction: clamp_fraction(fraction),
        }
    }
}

/// What the controller must do after reconciling an update
#[derive(Debug, Clone, PartialEq)]
pub enum Reconciled {
    /// Move the engine to this fraction
    Seek(f32),

    /// Show this time label; the engine already is where it says
    ShowTime(String),

    /// Nothing to show (no media loaded)
    Quiet,
}

/// Reconciles engine position/time reports with the slider
#[derive(Debug, Default)]
pub struct PositionSynchronizer {
    /// Value of the last programmatic slider write, until its echo arrives
    pending_echo: Option<f32>,
}

impl PositionSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Note a programmatic write to the slider
    ///
    /// Slider widgets commonly raise their value-changed notification for
    /// programmatic writes too; remembering the value lets `classify`
    /// recognise that echo.
    pub fn record_write(&mut self, fraction: f32) {
        self.pending_echo = Some(fraction);
    }

    /// Classify a value-changed notification from the slider
    ///
    /// Returns `None` for the echo of our own last write (consumed), or a
    /// user-originated update otherwise.
    pub fn classify(&mut self, fraction: f32) -> Option<PositionUpdate> {
        let fraction = clamp_fraction(fraction);
        match self.pending_echo.take() {
            Some(written) if written == fraction => None,
            _ => Some(PositionUpdate::user(fraction)),
        }
    }

    /// Decide what a position update means for the engine and the label
    ///
    /// Engine-originated updates recompute the label from
    /// `duration × fraction`, which keeps the label right while paused when
    /// no time report arrives.
    pub fn reconcile(&self, update: PositionUpdate, duration: Option<Duration>) -> Reconciled {
        match (update.origin, duration) {
            (Origin::User, _) => Reconciled::Seek(update.fraction),
            (Origin::Engine, None) => Reconciled::Quiet,
            (Origin::Engine, Some(total)) => {
                let elapsed = scale_duration(total, update.fraction as f64);
                Reconciled::ShowTime(format_time_label(elapsed, total))
            }
        }
    }

    /// Label for an engine time report; `None` when no media is loaded
    pub fn time_label(elapsed: Duration, duration: Option<Duration>) -> Option<String> {
        duration.map(|total| format_time_label(elapsed, total))
    }

    /// Label shown when media has just been parsed: the total duration alone
    pub fn duration_label(duration: Duration) -> String {
        format_clock(duration)
    }
}

/// Map a pointer release on the slider track to a fraction
///
/// A zero-width track maps to the start.
pub fn fraction_at(x: f64, track_width: f64) -> f32 {
    if track_width <= 0.0 || !track_width.is_finite() {
        return 0.0;
    }
    clamp_fraction((x / track_width) as f32)
}
