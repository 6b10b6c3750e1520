//! Headless transport engine
//!
//! A playback engine without a codec backend: it keeps the playlist, the
//! playhead and the volume, and advances the playhead on a clock. It lets
//! the shell run end to end (and be exercised in tests) without decoding.
//! Media cannot be probed, so every entry reports the configured nominal
//! duration once "parsed" on the first clock tick after loading.

use crate::engine::{EngineEvent, PlaybackEngine};
use crate::utils::clamp_fraction;
use crate::utils::config::EngineConfig;
use crate::utils::error::{PlayerError, Result};
use crossbeam_channel::{Receiver, Sender};
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Internal transport state
#[derive(Debug)]
struct Transport {
    playlist: Vec<PathBuf>,
    index: Option<usize>,
    elapsed: Duration,
    /// Zero until the current entry is parsed
    duration: Duration,
    playing: bool,
    volume: u8,
    parse_pending: bool,
    /// Seek requested before the duration was known
    pending_seek: Option<f32>,
}

impl Transport {
    fn new() -> Self {
        Self {
            playlist: Vec::new(),
            index: None,
            elapsed: Duration::ZERO,
            duration: Duration::ZERO,
            playing: false,
            volume: 100,
            parse_pending: false,
            pending_seek: None,
        }
    }

    fn current(&self) -> Option<&PathBuf> {
        self.index.and_then(|i| self.playlist.get(i))
    }

    fn select(&mut self, index: usize) {
        self.index = Some(index);
        self.elapsed = Duration::ZERO;
        self.duration = Duration::ZERO;
        self.parse_pending = true;
        self.pending_seek = None;
    }

    fn fraction(&self) -> f32 {
        if self.duration.is_zero() {
            return self.pending_seek.unwrap_or(0.0);
        }
        clamp_fraction((self.elapsed.as_secs_f64() / self.duration.as_secs_f64()) as f32)
    }

    fn seek(&mut self, fraction: f32) {
        let fraction = clamp_fraction(fraction);
        if self.duration.is_zero() {
            self.pending_seek = Some(fraction);
        } else {
            self.elapsed = self.duration.mul_f64(fraction as f64);
        }
    }

    /// Advance the playhead by one clock step
    fn advance(&mut self, step: Duration, nominal: Duration) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        let Some(current) = self.current().cloned() else {
            return events;
        };

        if self.parse_pending {
            self.parse_pending = false;
            self.duration = nominal;
            if let Some(fraction) = self.pending_seek.take() {
                self.elapsed = nominal.mul_f64(fraction as f64);
            }
            events.push(EngineEvent::MediaParsed { media: current });
        }

        if !self.playing {
            return events;
        }

        self.elapsed += step;
        if self.elapsed >= self.duration {
            let next = self.index.map(|i| i + 1).filter(|&i| i < self.playlist.len());
            match next {
                Some(next) => {
                    self.select(next);
                    if let Some(media) = self.current().cloned() {
                        info!("Advancing to {:?}", media);
                        events.push(EngineEvent::MediaChanged { media });
                    }
                }
                None => {
                    self.elapsed = self.duration;
                    self.playing = false;
                    debug!("End of playlist reached");
                }
            }
        }

        events.push(EngineEvent::PositionChanged { fraction: self.fraction() });
        events.push(EngineEvent::TimeChanged { elapsed: self.elapsed });
        events
    }
}

/// Transport-only playback engine
pub struct HeadlessEngine {
    transport: Arc<Mutex<Transport>>,
    events: Sender<EngineEvent>,
    nominal_duration: Duration,
}

/// Cloneable handle that drives the engine's playhead
#[derive(Clone)]
pub struct EngineClock {
    transport: Arc<Mutex<Transport>>,
    events: Sender<EngineEvent>,
    nominal_duration: Duration,
}

impl HeadlessEngine {
    /// Create an engine and the receiver its events are delivered on
    pub fn new(config: &EngineConfig) -> (Self, Receiver<EngineEvent>) {
        let (events, receiver) = crossbeam_channel::unbounded();
        let engine = Self {
            transport: Arc::new(Mutex::new(Transport::new())),
            events,
            nominal_duration: config.nominal_duration(),
        };
        (engine, receiver)
    }

    /// Handle for advancing the playhead from another task
    pub fn clock(&self) -> EngineClock {
        EngineClock {
            transport: Arc::clone(&self.transport),
            events: self.events.clone(),
            nominal_duration: self.nominal_duration,
        }
    }
}

impl EngineClock {
    /// Advance the playhead by `step` and publish the resulting events
    pub fn advance(&self, step: Duration) {
        let events = self.transport.lock().advance(step, self.nominal_duration);
        for event in events {
            if self.events.send(event).is_err() {
                debug!("Engine event receiver dropped");
                return;
            }
        }
    }

    /// Run the clock on a tokio runtime until the task is aborted
    pub fn spawn(self, runtime: &tokio::runtime::Handle, tick: Duration) -> tokio::task::JoinHandle<()> {
        runtime.spawn(async move {
            let mut interval = tokio::time::interval(tick);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                self.advance(tick);
            }
        })
    }
}

impl PlaybackEngine for HeadlessEngine {
    fn load_list(&mut self, paths: &[PathBuf]) -> Result<()> {
        let anchor = paths
            .first()
            .ok_or_else(|| PlayerError::engine_error("Cannot load an empty playlist"))?;
        if !anchor.is_file() {
            return Err(PlayerError::engine_error(format!("No such media: {}", anchor.display())));
        }

        let mut transport = self.transport.lock();
        transport.playlist = paths.to_vec();
        transport.playing = false;
        transport.select(0);
        info!("Loaded playlist of {} entries", paths.len());
        Ok(())
    }

    fn play(&mut self) {
        let mut transport = self.transport.lock();
        if transport.current().is_none() {
            warn!("Play requested with no media loaded");
            return;
        }
        transport.playing = true;
    }

    fn pause(&mut self) {
        self.transport.lock().playing = false;
    }

    fn stop(&mut self) {
        let mut transport = self.transport.lock();
        transport.playing = false;
        transport.elapsed = Duration::ZERO;
        transport.pending_seek = None;
    }

    fn next(&mut self) {
        let mut transport = self.transport.lock();
        if let Some(i) = transport.index.filter(|&i| i + 1 < transport.playlist.len()) {
            transport.select(i + 1);
        }
    }

    fn previous(&mut self) {
        let mut transport = self.transport.lock();
        if let Some(i) = transport.index.filter(|&i| i > 0) {
            transport.select(i - 1);
        }
    }

    fn seek(&mut self, fraction: f32) {
        self.transport.lock().seek(fraction);
    }

    fn position(&self) -> f32 {
        self.transport.lock().fraction()
    }

    fn volume(&self) -> u8 {
        self.transport.lock().volume
    }

    fn set_volume(&mut self, volume: u8) {
        self.transport.lock().volume = volume.min(100);
    }

    fn is_playing(&self) -> bool {
        self.transport.lock().playing
    }

    fn current_media(&self) -> Option<PathBuf> {
        self.transport.lock().current().cloned()
    }

    fn playlist_index(&self) -> Option<usize> {
        self.transport.lock().index
    }

    fn playlist_len(&self) -> usize {
        self.transport.lock().playlist.len()
    }

    fn duration(&self) -> Duration {
        self.transport.lock().duration
    }
}
