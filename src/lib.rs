//! EZPlayer - a desktop media-player shell
//!
//! The shell drives an embedded playback engine and keeps its console,
//! window chrome and persisted session consistent with it. The core is the
//! session controller in [`player`]; the other modules hold its
//! collaborators.

pub mod engine;
pub mod player;
pub mod system;
pub mod utils;
pub mod window;
