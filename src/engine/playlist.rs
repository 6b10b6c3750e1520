//! Default media-preparation collaborators
//!
//! Sibling-file playlist assembly and sidecar subtitle detection. Both are
//! deliberately simple; richer discovery rules plug in through the
//! `PlaylistSource` and `SubtitlePreparer` traits.

use crate::engine::{PlaylistSource, SubtitlePreparer};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Subtitle extensions probed next to the anchor file
const SUBTITLE_EXTENSIONS: [&str; 3] = ["srt", "ass", "ssa"];

/// Builds a playlist from files sharing the anchor's extension
///
/// Siblings are sorted by path and the playlist starts at the anchor, so
/// "next" walks forward through the directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct SiblingPlaylist;

impl SiblingPlaylist {
    fn same_extension(a: &Path, b: &Path) -> bool {
        match (a.extension(), b.extension()) {
            (Some(x), Some(y)) => x.to_string_lossy().eq_ignore_ascii_case(&y.to_string_lossy()),
            (None, None) => true,
            _ => false,
        }
    }
}

impl PlaylistSource for SiblingPlaylist {
    fn build_playlist(&self, anchor: &Path) -> Vec<PathBuf> {
        let Some(dir) = anchor.parent().filter(|d| !d.as_os_str().is_empty()) else {
            return vec![anchor.to_path_buf()];
        };

        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Cannot list {:?} for playlist: {}", dir, e);
                return vec![anchor.to_path_buf()];
            }
        };

        let mut siblings: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && Self::same_extension(path, anchor))
            .collect();
        siblings.sort();

        match siblings.iter().position(|p| p.file_name() == anchor.file_name()) {
            Some(start) => {
                let playlist = siblings.split_off(start);
                debug!("Playlist of {} entries from {:?}", playlist.len(), anchor);
                playlist
            }
            None => vec![anchor.to_path_buf()],
        }
    }
}

/// Detects sidecar subtitle files next to the anchor
#[derive(Debug, Default, Clone, Copy)]
pub struct SidecarSubtitles;

impl SidecarSubtitles {
    /// Find the first sidecar subtitle for a media file
    pub fn find(anchor: &Path) -> Option<PathBuf> {
        SUBTITLE_EXTENSIONS
            .iter()
            .map(|ext| anchor.with_extension(ext))
            .find(|candidate| candidate.is_file())
    }
}

impl SubtitlePreparer for SidecarSubtitles {
    fn prepare(&self, anchor: &Path) {
        match Self::find(anchor) {
            Some(subtitle) => info!("Using subtitles {:?}", subtitle),
            None => debug!("No sidecar subtitles for {:?}", anchor),
        }
    }
}
