use std::path::{Path, PathBuf};

use crate::matcher::{SkipSet, identify_track};

/// Matched region `(start, length)` inside the normalized file name.
///
/// `(0, 0)` means there is nothing to highlight, e.g. after a manual choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchSpan {
    pub start: usize,
    pub length: usize,
}

impl MatchSpan {
    pub const NONE: MatchSpan = MatchSpan {
        start: 0,
        length: 0,
    };

    pub fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }

    pub fn is_none(&self) -> bool {
        self.length == 0
    }
}

/// Proposed tag change for one audio file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: PathBuf,
    /// `None` leaves the file untouched
    pub track: Option<String>,
    pub span: MatchSpan,
}

impl FileChange {
    pub fn new(path: PathBuf, track: Option<String>, span: MatchSpan) -> Self {
        Self { path, track, span }
    }

    /// File name without extension, the part matched against the tracklist
    pub fn stem(&self) -> String {
        file_stem(&self.path)
    }

    /// Replaces the track with a manual choice, which never has a span
    pub fn assign(&mut self, track: Option<String>) {
        self.track = track;
        self.span = MatchSpan::NONE;
    }
}

pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Runs the matcher over every discovered file
pub fn build_changes(paths: Vec<PathBuf>, tracklist: &[String], skip: SkipSet) -> Vec<FileChange> {
    paths
        .into_iter()
        .map(|path| {
            let found = identify_track(&file_stem(&path), tracklist, skip);
            match &found.track {
                Some(track) => log::debug!(
                    "{} matched \"{}\" at {:?}",
                    path.to_string_lossy(),
                    track,
                    found.span
                ),
                None => log::debug!("{} matched no track", path.to_string_lossy()),
            }
            FileChange::new(path, found.track, found.span)
        })
        .collect()
}
