//! Matches audio file names against tracklist titles
//!
//! Both sides are lowercased and stripped of skippable characters, then the
//! title has to occur in the file name as one contiguous run.

use serde::Deserialize;

use crate::domain::change::MatchSpan;

/// Characters dropped before matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkipSet {
    /// whitespace and brackets
    Basic,
    /// whitespace, brackets, `-` and `_`
    #[default]
    Extended,
}

impl SkipSet {
    pub fn is_skippable(self, ch: char) -> bool {
        if ch.is_whitespace() || matches!(ch, '(' | ')' | '[' | ']' | '{' | '}') {
            return true;
        }
        self == SkipSet::Extended && matches!(ch, '-' | '_')
    }
}

/// Lowercased text with skippable characters removed.
///
/// Keeps the byte range each retained char came from in the original string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    chars: Vec<char>,
    origins: Vec<(usize, usize)>,
}

impl Normalized {
    pub fn new(original: &str, skip: SkipSet) -> Self {
        let mut chars = Vec::new();
        let mut origins = Vec::new();

        for (offset, ch) in original.char_indices() {
            let origin = (offset, offset + ch.len_utf8());
            for lower in ch.to_lowercase() {
                if skip.is_skippable(lower) {
                    continue;
                }
                chars.push(lower);
                origins.push(origin);
            }
        }

        Self { chars, origins }
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Byte range in the original string covered by a normalized span
    pub fn original_range(&self, span: MatchSpan) -> Option<(usize, usize)> {
        if span.is_none() || span.start + span.length > self.len() {
            return None;
        }
        let start = self.origins[span.start].0;
        let end = self.origins[span.start + span.length - 1].1;
        Some((start, end))
    }
}

impl std::fmt::Display for Normalized {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for ch in &self.chars {
            write!(f, "{ch}")?;
        }
        Ok(())
    }
}

/// Start of the first window of `string` equal to `pattern`.
///
/// An empty pattern never matches.
pub fn find_window(string: &[char], pattern: &[char]) -> Option<usize> {
    if pattern.is_empty() || pattern.len() > string.len() {
        return None;
    }
    string
        .windows(pattern.len())
        .position(|window| window == pattern)
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrackMatch {
    pub track: Option<String>,
    pub span: MatchSpan,
}

/// Picks the tracklist title with the longest occurrence in `filename`.
///
/// Ties go to the title listed first.
pub fn identify_track(filename: &str, tracklist: &[String], skip: SkipSet) -> TrackMatch {
    let file = Normalized::new(filename, skip);
    let mut best = TrackMatch::default();

    for title in tracklist {
        let track = Normalized::new(title, skip);
        if track.is_empty() {
            log::debug!("title \"{title}\" has nothing left to match after normalizing");
            continue;
        }
        let Some(start) = find_window(file.chars(), track.chars()) else {
            continue;
        };
        if track.len() > best.span.length {
            best = TrackMatch {
                track: Some(title.clone()),
                span: MatchSpan::new(start, track.len()),
            };
        }
    }

    best
}

/// Original file name cut around a matched span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight<'a> {
    pub prefix: &'a str,
    pub matched: &'a str,
    pub suffix: &'a str,
}

/// Splits `original` around `span`, `None` when there is nothing to highlight
pub fn highlight(original: &str, span: MatchSpan, skip: SkipSet) -> Option<Highlight<'_>> {
    let (start, end) = Normalized::new(original, skip).original_range(span)?;
    Some(Highlight {
        prefix: &original[..start],
        matched: &original[start..end],
        suffix: &original[end..],
    })
}
