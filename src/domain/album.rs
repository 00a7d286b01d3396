use thiserror::Error;

use crate::table::Table;

pub const ARTIST_HEADER: &str = "artist";
pub const ALBUM_HEADER: &str = "album";
pub const TRACKLIST_HEADER: &str = "tracklist";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AlbumMetadataError {
    #[error("No {0}")]
    MissingSection(&'static str),
}

/// Album descriptor built from a metadata table.
///
/// Tracklist order defines track numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumMetadata {
    pub artist: String,
    pub album: String,
    pub tracklist: Vec<String>,
}

impl AlbumMetadata {
    pub fn from_table(table: &Table) -> Result<Self, AlbumMetadataError> {
        for header in [ARTIST_HEADER, ALBUM_HEADER, TRACKLIST_HEADER] {
            if !table.has_entries(header) {
                return Err(AlbumMetadataError::MissingSection(header));
            }
        }

        Ok(Self {
            artist: table.section(ARTIST_HEADER)[0].clone(),
            album: table.section(ALBUM_HEADER)[0].clone(),
            tracklist: table.section(TRACKLIST_HEADER).to_vec(),
        })
    }

    /// 1-based position of the first tracklist entry equal to `title`
    pub fn track_number(&self, title: &str) -> Option<u32> {
        self.tracklist
            .iter()
            .position(|track| track == title)
            .and_then(|idx| u32::try_from(idx + 1).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::parse_table;

    #[test]
    fn test_build_from_table() -> anyhow::Result<()> {
        let table = parse_table(
            "[artist]\nThe Band\nIgnored\n[album]\nRecord\n[tracklist]\nIntro\nSecond Song\n",
        );

        let album = AlbumMetadata::from_table(&table)?;

        assert_eq!(album.artist, "The Band");
        assert_eq!(album.album, "Record");
        assert_eq!(album.tracklist, vec!["Intro", "Second Song"]);
        Ok(())
    }

    #[test]
    fn test_missing_sections_in_order() {
        let table = parse_table("[album]\nRecord\n");
        assert_eq!(
            AlbumMetadata::from_table(&table),
            Err(AlbumMetadataError::MissingSection(ARTIST_HEADER))
        );

        let table = parse_table("[artist]\nA\n[tracklist]\nOne\n");
        assert_eq!(
            AlbumMetadata::from_table(&table),
            Err(AlbumMetadataError::MissingSection(ALBUM_HEADER))
        );
    }

    #[test]
    fn test_missing_tracklist_message() {
        let table = parse_table("[artist]\nA\n[album]\nB\n");
        let err = AlbumMetadata::from_table(&table).unwrap_err();

        assert_eq!(err.to_string(), "No tracklist");
    }

    #[test]
    fn test_empty_section_counts_as_missing() {
        let table = parse_table("[artist]\nA\n[album]\nB\n[tracklist]\n\n");

        assert_eq!(
            AlbumMetadata::from_table(&table),
            Err(AlbumMetadataError::MissingSection(TRACKLIST_HEADER))
        );
    }

    #[test]
    fn test_track_number() {
        let album = AlbumMetadata {
            artist: "A".into(),
            album: "B".into(),
            tracklist: vec!["Intro".into(), "Second Song".into(), "Intro".into()],
        };

        assert_eq!(album.track_number("Intro"), Some(1));
        assert_eq!(album.track_number("Second Song"), Some(2));
        assert_eq!(album.track_number("intro"), None);
    }
}
