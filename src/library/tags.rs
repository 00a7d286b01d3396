use std::path::{Path, PathBuf};

use lofty::{Accessor, AudioFile, ItemKey, Tag, TagType, TaggedFileExt, read_from_path};

use crate::{
    domain::{album::AlbumMetadata, change::FileChange},
    library::error::LibraryError,
};

/// Tags written to one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackTags<'a> {
    pub artist: &'a str,
    pub album_artist: &'a str,
    pub album: &'a str,
    pub title: &'a str,
    pub track_number: u32,
}

impl<'a> TrackTags<'a> {
    pub fn for_track(album: &'a AlbumMetadata, title: &'a str) -> Result<Self, LibraryError> {
        let track_number = album
            .track_number(title)
            .ok_or_else(|| LibraryError::UnknownTrack(title.to_string()))?;
        Ok(Self {
            artist: &album.artist,
            album_artist: &album.artist,
            album: &album.album,
            title,
            track_number,
        })
    }
}

pub trait TagWriter {
    fn write(&mut self, path: &Path, tags: &TrackTags<'_>) -> Result<(), LibraryError>;
}

/// Writes into the file's own tag, creating one when the file has none
#[derive(Debug, Default)]
pub struct LoftyTagWriter;

impl TagWriter for LoftyTagWriter {
    fn write(&mut self, path: &Path, tags: &TrackTags<'_>) -> Result<(), LibraryError> {
        let lofty_err = |source| LibraryError::Tags {
            path: path.to_path_buf(),
            source,
        };

        let mut tagged_file = read_from_path(path).map_err(lofty_err)?;
        let mut tag_type = tagged_file.primary_tag_type();
        if tagged_file.tag(tag_type).is_none() {
            if let Some(tag) = tagged_file.first_tag() {
                tag_type = tag.tag_type();
            } else {
                tag_type = default_tag_type(path);
            }
        }
        if tagged_file.tag(tag_type).is_none() {
            tagged_file.insert_tag(Tag::new(tag_type));
        }
        let Some(tag) = tagged_file.tag_mut(tag_type) else {
            return Err(LibraryError::UnsupportedTag {
                path: path.to_path_buf(),
                tag_type,
            });
        };

        tag.set_artist(tags.artist.to_string());
        tag.insert_text(ItemKey::AlbumArtist, tags.album_artist.to_string());
        tag.set_album(tags.album.to_string());
        tag.set_title(tags.title.to_string());
        tag.set_track(tags.track_number);

        tagged_file.save_to_path(path).map_err(lofty_err)?;
        Ok(())
    }
}

fn default_tag_type(path: &Path) -> TagType {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "flac" | "ogg" | "oga" | "opus" => TagType::VorbisComments,
        "mp4" | "m4a" | "m4b" | "aac" => TagType::Mp4Ilst,
        _ => TagType::Id3v2,
    }
}

#[derive(Debug, Default)]
pub struct SaveReport {
    pub written: Vec<PathBuf>,
    pub untouched: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, LibraryError)>,
}

impl SaveReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Writes album tags to every file that got a track.
///
/// Files without a track are never opened. A failing file does not stop the rest.
pub fn save_changes(
    changes: &[FileChange],
    album: &AlbumMetadata,
    writer: &mut impl TagWriter,
) -> SaveReport {
    let mut report = SaveReport::default();

    for change in changes {
        let Some(title) = &change.track else {
            log::debug!("leaving {} untouched", change.path.to_string_lossy());
            report.untouched.push(change.path.clone());
            continue;
        };

        let result = TrackTags::for_track(album, title)
            .and_then(|tags| writer.write(&change.path, &tags));
        match result {
            Ok(()) => {
                log::info!("tagged {} as \"{}\"", change.path.to_string_lossy(), title);
                report.written.push(change.path.clone());
            }
            Err(err) => {
                log::warn!("{err}");
                report.failed.push((change.path.clone(), err));
            }
        }
    }

    report
}
