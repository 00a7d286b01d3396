//! Finds the audio files of one album directory

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::library::error::LibraryError;

pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|known| known.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Audio files directly inside `dir`, sorted by file name. Subdirectories are not entered.
pub fn discover_audio_files(
    dir: &Path,
    extensions: &[String],
) -> Result<Vec<PathBuf>, LibraryError> {
    let dir_str = dir.to_string_lossy();

    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                return Err(LibraryError::Discovery {
                    dir: dir.to_path_buf(),
                    source: err,
                });
            }
            Err(err) => {
                log::warn!("error while scanning dir {dir_str}, skipping an entry: {err}");
                continue;
            }
        };
        if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
            paths.push(entry.into_path());
        }
    }

    log::info!("found {} audio files in {dir_str}", paths.len());
    Ok(paths)
}
