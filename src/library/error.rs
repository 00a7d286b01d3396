use std::path::PathBuf;

use lofty::TagType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("failed to scan {}: {source}", .dir.display())]
    Discovery {
        dir: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("tag error in {}: {source}", .path.display())]
    Tags {
        path: PathBuf,
        #[source]
        source: lofty::error::LoftyError,
    },

    #[error("{} cannot hold a {tag_type:?} tag", .path.display())]
    UnsupportedTag { path: PathBuf, tag_type: TagType },

    #[error("track \"{0}\" is not in the tracklist")]
    UnknownTrack(String),
}
