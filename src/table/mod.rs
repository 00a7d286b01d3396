//! Reader for the sectioned metadata table file
//!
//! ```text
//! [artist]
//! Some Artist
//!
//! [tracklist]
//! Intro
//! Second Song
//! ```

use std::{collections::HashMap, path::Path};

use crate::table::error::TableError;

pub mod error;

const BOM: char = '\u{feff}';

/// Entries that appear before the first header land in this section
pub const UNNAMED_SECTION: &str = "";

/// Section name -> entries, in file order
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Table {
    sections: HashMap<String, Vec<String>>,
}

impl Table {
    /// entries of a section, empty if the section never appeared
    pub fn section(&self, name: &str) -> &[String] {
        self.sections.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_entries(&self, name: &str) -> bool {
        !self.section(name).is_empty()
    }
}

fn header_of(entry: &str) -> Option<&str> {
    entry.strip_prefix('[')?.strip_suffix(']')
}

/// Parses table text.
///
/// Blank lines are skipped, a repeated header reopens its section
/// and further entries are appended to it.
pub fn parse_table(contents: &str) -> Table {
    let mut sections: HashMap<String, Vec<String>> = HashMap::new();
    sections.insert(UNNAMED_SECTION.to_string(), Vec::new());
    let mut current = UNNAMED_SECTION.to_string();

    for (idx, line) in contents.lines().enumerate() {
        let line = if idx == 0 {
            line.strip_prefix(BOM).unwrap_or(line)
        } else {
            line
        };

        let entry = line.trim_end();
        if entry.is_empty() {
            continue;
        }

        if let Some(header) = header_of(entry) {
            sections.entry(header.to_string()).or_default();
            current = header.to_string();
            continue;
        }

        sections
            .entry(current.clone())
            .or_default()
            .push(entry.to_string());
    }

    Table { sections }
}

pub fn read_table(path: &Path) -> Result<Table, TableError> {
    let contents = std::fs::read_to_string(path).map_err(|source| TableError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let table = parse_table(&contents);
    log::debug!(
        "read {} sections from {}",
        table.sections.len(),
        path.to_string_lossy()
    );
    Ok(table)
}
