use crossterm::style::Stylize;

use crate::{
    domain::change::FileChange,
    matcher::{SkipSet, highlight},
};

/// How change lines are rendered
#[derive(Debug, Clone, Copy)]
pub struct Style {
    pub color: bool,
    pub skip: SkipSet,
}

impl Style {
    pub fn plain(skip: SkipSet) -> Self {
        Self { color: false, skip }
    }

    /// One line describing what happens to a file, with the matched part
    /// of its name highlighted
    pub fn render_change(&self, change: &FileChange) -> String {
        let stem = change.stem();
        let Some(track) = &change.track else {
            let line = format!("{stem} will remain unchanged");
            return if self.color {
                line.yellow().to_string()
            } else {
                line
            };
        };

        if !self.color {
            return format!("{stem} -> {track}");
        }

        let name = match highlight(&stem, change.span, self.skip) {
            Some(parts) => format!(
                "{}{}{}",
                parts.prefix.cyan(),
                parts.matched.green(),
                parts.suffix.cyan()
            ),
            None => stem.as_str().cyan().to_string(),
        };
        format!("{name} -> {}", track.as_str().cyan())
    }
}
