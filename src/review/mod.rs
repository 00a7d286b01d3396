//! Interactive review of proposed tag changes
//!
//! The user picks an entry from the numbered change list, then picks the
//! track it should get. An empty line in the list accepts everything, an
//! empty line while editing cancels that edit, `q` quits from anywhere.

use std::io::{self, BufRead, Write};

use crate::{domain::change::FileChange, review::display::Style};

pub mod display;

pub const PROMPT_CHANGE_SELECT: &str =
    "Enter number of any selection you want to change: (empty accepts, 'q' quits) ";
pub const PROMPT_TRACK_SELECT: &str =
    "Select the track number (0 for no title, empty cancels, 'q' quits): ";
pub const OUT_OF_RANGE: &str = "Selection is outside the available range";
const QUIT: &str = "q";

/// What a prompt produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Selected(usize),
    Cancel,
    Done,
    Quit,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ReviewOutcome {
    /// The list the user accepted, edits included
    Confirmed(Vec<FileChange>),
    /// Everything is discarded
    Quit,
}

/// Line based prompt over any input/output pair
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn println(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }

    /// Asks until the answer is an integer within `[lower, upper]` or a signal.
    ///
    /// An empty line yields `on_empty`. Closed input counts as quitting.
    pub fn bounded_integer(
        &mut self,
        prompt: &str,
        (lower, upper): (usize, usize),
        on_empty: Signal,
    ) -> io::Result<Signal> {
        loop {
            write!(self.output, "{prompt}")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                log::debug!("input closed at prompt, quitting");
                return Ok(Signal::Quit);
            }
            let response = line.trim_end_matches(['\n', '\r']);

            if response.is_empty() {
                return Ok(on_empty);
            }
            if response.trim().eq_ignore_ascii_case(QUIT) {
                return Ok(Signal::Quit);
            }

            let Some(choice) = parse_integer(response.trim()) else {
                continue;
            };
            match choice {
                Some(choice) if (lower..=upper).contains(&choice) => {
                    return Ok(Signal::Selected(choice));
                }
                _ => writeln!(self.output, "{OUT_OF_RANGE}")?,
            }
        }
    }
}

/// `None` for text that is not an integer at all.
///
/// An integer that no index can hold (negative or too large) is `Some(None)`.
fn parse_integer(text: &str) -> Option<Option<usize>> {
    let (negative, digits) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let value = digits.parse::<usize>().ok();
    if negative && value != Some(0) {
        return Some(None);
    }
    Some(value)
}

/// One review session over a tracklist
pub struct Review<'a, R, W> {
    prompter: Prompter<R, W>,
    tracklist: &'a [String],
    style: Style,
}

impl<'a, R: BufRead, W: Write> Review<'a, R, W> {
    pub fn new(prompter: Prompter<R, W>, tracklist: &'a [String], style: Style) -> Self {
        Self {
            prompter,
            tracklist,
            style,
        }
    }

    pub fn into_prompter(self) -> Prompter<R, W> {
        self.prompter
    }

    /// Runs until the user accepts the list or quits
    pub fn run(&mut self, mut changes: Vec<FileChange>) -> io::Result<ReviewOutcome> {
        loop {
            self.print_changes(&changes)?;

            let selection = self.prompter.bounded_integer(
                PROMPT_CHANGE_SELECT,
                (1, changes.len()),
                Signal::Done,
            )?;

            let idx = match selection {
                Signal::Selected(choice) => choice - 1,
                Signal::Done => {
                    log::debug!("review accepted with {} entries", changes.len());
                    return Ok(ReviewOutcome::Confirmed(changes));
                }
                Signal::Quit => {
                    log::debug!("review quit, dropping {} entries", changes.len());
                    return Ok(ReviewOutcome::Quit);
                }
                Signal::Cancel => continue,
            };

            match self.edit(&mut changes[idx])? {
                Signal::Quit => {
                    log::debug!("review quit while editing entry {}", idx + 1);
                    return Ok(ReviewOutcome::Quit);
                }
                _ => continue,
            }
        }
    }

    fn print_changes(&mut self, changes: &[FileChange]) -> io::Result<()> {
        self.prompter.println("")?;
        for (idx, change) in changes.iter().enumerate() {
            let line = format!("{} - {}", idx + 1, self.style.render_change(change));
            self.prompter.println(&line)?;
        }
        self.prompter.println("")
    }

    /// Lets the user reassign one entry. Returns the signal that ended the edit.
    fn edit(&mut self, change: &mut FileChange) -> io::Result<Signal> {
        self.prompter.println(&self.style.render_change(change))?;
        for (idx, track) in self.tracklist.iter().enumerate() {
            self.prompter.println(&format!("{} - {}", idx + 1, track))?;
        }
        self.prompter.println("0 - No title")?;
        self.prompter.println("")?;

        let selection = self.prompter.bounded_integer(
            PROMPT_TRACK_SELECT,
            (0, self.tracklist.len()),
            Signal::Cancel,
        )?;

        if let Signal::Selected(choice) = selection {
            let track = choice
                .checked_sub(1)
                .and_then(|idx| self.tracklist.get(idx))
                .cloned();
            change.assign(track);
            self.prompter.println(&self.style.render_change(change))?;
        }
        Ok(selection)
    }
}
