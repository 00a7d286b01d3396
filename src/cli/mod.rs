use anyhow::Context;
use clap::Parser;
use rand::Rng;
use std::{
    io::{BufRead, IsTerminal, Write},
    path::PathBuf,
    process::ExitCode,
};

use crate::{
    config::Config,
    domain::{
        album::AlbumMetadata,
        change::{FileChange, build_changes},
    },
    farewell::farewell,
    library::{
        fs::discover_audio_files,
        tags::{LoftyTagWriter, TagWriter, save_changes},
    },
    matcher::SkipSet,
    review::{Prompter, Review, ReviewOutcome, display::Style},
    table::read_table,
};

#[derive(Parser)]
#[command(name = "albumtag")]
#[command(version = "0.1")]
#[command(about = "Put the metadata! Tags an album's audio files from a tracklist")]
pub struct Cli {
    /// Path to the album metadata table
    pub input: PathBuf,

    /// Path to an optional settings TOML file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory holding the audio files, defaults to the current one
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Print plain text without colors
    #[arg(long)]
    pub no_color: bool,

    /// Review the changes but do not write any tags
    #[arg(long)]
    pub dry_run: bool,
}

/// Everything one run needs, resolved from the CLI and the config file
#[derive(Debug, Clone)]
pub struct Settings {
    pub table: PathBuf,
    pub directory: PathBuf,
    pub extensions: Vec<String>,
    pub skip: SkipSet,
    pub color: bool,
    pub farewell: bool,
    pub dry_run: bool,
}

impl Settings {
    pub fn new(cli: Cli, config: Config) -> Self {
        let color = resolve_color(
            config.output.color,
            cli.no_color,
            std::io::stdout().is_terminal(),
        );
        Self {
            table: cli.input,
            directory: cli.dir.unwrap_or(config.discovery.directory),
            extensions: config.discovery.extensions,
            skip: config.matching.skip_set,
            color,
            farewell: config.output.farewell,
            dry_run: cli.dry_run,
        }
    }

    fn style(&self) -> Style {
        Style {
            color: self.color,
            skip: self.skip,
        }
    }
}

/// `--no-color` wins, then the config file, then whether stdout is a terminal
fn resolve_color(configured: Option<bool>, no_color: bool, is_terminal: bool) -> bool {
    !no_color && configured.unwrap_or(is_terminal)
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    InvalidTable,
    NoAudioFiles,
    Quit,
    DryRun,
    Saved { failed: usize },
}

impl RunStatus {
    pub fn is_failure(self) -> bool {
        match self {
            RunStatus::InvalidTable => true,
            RunStatus::Saved { failed } => failed > 0,
            RunStatus::NoAudioFiles | RunStatus::Quit | RunStatus::DryRun => false,
        }
    }

    pub fn exit_code(self) -> ExitCode {
        if self.is_failure() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }
}

/// Entrypoint for CLI
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = Config::load_or_default(cli.config.as_deref()).and_then(|config| {
        let settings = Settings::new(cli, config);
        let stdin = std::io::stdin();
        let prompter = Prompter::new(stdin.lock(), std::io::stdout());
        tag_album(
            &settings,
            prompter,
            &mut LoftyTagWriter,
            &mut rand::thread_rng(),
        )
    });

    match result {
        Ok(status) => status.exit_code(),
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Reads the table, matches and reviews the files, then writes the tags.
///
/// Nothing is written unless the review is accepted.
pub fn tag_album<R: BufRead, W: Write>(
    settings: &Settings,
    mut prompter: Prompter<R, W>,
    writer: &mut impl TagWriter,
    rng: &mut impl Rng,
) -> anyhow::Result<RunStatus> {
    let album = match read_table(&settings.table) {
        Ok(table) => match AlbumMetadata::from_table(&table) {
            Ok(album) => album,
            Err(err) => return report_invalid_table(&mut prompter, &err),
        },
        Err(err) => return report_invalid_table(&mut prompter, &err),
    };
    prompter.println(&format!(
        "Read album metadata from {}",
        settings.table.to_string_lossy()
    ))?;
    log::info!(
        "album \"{}\" by \"{}\" with {} tracks",
        album.album,
        album.artist,
        album.tracklist.len()
    );

    let paths = discover_audio_files(&settings.directory, &settings.extensions)
        .context("Failed to look for audio files")?;
    if paths.is_empty() {
        prompter.println(&format!(
            "No audio files ({}) found in {}",
            settings.extensions.join(", "),
            settings.directory.to_string_lossy()
        ))?;
        return Ok(RunStatus::NoAudioFiles);
    }
    let changes = build_changes(paths, &album.tracklist, settings.skip);

    let mut review = Review::new(prompter, &album.tracklist, settings.style());
    let outcome = review.run(changes)?;
    let mut prompter = review.into_prompter();

    let changes = match outcome {
        ReviewOutcome::Confirmed(changes) => changes,
        ReviewOutcome::Quit => {
            prompter.println("Quitting...")?;
            prompter.println("No changes were made to the files.")?;
            return Ok(RunStatus::Quit);
        }
    };
    print_plan(&mut prompter, &changes)?;

    if settings.dry_run {
        prompter.println("Dry run, no files were changed.")?;
        return Ok(RunStatus::DryRun);
    }

    let report = save_changes(&changes, &album, writer);
    for (path, err) in &report.failed {
        prompter.println(&format!(
            "Could not tag {}: {err}",
            path.to_string_lossy()
        ))?;
    }
    if !report.is_success() {
        prompter.println(&format!(
            "{} of {} files could not be tagged.",
            report.failed.len(),
            report.failed.len() + report.written.len()
        ))?;
        return Ok(RunStatus::Saved {
            failed: report.failed.len(),
        });
    }

    prompter.println("Changes saved to files!")?;
    if settings.farewell {
        prompter.println(farewell(rng))?;
    }
    Ok(RunStatus::Saved { failed: 0 })
}

fn report_invalid_table<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    err: &dyn std::error::Error,
) -> anyhow::Result<RunStatus> {
    log::debug!("metadata table rejected: {err}");
    prompter.println(&format!("Error: {err}"))?;
    prompter.println("Fix error and run script again")?;
    Ok(RunStatus::InvalidTable)
}

fn print_plan<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    changes: &[FileChange],
) -> std::io::Result<()> {
    let tagged = changes.iter().filter(|change| change.track.is_some()).count();
    prompter.println(&format!(
        "{tagged} files will be tagged, {} left unchanged",
        changes.len() - tagged
    ))
}

#[cfg(test)]
mod tests {
    use std::{
        io::Cursor,
        path::{Path, PathBuf},
    };

    use rand::{SeedableRng, rngs::StdRng};
    use tempfile::TempDir;

    use super::*;
    use crate::library::{error::LibraryError, tags::TrackTags};

    const TABLE: &str = "\u{feff}[artist]\nThe Band\n\n[album]\nRecord\n\n[tracklist]\nIntro\nSecond Song\nOutro\n";

    #[derive(Default)]
    struct RecordingWriter {
        writes: Vec<(String, String, u32)>,
    }

    impl TagWriter for RecordingWriter {
        fn write(&mut self, path: &Path, tags: &TrackTags<'_>) -> Result<(), LibraryError> {
            let name = path.file_name().unwrap().to_string_lossy().into_owned();
            self.writes
                .push((name, tags.title.to_string(), tags.track_number));
            Ok(())
        }
    }

    fn setup(table: &str, files: &[&str]) -> anyhow::Result<(TempDir, Settings)> {
        let tmp = TempDir::new()?;
        let table_path = tmp.path().join("album.txt");
        std::fs::write(&table_path, table)?;

        let music = tmp.path().join("music");
        std::fs::create_dir(&music)?;
        for file in files {
            std::fs::write(music.join(file), b"audio")?;
        }

        let settings = Settings {
            table: table_path,
            directory: music,
            extensions: vec!["mp3".to_string()],
            skip: SkipSet::Extended,
            color: false,
            farewell: true,
            dry_run: false,
        };
        Ok((tmp, settings))
    }

    fn run_with(
        settings: &Settings,
        input: &str,
    ) -> anyhow::Result<(RunStatus, RecordingWriter, String)> {
        let mut writer = RecordingWriter::default();
        let mut out = Vec::new();
        let prompter = Prompter::new(Cursor::new(input.to_string()), &mut out);
        let status = tag_album(
            settings,
            prompter,
            &mut writer,
            &mut StdRng::seed_from_u64(1),
        )?;
        Ok((status, writer, String::from_utf8(out)?))
    }

    #[test]
    fn test_accept_matches_and_write() -> anyhow::Result<()> {
        let (_tmp, settings) = setup(
            TABLE,
            &["02 - second song.mp3", "01 intro.mp3", "notes.txt"],
        )?;

        let (status, writer, output) = run_with(&settings, "\n")?;

        assert_eq!(status, RunStatus::Saved { failed: 0 });
        assert_eq!(
            writer.writes,
            vec![
                ("01 intro.mp3".to_string(), "Intro".to_string(), 1),
                ("02 - second song.mp3".to_string(), "Second Song".to_string(), 2),
            ]
        );
        assert!(output.contains("Read album metadata from"));
        assert!(output.contains("2 files will be tagged, 0 left unchanged"));
        assert!(output.contains("Changes saved to files!"));
        Ok(())
    }

    #[test]
    fn test_missing_tracklist_touches_nothing() -> anyhow::Result<()> {
        let (_tmp, settings) = setup("[artist]\nA\n[album]\nB\n", &["01 intro.mp3"])?;

        let (status, writer, output) = run_with(&settings, "")?;

        assert_eq!(status, RunStatus::InvalidTable);
        assert!(writer.writes.is_empty());
        assert!(output.contains("Error: No tracklist"));
        assert!(output.contains("Fix error and run script again"));
        assert!(!output.contains(crate::review::PROMPT_CHANGE_SELECT));
        Ok(())
    }

    #[test]
    fn test_cleared_entry_is_not_written() -> anyhow::Result<()> {
        let (_tmp, settings) = setup(
            TABLE,
            &["01 intro.mp3", "02 second song.mp3", "03 outro.mp3"],
        )?;

        let (status, writer, output) = run_with(&settings, "3\n0\n\n")?;

        assert_eq!(status, RunStatus::Saved { failed: 0 });
        assert_eq!(writer.writes.len(), 2);
        assert!(writer.writes.iter().all(|(name, _, _)| name != "03 outro.mp3"));
        assert!(output.contains("2 files will be tagged, 1 left unchanged"));
        Ok(())
    }

    #[test]
    fn test_quit_discards_edits() -> anyhow::Result<()> {
        let (_tmp, settings) = setup(TABLE, &["01 intro.mp3", "bonus.mp3"])?;

        let (status, writer, output) = run_with(&settings, "2\n3\nq\n")?;

        assert_eq!(status, RunStatus::Quit);
        assert!(writer.writes.is_empty());
        assert!(output.contains("Quitting..."));
        assert!(output.contains("No changes were made to the files."));
        Ok(())
    }

    #[test]
    fn test_no_audio_files() -> anyhow::Result<()> {
        let (_tmp, settings) = setup(TABLE, &["cover.jpg"])?;

        let (status, writer, output) = run_with(&settings, "\n")?;

        assert_eq!(status, RunStatus::NoAudioFiles);
        assert!(writer.writes.is_empty());
        assert!(output.contains("No audio files (mp3) found"));
        Ok(())
    }

    #[test]
    fn test_dry_run_writes_nothing() -> anyhow::Result<()> {
        let (_tmp, mut settings) = setup(TABLE, &["01 intro.mp3"])?;
        settings.dry_run = true;

        let (status, writer, output) = run_with(&settings, "\n")?;

        assert_eq!(status, RunStatus::DryRun);
        assert!(writer.writes.is_empty());
        assert!(output.contains("Dry run"));
        Ok(())
    }

    #[test]
    fn test_unreadable_table_reported_like_invalid_table() -> anyhow::Result<()> {
        let (tmp, mut settings) = setup(TABLE, &["01 intro.mp3"])?;
        settings.table = tmp.path().join("nope.txt");

        let (status, writer, output) = run_with(&settings, "\n")?;

        assert_eq!(status, RunStatus::InvalidTable);
        assert!(writer.writes.is_empty());
        assert!(output.contains("Error: failed to read metadata table"));
        assert!(output.contains("nope.txt"));
        assert!(output.contains("Fix error and run script again"));
        assert!(!output.contains(crate::review::PROMPT_CHANGE_SELECT));
        Ok(())
    }

    #[test]
    fn test_settings_prefer_cli_over_config() {
        let cli = Cli::parse_from(["albumtag", "album.txt", "--dir", "/music", "--no-color"]);
        let settings = Settings::new(cli, Config::default());

        assert_eq!(settings.table, PathBuf::from("album.txt"));
        assert_eq!(settings.directory, PathBuf::from("/music"));
        assert!(!settings.color);
        assert!(settings.farewell);
        assert!(!settings.dry_run);
        assert_eq!(settings.skip, SkipSet::Extended);
    }

    #[test]
    fn test_color_follows_terminal_unless_configured() {
        assert!(resolve_color(None, false, true));
        assert!(!resolve_color(None, false, false));
        assert!(resolve_color(Some(true), false, false));
        assert!(!resolve_color(Some(false), false, true));
        assert!(!resolve_color(Some(true), true, true));
    }

    #[test]
    fn test_failure_statuses() {
        assert!(!RunStatus::Quit.is_failure());
        assert!(!RunStatus::NoAudioFiles.is_failure());
        assert!(RunStatus::InvalidTable.is_failure());
        assert!(RunStatus::Saved { failed: 2 }.is_failure());
        assert!(!RunStatus::Saved { failed: 0 }.is_failure());
    }
}
