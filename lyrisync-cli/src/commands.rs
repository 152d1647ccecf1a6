//! Command execution. Each command returns the text to print.

use crate::cli::{Command, NudgeDirection};
use crate::error::CliError;
use lyrisync_core::{
    format_timestamp, ActiveLineTracker, LrcLine, LrcMetadata, LyricSession, LyrisyncConfig,
    TimeMarker, LRC_EXTENSION,
};
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// JSON report printed by `inspect`
#[derive(Debug, Serialize)]
struct InspectReport<'a> {
    metadata: &'a LrcMetadata,
    lines: Vec<LrcLine>,
    lyrics: &'a [String],
    markers: &'a [TimeMarker],
}

/// Run a command against a fresh session
pub fn run(command: &Command, config: &LyrisyncConfig) -> Result<String, CliError> {
    let mut session = LyricSession::new(&config.editing);
    let include_metadata = config.export.include_metadata;

    match command {
        Command::Split { path } => {
            session.set_lyrics_text(&read_text(path)?);
            let mut output = String::new();
            for (index, line) in session.lyrics().iter().enumerate() {
                let _ = writeln!(output, "{index:>4}  {line}");
            }
            Ok(output)
        }
        Command::Inspect { path } => {
            session.import_lrc_bytes(&read_lrc(path)?)?;

            let lines = session
                .timeline()
                .into_iter()
                .map(|(marker, text)| LrcLine {
                    time: marker.time,
                    text: text.to_string(),
                })
                .collect();
            let report = InspectReport {
                metadata: session.metadata(),
                lines,
                lyrics: session.lyrics(),
                markers: session.markers().as_slice(),
            };
            let mut output = serde_json::to_string_pretty(&report)?;
            output.push('\n');
            Ok(output)
        }
        Command::Shift { path, seconds } => {
            session.import_lrc_bytes(&read_lrc(path)?)?;
            session.set_global_delay(*seconds);
            session.apply_global_delay();
            Ok(session.export_document(include_metadata))
        }
        Command::Nudge {
            path,
            direction,
            count,
        } => {
            session.import_lrc_bytes(&read_lrc(path)?)?;
            for _ in 0..*count {
                match direction {
                    NudgeDirection::Forward => session.nudge_forward(),
                    NudgeDirection::Backward => session.nudge_backward(),
                }
            }
            Ok(session.export_document(include_metadata))
        }
        Command::At { path, times } => {
            session.import_lrc_bytes(&read_lrc(path)?)?;
            let mut tracker = ActiveLineTracker::new();
            let mut output = String::new();

            for &time in times {
                let Some(change) = tracker.observe(session.markers().as_slice(), time) else {
                    debug!("Active line unchanged at {time:.2}s");
                    continue;
                };
                let stamp = format_timestamp(time);
                match change.current.and_then(|index| {
                    session.lyrics().get(index).map(|line| (index, line))
                }) {
                    Some((index, line)) => {
                        let _ = writeln!(output, "{stamp} {index}: {line}");
                    }
                    None => {
                        let _ = writeln!(output, "{stamp} -");
                    }
                }
            }
            Ok(output)
        }
        Command::Tap { path, times } => {
            session.set_lyrics_text(&read_text(path)?);
            for &time in times {
                if session.add_marker(time).is_none() {
                    warn!("Every line already has a marker, ignoring {time:.2}s");
                }
            }
            Ok(session.export_document(include_metadata))
        }
    }
}

/// Only `.lrc` files are accepted for import
pub fn ensure_lrc_extension(path: &Path) -> Result<(), CliError> {
    let is_lrc = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(LRC_EXTENSION));

    if is_lrc {
        Ok(())
    } else {
        Err(CliError::NotLrcFile {
            path: path.to_path_buf(),
        })
    }
}

/// Raw bytes, so encoding problems surface as an import error
fn read_lrc(path: &Path) -> Result<Vec<u8>, CliError> {
    ensure_lrc_extension(path)?;
    fs::read(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn read_text(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}
