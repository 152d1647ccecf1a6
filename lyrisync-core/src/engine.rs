//! Lyric timing: active-line resolution and LRC import/export.

use crate::lrc::{self, LrcFile};
use crate::markers::{MarkerStore, TimeMarker};
use std::collections::HashMap;

/// Find the active lyric line at `current_time`.
///
/// The active line belongs to the latest marker whose time is not after
/// `current_time`; among markers with equal times the later one in the
/// slice wins. Returns `None` before the first marker or when there are none.
#[must_use]
pub fn resolve_active_line(markers: &[TimeMarker], current_time: f64) -> Option<usize> {
    let mut active: Option<&TimeMarker> = None;

    for marker in markers {
        // NaN on either side never qualifies
        let reached = marker.time <= current_time;
        if !reached {
            continue;
        }
        if active.is_none_or(|best| marker.time >= best.time) {
            active = Some(marker);
        }
    }

    active.map(|marker| marker.lyric_index)
}

/// A change in the resolved active line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveLineChange {
    pub previous: Option<usize>,
    pub current: Option<usize>,
}

/// Remembers the last resolved line so callers can skip redundant updates
/// on every playback tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveLineTracker {
    current: Option<usize>,
}

impl ActiveLineTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last resolved line
    #[must_use]
    pub const fn current(&self) -> Option<usize> {
        self.current
    }

    /// Resolve the active line and report it only when it differs from the last one
    pub fn observe(
        &mut self,
        markers: &[TimeMarker],
        current_time: f64,
    ) -> Option<ActiveLineChange> {
        let resolved = resolve_active_line(markers, current_time);
        if resolved == self.current {
            return None;
        }

        let change = ActiveLineChange {
            previous: self.current,
            current: resolved,
        };
        self.current = resolved;
        Some(change)
    }

    /// Forget the last resolved line
    pub fn reset(&mut self) {
        self.current = None;
    }
}

/// Lyric lines and markers recovered from an LRC file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedLyrics {
    pub lines: Vec<String>,
    pub markers: MarkerStore,
}

/// Convert a parsed LRC file into lyric lines and markers.
///
/// Identical texts collapse into one lyric line (first occurrence wins the
/// position), and every timed LRC line becomes its own marker. Repeated lines
/// therefore map several markers onto one lyric index.
///
/// Timed lines without text (e.g. a closing `[03:12.00]`) are skipped: the
/// splitter never yields an empty lyric line, so keeping one would shift
/// marker indices on the next text edit.
#[must_use]
pub fn from_import(file: &LrcFile) -> ImportedLyrics {
    let mut lines: Vec<String> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut markers = Vec::with_capacity(file.lines.len());

    for line in file.lines.iter().filter(|line| !line.text.is_empty()) {
        let lyric_index = *positions.entry(line.text.as_str()).or_insert_with(|| {
            lines.push(line.text.clone());
            lines.len() - 1
        });
        markers.push(TimeMarker::new(line.time, lyric_index));
    }

    ImportedLyrics {
        lines,
        markers: MarkerStore::from_markers(markers),
    }
}

/// Render lyric lines and markers as LRC text.
///
/// Each line takes the time of the last marker pointing at it; lines without
/// a marker are left out.
#[must_use]
pub fn to_export<S: AsRef<str>>(lines: &[S], markers: &[TimeMarker]) -> String {
    let mut times: Vec<Option<f64>> = vec![None; lines.len()];

    for marker in markers {
        if let Some(slot) = times.get_mut(marker.lyric_index) {
            *slot = Some(marker.time);
        }
    }

    lrc::serialize(lines, &times)
}

/// Where a lyric line sits relative to the active line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStatus {
    Past,
    Current,
    Upcoming,
}

/// Classify line `index` against the active line
#[must_use]
pub fn line_status(index: usize, active: Option<usize>) -> LineStatus {
    match active {
        Some(active) if index == active => LineStatus::Current,
        Some(active) if index < active => LineStatus::Past,
        _ => LineStatus::Upcoming,
    }
}

/// Get lines around the active line for display
#[must_use]
pub fn visible_lines<S>(lines: &[S], active: Option<usize>, before: usize, after: usize) -> &[S] {
    if lines.is_empty() {
        return lines;
    }

    let current_idx = active.unwrap_or(0).min(lines.len() - 1);
    let start = current_idx.saturating_sub(before);
    let end = current_idx.saturating_add(after).saturating_add(1).min(lines.len());

    &lines[start..end]
}
