//! Time markers tying playback times to lyric lines.

use crate::time::SecondsExt;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Process-wide sequence for marker ids
static NEXT_MARKER_SEQ: AtomicU64 = AtomicU64::new(0);

/// Opaque marker identifier, unique for the lifetime of the process
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MarkerId(String);

impl MarkerId {
    /// Allocate a fresh id for a marker on `lyric_index`
    #[must_use]
    pub fn next(lyric_index: usize) -> Self {
        let seq = NEXT_MARKER_SEQ.fetch_add(1, Ordering::Relaxed);
        Self(format!("marker-{seq}-{lyric_index}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MarkerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A playback time associated with one lyric line
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeMarker {
    pub id: MarkerId,
    /// Time in seconds
    pub time: f64,
    /// Index into the current lyric lines
    pub lyric_index: usize,
}

impl TimeMarker {
    /// Create a marker with a freshly allocated id
    #[must_use]
    pub fn new(time: f64, lyric_index: usize) -> Self {
        Self {
            id: MarkerId::next(lyric_index),
            time,
            lyric_index,
        }
    }
}

/// Owns the marker set and keeps it in ascending time order.
///
/// Interactive `add` never assigns two markers to the same line. Markers built
/// from an imported file may share a line (repeated LRC lines).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerStore {
    markers: Vec<TimeMarker>,
}

impl MarkerStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from arbitrary markers, sorting them by time
    #[must_use]
    pub fn from_markers(markers: Vec<TimeMarker>) -> Self {
        let mut store = Self { markers };
        store.sort();
        store
    }

    /// Place a marker on the first lyric line that has none yet.
    ///
    /// Returns `None` (and changes nothing) when every one of the
    /// `line_count` lines already carries a marker.
    pub fn add(&mut self, time: f64, line_count: usize) -> Option<&TimeMarker> {
        let claimed: HashSet<usize> = self.markers.iter().map(|m| m.lyric_index).collect();
        let lyric_index = (0..line_count).find(|index| !claimed.contains(index))?;

        let marker = TimeMarker::new(time, lyric_index);
        let id = marker.id.clone();
        debug!("Adding marker {id} for line {lyric_index} at {time:.2}s");

        self.markers.push(marker);
        self.sort();
        self.get(&id)
    }

    /// Move a marker to a new time. Returns `false` if the id is unknown.
    ///
    /// The time is taken as-is; bounding it to the track length is up to the caller.
    pub fn update(&mut self, id: &MarkerId, time: f64) -> bool {
        let Some(marker) = self.markers.iter_mut().find(|m| &m.id == id) else {
            return false;
        };

        marker.time = time;
        self.sort();
        true
    }

    /// Delete a marker. Returns `false` if the id is unknown.
    pub fn remove(&mut self, id: &MarkerId) -> bool {
        let before = self.markers.len();
        self.markers.retain(|m| &m.id != id);
        before != self.markers.len()
    }

    /// Drop every marker pointing past the last of `line_count` lines.
    ///
    /// Returns the number of markers dropped.
    pub fn reconcile(&mut self, line_count: usize) -> usize {
        let before = self.markers.len();
        self.markers.retain(|m| m.lyric_index < line_count);

        let dropped = before - self.markers.len();
        if dropped > 0 {
            debug!("Dropped {dropped} marker(s) beyond line {line_count}");
        }
        dropped
    }

    /// Shift every marker by `delta` seconds, clamping at zero
    pub fn apply_delay(&mut self, delta: f64) {
        for marker in &mut self.markers {
            marker.time = marker.time.shifted_clamped(delta);
        }
        self.sort();
    }

    /// Shift every marker by a small step; same clamping as [`Self::apply_delay`]
    pub fn nudge_all(&mut self, delta: f64) {
        self.apply_delay(delta);
    }

    #[must_use]
    pub fn get(&self, id: &MarkerId) -> Option<&TimeMarker> {
        self.markers.iter().find(|m| &m.id == id)
    }

    /// Markers assigned to `lyric_index`, in time order
    pub fn for_line(&self, lyric_index: usize) -> impl Iterator<Item = &TimeMarker> {
        self.markers
            .iter()
            .filter(move |m| m.lyric_index == lyric_index)
    }

    /// Markers in ascending time order
    pub fn iter(&self) -> std::slice::Iter<'_, TimeMarker> {
        self.markers.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[TimeMarker] {
        &self.markers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    fn sort(&mut self) {
        self.markers.sort_by(|a, b| a.time.total_cmp(&b.time));
    }
}

impl<'a> IntoIterator for &'a MarkerStore {
    type Item = &'a TimeMarker;
    type IntoIter = std::slice::Iter<'a, TimeMarker>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
