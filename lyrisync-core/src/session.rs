//! Editing session state: lyric text, markers and staged adjustments.

use crate::config::EditingConfig;
use crate::engine::{self, ImportedLyrics};
use crate::error::{CoreError, Result};
use crate::lrc::{LrcFile, LrcMetadata};
use crate::lyrics::{join_lyrics, split_lyrics};
use crate::markers::{MarkerId, MarkerStore, TimeMarker};
use tracing::{debug, info, warn};

/// Owns the lyric lines and markers of one editing session.
///
/// Every mutation runs to completion before returning, so derived values
/// (active line, LRC text) always observe reconciled state.
#[derive(Debug, Clone)]
pub struct LyricSession {
    raw_text: String,
    lines: Vec<String>,
    markers: MarkerStore,
    metadata: LrcMetadata,
    global_delay: f64,
    nudge_step: f64,
}

impl Default for LyricSession {
    fn default() -> Self {
        Self::new(&EditingConfig::default())
    }
}

impl LyricSession {
    /// Create an empty session
    #[must_use]
    pub fn new(config: &EditingConfig) -> Self {
        Self {
            raw_text: String::new(),
            lines: Vec::new(),
            markers: MarkerStore::new(),
            metadata: LrcMetadata::default(),
            global_delay: 0.0,
            nudge_step: config.nudge_step_secs,
        }
    }

    /// Replace the raw lyric text, re-split it and drop markers left without a line
    pub fn set_lyrics_text(&mut self, text: &str) {
        self.raw_text = text.to_string();
        self.lines = split_lyrics(text);
        self.markers.reconcile(self.lines.len());
        debug!(
            "Lyrics updated: {} line(s), {} marker(s)",
            self.lines.len(),
            self.markers.len()
        );
    }

    #[must_use]
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    #[must_use]
    pub fn lyrics(&self) -> &[String] {
        &self.lines
    }

    #[must_use]
    pub fn markers(&self) -> &MarkerStore {
        &self.markers
    }

    #[must_use]
    pub fn metadata(&self) -> &LrcMetadata {
        &self.metadata
    }

    /// Place a marker at `time` on the first line without one
    pub fn add_marker(&mut self, time: f64) -> Option<MarkerId> {
        let id = self
            .markers
            .add(time, self.lines.len())
            .map(|marker| marker.id.clone());

        if id.is_none() {
            debug!("No unmarked line left for a marker at {time:.2}s");
        }
        id
    }

    /// Move a marker; unknown ids are ignored
    pub fn update_marker(&mut self, id: &MarkerId, time: f64) -> bool {
        self.markers.update(id, time)
    }

    /// Remove a marker; unknown ids are ignored
    pub fn remove_marker(&mut self, id: &MarkerId) -> bool {
        self.markers.remove(id)
    }

    /// Stage a delay to be applied to every marker later
    pub fn set_global_delay(&mut self, delta: f64) {
        self.global_delay = delta;
    }

    #[must_use]
    pub const fn global_delay(&self) -> f64 {
        self.global_delay
    }

    /// Apply the staged delay to every marker and reset it to zero.
    ///
    /// Returns `false` when nothing was staged.
    pub fn apply_global_delay(&mut self) -> bool {
        if self.global_delay == 0.0 || !self.global_delay.is_finite() {
            self.global_delay = 0.0;
            return false;
        }

        info!("Applying global delay of {:+.2}s", self.global_delay);
        self.markers.apply_delay(self.global_delay);
        self.global_delay = 0.0;
        true
    }

    /// Shift every marker by `delta` seconds
    pub fn nudge(&mut self, delta: f64) {
        self.markers.nudge_all(delta);
    }

    /// Shift every marker later by one nudge step
    pub fn nudge_forward(&mut self) {
        self.nudge(self.nudge_step);
    }

    /// Shift every marker earlier by one nudge step
    pub fn nudge_backward(&mut self) {
        self.nudge(-self.nudge_step);
    }

    #[must_use]
    pub const fn nudge_step(&self) -> f64 {
        self.nudge_step
    }

    /// Lyric line active at `current_time`
    #[must_use]
    pub fn active_line(&self, current_time: f64) -> Option<usize> {
        engine::resolve_active_line(self.markers.as_slice(), current_time)
    }

    /// Markers in time order, each with the text of its line
    #[must_use]
    pub fn timeline(&self) -> Vec<(&TimeMarker, &str)> {
        self.markers
            .iter()
            .filter_map(|marker| {
                self.lines
                    .get(marker.lyric_index)
                    .map(|line| (marker, line.as_str()))
            })
            .collect()
    }

    /// Replace the session with the contents of an LRC document.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::LrcParseError`] if the document holds no timed
    /// lyric line. The session is left untouched on error.
    pub fn import_lrc(&mut self, content: &str) -> Result<()> {
        let file = LrcFile::parse(content);
        let ImportedLyrics { lines, markers } = engine::from_import(&file);
        if lines.is_empty() {
            let err = CoreError::LrcParseError {
                reason: "document contains no timed lyric lines".to_string(),
            };
            warn!("Error importing LRC file: {err}");
            return Err(err);
        }

        info!(
            "Imported {} lyric line(s) with {} marker(s)",
            lines.len(),
            markers.len()
        );

        self.raw_text = join_lyrics(&lines);
        self.lines = lines;
        self.markers = markers;
        self.metadata = file.metadata;
        self.global_delay = 0.0;
        Ok(())
    }

    /// Import an LRC document from raw bytes
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::LrcEncodingError`] for non UTF-8 input, or any
    /// error of [`Self::import_lrc`]. The session is left untouched on error.
    pub fn import_lrc_bytes(&mut self, content: &[u8]) -> Result<()> {
        let text = std::str::from_utf8(content).map_err(|e| {
            warn!("Error importing LRC file: {e}");
            CoreError::from(e)
        })?;
        self.import_lrc(text)
    }

    /// Render the current lines and markers as LRC text
    #[must_use]
    pub fn export_lrc(&self) -> String {
        engine::to_export(&self.lines, self.markers.as_slice())
    }

    /// Render LRC text, optionally preceded by the imported ID tags
    #[must_use]
    pub fn export_document(&self, include_metadata: bool) -> String {
        let body = self.export_lrc();
        if include_metadata && !self.metadata.is_empty() {
            format!("{}{body}", self.metadata.to_header())
        } else {
            body
        }
    }
}
