pub mod config;
pub mod engine;
pub mod error;
pub mod lrc;
pub mod lyrics;
pub mod markers;
pub mod paths;
pub mod session;
pub mod time;

pub use config::{EditingConfig, ExportConfig, LoggingConfig, LyrisyncConfig, CONFIG_TEMPLATE};
pub use engine::{
    from_import, line_status, resolve_active_line, to_export, visible_lines, ActiveLineChange,
    ActiveLineTracker, ImportedLyrics, LineStatus,
};
pub use error::{CoreError, Result};
pub use lrc::{format_timestamp, parse_timestamp, serialize, LrcFile, LrcLine, LrcMetadata};
pub use lyrics::{join_lyrics, split_lyrics};
pub use markers::{MarkerId, MarkerStore, TimeMarker};
pub use paths::{
    config_dir, config_path, log_file_path, CONFIG_DIR_NAME, CONFIG_FILE_NAME, LOG_FILE_NAME,
    LRC_EXTENSION,
};
pub use session::LyricSession;
pub use time::SecondsExt;
