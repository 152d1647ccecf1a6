use crate::time::SecondsExt;
use serde::Serialize;
use std::collections::BTreeMap;

/// Timestamp emitted for times that cannot be represented
pub const ZERO_TIMESTAMP: &str = "[00:00.00]";

/// Parsed LRC file containing metadata and synchronized lines
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LrcFile {
    pub lines: Vec<LrcLine>,
    pub metadata: LrcMetadata,
}

/// LRC metadata from ID tags, keyed by tag name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LrcMetadata {
    tags: BTreeMap<String, String>,
}

/// A single line of lyrics with its start time in seconds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LrcLine {
    pub time: f64,
    pub text: String,
}

impl LrcFile {
    /// Parse an LRC string into an `LrcFile`.
    ///
    /// Never fails: blank lines and lines carrying neither a timestamp nor an
    /// ID tag are dropped. Lines come back sorted by time, ties keeping their
    /// input order.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let mut metadata = LrcMetadata::default();
        let mut lines = Vec::new();

        for line in input.lines() {
            if line.trim().is_empty() {
                continue;
            }

            // ID tags take precedence over lyric content
            if let Some((key, value)) = parse_id_tag(line) {
                metadata.insert(key, value);
                continue;
            }

            let tokens = find_timestamp_tokens(line);
            let Some(last) = tokens.last() else {
                continue;
            };

            // Text after the last timestamp is shared by every timestamp on the line
            let text = line[last.end..].trim();
            lines.extend(tokens.iter().map(|token| LrcLine {
                time: token.seconds,
                text: text.to_string(),
            }));
        }

        // Stable sort keeps input order for equal times
        lines.sort_by(|a, b| a.time.total_cmp(&b.time));

        Self { lines, metadata }
    }

    /// Whether the file holds no timed lines
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl LrcMetadata {
    /// Insert or replace a tag value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.tags.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.get("ti")
    }

    #[must_use]
    pub fn artist(&self) -> Option<&str> {
        self.get("ar")
    }

    #[must_use]
    pub fn album(&self) -> Option<&str> {
        self.get("al")
    }

    #[must_use]
    pub fn author(&self) -> Option<&str> {
        self.get("au")
    }

    /// Creator of the LRC file itself
    #[must_use]
    pub fn creator(&self) -> Option<&str> {
        self.get("by")
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Render every tag as an `[key:value]` line, ordered by key
    #[must_use]
    pub fn to_header(&self) -> String {
        let mut header = String::new();
        for (key, value) in self.iter() {
            header.push('[');
            header.push_str(key);
            header.push(':');
            header.push_str(value);
            header.push_str("]\n");
        }
        header
    }
}

/// Format seconds as an LRC timestamp `[mm:ss.xx]`.
///
/// Hundredths are truncated, not rounded. Negative and non-finite input
/// formats as [`ZERO_TIMESTAMP`].
#[must_use]
pub fn format_timestamp(seconds: f64) -> String {
    seconds.to_clock_parts().map_or_else(
        || ZERO_TIMESTAMP.to_string(),
        |parts| {
            format!(
                "[{:02}:{:02}.{:02}]",
                parts.minutes, parts.seconds, parts.hundredths
            )
        },
    )
}

/// Parse the first `[mm:ss.xx]` token found in `token` into seconds.
///
/// Returns `0.0` when no well-formed token is present.
#[must_use]
pub fn parse_timestamp(token: &str) -> f64 {
    find_timestamp_tokens(token)
        .first()
        .map_or(0.0, |token| token.seconds)
}

/// Serialize lyric lines and their optional times into LRC text.
///
/// Entries without a time, or with an empty line, are skipped. Output follows
/// the input index order.
#[must_use]
pub fn serialize<S: AsRef<str>>(lines: &[S], times: &[Option<f64>]) -> String {
    let mut output = String::new();

    for (line, time) in lines.iter().zip(times) {
        let line = line.as_ref();
        let Some(time) = time else {
            continue;
        };
        if line.is_empty() {
            continue;
        }

        output.push_str(&format_timestamp(*time));
        output.push_str(line);
        output.push('\n');
    }

    output
}

/// A `[mm:ss.xx]` token located within a line
#[derive(Debug, Clone, Copy, PartialEq)]
struct TimestampToken {
    /// Byte offset just past the closing bracket
    end: usize,
    seconds: f64,
}

/// Find every non-overlapping `[mm:ss.xx]` token in a line, left to right
fn find_timestamp_tokens(line: &str) -> Vec<TimestampToken> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while let Some(offset) = line[pos..].find('[') {
        let start = pos + offset;
        if let Some(token) = match_timestamp_at(line, start) {
            pos = token.end;
            tokens.push(token);
        } else {
            // '[' is one byte, so this stays on a char boundary
            pos = start + 1;
        }
    }

    tokens
}

/// Match `[digits:digits.digits]` starting exactly at `start`
fn match_timestamp_at(line: &str, start: usize) -> Option<TimestampToken> {
    let rest = line[start..].strip_prefix('[')?;
    let (minutes, rest) = take_digits(rest)?;
    let rest = rest.strip_prefix(':')?;
    let (seconds, rest) = take_digits(rest)?;
    let rest = rest.strip_prefix('.')?;
    let (hundredths, rest) = take_digits(rest)?;
    let rest = rest.strip_prefix(']')?;

    Some(TimestampToken {
        end: line.len() - rest.len(),
        seconds: minutes * 60.0 + seconds + hundredths / 100.0,
    })
}

/// Consume a non-empty run of ASCII digits
fn take_digits(s: &str) -> Option<(f64, &str)> {
    let len = s.bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 {
        return None;
    }

    let value = s[..len].parse().ok()?;
    Some((value, &s[len..]))
}

/// Parse an ID tag like [ti:Title] or [ar:Artist] opening the line
fn parse_id_tag(line: &str) -> Option<(String, String)> {
    let content = line.trim_start().strip_prefix('[')?;
    let colon = content.find(':')?;
    let key = &content[..colon];

    // Timestamps have numeric keys; only letter keys are tags
    if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    let rest = &content[colon + 1..];
    let end = rest.find(']')?;
    Some((key.to_string(), rest[..end].trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp_truncates_hundredths() {
        assert_eq!(format_timestamp(65.256), "[01:05.25]");
    }

    #[test]
    fn test_format_timestamp_invalid() {
        assert_eq!(format_timestamp(-1.0), ZERO_TIMESTAMP);
        assert_eq!(format_timestamp(f64::NAN), ZERO_TIMESTAMP);
        assert_eq!(format_timestamp(f64::INFINITY), ZERO_TIMESTAMP);
    }

    #[test]
    fn test_format_timestamp_padding() {
        assert_eq!(format_timestamp(0.0), "[00:00.00]");
        assert_eq!(format_timestamp(3.5), "[00:03.50]");
        assert_eq!(format_timestamp(6000.0), "[100:00.00]");
    }

    #[test]
    fn test_parse_timestamp() {
        assert!((parse_timestamp("[01:23.45]") - 83.45).abs() < 1e-9);
        assert!((parse_timestamp("[00:00.50]") - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_parse_timestamp_malformed() {
        assert_eq!(parse_timestamp("01:23.45"), 0.0);
        assert_eq!(parse_timestamp("[01:23]"), 0.0);
        assert_eq!(parse_timestamp("[ab:cd.ef]"), 0.0);
        assert_eq!(parse_timestamp(""), 0.0);
    }

    #[test]
    fn test_parse_sample_document() {
        let result = LrcFile::parse("[00:01.00]Hello\n[00:02.00]World\n[ar:Someone]");
        assert_eq!(result.lines.len(), 2);
        assert_eq!(result.lines[0].text, "Hello");
        assert_eq!(result.lines[0].time, 1.0);
        assert_eq!(result.lines[1].text, "World");
        assert_eq!(result.lines[1].time, 2.0);
        assert_eq!(result.metadata.len(), 1);
        assert_eq!(result.metadata.artist(), Some("Someone"));
    }

    #[test]
    fn test_parse_id_tags() {
        let input = r"
[ti:Song Title]
[ar:Artist Name]
[al:Album Name]
[by: someone ]
[00:05.00]Lyrics here
";
        let result = LrcFile::parse(input);
        assert_eq!(result.metadata.title(), Some("Song Title"));
        assert_eq!(result.metadata.artist(), Some("Artist Name"));
        assert_eq!(result.metadata.album(), Some("Album Name"));
        assert_eq!(result.metadata.creator(), Some("someone"));
        assert_eq!(result.lines.len(), 1);
    }

    #[test]
    fn test_parse_multi_timestamp_line() {
        let result = LrcFile::parse("[00:10.00][00:40.00]Chorus line");
        assert_eq!(result.lines.len(), 2);
        assert_eq!(result.lines[0].time, 10.0);
        assert_eq!(result.lines[1].time, 40.0);
        assert!(result.lines.iter().all(|l| l.text == "Chorus line"));
    }

    #[test]
    fn test_parse_text_after_last_token() {
        let result = LrcFile::parse("[00:01.00]first [00:02.00]  second  ");
        assert_eq!(result.lines.len(), 2);
        assert_eq!(result.lines[0].text, "second");
        assert_eq!(result.lines[1].text, "second");
    }

    #[test]
    fn test_parse_sorts_stably() {
        let input = "[00:02.00]B\n[00:01.00]A\n[00:02.00]C";
        let result = LrcFile::parse(input);
        let texts: Vec<_> = result.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_parse_drops_unrecognized_lines() {
        let input = "plain text\n\n   \n[00:01.00]Kept\n[12:34]no hundredths\n[1a:00.00]bad";
        let result = LrcFile::parse(input);
        assert_eq!(result.lines.len(), 1);
        assert_eq!(result.lines[0].text, "Kept");
        assert!(result.metadata.is_empty());
    }

    #[test]
    fn test_parse_empty_text_line() {
        let result = LrcFile::parse("[00:03.00]");
        assert_eq!(result.lines.len(), 1);
        assert_eq!(result.lines[0].text, "");
    }

    #[test]
    fn test_parse_crlf_and_cjk() {
        let result = LrcFile::parse("[00:05.00]你好世界\r\n[ti:标题]\r\n");
        assert_eq!(result.lines[0].text, "你好世界");
        assert_eq!(result.metadata.title(), Some("标题"));
    }

    #[test]
    fn test_numeric_key_is_not_a_tag() {
        assert!(parse_id_tag("[00:01.00]Hello").is_none());
        assert!(parse_id_tag("[a1:b]").is_none());
        assert_eq!(
            parse_id_tag("[offset:500]"),
            Some(("offset".to_string(), "500".to_string()))
        );
    }

    #[test]
    fn test_serialize_skips_untimed_and_empty() {
        let lines = ["One", "Two", "", "Four"];
        let times = [Some(1.0), None, Some(3.0), Some(4.0)];
        assert_eq!(
            serialize(&lines, &times),
            "[00:01.00]One\n[00:04.00]Four\n"
        );
    }

    #[test]
    fn test_serialize_keeps_index_order() {
        let lines = ["Late", "Early"];
        let times = [Some(9.0), Some(2.0)];
        assert_eq!(serialize(&lines, &times), "[00:09.00]Late\n[00:02.00]Early\n");
    }

    #[test]
    fn test_serialize_length_mismatch() {
        let lines = ["One", "Two", "Three"];
        let times = [Some(1.0)];
        assert_eq!(serialize(&lines, &times), "[00:01.00]One\n");
    }

    #[test]
    fn test_metadata_header() {
        let mut metadata = LrcMetadata::default();
        metadata.insert("ti", "Song");
        metadata.insert("ar", "Artist");
        assert_eq!(metadata.to_header(), "[ar:Artist]\n[ti:Song]\n");

        let reparsed = LrcFile::parse(&metadata.to_header());
        assert_eq!(reparsed.metadata, metadata);
    }

    #[test]
    fn test_serialize_to_json() {
        let lrc = LrcFile::parse("[ar:Someone]\n[00:01.50]Hi");
        let json = serde_json::to_value(&lrc).unwrap();
        assert_eq!(json["metadata"]["ar"], "Someone");
        assert_eq!(json["lines"][0]["text"], "Hi");
        assert_eq!(json["lines"][0]["time"], 1.5);
    }
}
