//! Splitting raw lyric text into lyric lines.

/// Split raw text into trimmed, non-empty lyric lines.
///
/// Indices into the result are what markers refer to, so any edit of the raw
/// text must go through a full re-split.
#[must_use]
pub fn split_lyrics(text: &str) -> Vec<String> {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join lyric lines back into raw editor text
#[must_use]
pub fn join_lyrics<S: AsRef<str>>(lines: &[S]) -> String {
    lines
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n")
}
