use serde::Serialize;
use url::Url;

/// One playlist item: a stream URL plus its display metadata.
///
/// Order within the playlist is significant and preserved by the parser;
/// entries carry no dependency on each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamEntry {
    /// Absolute stream URI, validated during parsing.
    pub url: Url,
    /// Display title from the `#EXTINF` line, `"Unknown"` when absent.
    pub title: String,
    /// `group-title` attribute, empty when the entry carries none.
    pub group_title: String,
}
