use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::entry::StreamEntry;

pub(crate) const EXTINF_PREFIX: &str = "#EXTINF:";

static GROUP_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"group-title="([^"]*)""#).unwrap());

/// Playlist-level failure. Malformed interior lines are tolerated and
/// skipped; only an entirely empty input is an error.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("playlist text is empty")]
    Empty,
}

struct Metadata {
    title: String,
    group_title: String,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            title: "Unknown".to_owned(),
            group_title: String::new(),
        }
    }
}

/// Parse playlist text into its ordered stream entries.
///
/// Each `#EXTINF` line is held in a single pending slot until the next
/// syntactically valid absolute-URI line consumes it; a second `#EXTINF`
/// before a URI overwrites the first, so metadata with no following URL
/// never produces an entry. A URI with no pending metadata falls back to an
/// `"Unknown"` title. The header, other comment lines, and invalid-URI lines
/// are skipped. A playlist with zero valid entries parses to an empty
/// vector; absence of entries is a reportable condition upstream, not a
/// parse failure.
pub fn parse(text: &str) -> Result<Vec<StreamEntry>, FormatError> {
    if text.trim().is_empty() {
        return Err(FormatError::Empty);
    }

    let mut entries = Vec::new();
    let mut pending: Option<Metadata> = None;

    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        if let Some(rest) = line.strip_prefix(EXTINF_PREFIX) {
            pending = Some(parse_metadata(rest));
        } else if line.starts_with('#') {
            continue;
        } else if let Ok(url) = Url::parse(line) {
            let meta = pending.take().unwrap_or_default();
            entries.push(StreamEntry {
                url,
                title: meta.title,
                group_title: meta.group_title,
            });
        }
        // Anything else is junk between entries; skip it.
    }

    Ok(entries)
}

pub(crate) fn extract_group_title(text: &str) -> Option<String> {
    GROUP_TITLE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_owned())
}

/// Split the remainder of an `#EXTINF` line into an attribute block and a
/// display title.
///
/// Both sides may legitimately contain commas: attribute values inside their
/// quotes, titles anywhere. The split point is therefore the first comma
/// after the last quoted attribute, falling back to the first comma when the
/// line carries no quoted attributes. The sibling formatter always splits at
/// the first comma; the two rules are intentionally separate.
fn parse_metadata(rest: &str) -> Metadata {
    let split = match rest.rfind('"') {
        Some(quote) => rest[quote..].find(',').map(|comma| quote + comma),
        None => rest.find(','),
    };

    let (attributes, title) = match split {
        Some(split) => (&rest[..split], rest[split + 1..].trim()),
        None => (rest, ""),
    };

    Metadata {
        title: if title.is_empty() { "Unknown" } else { title }.to_owned(),
        group_title: extract_group_title(attributes).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(entries: &[StreamEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.url.as_str()).collect()
    }

    #[test]
    fn parses_entries_in_playlist_order() {
        let text = "\
#EXTM3U
#EXTINF:-1 group-title=\"News\",Channel One
http://one.example/stream
#EXTINF:-1 group-title=\"Sports\",Channel Two
http://two.example/stream
#EXTINF:-1,Channel Three
http://three.example/stream
";
        let entries = parse(text).unwrap();
        assert_eq!(
            urls(&entries),
            vec![
                "http://one.example/stream",
                "http://two.example/stream",
                "http://three.example/stream",
            ]
        );
        assert_eq!(entries[0].title, "Channel One");
        assert_eq!(entries[0].group_title, "News");
        assert_eq!(entries[2].group_title, "");
    }

    #[test]
    fn title_keeps_its_commas() {
        let text = "#EXTINF:-1 group-title=\"News\",Channel, The Show\nhttp://a.example/live\n";
        let entries = parse(text).unwrap();
        assert_eq!(entries[0].title, "Channel, The Show");
        assert_eq!(entries[0].group_title, "News");
    }

    #[test]
    fn group_title_value_may_contain_commas() {
        let text = "#EXTINF:-1 group-title=\"News, World\",Channel\nhttp://a.example/live\n";
        let entries = parse(text).unwrap();
        assert_eq!(entries[0].group_title, "News, World");
        assert_eq!(entries[0].title, "Channel");
    }

    #[test]
    fn metadata_without_url_is_dropped() {
        let text = "\
#EXTM3U
#EXTINF:-1 group-title=\"Orphan\",No Stream Here
#EXTINF:-1 group-title=\"Kept\",Real Channel
http://kept.example/stream
";
        let entries = parse(text).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].group_title, "Kept");
    }

    #[test]
    fn url_without_metadata_gets_unknown_title() {
        let entries = parse("#EXTM3U\nhttp://bare.example/stream\n").unwrap();
        assert_eq!(entries[0].title, "Unknown");
        assert_eq!(entries[0].group_title, "");
    }

    #[test]
    fn metadata_without_title_gets_unknown_title() {
        let entries =
            parse("#EXTINF:-1 group-title=\"News\"\nhttp://a.example/stream\n").unwrap();
        assert_eq!(entries[0].title, "Unknown");
        assert_eq!(entries[0].group_title, "News");
    }

    #[test]
    fn invalid_uris_and_comments_are_skipped() {
        let text = "\
#EXTM3U
# a stray comment
#EXTINF:-1,Good
not a url at all
http://good.example/stream
";
        let entries = parse(text).unwrap();
        assert_eq!(entries.len(), 1);
        // The junk line does not consume the pending metadata.
        assert_eq!(entries[0].title, "Good");
    }

    #[test]
    fn metadata_never_outnumbers_urls() {
        let text = "\
#EXTINF:-1,A
#EXTINF:-1,B
#EXTINF:-1,C
http://only.example/stream
";
        let entries = parse(text).unwrap();
        assert_eq!(entries.len(), 1);
        // The pending slot holds the most recent metadata only.
        assert_eq!(entries[0].title, "C");
    }

    #[test]
    fn header_only_playlist_is_empty_not_an_error() {
        let entries = parse("#EXTM3U\n").unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn blank_input_is_an_error() {
        assert!(matches!(parse("   \n  \n"), Err(FormatError::Empty)));
        assert!(matches!(parse(""), Err(FormatError::Empty)));
    }
}
