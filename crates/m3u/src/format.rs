use crate::parse::EXTINF_PREFIX;

/// Collapse whitespace and normalize `#EXTINF` metadata formatting.
///
/// Blank lines are dropped, runs of whitespace collapse to single spaces,
/// and metadata lines are re-joined around the *first* comma with both
/// sides trimmed. This is not the parser's split rule: the formatter treats
/// everything after the first comma as the title, while the parser skips
/// commas inside quoted attribute values. The two must stay separate.
pub fn normalize(text: &str) -> String {
    let mut out = String::new();

    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");

        if let Some(rest) = collapsed.strip_prefix(EXTINF_PREFIX)
            && let Some((attributes, title)) = rest.split_once(',')
        {
            out.push_str(EXTINF_PREFIX);
            out.push_str(attributes.trim());
            out.push(',');
            out.push_str(title.trim());
        } else {
            out.push_str(&collapsed);
        }
        out.push('\n');
    }

    out
}
