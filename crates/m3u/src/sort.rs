use url::Url;

use crate::parse::{EXTINF_PREFIX, extract_group_title};

/// Reorder whole playlist entries alphabetically by their `group-title`
/// attribute.
///
/// Comparison is case-insensitive (Unicode lowercase folding); entries with
/// equal groups keep their original relative order. Entries without a group
/// sort first. Header comment lines are re-emitted before the entries,
/// untouched.
pub fn sort_by_group(text: &str) -> String {
    let mut header: Vec<&str> = Vec::new();
    let mut entries: Vec<(String, Option<&str>, &str)> = Vec::new();
    let mut pending: Option<&str> = None;
    let mut in_header = true;

    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        if line.starts_with(EXTINF_PREFIX) {
            pending = Some(line);
            in_header = false;
        } else if line.starts_with('#') {
            if in_header {
                header.push(line);
            }
        } else if Url::parse(line).is_ok() {
            let metadata = pending.take();
            let key = metadata
                .and_then(extract_group_title_key)
                .unwrap_or_default();
            entries.push((key, metadata, line));
            in_header = false;
        }
    }

    // Vec::sort_by is stable, so ties keep playlist order.
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut out = String::new();
    for line in &header {
        out.push_str(line);
        out.push('\n');
    }
    for (_, metadata, url) in &entries {
        if let Some(metadata) = metadata {
            out.push_str(metadata);
            out.push('\n');
        }
        out.push_str(url);
        out.push('\n');
    }
    out
}

fn extract_group_title_key(line: &str) -> Option<String> {
    extract_group_title(line).map(|group| group.to_lowercase())
}
