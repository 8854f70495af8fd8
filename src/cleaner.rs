//! Line cleaning: comment and quote stripping ahead of field parsing.
//!
//! Comment markers (`#`, `;`, `//`) are honored anywhere on the line, so a
//! literal `//` inside a rule target truncates the target. None of the
//! supported list formats put `//` inside a target.

/// Prefixes of lines that carry no rule: section headers, HTML noise,
/// adblock-style cosmetic filters and foreign rule-set metadata.
const SKIP_PREFIXES: &[&str] = &[
    "[",
    "<",
    "!",
    "no-alert",
    "title",
    "description",
    "payload:",
    "name:",
    "author:",
];

/// Clean one raw line. Returns `None` when the line holds no candidate rule.
pub fn clean_line(raw: &str) -> Option<&str> {
    let raw = raw.trim_start_matches('\u{feff}');
    let line = strip_comment(raw).trim();
    let line = strip_quotes(line).trim();

    if line.is_empty() || is_metadata(line) {
        return None;
    }
    Some(line)
}

/// Cut the line at the first comment marker.
fn strip_comment(line: &str) -> &str {
    let cut = [line.find('#'), line.find(';'), line.find("//")]
        .into_iter()
        .flatten()
        .min();
    match cut {
        Some(idx) => &line[..idx],
        None => line,
    }
}

/// Remove one leading and one trailing quote character, if present.
pub(crate) fn strip_quotes(s: &str) -> &str {
    let s = s.strip_prefix(['"', '\'']).unwrap_or(s);
    s.strip_suffix(['"', '\'']).unwrap_or(s)
}

fn is_metadata(line: &str) -> bool {
    let lower = line.to_ascii_lowercase();
    SKIP_PREFIXES.iter().any(|p| lower.starts_with(p))
}
