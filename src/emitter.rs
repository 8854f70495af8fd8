//! Output rendering: sorted rule body behind a `#` header block.

use chrono::{DateTime, FixedOffset};
use std::borrow::Cow;
use std::fmt::Write;

use crate::rule::CanonicalRule;
use crate::stats::SourceRecord;
use crate::utils::format_count_with_separator;

/// Inputs for the header block.
#[derive(Debug, Clone)]
pub struct Header<'a> {
    pub title: &'a str,
    pub generated_at: DateTime<FixedOffset>,
    /// Rule count of the previous output, if there was one
    pub previous: Option<usize>,
    pub sources: &'a [SourceRecord],
}

/// Sort by type rank, then by serialized form.
pub fn sort_rules(rules: &mut [CanonicalRule]) {
    rules.sort_by_cached_key(|rule| (rule.rule_type.rank(), rule.to_string()));
}

/// Render the full output file. `rules` must already be sorted.
pub fn render(rules: &[CanonicalRule], header: &Header<'_>) -> String {
    let mut out = String::with_capacity(rules.len() * 40 + 512);
    render_header(&mut out, rules.len(), header);
    for rule in rules {
        // Writing to a String cannot fail
        let _ = writeln!(out, "{}", rule);
    }
    out
}

fn render_header(out: &mut String, total: usize, header: &Header<'_>) {
    let _ = writeln!(out, "# {}", single_line(header.title));
    let _ = writeln!(
        out,
        "# Updated: {} (UTC{})",
        header.generated_at.format("%Y-%m-%d %H:%M:%S"),
        header.generated_at.offset()
    );
    let _ = writeln!(
        out,
        "# Total rules: {} ({})",
        format_count_with_separator(total),
        describe_delta(total, header.previous)
    );
    let _ = writeln!(out, "# --- Source contributions ---");
    for source in header.sources {
        if source.outcome.is_failed() {
            let _ = writeln!(out, "# {}: 0 (failed)", single_line(&source.name));
        } else {
            let _ = writeln!(
                out,
                "# {}: {}",
                single_line(&source.name),
                format_count_with_separator(source.contributed)
            );
        }
    }
}

/// Header text with control characters flattened to spaces, so every
/// header line stays a `#` comment.
fn single_line(text: &str) -> Cow<'_, str> {
    if text.chars().any(char::is_control) {
        Cow::Owned(
            text.chars()
                .map(|c| if c.is_control() { ' ' } else { c })
                .collect(),
        )
    } else {
        Cow::Borrowed(text)
    }
}

fn describe_delta(total: usize, previous: Option<usize>) -> String {
    match previous {
        None => "first run".to_string(),
        Some(prev) => {
            let delta = total as i64 - prev as i64;
            format!("{:+} vs previous", delta)
        }
    }
}

/// Number of rules in a previously emitted file: non-empty lines that are
/// not `#` comments.
pub fn count_rules(content: &str) -> usize {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .count()
}
