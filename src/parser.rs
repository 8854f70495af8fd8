//! Rule line parsing for the comma- and space-delimited dialects.

use crate::cleaner::strip_quotes;
use crate::rule::RuleType;

/// A rule line split into typed fields, before policy resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRule {
    pub rule_type: RuleType,
    pub target: String,
    /// Raw action field as the source wrote it
    pub policy_hint: Option<String>,
}

/// Parse a cleaned line into a typed rule.
///
/// Returns `None` for lines with fewer than two fields, an empty target or
/// a type outside the supported set (allow rules, process matching, proxy
/// groups and the like are all dropped here).
pub fn parse_line(line: &str) -> Option<ParsedRule> {
    let fields = split_fields(line);
    if fields.len() < 2 {
        return None;
    }

    // Payload-list dialect: "- DOMAIN-SUFFIX example.com"
    let fields = if fields[0] == "-" {
        if fields.len() < 3 {
            return None;
        }
        &fields[1..]
    } else {
        &fields[..]
    };

    let type_token = fields[0]
        .strip_prefix("- ")
        .map(str::trim_start)
        .unwrap_or(fields[0]);
    let rule_type = RuleType::from_token(strip_quotes(type_token))?;

    let target = strip_quotes(fields[1]).trim();
    if target.is_empty() {
        return None;
    }

    let policy_hint = fields
        .get(2)
        .map(|hint| strip_quotes(hint).trim())
        .filter(|hint| !hint.is_empty())
        .map(str::to_string);

    Some(ParsedRule {
        rule_type,
        target: target.to_string(),
        policy_hint,
    })
}

/// Commas take precedence; otherwise split on runs of whitespace.
fn split_fields(line: &str) -> Vec<&str> {
    if line.contains(',') {
        line.split(',').map(str::trim).collect()
    } else {
        line.split_whitespace().collect()
    }
}
