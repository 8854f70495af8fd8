//! Parse command: normalize a local rule file without fetching anything.
//!
//! Useful for checking how a new source's dialect will be interpreted.

use anyhow::{Context, Result};
use std::path::Path;
use tokio::io::AsyncReadExt;
use tracing::info;

use crate::aggregator::ingest_body;
use crate::emitter::sort_rules;
use crate::registry::RuleRegistry;
use crate::utils::format_count;

/// Run the parse command. `-` reads standard input.
pub async fn run(file: &Path) -> Result<()> {
    let body = if file.as_os_str() == "-" {
        let mut body = String::new();
        tokio::io::stdin()
            .read_to_string(&mut body)
            .await
            .context("Failed to read standard input")?;
        body
    } else {
        tokio::fs::read_to_string(file)
            .await
            .with_context(|| format!("Failed to read {:?}", file))?
    };

    let rules = normalize_body(&body);
    info!(
        "{} lines in, {} canonical rules out",
        format_count(body.lines().count()),
        format_count(rules.len())
    );
    for rule in rules {
        println!("{}", rule);
    }
    Ok(())
}

/// Deduplicated, sorted canonical rules of one body, serialized.
fn normalize_body(body: &str) -> Vec<String> {
    let mut registry = RuleRegistry::new();
    ingest_body(&mut registry, body);
    let mut rules = registry.into_rules();
    sort_rules(&mut rules);
    rules.iter().map(|r| r.to_string()).collect()
}
