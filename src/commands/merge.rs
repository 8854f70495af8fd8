//! Merge command implementation.

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Utc};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::aggregator::aggregate;
use crate::config::Config;
use crate::emitter::{count_rules, render, sort_rules, Header};
use crate::error::MergeError;
use crate::fetcher::{BodySource, Fetcher};
use crate::fs_abstraction::{real_fs, FileSystem};
use crate::lock::LockGuard;
use crate::stats::MergeSummary;
use crate::utils::{format_bytes, format_count};

/// Flags of the merge command
#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    pub output: Option<PathBuf>,
    pub dry_run: bool,
    pub json: bool,
}

/// Run the merge command
pub async fn run(opts: MergeOptions, config_path: &Path) -> Result<()> {
    let config = Config::load_or_default(config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    let output = opts.output.clone().unwrap_or_else(|| config.output.clone());

    let _lock = if opts.dry_run {
        None
    } else {
        let lock = LockGuard::acquire(&output)?;
        debug!("Holding lock {}", lock.path().display());
        Some(lock)
    };

    let fetcher = Fetcher::new(&config)?;
    let now = Utc::now().with_timezone(&config.offset()?);

    let summary = merge_with(&config, &fetcher, real_fs(), &output, now, opts.dry_run).await?;

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!();
        println!(
            "[OK] {} rules merged from {} sources ({} failed){}",
            format_count(summary.total),
            summary.sources.len(),
            summary.failed_sources(),
            if summary.written {
                format!(" -> {}", summary.output.display())
            } else {
                " (dry run)".to_string()
            }
        );
    }

    Ok(())
}

/// Fetch, merge, check the safety floor and write the output.
///
/// Nothing is written when the merged count is below `min_rules`; the
/// previous output stays in place and `MergeError::BelowFloor` is returned.
pub async fn merge_with<S, F>(
    config: &Config,
    client: &S,
    fs: &F,
    output: &Path,
    now: DateTime<FixedOffset>,
    dry_run: bool,
) -> Result<MergeSummary>
where
    S: BodySource + ?Sized,
    F: FileSystem + ?Sized,
{
    let sources = config.enabled_sources();
    if sources.is_empty() {
        warn!("No sources enabled. Check your configuration.");
    }

    info!("Merging {} sources...", sources.len());
    let (registry, records) = aggregate(client, &sources, config.max_concurrent).await;

    let total = registry.len();
    if total < config.min_rules {
        error!(
            "Only {} rules merged (minimum {}), keeping previous output",
            total, config.min_rules
        );
        return Err(MergeError::BelowFloor {
            count: total,
            minimum: config.min_rules,
        }
        .into());
    }

    let previous = previous_rule_count(fs, output);

    let mut rules = registry.into_rules();
    sort_rules(&mut rules);
    let content = render(
        &rules,
        &Header {
            title: &config.title,
            generated_at: now,
            previous,
            sources: &records,
        },
    );

    if dry_run {
        info!("Dry run: {} not written", output.display());
    } else {
        fs.write_atomic(output, &content).map_err(|e| {
            MergeError::FileSystem(format!("Failed to write {}: {}", output.display(), e))
        })?;
        info!(
            "Wrote {} rules ({}) to {}",
            format_count(total),
            format_bytes(content.len()),
            output.display()
        );
    }

    Ok(MergeSummary::new(
        total,
        previous,
        records,
        output.to_path_buf(),
        !dry_run,
    ))
}

/// Rule count of the existing output, `None` when there is none
fn previous_rule_count<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> Option<usize> {
    if !fs.exists(path) {
        return None;
    }
    match fs.read_to_string(path) {
        Ok(content) => Some(count_rules(&content)),
        Err(e) => {
            warn!("Could not read previous output {}: {}", path.display(), e);
            None
        }
    }
}
