//! Configuration management for rulemerge.

use anyhow::{Context, Result};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::MergeError;
use crate::sources::{default_sources, display_name};

/// User-Agent the upstream lists are served to without complaint
pub const DEFAULT_USER_AGENT: &str = "Quantumult%20X/1.0.30 (iPhone; iOS 16.0; Scale/3.00)";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// First header line of the output file
    pub title: String,

    /// Output rule file
    pub output: PathBuf,

    /// Fixed UTC offset for the header timestamp, e.g. "+08:00"
    pub utc_offset: String,

    /// Minimum merged rule count required to write the output
    pub min_rules: usize,

    /// Per-source HTTP timeout
    pub timeout_secs: u64,

    /// Maximum concurrent downloads
    pub max_concurrent: usize,

    /// Maximum accepted body size per source
    pub max_body_bytes: usize,

    pub user_agent: String,

    /// Rule sources in priority order (earlier wins)
    pub sources: Vec<RuleSource>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "QX AdBlock Merged".to_string(),
            output: PathBuf::from("merged_ads.list"),
            utc_offset: "+08:00".to_string(),
            min_rules: 1,
            timeout_secs: 60,
            max_concurrent: 4,
            max_body_bytes: 20 * 1024 * 1024,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            sources: default_sources(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;

        config.validate()?;

        Ok(config)
    }

    /// Load the file if it exists, otherwise fall back to built-in defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            debug!(
                "No config at {:?}, using built-in defaults",
                path.as_ref()
            );
            Ok(Self::default())
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.min_rules == 0 {
            return Err(MergeError::Config("min_rules must be at least 1".to_string()).into());
        }
        if self.timeout_secs == 0 {
            return Err(MergeError::Config("timeout_secs must be positive".to_string()).into());
        }
        if self.max_concurrent == 0 {
            return Err(MergeError::Config("max_concurrent must be positive".to_string()).into());
        }

        self.offset()?;
        check_header_text("title", &self.title)?;

        for source in &self.sources {
            check_header_text("Source name", &source.name)?;
            if source.enabled
                && !(source.url.starts_with("https://") || source.url.starts_with("http://"))
            {
                return Err(MergeError::Config(format!(
                    "Source '{}' URL must use http(s): {}",
                    source.display_name(),
                    source.url
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Parsed `utc_offset`
    pub fn offset(&self) -> Result<FixedOffset> {
        parse_utc_offset(&self.utc_offset).ok_or_else(|| {
            MergeError::Config(format!(
                "Invalid utc_offset '{}'. Use format like '+08:00'",
                self.utc_offset
            ))
            .into()
        })
    }

    /// Enabled sources in priority order
    pub fn enabled_sources(&self) -> Vec<&RuleSource> {
        self.sources.iter().filter(|s| s.enabled).collect()
    }

    /// Commented default configuration
    pub fn generate_default_yaml() -> String {
        include_str!("../templates/config.yaml").to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSource {
    #[serde(default)]
    pub name: String,
    pub url: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl RuleSource {
    /// Configured name, or a name derived from the URL
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            display_name(&self.url)
        } else {
            &self.name
        }
    }
}

fn default_enabled() -> bool {
    true
}

/// Parse "+HH:MM", "+HHMM", "Z" or "UTC"
fn parse_utc_offset(s: &str) -> Option<FixedOffset> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0);
    }
    s.parse::<FixedOffset>().ok()
}

/// Rejects values that would break out of a single header line.
fn check_header_text(field: &str, value: &str) -> Result<()> {
    if value.chars().any(char::is_control) {
        return Err(MergeError::Config(format!(
            "{} must be a single line without control characters: {:?}",
            field, value
        ))
        .into());
    }
    Ok(())
}
