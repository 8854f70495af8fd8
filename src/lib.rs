//! # rulemerge - proxy block list merger
//!
//! Fetches several independently maintained block lists (Quantumult X,
//! Surge, Clash payload and plain space-delimited dialects), normalizes
//! every line into one canonical rule model, resolves conflicts by source
//! priority and writes a single sorted rule file.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (clap)                                                 │
//! │    └── Commands: merge, sources, parse, config, version     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Config (serde_yaml)          Sources (defaults, names)     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Fetcher (reqwest + rustls, BodySource trait)               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Pipeline                                                   │
//! │    cleaner → parser → policy → registry                     │
//! │    aggregator: bounded parallel fetch, ordered commit       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Emitter (sort + header) → atomic write (tempfile)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use rulemerge::aggregator::aggregate;
//! use rulemerge::config::Config;
//! use rulemerge::emitter::sort_rules;
//! use rulemerge::fetcher::Fetcher;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load_or_default("rulemerge.yaml")?;
//!     let fetcher = Fetcher::new(&config)?;
//!
//!     let sources = config.enabled_sources();
//!     let (registry, records) = aggregate(&fetcher, &sources, config.max_concurrent).await;
//!
//!     let mut rules = registry.into_rules();
//!     sort_rules(&mut rules);
//!     for record in &records {
//!         println!("{}: {}", record.name, record.contributed);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`aggregator`] - Per-source ingestion and priority-ordered merge
//! - [`cleaner`] - Comment and quote stripping
//! - [`cli`] - Command-line interface definitions
//! - [`commands`] - CLI command implementations
//! - [`config`] - Configuration parsing and validation
//! - [`emitter`] - Sorting and output rendering
//! - [`error`] - Domain error type
//! - [`fetcher`] - HTTP client for downloading rule lists
//! - [`fs_abstraction`] - File access seam used by the merge run
//! - [`lock`] - Single-run lock next to the output file
//! - [`parser`] - Dialect-aware field splitting and type mapping
//! - [`policy`] - Reject-family policy resolution
//! - [`registry`] - First-wins rule accumulator
//! - [`rule`] - Canonical rule model
//! - [`sources`] - Built-in sources and display names
//! - [`stats`] - Per-source records and run summary
//! - [`utils`] - Formatting helpers

pub mod aggregator;
pub mod cleaner;
pub mod cli;
pub mod commands;
pub mod config;
pub mod emitter;
pub mod error;
pub mod fetcher;
pub mod fs_abstraction;
pub mod lock;
pub mod parser;
pub mod policy;
pub mod registry;
pub mod rule;
pub mod sources;
pub mod stats;
pub mod utils;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use error::MergeError;
pub use rule::{CanonicalRule, Policy, RuleType};
