//! Sources command: list configured sources in priority order.

use anyhow::Result;
use std::path::Path;

use crate::config::{Config, RuleSource};
use crate::utils::elide_middle;

const URL_WIDTH: usize = 60;

/// Run the sources command
pub async fn run(config_path: &Path) -> Result<()> {
    let config = Config::load_or_default(config_path)?;
    print!("{}", format_sources(&config.sources));
    Ok(())
}

/// One line per source; earlier lines win conflicts.
fn format_sources(sources: &[RuleSource]) -> String {
    if sources.is_empty() {
        return "No sources configured.\n".to_string();
    }

    let mut out = String::from(" #  SOURCE         STATUS    URL\n");
    for (i, source) in sources.iter().enumerate() {
        out.push_str(&format!(
            "{:>2}  {:<14} {:<9} {}\n",
            i + 1,
            elide_middle(source.display_name(), 14),
            if source.enabled { "enabled" } else { "disabled" },
            elide_middle(&source.url, URL_WIDTH)
        ));
    }
    out
}
