//! Built-in rule sources and display-name lookup.

use crate::config::RuleSource;

/// Mirror prefix used by the default sources.
const MIRROR: &str = "https://ghproxy.net/https://raw.githubusercontent.com";

/// URL fragments mapped to a short display name, checked in order.
const KNOWN_SOURCES: &[(&str, &str)] = &[
    ("AWAvenue", "AWAvenue"),
    ("limbopro", "limbopro"),
    ("fmz200", "FMZ200"),
    ("zirawell", "Zirawell"),
    ("blackmatrix7", "blackmatrix7"),
    ("ConnersHua", "ConnersHua"),
];

/// Name used when neither the config nor the lookup table names a source.
pub const UNKNOWN_SOURCE: &str = "unknown";

/// Short display name for a source URL.
pub fn display_name(url: &str) -> &'static str {
    KNOWN_SOURCES
        .iter()
        .find(|(needle, _)| url.contains(needle))
        .map(|(_, name)| *name)
        .unwrap_or(UNKNOWN_SOURCE)
}

/// Default source list, in priority order.
pub fn default_sources() -> Vec<RuleSource> {
    [
        (
            "AWAvenue",
            "TG-Twilight/AWAvenue-Ads-Rule/main/Filters/AWAvenue-Ads-Rule-QuantumultX.list",
        ),
        ("limbopro", "limbopro/Adblock4limbo/main/Adblock4limbo.list"),
        ("FMZ200", "fmz200/wool_scripts/main/QuantumultX/filter/filter.list"),
        (
            "Zirawell",
            "zirawell/R-Store/main/Rule/QuanX/Adblock/All/filter/allAdBlock.list",
        ),
    ]
    .into_iter()
    .map(|(name, path)| RuleSource {
        name: name.to_string(),
        url: format!("{}/{}", MIRROR, path),
        enabled: true,
    })
    .collect()
}
