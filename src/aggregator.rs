//! Source aggregation: fetch, normalize and merge rule lists in priority order.

use anyhow::Result;
use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::cleaner::clean_line;
use crate::config::RuleSource;
use crate::fetcher::BodySource;
use crate::parser::parse_line;
use crate::policy::resolve;
use crate::registry::RuleRegistry;
use crate::rule::CanonicalRule;
use crate::stats::{FetchOutcome, SourceRecord};
use crate::utils::format_count;

/// Counts from feeding one body into the registry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestTally {
    pub parsed: usize,
    pub contributed: usize,
}

/// Run one raw line through cleaner, parser and policy resolver.
pub fn normalize_line(raw: &str) -> Option<CanonicalRule> {
    let line = clean_line(raw)?;
    let parsed = parse_line(line)?;
    let (policy, modifier) = resolve(parsed.rule_type, parsed.policy_hint.as_deref());
    Some(CanonicalRule {
        rule_type: parsed.rule_type,
        target: parsed.target,
        policy,
        modifier,
    })
}

/// Normalize every line of a body, in order.
pub fn parse_body(body: &str) -> Vec<CanonicalRule> {
    body.lines().filter_map(normalize_line).collect()
}

/// Feed a body into the registry.
pub fn ingest_body(registry: &mut RuleRegistry, body: &str) -> IngestTally {
    commit(registry, parse_body(body))
}

fn commit(registry: &mut RuleRegistry, rules: Vec<CanonicalRule>) -> IngestTally {
    let parsed = rules.len();
    let contributed = rules
        .into_iter()
        .map(|rule| registry.insert(rule))
        .filter(|added| *added)
        .count();
    IngestTally {
        parsed,
        contributed,
    }
}

/// Fetch all sources with bounded concurrency and merge them.
///
/// Each body is parsed into its own buffer; buffers are then committed to
/// the registry strictly in the order of `sources`, whatever order the
/// downloads finished in. A failed source contributes nothing.
pub async fn aggregate<S: BodySource + ?Sized>(
    client: &S,
    sources: &[&RuleSource],
    max_concurrent: usize,
) -> (RuleRegistry, Vec<SourceRecord>) {
    // buffered() yields results in input order
    let fetched: Vec<(usize, Result<String>)> = stream::iter(sources.iter().enumerate())
        .map(|(idx, source)| async move { (idx, client.fetch(source).await) })
        .buffered(max_concurrent.max(1))
        .collect()
        .await;

    let mut registry = RuleRegistry::new();
    let mut records = Vec::with_capacity(sources.len());

    for (idx, body) in fetched {
        let source = sources[idx];
        let name = source.display_name().to_string();

        let record = match body {
            Ok(body) => {
                let tally = commit(&mut registry, parse_body(&body));
                info!(
                    "{}: {} rules parsed, {} new",
                    name,
                    format_count(tally.parsed),
                    format_count(tally.contributed)
                );
                SourceRecord {
                    name,
                    url: source.url.clone(),
                    outcome: FetchOutcome::Fetched { bytes: body.len() },
                    parsed: tally.parsed,
                    contributed: tally.contributed,
                }
            }
            Err(e) => {
                warn!("{}: fetch failed: {:#}", name, e);
                SourceRecord {
                    name,
                    url: source.url.clone(),
                    outcome: FetchOutcome::Failed {
                        reason: format!("{:#}", e),
                    },
                    parsed: 0,
                    contributed: 0,
                }
            }
        };
        records.push(record);
    }

    (registry, records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::mock::StaticSource;
    use crate::rule::{Modifier, Policy, RuleType};

    fn source(name: &str, url: &str) -> RuleSource {
        RuleSource {
            name: name.to_string(),
            url: url.to_string(),
            enabled: true,
        }
    }

    fn serialized(registry: &RuleRegistry) -> Vec<String> {
        registry.rules().iter().map(|r| r.to_string()).collect()
    }

    #[test]
    fn test_normalize_dialects_agree() {
        let a = normalize_line("DOMAIN-SUFFIX,tracker.example,reject").unwrap();
        let b = normalize_line("HOST-SUFFIX tracker.example REJECT").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "HOST-SUFFIX,tracker.example,reject");
    }

    #[test]
    fn test_normalize_policy_coercion() {
        let rule = normalize_line("HOST,x.example,allow").unwrap();
        assert_eq!(rule.to_string(), "HOST,x.example,reject");
    }

    #[test]
    fn test_normalize_comment_stripped() {
        let rule = normalize_line("HOST,y.example,reject # tracking").unwrap();
        assert_eq!(rule.to_string(), "HOST,y.example,reject");
    }

    #[test]
    fn test_normalize_type_filter() {
        assert!(normalize_line("PROCESS-NAME,SomeApp,reject").is_none());
    }

    #[test]
    fn test_normalize_ip_cidr() {
        let rule = normalize_line("IP-CIDR,1.2.3.0/24,reject,no-resolve").unwrap();
        assert_eq!(rule.policy, Policy::Reject);
        assert_eq!(rule.modifier, Some(Modifier::NoResolve));
        assert_eq!(rule.to_string(), "IP-CIDR,1.2.3.0/24,reject,no-resolve");
    }

    #[test]
    fn test_parse_body_mixed_dialects() {
        let body = "\
[filter_remote]
# AdBlock list
payload:
  - DOMAIN-SUFFIX,ads.example
  - DOMAIN-KEYWORD adtrack REJECT
HOST-WILDCARD,*.ad.example,reject-200
USER-AGENT,AdSDK*,reject-dict
PROCESS-NAME,Telemetry,reject
GEOIP,CN,direct
";
        let rules: Vec<String> = parse_body(body).iter().map(|r| r.to_string()).collect();
        assert_eq!(
            rules,
            vec![
                "HOST-SUFFIX,ads.example,reject",
                "HOST-KEYWORD,adtrack,reject",
                "HOST-WILDCARD,*.ad.example,reject-200",
                "USER-AGENT,AdSDK*,reject-dict",
                "GEOIP,CN,reject",
            ]
        );
    }

    #[test]
    fn test_ingest_same_body_twice() {
        let mut registry = RuleRegistry::new();
        let body = "HOST,a.example,reject\nHOST,b.example,reject\n";
        let first = ingest_body(&mut registry, body);
        let second = ingest_body(&mut registry, body);
        assert_eq!(first, IngestTally { parsed: 2, contributed: 2 });
        assert_eq!(second, IngestTally { parsed: 2, contributed: 0 });
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_ingest_duplicate_within_body() {
        let mut registry = RuleRegistry::new();
        let tally = ingest_body(&mut registry, "HOST,a.example\nhost,A.EXAMPLE,reject-img\n");
        assert_eq!(tally, IngestTally { parsed: 2, contributed: 1 });
        assert_eq!(serialized(&registry), vec!["HOST,a.example,reject"]);
    }

    #[tokio::test]
    async fn test_aggregate_priority() {
        let client = StaticSource::new(&[
            ("https://s1", "HOST,ads.example,reject\n"),
            ("https://s2", "HOST,ads.example,direct\nHOST,other.example,reject\n"),
        ]);
        let s1 = source("s1", "https://s1");
        let s2 = source("s2", "https://s2");

        let (registry, records) = aggregate(&client, &[&s1, &s2], 2).await;

        assert_eq!(
            serialized(&registry),
            vec!["HOST,ads.example,reject", "HOST,other.example,reject"]
        );
        assert_eq!(records[0].contributed, 1);
        assert_eq!(records[1].parsed, 2);
        assert_eq!(records[1].contributed, 1);
    }

    #[tokio::test]
    async fn test_aggregate_priority_survives_completion_order() {
        // The first source finishes last; it must still win
        let client = StaticSource::new(&[
            ("https://slow", "HOST,ads.example,reject-img\n"),
            ("https://fast", "HOST,ads.example,reject-200\n"),
        ])
        .with_delay("https://slow", 50);
        let slow = source("slow", "https://slow");
        let fast = source("fast", "https://fast");

        let (registry, records) = aggregate(&client, &[&slow, &fast], 2).await;

        assert_eq!(registry.rules()[0].policy, Policy::RejectImg);
        assert_eq!(records[0].name, "slow");
        assert_eq!(records[0].contributed, 1);
        assert_eq!(records[1].contributed, 0);
    }

    #[tokio::test]
    async fn test_aggregate_duplicate_source() {
        let client = StaticSource::new(&[("https://s1", "HOST,a.example\nIP-CIDR,10.0.0.0/8\n")]);
        let s1 = source("s1", "https://s1");

        let (registry, records) = aggregate(&client, &[&s1, &s1], 1).await;

        assert_eq!(registry.len(), 2);
        assert_eq!(records[0].contributed, 2);
        assert_eq!(records[1].contributed, 0);
    }

    #[tokio::test]
    async fn test_aggregate_failed_source_is_soft() {
        let client = StaticSource::new(&[("https://ok", "HOST,a.example\n")]);
        let missing = source("missing", "https://missing");
        let ok = source("ok", "https://ok");

        let (registry, records) = aggregate(&client, &[&missing, &ok], 4).await;

        assert_eq!(registry.len(), 1);
        assert!(records[0].outcome.is_failed());
        assert_eq!(records[0].contributed, 0);
        assert!(!records[1].outcome.is_failed());
        assert_eq!(records[1].contributed, 1);
    }

    #[tokio::test]
    async fn test_aggregate_all_failed() {
        let client = StaticSource::new(&[]);
        let a = source("a", "https://a");
        let b = source("", "https://example.com/zirawell/list");

        let (registry, records) = aggregate(&client, &[&a, &b], 2).await;

        assert!(registry.is_empty());
        assert!(records.iter().all(|r| r.outcome.is_failed()));
        assert_eq!(records[1].name, "Zirawell");
    }

    #[tokio::test]
    async fn test_aggregate_types_kept_separately() {
        let client = StaticSource::new(&[("https://s", "HOST,a.example\nHOST-SUFFIX,a.example\n")]);
        let s = source("s", "https://s");
        let (registry, _) = aggregate(&client, &[&s], 1).await;
        let types: Vec<_> = registry.rules().iter().map(|r| r.rule_type).collect();
        assert_eq!(types, vec![RuleType::Host, RuleType::HostSuffix]);
    }
}
