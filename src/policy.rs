//! Policy resolution: every rule leaves the pipeline with a reject action.

use crate::rule::{Modifier, Policy, RuleType};

/// Resolve the final policy and modifier for a parsed rule.
///
/// Hints are matched case-insensitively by substring against the reject
/// family; the longest keyword found wins so `REJECT-TINYGIF` stays
/// `reject-tinygif` rather than collapsing to `reject`. Hints with no
/// reject keyword (`direct`, `allow`, `proxy`, ...) become plain `reject`.
pub fn resolve(rule_type: RuleType, hint: Option<&str>) -> (Policy, Option<Modifier>) {
    let policy = hint.map(policy_from_hint).unwrap_or_default();
    let modifier = rule_type.is_ip_cidr().then_some(Modifier::NoResolve);
    (policy, modifier)
}

fn policy_from_hint(hint: &str) -> Policy {
    let hint = hint.to_lowercase();
    Policy::ALL
        .into_iter()
        .filter(|policy| hint.contains(policy.as_str()))
        .max_by_key(|policy| policy.as_str().len())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_hint_is_reject() {
        assert_eq!(resolve(RuleType::Host, None), (Policy::Reject, None));
    }

    #[test]
    fn test_non_reject_hints_coerced() {
        for hint in ["allow", "direct", "DIRECT", "proxy", "Proxy-Group", "no-resolve"] {
            assert_eq!(resolve(RuleType::Host, Some(hint)).0, Policy::Reject, "hint {}", hint);
        }
    }

    #[test]
    fn test_specific_variants_kept() {
        assert_eq!(resolve(RuleType::Host, Some("reject-200")).0, Policy::Reject200);
        assert_eq!(resolve(RuleType::Host, Some("REJECT-TINYGIF")).0, Policy::RejectTinyGif);
        assert_eq!(resolve(RuleType::Host, Some("reject-img")).0, Policy::RejectImg);
        assert_eq!(resolve(RuleType::Host, Some("Reject-Dict")).0, Policy::RejectDict);
        assert_eq!(resolve(RuleType::Host, Some("reject-array")).0, Policy::RejectArray);
        assert_eq!(resolve(RuleType::Host, Some("reject-video")).0, Policy::RejectVideo);
    }

    #[test]
    fn test_substring_match() {
        assert_eq!(resolve(RuleType::Host, Some("REJECT-DROP")).0, Policy::Reject);
        assert_eq!(resolve(RuleType::Host, Some("x-reject-200-y")).0, Policy::Reject200);
    }

    #[test]
    fn test_ip_types_get_no_resolve() {
        assert_eq!(
            resolve(RuleType::IpCidr, Some("reject")),
            (Policy::Reject, Some(Modifier::NoResolve))
        );
        assert_eq!(
            resolve(RuleType::IpCidr6, None),
            (Policy::Reject, Some(Modifier::NoResolve))
        );
        assert_eq!(resolve(RuleType::IpAsn, None).1, None);
        assert_eq!(resolve(RuleType::Geoip, None).1, None);
    }
}
