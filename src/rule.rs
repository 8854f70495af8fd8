//! Canonical rule model shared by the parser, registry and emitter.

use std::fmt;

/// Rule types the merged list may contain.
///
/// The set is closed: any token that does not map onto one of these
/// variants is dropped by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleType {
    Host,
    HostSuffix,
    HostKeyword,
    HostWildcard,
    IpCidr,
    IpCidr6,
    UserAgent,
    Geoip,
    IpAsn,
}

impl RuleType {
    /// Map a raw type token from any supported dialect onto a canonical type.
    ///
    /// Matching is case-insensitive. `DOMAIN*` tokens collapse onto their
    /// `HOST*` counterparts and `IP6-CIDR` onto `IP-CIDR6`.
    pub fn from_token(token: &str) -> Option<Self> {
        let rule_type = match token.to_ascii_uppercase().as_str() {
            "HOST" | "DOMAIN" => Self::Host,
            "HOST-SUFFIX" | "DOMAIN-SUFFIX" => Self::HostSuffix,
            "HOST-KEYWORD" | "DOMAIN-KEYWORD" => Self::HostKeyword,
            "HOST-WILDCARD" => Self::HostWildcard,
            "IP-CIDR" => Self::IpCidr,
            "IP-CIDR6" | "IP6-CIDR" => Self::IpCidr6,
            "USER-AGENT" => Self::UserAgent,
            "GEOIP" => Self::Geoip,
            "IP-ASN" => Self::IpAsn,
            _ => return None,
        };
        Some(rule_type)
    }

    /// Canonical upper-case token used in the output file.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Host => "HOST",
            Self::HostSuffix => "HOST-SUFFIX",
            Self::HostKeyword => "HOST-KEYWORD",
            Self::HostWildcard => "HOST-WILDCARD",
            Self::IpCidr => "IP-CIDR",
            Self::IpCidr6 => "IP-CIDR6",
            Self::UserAgent => "USER-AGENT",
            Self::Geoip => "GEOIP",
            Self::IpAsn => "IP-ASN",
        }
    }

    /// Sort rank in the emitted file (lower comes first).
    pub fn rank(&self) -> u8 {
        match self {
            Self::Host => 1,
            Self::HostSuffix => 2,
            Self::HostKeyword => 3,
            Self::IpCidr | Self::IpCidr6 => 4,
            _ => 10,
        }
    }

    /// IP-CIDR family rules are emitted with `no-resolve`.
    pub fn is_ip_cidr(&self) -> bool {
        matches!(self, Self::IpCidr | Self::IpCidr6)
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Block actions. Everything this pipeline emits is a reject variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Policy {
    #[default]
    Reject,
    Reject200,
    RejectTinyGif,
    RejectImg,
    RejectDict,
    RejectArray,
    RejectVideo,
}

impl Policy {
    /// Every reject-family policy, used by the resolver for keyword search.
    pub const ALL: [Policy; 7] = [
        Policy::Reject,
        Policy::Reject200,
        Policy::RejectTinyGif,
        Policy::RejectImg,
        Policy::RejectDict,
        Policy::RejectArray,
        Policy::RejectVideo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reject => "reject",
            Self::Reject200 => "reject-200",
            Self::RejectTinyGif => "reject-tinygif",
            Self::RejectImg => "reject-img",
            Self::RejectDict => "reject-dict",
            Self::RejectArray => "reject-array",
            Self::RejectVideo => "reject-video",
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trailing rule option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    NoResolve,
}

impl Modifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoResolve => "no-resolve",
        }
    }
}

/// Deduplication key: lower-cased `type,target`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityKey(String);

impl IdentityKey {
    pub fn new(rule_type: RuleType, target: &str) -> Self {
        Self(format!(
            "{},{}",
            rule_type.as_str().to_ascii_lowercase(),
            target.to_lowercase()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A fully normalized rule, ready to be registered and emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRule {
    pub rule_type: RuleType,
    /// Match pattern with its original casing
    pub target: String,
    pub policy: Policy,
    pub modifier: Option<Modifier>,
}

impl CanonicalRule {
    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey::new(self.rule_type, &self.target)
    }
}

/// Serializes as `TYPE,target,policy[,modifier]`.
impl fmt::Display for CanonicalRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.rule_type, self.target, self.policy)?;
        if let Some(modifier) = self.modifier {
            write!(f, ",{}", modifier.as_str())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_token_aliases() {
        assert_eq!(RuleType::from_token("DOMAIN"), Some(RuleType::Host));
        assert_eq!(RuleType::from_token("domain-suffix"), Some(RuleType::HostSuffix));
        assert_eq!(RuleType::from_token("Domain-Keyword"), Some(RuleType::HostKeyword));
        assert_eq!(RuleType::from_token("IP6-CIDR"), Some(RuleType::IpCidr6));
        assert_eq!(RuleType::from_token("ip-cidr6"), Some(RuleType::IpCidr6));
        assert_eq!(RuleType::from_token("GEOIP"), Some(RuleType::Geoip));
    }

    #[test]
    fn test_from_token_rejects_unknown() {
        assert_eq!(RuleType::from_token("PROCESS-NAME"), None);
        assert_eq!(RuleType::from_token("DST-PORT"), None);
        assert_eq!(RuleType::from_token("FINAL"), None);
        assert_eq!(RuleType::from_token(""), None);
    }

    #[test]
    fn test_rank_table() {
        assert_eq!(RuleType::Host.rank(), 1);
        assert_eq!(RuleType::HostSuffix.rank(), 2);
        assert_eq!(RuleType::HostKeyword.rank(), 3);
        assert_eq!(RuleType::IpCidr.rank(), 4);
        assert_eq!(RuleType::IpCidr6.rank(), 4);
        assert_eq!(RuleType::UserAgent.rank(), 10);
        assert_eq!(RuleType::HostWildcard.rank(), 10);
    }

    #[test]
    fn test_identity_key_is_case_insensitive() {
        let a = IdentityKey::new(RuleType::Host, "Ads.Example");
        let b = IdentityKey::new(RuleType::Host, "ads.example");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "host,ads.example");
    }

    #[test]
    fn test_identity_key_distinguishes_type() {
        let host = IdentityKey::new(RuleType::Host, "ads.example");
        let suffix = IdentityKey::new(RuleType::HostSuffix, "ads.example");
        assert_ne!(host, suffix);
    }

    #[test]
    fn test_display_with_modifier() {
        let rule = CanonicalRule {
            rule_type: RuleType::IpCidr,
            target: "10.0.0.0/8".to_string(),
            policy: Policy::Reject,
            modifier: Some(Modifier::NoResolve),
        };
        assert_eq!(rule.to_string(), "IP-CIDR,10.0.0.0/8,reject,no-resolve");
    }

    #[test]
    fn test_display_preserves_target_case() {
        let rule = CanonicalRule {
            rule_type: RuleType::UserAgent,
            target: "AdClient*".to_string(),
            policy: Policy::RejectDict,
            modifier: None,
        };
        assert_eq!(rule.to_string(), "USER-AGENT,AdClient*,reject-dict");
    }
}
