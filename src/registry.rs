//! Per-run rule accumulator keyed by identity.

use std::collections::HashSet;

use crate::rule::{CanonicalRule, IdentityKey};

/// Ordered, append-only set of canonical rules.
///
/// The first rule registered for an identity key is kept; later rules with
/// the same key are ignored. Sources are committed in priority order, so
/// earlier sources win conflicts.
#[derive(Debug, Default)]
pub struct RuleRegistry {
    rules: Vec<CanonicalRule>,
    seen: HashSet<IdentityKey>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule. Returns `true` if it was new.
    pub fn insert(&mut self, rule: CanonicalRule) -> bool {
        if !self.seen.insert(rule.identity_key()) {
            return false;
        }
        self.rules.push(rule);
        true
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in insertion order.
    pub fn rules(&self) -> &[CanonicalRule] {
        &self.rules
    }

    pub fn into_rules(self) -> Vec<CanonicalRule> {
        self.rules
    }
}
