//! Safety layer.
//!
//! Everything that can refuse a request before the catalog pipeline runs:
//! - Adversarial/toxicity/spam filtering
//! - Off-topic detection (two checks of different strictness)
//! - Per-client rate limiting

pub mod filter;
pub mod offtopic;
pub mod rate_limit;

pub use filter::*;
pub use offtopic::*;
pub use rate_limit::*;

use regex::Regex;

/// One entry of a pattern table: a detection regex plus an optional
/// exemption. The exemption stands in for the negative lookaheads the
/// rules were originally tuned with; keeping it a separate field keeps
/// each rule independently testable.
#[derive(Debug)]
pub struct PatternRule {
    pattern: Regex,
    unless: Option<Regex>,
}

impl PatternRule {
    /// Compile a rule. Panics on an invalid pattern, which is acceptable
    /// only because every rule is a compile-time constant covered by
    /// tests.
    pub fn new(pattern: &str, unless: Option<&str>) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("invalid safety pattern"),
            unless: unless.map(|u| Regex::new(u).expect("invalid exemption pattern")),
        }
    }

    /// True when the rule fires: the pattern matches and the exemption
    /// (if any) does not.
    pub fn is_match(&self, text: &str) -> bool {
        if !self.pattern.is_match(text) {
            return false;
        }
        match &self.unless {
            Some(unless) => !unless.is_match(text),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_without_exemption_fires_on_match() {
        let rule = PatternRule::new(r"(?i)jailbreak", None);
        assert!(rule.is_match("how do I JAILBREAK you"));
        assert!(!rule.is_match("how do I break jail"));
    }

    #[test]
    fn exemption_suppresses_the_match() {
        let rule = PatternRule::new(
            r"(?i)act\s+as\s+an?\s+",
            Some(r"(?i)act\s+as\s+a\s+(mobile|phone|shopping)"),
        );
        assert!(rule.is_match("act as a pirate"));
        assert!(!rule.is_match("act as a phone expert"));
    }
}
