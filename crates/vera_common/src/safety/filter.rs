//! Adversarial and toxicity filtering.
//!
//! Two independent pattern-based checks over raw user text. Both are
//! pure; neither touches shared state. `check_safety` catches prompt
//! injection, credential fishing and jailbreak phrasing; `check_toxicity`
//! catches brand bashing, repeated profanity and spam. First matching
//! rule wins within each table.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::PatternRule;

/// Hard cap on message length; longer input is refused outright.
pub const MAX_MESSAGE_CHARS: usize = 1000;

pub const ADVERSARIAL_REFUSAL: &str =
    "I can only help with mobile phone shopping queries. What phone features are you interested in?";
pub const TOO_LONG_REFUSAL: &str =
    "Your message is too long. Please keep your query under 1000 characters.";
pub const EMPTY_REFUSAL: &str = "Please enter a query to get started.";
pub const SPAM_REFUSAL: &str =
    "Please send a valid query. I'm here to help you find the perfect phone!";
pub const TOXIC_REFUSAL: &str =
    "I'm here to provide helpful, unbiased shopping assistance. Let me help you find a great phone based on facts and specifications instead. What features are most important to you?";
pub const PROFANITY_REFUSAL: &str =
    "Let's keep our conversation professional. How can I help you find the perfect phone?";

/// Why a message was refused by the safety layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyReason {
    AdversarialPattern,
    MessageTooLong,
    EmptyMessage,
    ToxicContent,
    Profanity,
    SpamDetected,
    RateLimitExceeded,
}

/// Outcome of a safety check.
#[derive(Debug, Clone)]
pub struct SafetyCheck {
    pub safe: bool,
    pub reason: Option<SafetyReason>,
    pub refusal: Option<String>,
}

impl SafetyCheck {
    pub fn pass() -> Self {
        Self {
            safe: true,
            reason: None,
            refusal: None,
        }
    }

    pub fn reject(reason: SafetyReason, refusal: &str) -> Self {
        Self {
            safe: false,
            reason: Some(reason),
            refusal: Some(refusal.to_string()),
        }
    }

    pub fn is_safe(&self) -> bool {
        self.safe
    }
}

/// Brand alternation shared by several toxicity rules.
const BRANDS: &str = "samsung|apple|oneplus|xiaomi|oppo|vivo|realme|google|motorola|nokia|asus";

static ADVERSARIAL_RULES: Lazy<Vec<PatternRule>> = Lazy::new(|| {
    vec![
        // Prompt injection
        PatternRule::new(
            r"(?i)ignore.*(previous|prior|above|your|all|these|the).*(instructions|rules|prompt|commands|directives)",
            None,
        ),
        PatternRule::new(
            r"(?i)forget.*(everything|instructions|rules|prompt|commands|what\s+i\s+said|all\s+that)",
            None,
        ),
        PatternRule::new(
            r"(?i)reveal.*(system|prompt|instructions|rules|internal|hidden|secret)",
            None,
        ),
        PatternRule::new(
            r"(?i)show.*(system|prompt|instructions|rules|internal|hidden|original)",
            None,
        ),
        PatternRule::new(
            r"(?i)tell\s+me.*(system|prompt|instructions|rules|configuration|settings)",
            None,
        ),
        PatternRule::new(
            r"(?i)what.*(is|are|were).*(your|the).*(system|prompt|instructions|initial\s+prompt)",
            None,
        ),
        PatternRule::new(
            r"(?i)(display|print|output|write).*(system|prompt|instructions|original)",
            None,
        ),
        // API key and credential fishing
        PatternRule::new(r"(?i)(api|secret|private|gemini|openai|google).*(key|token|credential)", None),
        PatternRule::new(
            r"(?i)(show|tell|reveal|give|provide|share).*(password|credential|token|key|secret)",
            None,
        ),
        PatternRule::new(r"(?i)authentication.*(token|key|secret|credential)", None),
        PatternRule::new(r"(?i)environment.*(variable|var|key)", None),
        PatternRule::new(r"(?i)\.env.*(file|variable|key)", None),
        // Safety bypass
        PatternRule::new(
            r"(?i)bypass.*(safety|security|filter|rule|restriction|guard|protection)",
            None,
        ),
        PatternRule::new(
            r"(?i)override.*(protocol|safety|security|rule|restriction|filter|instruction)",
            None,
        ),
        PatternRule::new(r"(?i)disable.*(safety|security|filter|rule|protection|guard)", None),
        PatternRule::new(r"(?i)circumvent.*(safety|security|filter|rule|restriction)", None),
        PatternRule::new(r"(?i)get\s+around.*(safety|security|filter|rule|restriction)", None),
        PatternRule::new(r"(?i)work\s+around.*(safety|filter|rule|restriction)", None),
        // Role manipulation; the exemption keeps on-domain role phrasing usable
        PatternRule::new(
            r"(?i)act\s+as\s+an?\s+.{0,30}(assistant|expert|agent|bot|ai)",
            Some(r"(?i)act\s+as\s+an?\s+(mobile|phone|shopping|assistant)"),
        ),
        PatternRule::new(
            r"(?i)pretend\s+(to\s+be|you'?re|you\s+are)",
            Some(r"(?i)pretend\s+(to\s+be|you'?re|you\s+are)\s+a\s+(mobile|phone|shopping)"),
        ),
        PatternRule::new(
            r"(?i)you\s+are\s+now\s+an?\s+",
            Some(r"(?i)you\s+are\s+now\s+an?\s+(mobile|phone|shopping)"),
        ),
        PatternRule::new(
            r"(?i)simulate\s+.*(being|you'?re|you\s+are)",
            Some(r"(?i)(mobile|phone|shopping)"),
        ),
        PatternRule::new(
            r"(?i)roleplay\s+.*(as|being)",
            Some(r"(?i)(mobile|phone|shopping)"),
        ),
        PatternRule::new(r"(?i)switch\s+to\s+.*(mode|role|character)", None),
        // Instruction override
        PatternRule::new(
            r"(?i)disregard.*(instructions|rules|guidelines|everything|previous|above)",
            None,
        ),
        PatternRule::new(r"(?i)cancel.*(instructions|rules|guidelines|everything|previous)", None),
        PatternRule::new(r"(?i)new\s+(instructions|rules|mission|task|objective|goal)", None),
        PatternRule::new(r"(?i)instead.*(of|follow|do|execute).*(instructions|rules)", None),
        PatternRule::new(r"(?i)don'?t\s+follow.*(instructions|rules|guidelines)", None),
        // Jailbreak phrasing
        PatternRule::new(r"(?i)jailbreak", None),
        PatternRule::new(r"(?i)dan\s+mode", None),
        PatternRule::new(r"(?i)developer\s+mode", None),
        PatternRule::new(r"(?i)god\s+mode", None),
        PatternRule::new(r"(?i)admin\s+mode", None),
        PatternRule::new(r"(?i)sudo\s+mode", None),
        PatternRule::new(r"(?i)root\s+access", None),
        PatternRule::new(r"(?i)unrestricted.*mode", None),
        // Hidden content extraction
        PatternRule::new(r"(?i)hidden.*(prompt|instructions|rules|content|system)", None),
        PatternRule::new(r"(?i)show\s+me\s+everything", None),
        PatternRule::new(r"(?i)dump.*(prompt|instructions|memory|log|data)", None),
        PatternRule::new(r"(?i)extract.*(prompt|instructions|system|data)", None),
        PatternRule::new(r"(?i)decode.*(prompt|instructions|system)", None),
        // Manipulation through confusion
        PatternRule::new(r"(?i)(confused|confuse).*(about|regarding).*(role|purpose|instructions)", None),
        PatternRule::new(r"(?i)what\s+(were|was).*(told|instructed|programmed)", None),
        PatternRule::new(r"(?i)(core|base|original).*(programming|instruction|directive)", None),
        // Meta-level extraction
        PatternRule::new(
            r"(?i)how\s+(were|are)\s+you\s+(programmed|trained|instructed|built|created)",
            None,
        ),
        PatternRule::new(r"(?i)who\s+(programmed|created|built|designed|instructed)\s+you", None),
        PatternRule::new(r"(?i)what\s+(model|version|language\s+model|llm)\s+are\s+you", None),
        // Encoding / obfuscation
        PatternRule::new(r"(?i)base64.*(decode|encoded)", None),
        PatternRule::new(r"(?i)rot13", None),
        PatternRule::new(r"(?i)hex.*(decode|encoded)", None),
        PatternRule::new(r"(?i)\$\{.*\}", None),
        PatternRule::new(r"(?i)eval\s*\(", None),
    ]
});

static TOXIC_RULES: Lazy<Vec<PatternRule>> = Lazy::new(|| {
    vec![
        PatternRule::new(
            r"(?i)(trash|garbage|shit|crap|terrible|horrible|awful|pathetic|useless).*(brand|phone|company)",
            None,
        ),
        PatternRule::new(
            r"(?i)(brand|phone|company).*(trash|garbage|shit|crap|terrible|horrible|awful|pathetic|useless)",
            None,
        ),
        PatternRule::new(
            &format!(r"(?i)({BRANDS}).*(is|are).*(trash|garbage|shit|crap|worst|pathetic|useless)"),
            None,
        ),
        PatternRule::new(
            &format!(r"(?i)(trash|garbage|shit|crap|worst|pathetic|useless).*({BRANDS})"),
            None,
        ),
        PatternRule::new(&format!(r"(?i)(hate|never\s+buy|avoid|don'?t\s+buy).*({BRANDS})"), None),
        PatternRule::new(
            &format!(r"(?i)({BRANDS}).*sucks?"),
            Some(r"(?i)sucks?\s+as\s+in"),
        ),
        PatternRule::new(
            &format!(r"(?i)sucks?.*({BRANDS})"),
            Some(r"(?i)sucks?\s+as\s+in"),
        ),
        PatternRule::new(r"(?i)phones?\s+that\s+don'?t\s+suck", None),
        PatternRule::new(r"(?i)(way\s+)?(better|superior)\s+than.*(garbage|trash|shit)", None),
        PatternRule::new(&format!(r"(?i)({BRANDS}).*(fanboy|fangirl|sheep|cult)"), None),
        PatternRule::new(
            &format!(r"(?i)({BRANDS}).*(scam|fraud|ripoff|rip-off|stealing|cheating)"),
            None,
        ),
        PatternRule::new(r"(?i)only\s+(idiots|fools|morons).*(buy|use)", None),
        PatternRule::new(
            &format!(r"(?i)(waste\s+of\s+money|money\s+down\s+the\s+drain).*({BRANDS})"),
            None,
        ),
    ]
});

static PROFANITY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)\b(fuck|shit|damn|ass|bitch|bastard|hell|cunt|dick|piss)\b").unwrap(),
        Regex::new(r"(?i)\b(fuckin|fucking|shitty|shithead|asshole|dumbass|dipshit)\b").unwrap(),
    ]
});

/// Occurrences of a single character repeated this many times count as spam.
const SPAM_CHAR_RUN: usize = 10;
/// A word repeated this many times in a row counts as spam.
const SPAM_WORD_RUN: usize = 6;
/// Profanity is tolerated once; flagged from this count up.
const PROFANITY_LIMIT: usize = 2;

/// Screen raw input for prompt-injection and jailbreak phrasing, then
/// enforce the length and non-empty invariants.
pub fn check_safety(message: &str) -> SafetyCheck {
    for rule in ADVERSARIAL_RULES.iter() {
        if rule.is_match(message) {
            return SafetyCheck::reject(SafetyReason::AdversarialPattern, ADVERSARIAL_REFUSAL);
        }
    }

    if message.chars().count() > MAX_MESSAGE_CHARS {
        return SafetyCheck::reject(SafetyReason::MessageTooLong, TOO_LONG_REFUSAL);
    }

    if message.trim().is_empty() {
        return SafetyCheck::reject(SafetyReason::EmptyMessage, EMPTY_REFUSAL);
    }

    SafetyCheck::pass()
}

/// Separate pass for brand bashing, profanity and spam. Order is fixed:
/// toxicity, then profanity count, then spam.
pub fn check_toxicity(message: &str) -> SafetyCheck {
    for rule in TOXIC_RULES.iter() {
        if rule.is_match(message) {
            return SafetyCheck::reject(SafetyReason::ToxicContent, TOXIC_REFUSAL);
        }
    }

    let profanity_count: usize = PROFANITY_PATTERNS
        .iter()
        .map(|p| p.find_iter(message).count())
        .sum();
    if profanity_count >= PROFANITY_LIMIT {
        return SafetyCheck::reject(SafetyReason::Profanity, PROFANITY_REFUSAL);
    }

    if has_repeated_char(message, SPAM_CHAR_RUN) || has_repeated_word(message, SPAM_WORD_RUN) {
        return SafetyCheck::reject(SafetyReason::SpamDetected, SPAM_REFUSAL);
    }

    SafetyCheck::pass()
}

/// Run-length scan for a single character repeated `limit` or more times.
fn has_repeated_char(message: &str, limit: usize) -> bool {
    let mut last: Option<char> = None;
    let mut run = 0usize;
    for c in message.chars() {
        if Some(c) == last {
            run += 1;
        } else {
            last = Some(c);
            run = 1;
        }
        if run >= limit {
            return true;
        }
    }
    false
}

/// Scan for the same word appearing `limit` or more times consecutively
/// (case-insensitive).
fn has_repeated_word(message: &str, limit: usize) -> bool {
    let mut last = String::new();
    let mut run = 0usize;
    for word in message.split_whitespace() {
        let word = word.to_lowercase();
        if word == last {
            run += 1;
        } else {
            last = word;
            run = 1;
        }
        if run >= limit {
            return true;
        }
    }
    false
}
