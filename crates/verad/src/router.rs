//! Deterministic intent rule engine.
//!
//! Fallback classifier used whenever the AI classifier is unreachable or
//! returns garbage. Fully self-contained: never errors, never calls out.
//! Rules are evaluated in a fixed priority order; the first match wins.
//!
//! This is the single unified engine - the superset of the pattern sets
//! that previously existed as a simple draft and an elaborated variant.

use once_cell::sync::Lazy;
use regex::Regex;

use vera_common::chat::{IntentKind, IntentResult};
use vera_common::safety::offtopic;

/// Brand vocabulary for search parameter extraction.
const BRAND_VOCAB: &[&str] = &[
    "samsung", "apple", "oneplus", "xiaomi", "realme", "oppo", "vivo", "google", "pixel",
];

/// Feature vocabulary for search parameter extraction.
const FEATURE_VOCAB: &[&str] = &["camera", "battery", "5g", "gaming", "performance", "display"];

/// Product-line tokens that mark a string as a model identifier.
const MODEL_LINE_TOKENS: &[&str] = &[
    "pixel", "iphone", "galaxy", "oneplus", "realme", "oppo", "vivo", "redmi", "poco", "mi",
    "note", "edge", "fold", "flip",
];

/// Words stripped from comparison segments.
const FILLER_WORDS: &[&str] = &["compare", "versus", "vs", "and", "with", "between", "the"];

static GREETING_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)what (can|do) you (do|help)").unwrap(),
        Regex::new(r"(?i)how (can|do) you help").unwrap(),
        Regex::new(r"(?i)what are (you|your) (capabilities|features)").unwrap(),
        Regex::new(r"(?i)tell me (about|what) (you|yourself)\b").unwrap(),
    ]
});

static COMPARE_KEYWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(compare|vs\.?|versus)\b").unwrap());

static COMPARE_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+(vs\.?|versus|and)\s+|,\s*").unwrap());

static FILLER_STRIP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(compare|with|between|the)\b").unwrap());

static DETAILS_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(
            r"(?i)(explain|tell me about|what about|info|information|details|specs?|specifications?|features?).*\b(of|about|for)\s+(the\s+)?[a-z0-9 ]+",
        )
        .unwrap(),
        Regex::new(
            r"(?i)^(show me|give me|provide)\s+(details?|specs?|specifications?|features?|info|information).*\b(of|about|for|on)\s+(the\s+)?[a-z0-9 ]+",
        )
        .unwrap(),
        Regex::new(r"(?i)(tell me more|more info|more details).*\b(about|on)\s+(the\s+)?[a-z0-9 ]+")
            .unwrap(),
    ]
});

static SUBJECT_AFTER_PREPOSITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:of|about|for|on)\s+(?:the\s+)?([a-z0-9 ]+(?:pro|plus|max|ultra|lite|mini)?)")
        .unwrap()
});

static EXPLAIN_TRIGGERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)^what (is|are|does|means?) ").unwrap(),
        Regex::new(r"(?i)^what's ").unwrap(),
        Regex::new(r"(?i)^explain\b").unwrap(),
        Regex::new(r"(?i)^tell me about\b").unwrap(),
        Regex::new(r"(?i)^define\b").unwrap(),
        Regex::new(r"(?i)^how (does|do) .* work").unwrap(),
        Regex::new(r"(?i)difference between .* (and|vs)").unwrap(),
    ]
});

static EXPLAIN_SUBJECTS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)^what (?:is|are|does|means?)\s+(.+)").unwrap(),
        Regex::new(r"(?i)^what's\s+(.+)").unwrap(),
        Regex::new(r"(?i)^explain\s+(.+)").unwrap(),
        Regex::new(r"(?i)^define\s+(.+)").unwrap(),
        Regex::new(r"(?i)^tell me about\s+(.+)").unwrap(),
        Regex::new(r"(?i)\b(?:of|about|for)\s+(?:the\s+)?([a-z0-9 ]+)").unwrap(),
    ]
});

static MODEL_SHORT_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^[a-z]?\d+[a-z]?$").unwrap());
static MODEL_WORD_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)[a-z]+\s*\d+").unwrap());

static BUDGET_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // "30k" style, optional qualifier and currency
        Regex::new(r"(?i)(?:under|below|less than|within|around|about)?\s*(?:₹|rs\.?)?\s*(\d+)k\b")
            .unwrap(),
        // Plain 5-6 digit amount
        Regex::new(r"(?i)(?:under|below|less than|within|around|about)?\s*(?:₹|rs\.?)?\s*(\d{5,6})")
            .unwrap(),
        // Short amount that only counts with an explicit qualifier
        Regex::new(r"(?i)(?:under|below|less than|within|around|about|₹|rs\.?)\s*(\d{1,4})\b")
            .unwrap(),
    ]
});

/// Accepted budget range in rupees. Matches outside it are noise
/// (model numbers, resolution values) and must be dropped.
const BUDGET_MIN: u32 = 5_000;
const BUDGET_MAX: u32 = 200_000;

/// Extract a budget amount from free text. The `k` suffix and bare
/// sub-thousand amounts are scaled to rupees; anything outside
/// [5000, 200000] is treated as not found.
pub fn extract_budget(query: &str) -> Option<u32> {
    for (idx, pattern) in BUDGET_PATTERNS.iter().enumerate() {
        let Some(caps) = pattern.captures(query) else {
            continue;
        };
        let Ok(raw) = caps[1].parse::<u32>() else {
            continue;
        };

        let has_k_suffix = idx == 0;
        let amount = if has_k_suffix || raw < 1000 {
            raw.saturating_mul(1000)
        } else {
            raw
        };

        if (BUDGET_MIN..=BUDGET_MAX).contains(&amount) {
            return Some(amount);
        }
    }
    None
}

/// Split a comparison query into candidate model names.
pub fn extract_compare_models(query: &str) -> Vec<String> {
    COMPARE_SPLIT
        .split(query)
        .map(|part| {
            let cleaned = FILLER_STRIP.replace_all(part, " ");
            cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
        })
        .filter(|part| {
            if part.len() <= 2 {
                return false;
            }
            let lower = part.to_lowercase();
            !FILLER_WORDS.contains(&lower.as_str())
        })
        .collect()
}

/// True when the text plausibly names a phone model rather than a
/// technical concept: a short alphanumeric code ("m35", "8a"), a word
/// followed by digits ("pixel 8"), or a known product-line token.
pub fn looks_like_model(text: &str) -> bool {
    let text = text.trim();
    if MODEL_SHORT_CODE.is_match(text) || MODEL_WORD_DIGIT.is_match(text) {
        return true;
    }
    let lower = text.to_lowercase();
    lower
        .split_whitespace()
        .any(|word| MODEL_LINE_TOKENS.contains(&word))
}

fn extract_details_subject(query: &str) -> Option<String> {
    let caps = SUBJECT_AFTER_PREPOSITION.captures(query)?;
    let subject = caps[1].trim().to_string();
    if subject.is_empty() {
        None
    } else {
        Some(subject)
    }
}

fn extract_explain_subject(query: &str) -> Option<String> {
    for pattern in EXPLAIN_SUBJECTS.iter() {
        if let Some(caps) = pattern.captures(query) {
            let subject = caps[1].trim_end_matches('?').trim().to_string();
            if !subject.is_empty() {
                return Some(subject);
            }
        }
    }
    None
}

fn extract_brands(query: &str) -> Vec<String> {
    BRAND_VOCAB
        .iter()
        .filter(|brand| query.contains(*brand))
        .map(|brand| brand.to_string())
        .collect()
}

fn extract_features(query: &str) -> Vec<String> {
    FEATURE_VOCAB
        .iter()
        .filter(|feature| query.contains(*feature))
        .map(|feature| feature.to_string())
        .collect()
}

/// Classify a query with the deterministic rules.
pub fn classify(query: &str) -> IntentResult {
    let q = query.to_lowercase();
    let q = q.trim();

    // 1. Off-topic keyword with no phone context
    if offtopic::has_off_topic_keyword(q) && !offtopic::has_domain_keyword(q) {
        return IntentResult::new(IntentKind::Irrelevant, 85).with_query(query);
    }

    // 2. Greetings and capability questions about the assistant itself
    if q == "help"
        || q == "hello"
        || q == "hi"
        || GREETING_PATTERNS.iter().any(|p| p.is_match(q))
    {
        return IntentResult::new(IntentKind::General, 90).with_query(query);
    }

    // 3. Comparison
    if COMPARE_KEYWORD.is_match(q) {
        let models = extract_compare_models(query);
        let mut intent = IntentResult::new(IntentKind::Compare, 80).with_query(query);
        if !models.is_empty() {
            intent.parameters.models = Some(models);
        }
        return intent;
    }

    // 4. Details about a specific model
    if DETAILS_PATTERNS.iter().any(|p| p.is_match(q)) {
        if let Some(subject) = extract_details_subject(q) {
            if looks_like_model(&subject) {
                return IntentResult::new(IntentKind::Details, 85).with_query(subject);
            }
        }
    }

    // 5. Explanation of a concept; model-shaped subjects reclassify to details
    if EXPLAIN_TRIGGERS.iter().any(|p| p.is_match(q)) {
        if let Some(subject) = extract_explain_subject(q) {
            if looks_like_model(&subject) {
                return IntentResult::new(IntentKind::Details, 85).with_query(subject);
            }
        }
        return IntentResult::new(IntentKind::Explain, 80).with_query(query);
    }

    // 6. Default: search with extracted parameters
    let mut intent = IntentResult::new(IntentKind::Search, 70).with_query(query);
    intent.parameters.budget = extract_budget(q);
    let brands = extract_brands(q);
    if !brands.is_empty() {
        intent.parameters.brands = Some(brands);
    }
    let features = extract_features(q);
    if !features.is_empty() {
        intent.parameters.features = Some(features);
    }
    intent
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_k_suffix_scales_to_rupees() {
        assert_eq!(extract_budget("under 30k"), Some(30_000));
        assert_eq!(extract_budget("phones around 45k please"), Some(45_000));
    }

    #[test]
    fn budget_plain_amount_accepted() {
        assert_eq!(extract_budget("below 45000"), Some(45_000));
        assert_eq!(extract_budget("₹52999"), Some(52_999));
    }

    #[test]
    fn budget_short_amount_needs_qualifier() {
        assert_eq!(extract_budget("under 8000"), Some(8_000));
        // Bare small numbers without qualifier are not budgets
        assert_eq!(extract_budget("pixel 8"), None);
    }

    #[test]
    fn budget_out_of_range_is_rejected() {
        assert_eq!(extract_budget("under 3000000"), None);
        assert_eq!(extract_budget("under 3k"), None);
        assert_eq!(extract_budget("under 500k"), None);
    }

    #[test]
    fn compare_models_split_on_vs() {
        let models = extract_compare_models("Compare Pixel 8a vs OnePlus 12R");
        assert_eq!(models, vec!["Pixel 8a".to_string(), "OnePlus 12R".to_string()]);
    }

    #[test]
    fn compare_models_split_on_and_and_comma() {
        let models = extract_compare_models("compare the Galaxy M35 and Redmi Note 13, Realme 12");
        assert_eq!(
            models,
            vec![
                "Galaxy M35".to_string(),
                "Redmi Note 13".to_string(),
                "Realme 12".to_string()
            ]
        );
    }

    #[test]
    fn compare_segments_drop_fillers_and_stubs() {
        let models = extract_compare_models("compare a vs the OnePlus 12R");
        assert_eq!(models, vec!["OnePlus 12R".to_string()]);
    }

    #[test]
    fn greeting_is_general() {
        for q in ["hello", "hi", "what can you do", "help"] {
            let intent = classify(q);
            assert_eq!(intent.kind, vera_common::IntentKind::General, "{}", q);
            assert_eq!(intent.confidence, 90);
        }
    }

    #[test]
    fn off_topic_without_phone_context_is_irrelevant() {
        let intent = classify("what's a good bitcoin exchange");
        assert_eq!(intent.kind, vera_common::IntentKind::Irrelevant);
        assert_eq!(intent.confidence, 85);
    }

    #[test]
    fn compare_query_extracts_models() {
        let intent = classify("Compare Pixel 8a vs OnePlus 12R");
        assert_eq!(intent.kind, vera_common::IntentKind::Compare);
        assert_eq!(
            intent.parameters.models.as_deref(),
            Some(["Pixel 8a".to_string(), "OnePlus 12R".to_string()].as_slice())
        );
    }

    #[test]
    fn details_phrasing_with_model_subject() {
        let intent = classify("tell me the specs of the galaxy m35");
        assert_eq!(intent.kind, vera_common::IntentKind::Details);
        assert_eq!(intent.parameters.query.as_deref(), Some("galaxy m35"));
    }

    #[test]
    fn explain_reclassifies_model_subjects_to_details() {
        let intent = classify("what is the pixel 8a");
        assert_eq!(intent.kind, vera_common::IntentKind::Details);

        let intent = classify("explain m35");
        assert_eq!(intent.kind, vera_common::IntentKind::Details);
        assert_eq!(intent.parameters.query.as_deref(), Some("m35"));
    }

    #[test]
    fn explain_keeps_concept_subjects() {
        let intent = classify("what is ois");
        assert_eq!(intent.kind, vera_common::IntentKind::Explain);
        assert_eq!(intent.confidence, 80);

        let intent = classify("explain refresh rate");
        assert_eq!(intent.kind, vera_common::IntentKind::Explain);
    }

    #[test]
    fn default_search_extracts_parameters() {
        let intent = classify("best samsung camera phone under 30k");
        assert_eq!(intent.kind, vera_common::IntentKind::Search);
        assert_eq!(intent.confidence, 70);
        assert_eq!(intent.parameters.budget, Some(30_000));
        assert_eq!(
            intent.parameters.brands.as_deref(),
            Some(["samsung".to_string()].as_slice())
        );
        assert_eq!(
            intent.parameters.features.as_deref(),
            Some(["camera".to_string()].as_slice())
        );
    }

    #[test]
    fn model_shape_detection() {
        assert!(looks_like_model("m35"));
        assert!(looks_like_model("8a"));
        assert!(looks_like_model("pixel 8"));
        assert!(looks_like_model("galaxy note 10"));
        assert!(!looks_like_model("refresh rate"));
        assert!(!looks_like_model("ois"));
        assert!(!looks_like_model("fast charging"));
    }
}
