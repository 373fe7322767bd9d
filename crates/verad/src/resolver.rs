//! Fuzzy entity resolver.
//!
//! Maps loose user phrasing ("pixel8a", "the m35", "12R") to catalog
//! records. Three tiers, short-circuiting on the first non-empty result:
//! exact match, substring containment, then word-level scoring against a
//! per-item alias table. The alias rules are the open-ended part of the
//! matcher and are kept as an independently testable unit.

use once_cell::sync::Lazy;
use regex::Regex;

use vera_common::CatalogItem;

/// Cap on results returned by the substring and scored tiers.
const MAX_RESULTS: usize = 10;

// Scoring weights per query word, best tier first.
const SCORE_ALIAS: i32 = 15;
const SCORE_MODEL: i32 = 10;
const SCORE_NUMERIC_PARTIAL: i32 = 8;
const SCORE_BRAND: i32 = 5;
const SCORE_FULL_TEXT: i32 = 3;
// Flat bonuses.
const BONUS_ALL_WORDS: i32 = 20;
const BONUS_BRAND_HIT: i32 = 5;
const BONUS_ALIAS_EXACT: i32 = 25;

static PARENTHETICAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\([^)]*\)\s*").unwrap());
static LEADING_GOOGLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^google\s+").unwrap());
static NETWORK_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+(5g|4g)\b").unwrap());
static TRAILING_LETTER_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)([a-z]+)$").unwrap());
static M_SERIES_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bm\d+").unwrap());
static NUMBER_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+[a-z]?$").unwrap());

/// Normalize a phone name for matching: lowercase, drop parenthetical
/// variants like "(8GB RAM + 128GB)", drop the "Google" line prefix and
/// trailing network tokens, collapse whitespace.
pub fn normalize_name(name: &str) -> String {
    let lower = name.to_lowercase();
    let no_parens = PARENTHETICAL.replace_all(&lower, " ");
    let no_prefix = LEADING_GOOGLE.replace(no_parens.trim(), "");
    let no_network = NETWORK_SUFFIX.replace_all(&no_prefix, "");
    no_network.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Build the alias set for one catalog item. Each rule covers one loose
/// phrasing users actually type:
/// - the raw model name and "brand model"
/// - spaces removed ("12 R" -> "12r")
/// - a space inserted before a trailing letter suffix ("12r" -> "12 r")
/// - the model without its "google" line prefix
/// - Samsung M-series short codes ("m35", "galaxy m35", "samsung m35")
pub fn generate_aliases(item: &CatalogItem) -> Vec<String> {
    let model = item.model.to_lowercase();
    let brand = item.brand.to_lowercase();
    let mut aliases = vec![model.clone(), format!("{} {}", brand, model)];

    let no_spaces: String = model.split_whitespace().collect();
    if no_spaces != model {
        aliases.push(no_spaces.clone());
        aliases.push(format!("{} {}", brand, no_spaces));
    }

    if TRAILING_LETTER_SUFFIX.is_match(&model) {
        let with_space = TRAILING_LETTER_SUFFIX.replace(&model, "$1 $2").to_string();
        aliases.push(with_space.clone());
        aliases.push(format!("{} {}", brand, with_space));
    }

    let without_google = LEADING_GOOGLE.replace(&model, "").to_string();
    if without_google != model {
        aliases.push(without_google);
    }

    if brand == "samsung" {
        if let Some(code) = M_SERIES_CODE.find(&model) {
            let code = code.as_str();
            aliases.push(code.to_string());
            aliases.push(format!("galaxy {}", code));
            aliases.push(format!("samsung {}", code));
        }
    }

    aliases
}

/// Resolve a free-text name to catalog records, most relevant first.
/// `threshold` is the minimum matched-word ratio for the scored tier;
/// callers choose it per use case (loose for comparison lookups, strict
/// for detail lookups).
pub fn fuzzy_search_model(items: &[CatalogItem], query: &str, threshold: f32) -> Vec<CatalogItem> {
    let query_lower = query.trim().to_lowercase();
    if query_lower.is_empty() {
        return Vec::new();
    }
    let normalized_query = normalize_name(&query_lower);

    // Tier 1: exact match on raw or normalized name
    let exact: Vec<CatalogItem> = items
        .iter()
        .filter(|item| {
            item.model.to_lowercase() == query_lower
                || normalize_name(&item.model) == normalized_query
        })
        .cloned()
        .collect();
    if !exact.is_empty() {
        return exact;
    }

    // Tier 2: substring containment either way
    let substring: Vec<CatalogItem> = items
        .iter()
        .filter(|item| {
            let model_lower = item.model.to_lowercase();
            let model_normalized = normalize_name(&model_lower);
            model_lower.contains(&query_lower)
                || model_normalized.contains(&normalized_query)
                || query_lower.contains(&model_lower)
        })
        .take(MAX_RESULTS)
        .cloned()
        .collect();
    if !substring.is_empty() {
        return substring;
    }

    // Tier 3: word-level scoring against the alias table
    let query_words: Vec<&str> = normalized_query.split_whitespace().collect();
    if query_words.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(i32, &CatalogItem)> = items
        .iter()
        .filter_map(|item| {
            let (score, ratio) = score_item(item, &normalized_query, &query_words);
            if ratio >= threshold {
                Some((score, item))
            } else {
                None
            }
        })
        .collect();

    // Stable sort keeps catalog order among equal scores
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored
        .into_iter()
        .take(MAX_RESULTS)
        .map(|(_, item)| item.clone())
        .collect()
}

fn score_item(item: &CatalogItem, normalized_query: &str, query_words: &[&str]) -> (i32, f32) {
    let model_lower = item.model.to_lowercase();
    let brand_lower = item.brand.to_lowercase();
    let model_normalized = normalize_name(&model_lower);
    let full_text = format!("{} {}", brand_lower, model_normalized);
    let aliases = generate_aliases(item);

    let mut score = 0i32;
    let mut matched_words = 0usize;

    for word in query_words {
        let is_number_word = NUMBER_WORD.is_match(word);
        let word_base = if is_number_word {
            word.trim_end_matches(|c: char| c.is_ascii_alphabetic())
        } else {
            word
        };

        if aliases
            .iter()
            .any(|alias| alias == normalized_query || alias.contains(word))
        {
            score += SCORE_ALIAS;
            matched_words += 1;
        } else if model_normalized.contains(word) {
            score += SCORE_MODEL;
            matched_words += 1;
        } else if is_number_word && model_normalized.contains(word_base) {
            score += SCORE_NUMERIC_PARTIAL;
            matched_words += 1;
        } else if brand_lower.contains(word) {
            score += SCORE_BRAND;
            matched_words += 1;
        } else if full_text.contains(word) {
            score += SCORE_FULL_TEXT;
            matched_words += 1;
        }
    }

    let ratio = matched_words as f32 / query_words.len() as f32;

    if (ratio - 1.0).abs() < f32::EPSILON {
        score += BONUS_ALL_WORDS;
    }
    if query_words.iter().any(|w| brand_lower.contains(w)) {
        score += BONUS_BRAND_HIT;
    }
    if aliases.iter().any(|alias| alias == normalized_query) {
        score += BONUS_ALIAS_EXACT;
    }

    (score, ratio)
}
