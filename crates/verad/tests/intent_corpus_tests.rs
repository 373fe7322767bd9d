//! Corpus tests for the deterministic intent rule engine.
//!
//! A table of real-world phrasings per intent, verifying that the rule
//! priority order holds and the extracted parameters are right.

use vera_common::chat::IntentKind;
use verad::router::{classify, extract_budget, extract_compare_models};

fn expect_intent(query: &str, expected: IntentKind) {
    let intent = classify(query);
    assert_eq!(intent.kind, expected, "query: {:?}", query);
}

#[test]
fn corpus_general() {
    for query in [
        "hello",
        "hi",
        "help",
        "what can you do",
        "how can you help me",
        "what are your capabilities",
        "tell me about yourself",
    ] {
        expect_intent(query, IntentKind::General);
    }
}

#[test]
fn corpus_irrelevant() {
    for query in [
        "what's a good bitcoin exchange",
        "any movie recommendations",
        "cheap flight to goa",
        "best stock to invest in",
    ] {
        expect_intent(query, IntentKind::Irrelevant);
    }
}

#[test]
fn corpus_compare() {
    for query in [
        "Compare Pixel 8a vs OnePlus 12R",
        "pixel 8a versus galaxy s24",
        "compare the galaxy m35 and redmi note 13",
        "oneplus 12 vs oneplus 12r which is better",
    ] {
        expect_intent(query, IntentKind::Compare);
    }
}

#[test]
fn corpus_details() {
    for query in [
        "tell me the specs of the galaxy m35",
        "show me details of the pixel 8a",
        "more info about the oneplus 12r",
        "what is the pixel 8a",
        "explain m35",
    ] {
        expect_intent(query, IntentKind::Details);
    }
}

#[test]
fn corpus_explain() {
    for query in [
        "what is ois",
        "explain refresh rate",
        "what does fast charging mean",
        "define megapixel",
    ] {
        expect_intent(query, IntentKind::Explain);
    }
}

#[test]
fn corpus_search() {
    for query in [
        "best camera phone under 30k",
        "samsung phones with good battery",
        "5g phone below 25000",
        "gaming phone with 12gb ram",
        "recommend a phone",
    ] {
        expect_intent(query, IntentKind::Search);
    }
}

#[test]
fn search_parameters_are_extracted_together() {
    let intent = classify("best samsung 5g camera phone under 30k");
    assert_eq!(intent.kind, IntentKind::Search);
    assert_eq!(intent.parameters.budget, Some(30_000));
    assert_eq!(
        intent.parameters.brands.as_deref(),
        Some(["samsung".to_string()].as_slice())
    );
    let features = intent.parameters.features.unwrap();
    assert!(features.contains(&"camera".to_string()));
    assert!(features.contains(&"5g".to_string()));
}

#[test]
fn budget_corpus() {
    let cases: &[(&str, Option<u32>)] = &[
        ("under 30k", Some(30_000)),
        ("below ₹45k", Some(45_000)),
        ("less than 25000", Some(25_000)),
        ("around 15k", Some(15_000)),
        ("within 200000", Some(200_000)),
        ("under 8000", Some(8_000)),
        // Out of the accepted range: treated as not found
        ("under 3000000", None),
        ("under 3k", None),
        ("under 500k", None),
        // No qualifier, no amount shape
        ("pixel 8", None),
        ("galaxy s24", None),
    ];
    for (query, expected) in cases {
        assert_eq!(extract_budget(query), *expected, "query: {:?}", query);
    }
}

#[test]
fn compare_model_extraction_corpus() {
    let cases: &[(&str, &[&str])] = &[
        (
            "Compare Pixel 8a vs OnePlus 12R",
            &["Pixel 8a", "OnePlus 12R"],
        ),
        (
            "compare galaxy m35, redmi note 13 and realme 12",
            &["galaxy m35", "redmi note 13", "realme 12"],
        ),
        ("pixel 8a vs. galaxy s24", &["pixel 8a", "galaxy s24"]),
        ("compare between the m35 and the 12r", &["m35", "12r"]),
    ];
    for (query, expected) in cases {
        let models = extract_compare_models(query);
        assert_eq!(models, expected.to_vec(), "query: {:?}", query);
    }
}

#[test]
fn rule_priority_compare_beats_details_phrasing() {
    // Contains details-style wording but the compare keyword wins
    let intent = classify("give me details, compare pixel 8a vs galaxy s24");
    assert_eq!(intent.kind, IntentKind::Compare);
}

#[test]
fn rule_priority_irrelevant_beats_greeting() {
    // Off-topic keyword with no phone context outranks the greeting rule
    let intent = classify("what can you do about the weather");
    assert_eq!(intent.kind, IntentKind::Irrelevant);
}
