//! Response generation.
//!
//! Primary path hands a compact summary of the pipeline's findings to
//! the external generator (through the retry policy); every call has a
//! templated local fallback so a dead LLM degrades to terse but correct
//! answers instead of errors.

use tracing::warn;

use vera_common::llm::LanguageModel;
use vera_common::retry::{retry_with_backoff, RetryPolicy};
use vera_common::CatalogItem;

pub const SYSTEM_PROMPT: &str = "You are a mobile phone shopping assistant. \
Only discuss phones and phone shopping. Use only the specification data provided; \
never invent specs. Be concise, neutral between brands, and helpful.";

pub const REFUSAL_MESSAGE: &str = "I can only help with mobile phone shopping queries. I can assist you with:\n\
- Finding phones by budget or features\n\
- Comparing phones side by side\n\
- Explaining technical terms like OIS or refresh rate\n\
- Details about a specific model\n\n\
What would you like to know?";

pub const NEED_TWO_MODELS_MESSAGE: &str =
    "I need at least 2 phone models to compare. Could you specify which phones you'd like to compare?";

pub const UNRESOLVED_DETAILS_MESSAGE: &str =
    "Could you specify which phone you'd like to know more about?";

pub const GENERIC_ERROR_MESSAGE: &str =
    "I'm having trouble processing your request. Could you try rephrasing it?";

const EXPLAIN_FALLBACK: &str =
    "I'm having trouble generating an explanation right now. Could you rephrase your question?";

const GENERAL_FALLBACK: &str =
    "I'm here to help you find the perfect mobile phone. What are you looking for?";

/// Response text for a search result set.
pub async fn search_response(
    llm: &dyn LanguageModel,
    retry: &RetryPolicy,
    query: &str,
    items: &[CatalogItem],
    budget: Option<u32>,
) -> String {
    if items.is_empty() {
        let budget_text = budget
            .map(|b| format!(" under ₹{}", b))
            .unwrap_or_default();
        return format!(
            "I couldn't find any phones matching your criteria{}. Would you like to adjust your requirements or try a different search?",
            budget_text
        );
    }

    let summary: String = items
        .iter()
        .take(5)
        .enumerate()
        .map(|(idx, item)| {
            format!(
                "{}. {} (₹{}) - {}MP camera, {}mAh battery, {}GB RAM, rated {}/100\n",
                idx + 1,
                item.model,
                item.price,
                item.primary_camera_rear,
                item.battery_capacity,
                item.ram_capacity,
                item.rating
            )
        })
        .collect();

    let prompt = format!(
        "The user asked: \"{}\"\nBudget: {}\nMatching phones:\n{}\nPresent the top recommendations, why they fit, and any trade-offs.",
        query,
        budget.map(|b| format!("₹{}", b)).unwrap_or_else(|| "any".to_string()),
        summary
    );

    match retry_with_backoff(retry, || llm.generate(&prompt, Some(SYSTEM_PROMPT))).await {
        Ok(text) => text,
        Err(e) => {
            warn!(%e, "generator failed, using search template");
            simple_search_response(items, budget)
        }
    }
}

/// Templated search summary used when the generator is unavailable.
pub fn simple_search_response(items: &[CatalogItem], budget: Option<u32>) -> String {
    let budget_text = budget
        .map(|b| format!(" under ₹{}", b))
        .unwrap_or_default();
    let mut response = format!("Here are my top recommendations{}:\n\n", budget_text);

    for (idx, item) in items.iter().take(3).enumerate() {
        response.push_str(&format!(
            "{}. **{}** - ₹{}\n   - {}MP Camera, {}mAh Battery\n   - {}GB RAM, {}GB Storage\n\n",
            idx + 1,
            item.model,
            item.price,
            item.primary_camera_rear,
            item.battery_capacity,
            item.ram_capacity,
            item.internal_memory
        ));
    }

    response
}

/// Response text for a comparison.
pub async fn comparison_response(
    llm: &dyn LanguageModel,
    retry: &RetryPolicy,
    items: &[CatalogItem],
) -> String {
    if items.len() < 2 {
        return NEED_TWO_MODELS_MESSAGE.to_string();
    }

    let summary: String = items
        .iter()
        .map(|item| {
            format!(
                "{}: ₹{}, {}MP camera, {}mAh battery, {}GB RAM, rated {}/100\n",
                item.model,
                item.price,
                item.primary_camera_rear,
                item.battery_capacity,
                item.ram_capacity,
                item.rating
            )
        })
        .collect();

    let prompt = format!(
        "Compare these phones for the user:\n{}\nCover strengths of each, trade-offs, and which use cases favour which phone. Be balanced.",
        summary
    );

    match retry_with_backoff(retry, || llm.generate(&prompt, Some(SYSTEM_PROMPT))).await {
        Ok(text) => text,
        Err(e) => {
            warn!(%e, "generator failed, using comparison template");
            simple_comparison_response(items)
        }
    }
}

/// Templated comparison summary used when the generator is unavailable.
pub fn simple_comparison_response(items: &[CatalogItem]) -> String {
    let names: Vec<&str> = items.iter().map(|item| item.model.as_str()).collect();
    let mut response = format!("Comparing {}:\n\n**Key Specifications:**\n\n", names.join(" vs "));

    let prices: Vec<String> = items.iter().map(|i| format!("₹{}", i.price)).collect();
    let cameras: Vec<String> = items.iter().map(|i| format!("{}MP", i.primary_camera_rear)).collect();
    let batteries: Vec<String> = items.iter().map(|i| format!("{}mAh", i.battery_capacity)).collect();

    response.push_str(&format!("Price: {}\n", prices.join(" | ")));
    response.push_str(&format!("Camera: {}\n", cameras.join(" | ")));
    response.push_str(&format!("Battery: {}\n", batteries.join(" | ")));
    response
}

/// Response text for a technical-term explanation.
pub async fn explanation_response(llm: &dyn LanguageModel, retry: &RetryPolicy, query: &str) -> String {
    let prompt = format!(
        "Explain this mobile phone concept for a shopper in plain language: {}",
        query
    );
    match retry_with_backoff(retry, || llm.generate(&prompt, Some(SYSTEM_PROMPT))).await {
        Ok(text) => text,
        Err(e) => {
            warn!(%e, "generator failed, using explanation fallback");
            EXPLAIN_FALLBACK.to_string()
        }
    }
}

/// Response text for general / small-talk queries.
pub async fn general_response(llm: &dyn LanguageModel, retry: &RetryPolicy, query: &str) -> String {
    match retry_with_backoff(retry, || llm.generate(query, Some(SYSTEM_PROMPT))).await {
        Ok(text) => text,
        Err(e) => {
            warn!(%e, "generator failed, using general fallback");
            GENERAL_FALLBACK.to_string()
        }
    }
}
