//! Chat pipeline.
//!
//! The full request flow: rate limiter, safety filter, toxicity filter,
//! off-topic check, intent classification, then dispatch into search,
//! comparison, details, explanation or general handling. Every refusal
//! is a structured response, never an error; the only loud failure mode
//! is the comparator precondition, which the pipeline pre-validates.

use tracing::{debug, error, info, Instrument};
use uuid::Uuid;

use vera_common::chat::{ChatResponse, IntentKind, IntentResult, RateLimitInfo, ResponseKind};
use vera_common::safety::{
    check_safety, check_toxicity, is_general_query_off_topic, is_query_off_topic,
    offtopic::OFF_TOPIC_REFUSAL, RateLimitResult,
};
use vera_common::{CatalogItem, PriorityFeature, RankingCriteria, SearchCriteria};

use crate::classifier;
use crate::comparison;
use crate::ranking::rank_items;
use crate::resolver;
use crate::responder;
use crate::router;
use crate::search::search_items;
use crate::state::AppState;

/// Handle one chat message from `client_id`.
pub async fn handle_chat(state: &AppState, client_id: &str, message: &str) -> ChatResponse {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("chat", %request_id, client = client_id);
    process_chat(state, client_id, message).instrument(span).await
}

async fn process_chat(state: &AppState, client_id: &str, message: &str) -> ChatResponse {
    // Admission control first; independent of message content
    if let RateLimitResult::Limited { retry_after } = state.rate_limiter.check(client_id) {
        info!("rate limited");
        let mut response = ChatResponse::refusal(state.rate_limiter.refusal_message());
        response.retry_after = Some(retry_after.as_secs().max(1));
        return response;
    }

    let safety = check_safety(message);
    if !safety.is_safe() {
        info!(reason = ?safety.reason, "refused by safety filter");
        return ChatResponse::refusal(
            safety
                .refusal
                .unwrap_or_else(|| responder::REFUSAL_MESSAGE.to_string()),
        );
    }

    let toxicity = check_toxicity(message);
    if !toxicity.is_safe() {
        info!(reason = ?toxicity.reason, "refused by toxicity filter");
        return ChatResponse::refusal(
            toxicity
                .refusal
                .unwrap_or_else(|| responder::REFUSAL_MESSAGE.to_string()),
        );
    }

    if is_query_off_topic(message) {
        info!("refused as off-topic");
        return ChatResponse::refusal(OFF_TOPIC_REFUSAL);
    }

    let intent = classifier::detect_intent(state.llm.as_ref(), &state.retry, message).await;
    info!(intent = %intent.kind, confidence = intent.confidence, "intent classified");

    match intent.kind {
        IntentKind::Adversarial => ChatResponse::refusal(responder::REFUSAL_MESSAGE),
        IntentKind::Irrelevant => ChatResponse::refusal(OFF_TOPIC_REFUSAL),
        IntentKind::Search => handle_search(state, message, &intent).await,
        IntentKind::Compare => handle_compare_intent(state, message, &intent).await,
        IntentKind::Details => handle_details(state, message, &intent).await,
        IntentKind::Explain => {
            let text =
                responder::explanation_response(state.llm.as_ref(), &state.retry, message).await;
            ChatResponse::text(ResponseKind::Explain, text)
        }
        IntentKind::General => {
            // Second net: the classifier calls some off-topic queries general
            if is_general_query_off_topic(message) {
                info!("general query refused as off-topic");
                return ChatResponse::refusal(OFF_TOPIC_REFUSAL);
            }
            let text = responder::general_response(state.llm.as_ref(), &state.retry, message).await;
            ChatResponse::text(ResponseKind::General, text)
        }
    }
}

/// Search: merge classifier parameters with rule-extracted ones, filter,
/// rank, and answer with the top slice.
async fn handle_search(state: &AppState, message: &str, intent: &IntentResult) -> ChatResponse {
    let budget = intent
        .parameters
        .budget
        .or_else(|| router::extract_budget(message));
    let no_features = Vec::new();
    let features = intent.parameters.features.as_ref().unwrap_or(&no_features);

    let mut criteria = SearchCriteria {
        budget,
        ..Default::default()
    };
    if let Some(brands) = &intent.parameters.brands {
        if !brands.is_empty() {
            criteria.brands = Some(brands.clone());
        }
    }
    for feature in features {
        match feature.as_str() {
            "camera" => criteria.min_camera = Some(40),
            "battery" => criteria.min_battery = Some(5000),
            "5g" => criteria.has_5g = Some(true),
            "gaming" | "performance" => criteria.min_ram = Some(8),
            _ => {}
        }
    }

    let results = search_items(state.catalog.items(), &criteria);
    let priority = features
        .iter()
        .find_map(|f| PriorityFeature::from_token(f));
    let ranked = rank_items(results, &RankingCriteria { budget, priority });

    let max = state.config.limits.max_results;
    let top: Vec<CatalogItem> = ranked.iter().take(max).cloned().collect();
    let additional: Vec<CatalogItem> = ranked.iter().skip(max).take(max).cloned().collect();
    debug!(matches = ranked.len(), returned = top.len(), "search complete");

    let text =
        responder::search_response(state.llm.as_ref(), &state.retry, message, &top, budget).await;

    ChatResponse {
        message: text,
        kind: ResponseKind::Search,
        items: (!top.is_empty()).then_some(top),
        additional_items: (!additional.is_empty()).then_some(additional),
        comparison: None,
        retry_after: None,
    }
}

/// Comparison via entity resolution: exact lookup first, loose fuzzy
/// match second, then the comparator once at least two distinct records
/// are resolved.
async fn handle_compare_intent(
    state: &AppState,
    message: &str,
    intent: &IntentResult,
) -> ChatResponse {
    let models = intent
        .parameters
        .models
        .clone()
        .unwrap_or_else(|| router::extract_compare_models(message));

    let threshold = state.config.resolver.compare_threshold;
    let mut resolved: Vec<CatalogItem> = Vec::new();
    for name in &models {
        let found = state.catalog.find_by_model(name).cloned().or_else(|| {
            resolver::fuzzy_search_model(state.catalog.items(), name, threshold)
                .into_iter()
                .next()
        });
        match found {
            Some(item) => {
                if !resolved.iter().any(|r| r.model_key() == item.model_key()) {
                    resolved.push(item);
                }
            }
            None => debug!(name = name.as_str(), "comparison entity not resolved"),
        }
    }

    if resolved.len() < 2 {
        info!(resolved = resolved.len(), "not enough entities to compare");
        return ChatResponse::text(ResponseKind::General, responder::NEED_TWO_MODELS_MESSAGE);
    }

    match comparison::compare_items(&resolved) {
        Ok(result) => {
            let text =
                responder::comparison_response(state.llm.as_ref(), &state.retry, &resolved).await;
            ChatResponse {
                message: text,
                kind: ResponseKind::Compare,
                items: Some(resolved),
                additional_items: None,
                comparison: Some(result),
                retry_after: None,
            }
        }
        Err(e) => {
            error!(%e, "comparison failed after count validation");
            ChatResponse::error(responder::GENERIC_ERROR_MESSAGE)
        }
    }
}

/// Details lookup with the strict fuzzy threshold.
async fn handle_details(state: &AppState, message: &str, intent: &IntentResult) -> ChatResponse {
    let query = intent
        .parameters
        .query
        .clone()
        .unwrap_or_else(|| message.to_string());

    let found = resolver::fuzzy_search_model(
        state.catalog.items(),
        &query,
        state.config.resolver.details_threshold,
    );

    match found.into_iter().next() {
        Some(item) => {
            let prompt = format!("Tell me detailed information about the {}", item.model);
            let text = responder::general_response(state.llm.as_ref(), &state.retry, &prompt).await;
            ChatResponse {
                message: text,
                kind: ResponseKind::Details,
                items: Some(vec![item]),
                additional_items: None,
                comparison: None,
                retry_after: None,
            }
        }
        None => ChatResponse::text(ResponseKind::General, responder::UNRESOLVED_DETAILS_MESSAGE),
    }
}

/// Direct comparison of already-selected records (the compare surface of
/// the HTTP boundary). Count is validated here; the comparator itself
/// treats a short list as a caller bug.
pub async fn handle_compare(state: &AppState, items: &[CatalogItem]) -> ChatResponse {
    if items.len() < 2 {
        return ChatResponse::text(ResponseKind::General, responder::NEED_TWO_MODELS_MESSAGE);
    }

    match comparison::compare_items(items) {
        Ok(result) => {
            let text =
                responder::comparison_response(state.llm.as_ref(), &state.retry, items).await;
            ChatResponse {
                message: text,
                kind: ResponseKind::Compare,
                items: Some(items.to_vec()),
                additional_items: None,
                comparison: Some(result),
                retry_after: None,
            }
        }
        Err(e) => {
            error!(%e, "direct comparison failed");
            ChatResponse::error(responder::GENERIC_ERROR_MESSAGE)
        }
    }
}

/// Rate-limit standing for a client, for the `X-RateLimit-*` headers at
/// the HTTP boundary.
pub fn rate_limit_info(state: &AppState, client_id: &str) -> RateLimitInfo {
    state.rate_limiter.info(client_id)
}
