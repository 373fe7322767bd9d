//! Intent classification with deterministic fallback.
//!
//! The AI classifier is consulted first; on any failure (timeout,
//! transport error, malformed output) the rule engine takes over. This
//! function never errors - the fallback is total.

use tracing::{debug, warn};

use vera_common::chat::IntentResult;
use vera_common::llm::LanguageModel;
use vera_common::retry::{retry_with_backoff, RetryPolicy};

use crate::router;

/// Classify a user query, AI first, rules on failure.
pub async fn detect_intent(
    llm: &dyn LanguageModel,
    retry: &RetryPolicy,
    query: &str,
) -> IntentResult {
    match retry_with_backoff(retry, || llm.classify(query)).await {
        Ok(mut intent) => {
            intent.confidence = intent.confidence.min(100);
            debug!(intent = %intent.kind, confidence = intent.confidence, "AI classifier result");
            intent
        }
        Err(e) => {
            warn!(%e, "AI classifier unavailable, falling back to rule engine");
            router::classify(query)
        }
    }
}
