//! Language-model client seam.
//!
//! The engine depends on two collaborator calls only: `classify` for
//! intent detection and `generate` for response text. Both can fail at
//! any time (timeouts, transport errors, malformed output); callers are
//! expected to recover with the deterministic rule engine or templated
//! responses. `HttpLanguageModel` talks to an Ollama-style endpoint;
//! `ScriptedModel` is the fake used by tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::chat::IntentResult;

/// LLM failure modes. `is_retryable` marks the classes the retry policy
/// may re-attempt; everything else propagates immediately.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    #[error("LLM is disabled in configuration")]
    Disabled,

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    #[error("LLM endpoint rate limited the request")]
    RateLimited,

    #[error("LLM endpoint returned server error {0}")]
    Server(u16),

    #[error("Invalid JSON in LLM response: {0}")]
    InvalidJson(String),

    #[error("LLM returned empty response")]
    Empty,
}

impl LlmError {
    /// Network, timeout, rate-limit and 5xx failures are transient;
    /// malformed output is not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LlmError::Http(_) | LlmError::Timeout(_) | LlmError::RateLimited | LlmError::Server(_)
        )
    }
}

/// The two collaborator calls the core depends on. The core never
/// depends on specific prompt content, only on these signatures and
/// their failure modes.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Classify a raw user query into an intent.
    async fn classify(&self, text: &str) -> Result<IntentResult, LlmError>;

    /// Generate free response text for a prompt.
    async fn generate(&self, prompt: &str, system_prompt: Option<&str>) -> Result<String, LlmError>;
}

/// Pull the first `{` … last `}` block out of a free-text LLM response
/// and deserialize it. Models wrap JSON in prose often enough that this
/// is the only reliable way to read structured output back.
pub fn extract_json<T: DeserializeOwned>(text: &str) -> Result<T, LlmError> {
    let start = text.find('{').ok_or_else(|| LlmError::InvalidJson("no JSON object".into()))?;
    let end = text.rfind('}').ok_or_else(|| LlmError::InvalidJson("no JSON object".into()))?;
    if end < start {
        return Err(LlmError::InvalidJson("no JSON object".into()));
    }
    serde_json::from_str(&text[start..=end]).map_err(|e| LlmError::InvalidJson(e.to_string()))
}

const INTENT_SCHEMA_PROMPT: &str = r#"Classify the user's query for a mobile phone shopping assistant. Respond with JSON only:
{"type": "search" | "compare" | "explain" | "details" | "adversarial" | "irrelevant" | "general",
 "confidence": 0-100,
 "parameters": {"budget": number?, "brands": [string]?, "features": [string]?, "models": [string]?, "query": string?}}"#;

/// HTTP client for an Ollama-style generation endpoint.
pub struct HttpLanguageModel {
    endpoint: String,
    model: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpLanguageModel {
    pub fn new(endpoint: &str, model: &str, timeout_secs: u64) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| LlmError::Http(e.to_string()))?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            timeout_secs,
            client,
        })
    }

    async fn generate_raw(&self, prompt: &str) -> Result<String, LlmError> {
        let body = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
        });

        let response = self
            .client
            .post(format!("{}/api/generate", self.endpoint))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(self.timeout_secs)
                } else {
                    LlmError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(LlmError::RateLimited);
        }
        if status.is_server_error() {
            return Err(LlmError::Server(status.as_u16()));
        }
        if !status.is_success() {
            return Err(LlmError::Http(format!("status {}", status)));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidJson(e.to_string()))?;
        let text = json
            .get("response")
            .and_then(|r| r.as_str())
            .unwrap_or("")
            .to_string();

        if text.trim().is_empty() {
            return Err(LlmError::Empty);
        }
        Ok(text)
    }
}

#[async_trait]
impl LanguageModel for HttpLanguageModel {
    async fn classify(&self, text: &str) -> Result<IntentResult, LlmError> {
        let prompt = format!("{}\n\nUser Query: \"{}\"", INTENT_SCHEMA_PROMPT, text);
        let response = self.generate_raw(&prompt).await?;
        debug!(len = response.len(), "classifier response received");
        extract_json(&response)
    }

    async fn generate(&self, prompt: &str, system_prompt: Option<&str>) -> Result<String, LlmError> {
        let full = match system_prompt {
            Some(system) => format!("{}\n\nUser Query: {}", system, prompt),
            None => prompt.to_string(),
        };
        self.generate_raw(&full).await
    }
}

/// Backend used when the LLM is disabled in configuration. Every call
/// fails fast with a non-retryable error so the deterministic paths
/// take over immediately.
pub struct DisabledModel;

#[async_trait]
impl LanguageModel for DisabledModel {
    async fn classify(&self, _text: &str) -> Result<IntentResult, LlmError> {
        Err(LlmError::Disabled)
    }

    async fn generate(&self, _prompt: &str, _system: Option<&str>) -> Result<String, LlmError> {
        Err(LlmError::Disabled)
    }
}

/// Scripted fake for tests: pops pre-loaded results per call, errors with
/// `Empty` once exhausted.
#[derive(Default)]
pub struct ScriptedModel {
    classify_script: Mutex<VecDeque<Result<IntentResult, LlmError>>>,
    generate_script: Mutex<VecDeque<Result<String, LlmError>>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_classify(&self, result: Result<IntentResult, LlmError>) {
        self.classify_script.lock().unwrap().push_back(result);
    }

    pub fn push_generate(&self, result: Result<String, LlmError>) {
        self.generate_script.lock().unwrap().push_back(result);
    }

    /// A model whose every call fails with a timeout; exercises the
    /// deterministic fallbacks.
    pub fn unreachable_model() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn classify(&self, _text: &str) -> Result<IntentResult, LlmError> {
        self.classify_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::Timeout(0)))
    }

    async fn generate(&self, _prompt: &str, _system: Option<&str>) -> Result<String, LlmError> {
        self.generate_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::Timeout(0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::IntentKind;

    #[test]
    fn extract_json_reads_wrapped_object() {
        let text = "Sure! Here is the classification:\n{\"type\": \"search\", \"confidence\": 80}\nLet me know.";
        let intent: IntentResult = extract_json(text).unwrap();
        assert_eq!(intent.kind, IntentKind::Search);
    }

    #[test]
    fn extract_json_without_object_fails() {
        let err = extract_json::<IntentResult>("no structure here").unwrap_err();
        assert!(matches!(err, LlmError::InvalidJson(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn retryable_classes_match_the_policy() {
        assert!(LlmError::Timeout(5).is_retryable());
        assert!(LlmError::RateLimited.is_retryable());
        assert!(LlmError::Server(503).is_retryable());
        assert!(LlmError::Http("connection refused".into()).is_retryable());
        assert!(!LlmError::InvalidJson("bad".into()).is_retryable());
        assert!(!LlmError::Empty.is_retryable());
        assert!(!LlmError::Disabled.is_retryable());
    }

    #[tokio::test]
    async fn scripted_model_pops_in_order() {
        let model = ScriptedModel::new();
        model.push_generate(Ok("first".into()));
        model.push_generate(Err(LlmError::RateLimited));

        assert_eq!(model.generate("p", None).await.unwrap(), "first");
        assert!(model.generate("p", None).await.is_err());
        // Exhausted script behaves like an unreachable backend
        assert!(matches!(
            model.generate("p", None).await,
            Err(LlmError::Timeout(_))
        ));
    }
}
