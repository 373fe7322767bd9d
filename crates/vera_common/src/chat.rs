//! Chat wire types and intent model.
//!
//! These are the shapes the engine exchanges with the HTTP-facing layer
//! and with the AI classifier. Intent results are produced per request
//! and never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogItem;

/// Classified purpose of a user query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    Search,
    Compare,
    Explain,
    Details,
    Adversarial,
    Irrelevant,
    General,
}

impl std::fmt::Display for IntentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Search => "search",
            Self::Compare => "compare",
            Self::Explain => "explain",
            Self::Details => "details",
            Self::Adversarial => "adversarial",
            Self::Irrelevant => "irrelevant",
            Self::General => "general",
        };
        write!(f, "{}", s)
    }
}

/// Parameters extracted alongside an intent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntentParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brands: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub models: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

/// Result of intent classification, from the AI classifier or the rule
/// engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentResult {
    #[serde(rename = "type")]
    pub kind: IntentKind,
    /// Confidence on a 0-100 scale.
    pub confidence: u8,
    #[serde(default)]
    pub parameters: IntentParameters,
}

impl IntentResult {
    pub fn new(kind: IntentKind, confidence: u8) -> Self {
        Self {
            kind,
            confidence: confidence.min(100),
            parameters: IntentParameters::default(),
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.parameters.query = Some(query.into());
        self
    }
}

/// One comparison table row: a feature label, the per-item rendered
/// values, and the winning item index when the row has a polarity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub feature: String,
    pub values: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<usize>,
}

/// Full comparison across 2+ items. Built fresh per request; comparisons
/// are cheap and criteria vary, so this is never cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub items: Vec<CatalogItem>,
    pub rows: Vec<ComparisonRow>,
    pub summary: String,
}

/// Request body for the chat surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Request body for a direct comparison of already-selected items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareRequest {
    pub items: Vec<CatalogItem>,
}

/// Kind tag on an outgoing response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    Search,
    Compare,
    Explain,
    Details,
    General,
    Refusal,
    Error,
}

/// Response handed back across the HTTP boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: ResponseKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<CatalogItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_items: Option<Vec<CatalogItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonResult>,
    /// Seconds until the client may retry, on rate-limit refusals.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

impl ChatResponse {
    pub fn text(kind: ResponseKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
            items: None,
            additional_items: None,
            comparison: None,
            retry_after: None,
        }
    }

    pub fn refusal(message: impl Into<String>) -> Self {
        Self::text(ResponseKind::Refusal, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::text(ResponseKind::Error, message)
    }
}

/// Rate-limit status for a client, exposed for `X-RateLimit-*` headers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitInfo {
    pub remaining: u32,
    pub reset_at: DateTime<Utc>,
}
