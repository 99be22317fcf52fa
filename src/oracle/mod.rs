//! Text-to-nutrition oracle.
//!
//! The oracle is an external model that turns free text into structured
//! nutrient JSON. Its output is trusted as-is; the only post-processing is
//! lenient decoding.

mod anthropic;
mod prompts;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use time::OffsetDateTime;

use crate::nutrients::payload::{lenient, lenient_items, lenient_number};
use crate::nutrients::Item;

pub use anthropic::AnthropicOracle;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("oracle returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("oracle returned no text content")]
    EmptyResponse,

    #[error("oracle returned invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl OracleError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::EmptyResponse | Self::Json(_) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Http(e) => e.is_timeout() || e.is_connect(),
        }
    }
}

/// Named scalars as the oracle reports them.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ReadingTotals {
    #[serde(default, deserialize_with = "lenient_number")]
    pub calories: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub protein: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub carbs: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub fats: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub water_ml: f64,
}

/// Full nutrient reading for one utterance.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct OracleReading {
    #[serde(default, deserialize_with = "lenient")]
    pub food_name: Option<String>,
    /// Consumption time as the oracle understood it, ISO 8601.
    #[serde(default, deserialize_with = "lenient")]
    pub ingested_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_items")]
    pub items: Vec<Item>,
    #[serde(default, deserialize_with = "lenient")]
    pub total_macros: ReadingTotals,
    #[serde(default, deserialize_with = "lenient")]
    pub micros: BTreeMap<String, Value>,
    /// Any other top-level fields, e.g. `fiber_g`.
    #[serde(flatten)]
    pub extras: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParsedItem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Lightweight split of an utterance into items, shown to the user for
/// review before a full reading. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParsedItems {
    #[serde(default)]
    pub items: Vec<ParsedItem>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub confidence: Option<Confidence>,
}

#[async_trait]
pub trait NutritionOracle: Send + Sync {
    /// Full reading for `raw_text`. `reference` anchors relative times
    /// ("this morning", "yesterday").
    async fn analyze(
        &self,
        raw_text: &str,
        reference: OffsetDateTime,
    ) -> Result<OracleReading, OracleError>;

    async fn parse_items(&self, raw_text: &str) -> Result<ParsedItems, OracleError>;
}

#[cfg(test)]
pub(crate) mod scripted {
    use super::*;

    /// Oracle returning a canned JSON reading, or failing every call.
    pub struct ScriptedOracle {
        reading: Option<Value>,
    }

    impl ScriptedOracle {
        pub fn answering(reading: Value) -> Self {
            Self {
                reading: Some(reading),
            }
        }

        pub fn failing() -> Self {
            Self { reading: None }
        }
    }

    #[async_trait]
    impl NutritionOracle for ScriptedOracle {
        async fn analyze(
            &self,
            _raw_text: &str,
            _reference: OffsetDateTime,
        ) -> Result<OracleReading, OracleError> {
            match &self.reading {
                Some(v) => Ok(serde_json::from_value(v.clone())?),
                None => Err(OracleError::EmptyResponse),
            }
        }

        async fn parse_items(&self, raw_text: &str) -> Result<ParsedItems, OracleError> {
            if self.reading.is_none() {
                return Err(OracleError::EmptyResponse);
            }
            Ok(ParsedItems {
                items: vec![ParsedItem {
                    name: raw_text.to_string(),
                    quantity: "1 serving".into(),
                    note: None,
                }],
                time: None,
                confidence: Some(Confidence::Medium),
            })
        }
    }
}
