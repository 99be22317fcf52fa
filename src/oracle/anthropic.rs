use std::time::Duration;

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{debug, instrument, warn};

use super::{prompts, NutritionOracle, OracleError, OracleReading, ParsedItems};
use crate::config::OracleConfig;

const API_VERSION: &str = "2023-06-01";
const ITEMS_MAX_TOKENS: u32 = 800;

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct Usage {
    input_tokens: u64,
    output_tokens: u64,
}

/// Oracle backed by the Anthropic Messages API.
#[derive(Clone)]
pub struct AnthropicOracle {
    client: Client,
    config: OracleConfig,
}

impl AnthropicOracle {
    pub fn new(config: OracleConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self { client, config })
    }

    async fn complete(&self, model: &str, max_tokens: u32, prompt: &str) -> Result<String, OracleError> {
        let url = format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&MessagesRequest {
                model,
                max_tokens,
                messages: [Message {
                    role: "user",
                    content: prompt,
                }],
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: MessagesResponse = response.json().await?;
        if let Some(usage) = &body.usage {
            debug!(
                model,
                stop_reason = body.stop_reason.as_deref().unwrap_or("-"),
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "oracle completion"
            );
        }
        if body.stop_reason.as_deref() == Some("max_tokens") {
            warn!(model, "oracle hit max_tokens; reading may be truncated");
        }

        let text = body
            .content
            .into_iter()
            .find(|block| block.kind == "text")
            .map(|block| block.text)
            .unwrap_or_default();
        let text = text.trim();
        if text.is_empty() {
            return Err(OracleError::EmptyResponse);
        }
        Ok(text.to_string())
    }

    async fn complete_json<T: DeserializeOwned>(
        &self,
        model: &str,
        max_tokens: u32,
        prompt: &str,
        max_retries: u32,
    ) -> Result<T, OracleError> {
        let mut attempt = 0;
        loop {
            let result = match self.complete(model, max_tokens, prompt).await {
                Ok(text) => serde_json::from_str::<T>(strip_code_fences(&text)).map_err(OracleError::from),
                Err(e) => Err(e),
            };
            match result {
                Err(e) if e.is_retryable() && attempt < max_retries => {
                    attempt += 1;
                    warn!(error = %e, attempt, "oracle attempt failed; retrying");
                    tokio::time::sleep(Duration::from_secs(u64::from(attempt))).await;
                }
                other => return other,
            }
        }
    }
}

#[async_trait]
impl NutritionOracle for AnthropicOracle {
    #[instrument(skip(self, raw_text), fields(len = raw_text.len()))]
    async fn analyze(
        &self,
        raw_text: &str,
        reference: OffsetDateTime,
    ) -> Result<OracleReading, OracleError> {
        let prompt = prompts::reading(raw_text, reference);
        self.complete_json(
            &self.config.model,
            self.config.max_tokens,
            &prompt,
            self.config.max_retries,
        )
        .await
    }

    #[instrument(skip(self, raw_text), fields(len = raw_text.len()))]
    async fn parse_items(&self, raw_text: &str) -> Result<ParsedItems, OracleError> {
        let prompt = prompts::items(raw_text);
        self.complete_json(&self.config.items_model, ITEMS_MAX_TOKENS, &prompt, 0)
            .await
    }
}

/// Models sometimes wrap JSON in a markdown fence despite being told not to.
fn strip_code_fences(text: &str) -> &str {
    lazy_static! {
        static ref FENCED: Regex = Regex::new(r"(?s)^\s*```[A-Za-z]*\s*(.*?)\s*```\s*$").unwrap();
    }
    FENCED
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(text)
        .trim()
}
