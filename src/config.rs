use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct OracleConfig {
    pub api_key: String,
    pub base_url: String,
    /// Model used for the full nutrient reading.
    pub model: String,
    /// Cheaper model used to split text into items for review.
    pub items_model: String,
    pub max_tokens: u32,
    pub max_retries: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub oracle: OracleConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let oracle = OracleConfig {
            api_key: std::env::var("ANTHROPIC_API_KEY")?,
            base_url: std::env::var("ANTHROPIC_BASE_URL")
                .unwrap_or_else(|_| "https://api.anthropic.com".into()),
            model: std::env::var("ORACLE_MODEL")
                .unwrap_or_else(|_| "claude-sonnet-4-20250514".into()),
            items_model: std::env::var("ORACLE_ITEMS_MODEL")
                .unwrap_or_else(|_| "claude-3-haiku-20240307".into()),
            max_tokens: std::env::var("ORACLE_MAX_TOKENS")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(2500),
            max_retries: std::env::var("ORACLE_MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(2),
        };
        Ok(Self {
            database_url,
            oracle,
        })
    }
}
