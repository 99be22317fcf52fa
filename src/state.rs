use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::{self, PgStore};
use crate::oracle::{AnthropicOracle, NutritionOracle};
use crate::store::{EntryStore, GoalStore};

/// Collaborators shared by every request. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub entries: Arc<dyn EntryStore>,
    pub goals: Arc<dyn GoalStore>,
    pub oracle: Arc<dyn NutritionOracle>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        let pool = db::connect(&config.database_url).await?;
        if let Err(e) = sqlx::migrate!("./migrations").run(&pool).await {
            tracing::warn!(error = %e, "migration failed; continuing");
        }
        let store = Arc::new(PgStore::new(pool));

        let oracle = Arc::new(AnthropicOracle::new(config.oracle)?) as Arc<dyn NutritionOracle>;

        Ok(Self::from_parts(store.clone(), store, oracle))
    }

    pub fn from_parts(
        entries: Arc<dyn EntryStore>,
        goals: Arc<dyn GoalStore>,
        oracle: Arc<dyn NutritionOracle>,
    ) -> Self {
        Self {
            entries,
            goals,
            oracle,
        }
    }

    #[cfg(test)]
    pub fn fake(oracle: crate::oracle::scripted::ScriptedOracle) -> Self {
        let store = Arc::new(crate::store::memory::MemoryStore::default());
        Self::from_parts(store.clone(), store, Arc::new(oracle))
    }
}
