use async_trait::async_trait;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::goals::dto::DailyGoal;
use crate::nutrients::{Entry, NutrientPayload};

/// Entry about to be persisted; the store assigns `id` and `created_at`.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub raw_text: String,
    pub ingested_at: OffsetDateTime,
    pub macros: NutrientPayload,
}

#[async_trait]
pub trait EntryStore: Send + Sync {
    async fn create(&self, entry: NewEntry) -> anyhow::Result<Entry>;
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Entry>>;
    /// Entries consumed on `day` (UTC), oldest first.
    async fn list_by_day(&self, day: Date) -> anyhow::Result<Vec<Entry>>;
    /// Returns `false` when nothing was deleted.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}

#[async_trait]
pub trait GoalStore: Send + Sync {
    /// Stored goal for `day`, or the default goal when none was set.
    async fn goal_for(&self, day: Date) -> anyhow::Result<DailyGoal>;
    async fn upsert_goal(&self, goal: DailyGoal) -> anyhow::Result<DailyGoal>;
}
