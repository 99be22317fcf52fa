use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use time::Date;
use uuid::Uuid;

use crate::entries::repo as entries_repo;
use crate::goals::{dto::DailyGoal, repo as goals_repo};
use crate::nutrients::Entry;
use crate::store::{EntryStore, GoalStore, NewEntry};

pub async fn connect(database_url: &str) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .context("connect to database")
}

/// Entry and goal store backed by Postgres.
#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EntryStore for PgStore {
    async fn create(&self, entry: NewEntry) -> anyhow::Result<Entry> {
        entries_repo::insert_entry(&self.db, entry).await
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Entry>> {
        entries_repo::get_entry(&self.db, id).await
    }

    async fn list_by_day(&self, day: Date) -> anyhow::Result<Vec<Entry>> {
        entries_repo::list_entries_by_day(&self.db, day).await
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        entries_repo::delete_entry(&self.db, id).await
    }
}

#[async_trait]
impl GoalStore for PgStore {
    async fn goal_for(&self, day: Date) -> anyhow::Result<DailyGoal> {
        Ok(goals_repo::find_goal(&self.db, day)
            .await?
            .unwrap_or_else(|| DailyGoal::default_for(day)))
    }

    async fn upsert_goal(&self, goal: DailyGoal) -> anyhow::Result<DailyGoal> {
        goals_repo::upsert_goal(&self.db, &goal).await
    }
}
