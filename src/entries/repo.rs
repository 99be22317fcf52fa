use anyhow::Context;
use sqlx::{types::Json, PgPool};
use time::Date;
use uuid::Uuid;

use super::repo_types::EntryRow;
use crate::day;
use crate::nutrients::Entry;
use crate::store::NewEntry;

pub async fn insert_entry(db: &PgPool, entry: NewEntry) -> anyhow::Result<Entry> {
    let row = sqlx::query_as::<_, EntryRow>(
        r#"
        INSERT INTO entries (id, raw_text, ingested_at, macros)
        VALUES ($1, $2, $3, $4)
        RETURNING id, raw_text, ingested_at, created_at, macros
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&entry.raw_text)
    .bind(entry.ingested_at)
    .bind(Json(&entry.macros))
    .fetch_one(db)
    .await
    .context("insert entry")?;
    Ok(row.into())
}

pub async fn get_entry(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Entry>> {
    let row = sqlx::query_as::<_, EntryRow>(
        r#"
        SELECT id, raw_text, ingested_at, created_at, macros
          FROM entries
         WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
    .context("get entry")?;
    Ok(row.map(Entry::from))
}

pub async fn list_entries_by_day(db: &PgPool, day: Date) -> anyhow::Result<Vec<Entry>> {
    let (start, end) = day::bounds(day);
    let rows = sqlx::query_as::<_, EntryRow>(
        r#"
        SELECT id, raw_text, ingested_at, created_at, macros
          FROM entries
         WHERE ingested_at >= $1 AND ingested_at < $2
         ORDER BY ingested_at ASC
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(db)
    .await
    .with_context(|| format!("list entries for {day}"))?;
    Ok(rows.into_iter().map(Entry::from).collect())
}

pub async fn delete_entry(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM entries WHERE id = $1")
        .bind(id)
        .execute(db)
        .await
        .context("delete entry")?;
    Ok(res.rows_affected() > 0)
}
