use sqlx::types::Json;
use time::OffsetDateTime;
use tracing::warn;
use uuid::Uuid;

use crate::nutrients::{Entry, NutrientPayload};

#[derive(Debug, sqlx::FromRow)]
pub struct EntryRow {
    pub id: Uuid,
    pub raw_text: String,
    pub ingested_at: OffsetDateTime,
    pub created_at: OffsetDateTime,
    pub macros: Json<serde_json::Value>,
}

impl From<EntryRow> for Entry {
    fn from(r: EntryRow) -> Self {
        // payload decoding is lenient; only a non-object column can fail here
        let macros = serde_json::from_value(r.macros.0).unwrap_or_else(|e| {
            warn!(entry_id = %r.id, error = %e, "unreadable stored payload");
            NutrientPayload::failed(&r.raw_text, "stored payload could not be read")
        });
        Self {
            id: r.id,
            raw_text: r.raw_text,
            ingested_at: r.ingested_at,
            created_at: r.created_at,
            macros,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::datetime;

    use super::*;

    fn row(macros: serde_json::Value) -> EntryRow {
        EntryRow {
            id: Uuid::new_v4(),
            raw_text: "oats with milk".into(),
            ingested_at: datetime!(2024-03-10 08:00 UTC),
            created_at: datetime!(2024-03-10 08:01 UTC),
            macros: Json(macros),
        }
    }

    #[test]
    fn decodes_stored_payload() {
        let entry = Entry::from(row(json!({"calories": 310, "micros": {"iron_mg": 3}})));
        assert_eq!(entry.macros.calories, 310.0);
        assert_eq!(entry.macros.micro("iron_mg"), Some(3.0));
        assert!(!entry.macros.is_failed());
    }

    #[test]
    fn non_object_payload_becomes_failed_entry() {
        let entry = Entry::from(row(json!(null)));
        assert!(entry.macros.is_failed());
        assert_eq!(entry.macros.calories, 0.0);
        assert_eq!(entry.display_name(), "oats with milk");
    }
}
