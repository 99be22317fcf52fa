use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::nutrients::{Item, MacroTotals, NutrientMap};

#[derive(Debug, Deserialize)]
pub struct LogRequest {
    pub raw_text: String,
    /// Calendar day (`YYYY-MM-DD`) the meal belongs to; defaults to now.
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    pub raw_text: String,
}

/// One entry taken apart item by item.
#[derive(Debug, Serialize)]
pub struct MealBreakdown {
    pub entry_id: Uuid,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub ingested_at: OffsetDateTime,
    pub totals: MacroTotals,
    /// Non-scalar nutrients summed over the entry's items.
    pub nutrients: NutrientMap,
    pub items: Vec<Item>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
