use time::{
    format_description::well_known::{Iso8601, Rfc3339},
    Date, OffsetDateTime, PrimitiveDateTime,
};
use tracing::{error, info, instrument};
use uuid::Uuid;

use super::dto::MealBreakdown;
use crate::day::noon;
use crate::nutrients::aggregate::{item_amount, payload_amount};
use crate::nutrients::keys::is_named_scalar;
use crate::nutrients::{aggregate_items, Entry, MacroTotals, NutrientPayload};
use crate::oracle::{OracleError, OracleReading, ParsedItems};
use crate::state::AppState;
use crate::store::NewEntry;

/// Keyword in the user's text -> nutrient the oracle should have extracted.
const EXTRACTION_CHECKS: &[(&str, &str)] = &[
    ("creatine", "creatine_g"),
    ("omega", "epa_mg"),
    ("fish oil", "epa_mg"),
    ("magnesium", "magnesium_mg"),
    ("vitamin d", "vitamin_d_iu"),
];

/// Payload fields an oracle extra must not shadow.
const RESERVED_FIELDS: &[&str] = &["food_name", "micros", "items", "warnings", "error"];

/// Analyze `raw_text` and store the result as a new entry.
///
/// Oracle failures are not errors here: the entry is stored with a zeroed
/// payload carrying the failure, so the text is never lost.
#[instrument(skip(state, raw_text), fields(len = raw_text.len()))]
pub async fn log_entry(
    state: &AppState,
    raw_text: &str,
    day: Option<Date>,
) -> anyhow::Result<Entry> {
    anyhow::ensure!(!raw_text.trim().is_empty(), "raw_text must not be empty");

    let reference = day.map(noon).unwrap_or_else(OffsetDateTime::now_utc);
    let (ingested_at, macros) = match state.oracle.analyze(raw_text, reference).await {
        Ok(reading) => {
            let ingested_at = merge_ingested_at(reading.ingested_at.as_deref(), day, reference);
            (ingested_at, payload_from_reading(raw_text, reading))
        }
        Err(e) => {
            error!(error = %e, "oracle failed; storing entry without nutrients");
            (reference, NutrientPayload::failed(raw_text, &e.to_string()))
        }
    };

    let entry = state
        .entries
        .create(NewEntry {
            raw_text: raw_text.to_string(),
            ingested_at,
            macros,
        })
        .await?;
    info!(
        entry_id = %entry.id,
        failed = entry.macros.is_failed(),
        warnings = entry.macros.warnings.as_ref().map_or(0, Vec::len),
        "entry logged"
    );
    Ok(entry)
}

#[instrument(skip(state, raw_text), fields(len = raw_text.len()))]
pub async fn parse_items(state: &AppState, raw_text: &str) -> Result<ParsedItems, OracleError> {
    state.oracle.parse_items(raw_text).await
}

#[instrument(skip(state))]
pub async fn delete_entry(state: &AppState, id: Uuid) -> anyhow::Result<bool> {
    let deleted = state.entries.delete(id).await?;
    if deleted {
        info!(%id, "entry deleted");
    }
    Ok(deleted)
}

#[instrument(skip(state))]
pub async fn meal_breakdown(state: &AppState, id: Uuid) -> anyhow::Result<Option<MealBreakdown>> {
    Ok(state.entries.get(id).await?.map(|entry| breakdown(&entry)))
}

pub fn breakdown(entry: &Entry) -> MealBreakdown {
    MealBreakdown {
        entry_id: entry.id,
        name: entry.display_name().to_string(),
        ingested_at: entry.ingested_at,
        totals: MacroTotals::of(&entry.macros),
        nutrients: aggregate_items(entry),
        items: entry.macros.items.clone(),
        warnings: entry.macros.warnings.clone(),
        error: entry.macros.error.clone(),
    }
}

fn payload_from_reading(raw_text: &str, reading: OracleReading) -> NutrientPayload {
    let totals = reading.total_macros;
    let extras = reading
        .extras
        .into_iter()
        .filter(|(key, value)| {
            value.is_number() && !is_named_scalar(key) && !RESERVED_FIELDS.contains(&key.as_str())
        })
        .collect();

    let mut payload = NutrientPayload {
        calories: totals.calories,
        protein: totals.protein,
        carbs: totals.carbs,
        fats: totals.fats,
        water_ml: totals.water_ml,
        food_name: reading.food_name.filter(|name| !name.trim().is_empty()),
        micros: reading.micros,
        items: reading.items,
        warnings: None,
        error: None,
        extras,
    };
    let warnings = extraction_warnings(raw_text, &payload);
    payload.warnings = (!warnings.is_empty()).then_some(warnings);
    payload
}

/// Flags supplements the user mentioned but the oracle left out.
pub fn extraction_warnings(raw_text: &str, payload: &NutrientPayload) -> Vec<String> {
    let lowered = raw_text.to_lowercase();
    EXTRACTION_CHECKS
        .iter()
        .filter(|(keyword, _)| lowered.contains(keyword))
        .filter(|(_, key)| {
            let in_items: f64 = payload.items.iter().map(|item| item_amount(item, key)).sum();
            payload_amount(payload, key) + in_items <= 0.0
        })
        .map(|(keyword, key)| format!("Mentioned '{keyword}' but no {key} was extracted."))
        .collect()
}

/// Consumption time: the oracle's timestamp when it parses; otherwise
/// `reference`. When the user picked a day, the timestamp's wall-clock time
/// is placed on that UTC day so the entry is listed under it.
pub fn merge_ingested_at(
    extracted: Option<&str>,
    day: Option<Date>,
    reference: OffsetDateTime,
) -> OffsetDateTime {
    let Some(parsed) = extracted.and_then(parse_timestamp) else {
        return reference;
    };
    match day {
        Some(day) => PrimitiveDateTime::new(day, parsed.time()).assume_utc(),
        None => parsed,
    }
}

fn parse_timestamp(s: &str) -> Option<OffsetDateTime> {
    let s = s.trim();
    OffsetDateTime::parse(s, &Rfc3339)
        .or_else(|_| OffsetDateTime::parse(s, &Iso8601::DEFAULT))
        .ok()
        .or_else(|| {
            // no offset given; the oracle reasons in UTC
            PrimitiveDateTime::parse(s, &Iso8601::DEFAULT)
                .ok()
                .map(PrimitiveDateTime::assume_utc)
        })
}
