use std::collections::BTreeMap;

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use super::keys::is_named_scalar;

/// One logged meal or snack. Entries are never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    pub id: Uuid,
    pub raw_text: String,
    #[serde(with = "time::serde::rfc3339")]
    pub ingested_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub macros: NutrientPayload,
}

impl Entry {
    /// Label used when the entry as a whole is shown: the oracle's summary,
    /// or the user's own words when there is none.
    pub fn display_name(&self) -> &str {
        self.macros
            .food_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.raw_text)
    }
}

/// Nutrient payload stored with every entry.
///
/// The five named scalars always deserialize to a number; anything missing,
/// `null` or non-numeric becomes `0`. Every other top-level field lands in
/// `extras` and is only read back when it is numeric.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NutrientPayload {
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

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub food_name: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub micros: BTreeMap<String, Value>,

    #[serde(default, deserialize_with = "lenient_items")]
    pub items: Vec<Item>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Vec<String>>,

    /// Set when extraction failed; the scalars are then all zero.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(flatten)]
    pub extras: BTreeMap<String, Value>,
}

impl NutrientPayload {
    /// Payload recorded when the oracle could not produce a reading.
    pub fn failed(raw_text: &str, reason: &str) -> Self {
        Self {
            food_name: Some(raw_text.to_string()),
            warnings: Some(vec![format!(
                "Extraction failed: {reason}. Nutrients could not be calculated."
            )]),
            error: Some(reason.to_string()),
            ..Self::default()
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    pub fn scalar(&self, key: &str) -> Option<f64> {
        match key {
            "calories" => Some(self.calories),
            "protein" => Some(self.protein),
            "carbs" => Some(self.carbs),
            "fats" => Some(self.fats),
            "water_ml" => Some(self.water_ml),
            _ => None,
        }
    }

    /// Numeric top-level fields other than the named scalars, raw keys.
    pub fn extra_scalars(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        numeric_entries(&self.extras).filter(|(key, _)| !is_named_scalar(key))
    }

    /// Numeric micronutrient map values other than the named scalars, raw
    /// keys.
    pub fn micronutrients(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        numeric_entries(&self.micros).filter(|(key, _)| !is_named_scalar(key))
    }

    pub fn extra(&self, key: &str) -> Option<f64> {
        self.extras.get(key).and_then(numeric)
    }

    pub fn micro(&self, key: &str) -> Option<f64> {
        self.micros.get(key).and_then(numeric)
    }
}

/// One component of a meal, e.g. "2 slices bread".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Item {
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    /// Display string with unit; never parsed.
    #[serde(default, deserialize_with = "lenient")]
    pub quantity: String,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub nutrients: BTreeMap<String, Value>,
}

impl Item {
    pub fn nutrient(&self, key: &str) -> Option<f64> {
        self.nutrients.get(key).and_then(numeric)
    }

    /// Numeric nutrients other than the named scalars, raw keys.
    pub fn extra_nutrients(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        numeric_entries(&self.nutrients).filter(|(key, _)| !is_named_scalar(key))
    }
}

pub(crate) fn numeric(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite())
}

fn numeric_entries(map: &BTreeMap<String, Value>) -> impl Iterator<Item = (&str, f64)> + '_ {
    map.iter()
        .filter_map(|(key, value)| numeric(value).map(|v| (key.as_str(), v)))
}

pub(crate) fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(numeric(&value).unwrap_or(0.0))
}

pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

pub(crate) fn lenient_items<'de, D>(deserializer: D) -> Result<Vec<Item>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(raw) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(raw
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}
