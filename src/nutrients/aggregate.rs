use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::keys::{equivalents, normalize};
use super::payload::{Entry, Item, NutrientPayload};

/// Canonical nutrient key -> summed amount.
pub type NutrientMap = BTreeMap<String, f64>;

/// Sum of the named scalars. These never go through [`aggregate`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct MacroTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub water_ml: f64,
}

impl MacroTotals {
    pub fn of(payload: &NutrientPayload) -> Self {
        Self {
            calories: payload.calories,
            protein: payload.protein,
            carbs: payload.carbs,
            fats: payload.fats,
            water_ml: payload.water_ml,
        }
    }

    pub fn sum(entries: &[Entry]) -> Self {
        entries.iter().fold(Self::default(), |acc, entry| {
            let m = Self::of(&entry.macros);
            Self {
                calories: acc.calories + m.calories,
                protein: acc.protein + m.protein,
                carbs: acc.carbs + m.carbs,
                fats: acc.fats + m.fats,
                water_ml: acc.water_ml + m.water_ml,
            }
        })
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        match key {
            "calories" => Some(self.calories),
            "protein" => Some(self.protein),
            "carbs" => Some(self.carbs),
            "fats" => Some(self.fats),
            "water_ml" => Some(self.water_ml),
            _ => None,
        }
    }
}

/// Day-level nutrient totals, excluding the named scalars.
///
/// Per entry and per canonical key, the entry's items are the source of
/// truth whenever they carry a positive amount for that key; the entry-level
/// extra scalars and micronutrient map are only used for keys the items do
/// not cover. Extra scalars and micronutrients are added to each other as
/// they are.
pub fn aggregate(entries: &[Entry]) -> NutrientMap {
    let mut totals = NutrientMap::new();
    for entry in entries {
        let from_items = aggregate_items(entry);
        for (key, value) in entry_level(&entry.macros) {
            if from_items.get(&key).is_some_and(|v| *v > 0.0) {
                continue;
            }
            *totals.entry(key).or_default() += value;
        }
        for (key, value) in from_items {
            *totals.entry(key).or_default() += value;
        }
    }
    totals
}

/// Extra nutrients of one entry derived purely from its itemized breakdown.
pub fn aggregate_items(entry: &Entry) -> NutrientMap {
    let mut totals = NutrientMap::new();
    for item in &entry.macros.items {
        for (key, value) in item.extra_nutrients() {
            *totals.entry(normalize(key).to_string()).or_default() += value;
        }
    }
    totals
}

fn entry_level(payload: &NutrientPayload) -> NutrientMap {
    let mut totals = NutrientMap::new();
    for (key, value) in payload.extra_scalars().chain(payload.micronutrients()) {
        *totals.entry(normalize(key).to_string()).or_default() += value;
    }
    totals
}

/// Amount of `key` (under every spelling) recorded on the payload itself:
/// extra scalars plus micronutrients, or only the scalar for a named key.
pub fn payload_amount(payload: &NutrientPayload, key: &str) -> f64 {
    if let Some(value) = payload.scalar(normalize(key)) {
        return value;
    }
    equivalents(key)
        .into_iter()
        .map(|k| payload.extra(k).unwrap_or(0.0) + payload.micro(k).unwrap_or(0.0))
        .sum()
}

/// Amount of `key` (under every spelling) in one item.
pub fn item_amount(item: &Item, key: &str) -> f64 {
    equivalents(key)
        .into_iter()
        .filter_map(|k| item.nutrient(k))
        .sum()
}
