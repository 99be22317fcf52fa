use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use super::aggregate::{item_amount, payload_amount};
use super::keys::{is_named_scalar, normalize};
use super::payload::Entry;

/// Upper bound on the contributors returned for one nutrient.
pub const MAX_CONTRIBUTORS: usize = 10;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContributorLevel {
    Item,
    Entry,
}

/// A logged item (or whole entry) that supplied some amount of a nutrient.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Contributor {
    pub name: String,
    pub value: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub entry_id: Uuid,
    pub level: ContributorLevel,
}

/// Largest sources of `key` across `entries`, biggest first.
pub fn find_contributors(entries: &[Entry], key: &str) -> Vec<Contributor> {
    let mut found = all_contributors(entries, key);
    // stable: equal values keep entry order
    found.sort_by(|a, b| b.value.total_cmp(&a.value));
    found.truncate(MAX_CONTRIBUTORS);
    found
}

fn all_contributors(entries: &[Entry], key: &str) -> Vec<Contributor> {
    let named = is_named_scalar(normalize(key));
    let mut found = Vec::new();
    for entry in entries {
        let before = found.len();
        let mut from_items = 0.0;
        for item in &entry.macros.items {
            let value = item_amount(item, key);
            if value > 0.0 {
                from_items += value;
                found.push(Contributor {
                    name: item.name.clone(),
                    value,
                    timestamp: entry.ingested_at,
                    entry_id: entry.id,
                    level: ContributorLevel::Item,
                });
            }
        }
        // named scalars are totalled from the entry scalar, so whatever the
        // items leave over is attributed to the entry
        if found.len() > before && !named {
            continue;
        }

        let value = payload_amount(&entry.macros, key) - from_items;
        if value > 0.0 {
            found.push(Contributor {
                name: entry.display_name().to_string(),
                value,
                timestamp: entry.ingested_at,
                entry_id: entry.id,
                level: ContributorLevel::Entry,
            });
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::nutrients::aggregate::aggregate;
    use crate::nutrients::fixtures::entry;

    #[test]
    fn empty_day_has_no_contributors() {
        assert!(find_contributors(&[], "fiber_g").is_empty());
    }

    #[test]
    fn items_win_over_entry_name() {
        let meal = entry(json!({
            "food_name": "Breakfast",
            "micros": {"potassium_mg": 400},
            "items": [{"name": "Banana", "nutrients": {"potassium_mg": 400}}]
        }));

        let found = find_contributors(&[meal.clone()], "potassium_mg");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Banana");
        assert_eq!(found[0].value, 400.0);
        assert_eq!(found[0].level, ContributorLevel::Item);
        assert_eq!(found[0].entry_id, meal.id);
        assert_eq!(found[0].timestamp, meal.ingested_at);
    }

    #[test]
    fn fiber_only_in_items_yields_one_row_per_item() {
        let meal = entry(json!({
            "food_name": "Lunch",
            "items": [
                {"name": "Roti", "nutrients": {"fiber": 2}},
                {"name": "Rice", "nutrients": {"fiber": 0}},
                {"name": "Dal", "nutrients": {"fiber": 4}}
            ]
        }));

        let found = find_contributors(&[meal], "fiber_g");
        let names: Vec<_> = found.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Dal", "Roti"]);
    }

    #[test]
    fn entry_fallback_uses_food_name_then_raw_text() {
        let named = entry(json!({"food_name": "Fish oil", "micros": {"omega3_epa_mg": 690}}));
        let mut unnamed = entry(json!({"epa_mg": 100}));
        unnamed.raw_text = "some omega caps".into();

        let found = find_contributors(&[unnamed, named], "epa_mg");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].name, "Fish oil");
        assert_eq!(found[0].value, 690.0);
        assert_eq!(found[0].level, ContributorLevel::Entry);
        assert_eq!(found[1].name, "some omega caps");
    }

    #[test]
    fn entry_fallback_sums_extras_and_micros() {
        let meal = entry(json!({"food_name": "Shake", "fiber_g": 3, "micros": {"fiber_g": 2}}));
        let found = find_contributors(&[meal], "fiber_g");
        assert_eq!(found[0].value, 5.0);
    }

    #[test]
    fn named_scalars_fall_back_to_payload_scalar() {
        let meal = entry(json!({"food_name": "Coffee", "calories": 5}));
        let found = find_contributors(&[meal], "calories");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].value, 5.0);
    }

    #[test]
    fn named_scalar_remainder_goes_to_the_entry() {
        let meal = entry(json!({
            "food_name": "Chicken rice",
            "protein": 40,
            "items": [{"name": "Chicken", "nutrients": {"protein": 35}}]
        }));
        let covered = entry(json!({
            "protein": 12,
            "items": [{"name": "Paneer", "nutrients": {"protein": 12}}]
        }));

        let found = find_contributors(&[meal, covered], "protein");
        let rows: Vec<_> = found.iter().map(|c| (c.name.as_str(), c.value, c.level)).collect();
        assert_eq!(
            rows,
            vec![
                ("Chicken", 35.0, ContributorLevel::Item),
                ("Paneer", 12.0, ContributorLevel::Item),
                ("Chicken rice", 5.0, ContributorLevel::Entry),
            ]
        );
    }

    #[test]
    fn zero_entries_are_omitted() {
        let meal = entry(json!({"food_name": "Water", "water_ml": 500}));
        assert!(find_contributors(&[meal], "iron_mg").is_empty());
    }

    #[test]
    fn capped_and_sorted_descending() {
        let entries: Vec<_> = (1..=15)
            .map(|i| entry(json!({"food_name": format!("meal {i}"), "micros": {"iron_mg": i}})))
            .collect();

        let found = find_contributors(&entries, "iron_mg");
        assert_eq!(found.len(), MAX_CONTRIBUTORS);
        assert!(found.windows(2).all(|w| w[0].value >= w[1].value));
        assert_eq!(found[0].value, 15.0);
        assert_eq!(found[9].value, 6.0);
    }

    #[test]
    fn contributors_add_up_to_the_aggregate() {
        let entries = vec![
            entry(json!({
                "micros": {"magnesium_mg": 80},
                "items": [
                    {"name": "Spinach", "nutrients": {"magnesium_mg": 70}},
                    {"name": "Almonds", "nutrients": {"magnesium_mg": 75}}
                ]
            })),
            entry(json!({"food_name": "Supplement", "magnesium_mg": 200, "micros": {"magnesium_mg": 50}})),
            entry(json!({"food_name": "Tea"})),
        ];

        let contributed: f64 = all_contributors(&entries, "magnesium_mg")
            .iter()
            .map(|c| c.value)
            .sum();
        assert_eq!(aggregate(&entries).get("magnesium_mg"), Some(&contributed));
        assert_eq!(contributed, 395.0);
    }
}
