use std::collections::BTreeMap;

use super::keys::normalize;

/// Denominator used when neither a goal nor a reference value exists.
/// Any logged amount then reads as complete instead of dividing by zero.
pub const NEUTRAL_TARGET: f64 = 1.0;

/// Reference daily values, keyed by canonical nutrient key.
const REFERENCE_VALUES: &[(&str, f64)] = &[
    ("calories", 2000.0),
    ("protein", 150.0),
    ("carbs", 250.0),
    ("fats", 70.0),
    ("water_ml", 3000.0),
    ("fiber_g", 30.0),
    ("sugar_g", 30.0),
    ("added_sugar_g", 25.0),
    ("saturated_fat_g", 25.0),
    ("cholesterol_mg", 300.0),
    // vitamins
    ("vitamin_a_iu", 3000.0),
    ("vitamin_c_mg", 90.0),
    ("vitamin_d_iu", 600.0),
    ("vitamin_e_mg", 15.0),
    ("vitamin_k_mcg", 120.0),
    ("vitamin_b1_thiamine_mg", 1.2),
    ("vitamin_b2_riboflavin_mg", 1.3),
    ("vitamin_b3_niacin_mg", 16.0),
    ("vitamin_b5_pantothenic_acid_mg", 5.0),
    ("vitamin_b6_pyridoxine_mg", 1.3),
    ("vitamin_b7_biotin_mcg", 30.0),
    ("vitamin_b9_folate_mcg", 400.0),
    ("vitamin_b12_cobalamin_mcg", 2.4),
    // minerals
    ("calcium_mg", 1000.0),
    ("iron_mg", 8.0),
    ("magnesium_mg", 400.0),
    ("phosphorus_mg", 700.0),
    ("potassium_mg", 3400.0),
    ("sodium_mg", 2300.0),
    ("zinc_mg", 11.0),
    ("copper_mcg", 900.0),
    ("manganese_mg", 2.3),
    ("selenium_mcg", 55.0),
    ("iodine_mcg", 150.0),
    ("chromium_mcg", 35.0),
    ("molybdenum_mcg", 45.0),
    ("chloride_mg", 2300.0),
    // supplements
    ("epa_mg", 250.0),
    ("dha_mg", 250.0),
    ("creatine_g", 5.0),
];

pub fn reference_value(key: &str) -> Option<f64> {
    let key = normalize(key);
    REFERENCE_VALUES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
}

pub fn reference_keys() -> impl Iterator<Item = &'static str> {
    REFERENCE_VALUES.iter().map(|(k, _)| *k)
}

/// Target for `key`: the user's goal, then the reference value, then
/// [`NEUTRAL_TARGET`]. Goals that are zero, negative or not finite are
/// treated as unset.
pub fn resolve_target(key: &str, goals: &BTreeMap<String, f64>) -> f64 {
    let canonical = normalize(key);
    goals
        .get(canonical)
        .or_else(|| goals.get(key))
        .copied()
        .filter(|goal| goal.is_finite() && *goal > 0.0)
        .or_else(|| reference_value(canonical))
        .unwrap_or(NEUTRAL_TARGET)
}

pub fn percent_of_target(value: f64, target: f64) -> f64 {
    let target = if target.is_finite() && target > 0.0 {
        target
    } else {
        NEUTRAL_TARGET
    };
    value / target * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goals(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn falls_back_to_reference_then_neutral() {
        let none = BTreeMap::new();
        assert_eq!(resolve_target("vitamin_c_mg", &none), 90.0);
        assert_eq!(resolve_target("calories", &none), 2000.0);
        assert_eq!(resolve_target("astaxanthin_mg", &none), NEUTRAL_TARGET);
    }

    #[test]
    fn explicit_goal_wins() {
        let g = goals(&[("calories", 2400.0), ("water_ml", 3500.0)]);
        assert_eq!(resolve_target("calories", &g), 2400.0);
        assert_eq!(resolve_target("water_ml", &g), 3500.0);
        assert_eq!(resolve_target("protein", &g), 150.0);
    }

    #[test]
    fn unusable_goals_are_ignored() {
        let g = goals(&[("calories", 0.0), ("protein", f64::NAN), ("iron_mg", -3.0)]);
        assert_eq!(resolve_target("calories", &g), 2000.0);
        assert_eq!(resolve_target("protein", &g), 150.0);
        assert_eq!(resolve_target("iron_mg", &g), 8.0);
    }

    #[test]
    fn variant_spellings_resolve_to_canonical_target() {
        let none = BTreeMap::new();
        assert_eq!(resolve_target("omega3_epa_mg", &none), 250.0);
        assert_eq!(resolve_target("fiber", &none), 30.0);

        let g = goals(&[("epa_mg", 500.0)]);
        assert_eq!(resolve_target("omega3_epa_mg", &g), 500.0);
    }

    #[test]
    fn reference_keys_are_canonical() {
        for key in reference_keys() {
            assert_eq!(normalize(key), key);
        }
    }

    #[test]
    fn percent_never_divides_by_zero() {
        assert_eq!(percent_of_target(45.0, 90.0), 50.0);
        assert_eq!(percent_of_target(1.0, 0.0), 100.0);
        assert_eq!(percent_of_target(0.0, NEUTRAL_TARGET), 0.0);
    }
}
