/// Named scalars carried on every payload and every item breakdown.
/// They are summed separately (see [`MacroTotals`](super::MacroTotals)) and
/// never flow through the extra-nutrient maps.
pub const NAMED_SCALARS: [&str; 5] = ["calories", "protein", "carbs", "fats", "water_ml"];

/// Historical spelling -> canonical key. No canonical key may appear on the
/// left-hand side, otherwise `normalize` stops being idempotent.
const ALIASES: &[(&str, &str)] = &[
    ("omega3_epa_mg", "epa_mg"),
    ("omega3_dha_mg", "dha_mg"),
    // item breakdowns use unit-less names
    ("fiber", "fiber_g"),
    ("sugar", "sugar_g"),
    ("sodium", "sodium_mg"),
];

/// Map a raw nutrient field name onto its canonical key.
///
/// Unknown keys are already canonical and come back unchanged.
pub fn normalize(raw_key: &str) -> &str {
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == raw_key)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(raw_key)
}

/// Every spelling that normalizes to the same canonical key as `key`.
/// The canonical key is always first.
pub fn equivalents(key: &str) -> Vec<&str> {
    let canonical = normalize(key);
    let mut keys = vec![canonical];
    keys.extend(
        ALIASES
            .iter()
            .filter(|(_, target)| *target == canonical)
            .map(|(alias, _)| *alias),
    );
    keys
}

pub fn is_named_scalar(key: &str) -> bool {
    NAMED_SCALARS.contains(&key)
}
