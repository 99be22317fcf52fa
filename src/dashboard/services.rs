use time::Date;
use tracing::{debug, instrument};

use super::dto::{DaySnapshot, NutrientDetail};
use crate::goals::dto::DailyGoal;
use crate::nutrients::keys::NAMED_SCALARS;
use crate::nutrients::targets::reference_keys;
use crate::nutrients::{
    aggregate, find_contributors, normalize, percent_of_target, resolve_target, Entry,
    MacroTotals, NutrientMap,
};
use crate::state::AppState;

#[instrument(skip(state))]
pub async fn day_snapshot(state: &AppState, day: Date) -> anyhow::Result<DaySnapshot> {
    let (goals, entries) =
        tokio::try_join!(state.goals.goal_for(day), state.entries.list_by_day(day))?;
    debug!(entries = entries.len(), "loaded day");
    Ok(snapshot(day, goals, entries))
}

#[instrument(skip(state))]
pub async fn nutrient_detail(
    state: &AppState,
    day: Date,
    key: &str,
) -> anyhow::Result<NutrientDetail> {
    let (goals, entries) =
        tokio::try_join!(state.goals.goal_for(day), state.entries.list_by_day(day))?;
    Ok(detail(day, key, &goals, &entries))
}

pub fn snapshot(date: Date, goals: DailyGoal, entries: Vec<Entry>) -> DaySnapshot {
    let totals = MacroTotals::sum(&entries);
    let nutrients = aggregate(&entries);
    let goal_map = goals.targets();
    let targets: NutrientMap = NAMED_SCALARS
        .iter()
        .copied()
        .chain(reference_keys())
        .map(str::to_string)
        .chain(nutrients.keys().cloned())
        .map(|key| {
            let target = resolve_target(&key, &goal_map);
            (key, target)
        })
        .collect();

    DaySnapshot {
        date,
        goals,
        totals,
        nutrients,
        targets,
        entries,
    }
}

pub fn detail(date: Date, key: &str, goals: &DailyGoal, entries: &[Entry]) -> NutrientDetail {
    let key = normalize(key.trim());
    let value = MacroTotals::sum(entries)
        .get(key)
        .unwrap_or_else(|| aggregate(entries).get(key).copied().unwrap_or(0.0));
    let target = resolve_target(key, &goals.targets());

    NutrientDetail {
        date,
        key: key.to_string(),
        value,
        target,
        percent: percent_of_target(value, target),
        contributors: find_contributors(entries, key),
    }
}
