use serde::{Deserialize, Serialize};
use time::Date;

use crate::day::day_format;
use crate::goals::dto::DailyGoal;
use crate::nutrients::{Contributor, Entry, MacroTotals, NutrientMap};

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    pub date: Option<String>,
}

/// Everything the dashboard shows for one day.
#[derive(Debug, Serialize)]
pub struct DaySnapshot {
    #[serde(with = "day_format")]
    pub date: Date,
    pub goals: DailyGoal,
    pub totals: MacroTotals,
    pub nutrients: NutrientMap,
    /// Resolved target for every scalar, reference nutrient and consumed
    /// nutrient.
    pub targets: NutrientMap,
    pub entries: Vec<Entry>,
}

/// Drill-down for one nutrient on one day.
#[derive(Debug, Serialize)]
pub struct NutrientDetail {
    #[serde(with = "day_format")]
    pub date: Date,
    pub key: String,
    pub value: f64,
    pub target: f64,
    pub percent: f64,
    pub contributors: Vec<Contributor>,
}
