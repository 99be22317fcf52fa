use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::day::day_format;

pub const DEFAULT_CALORIE_TARGET: i32 = 2000;
pub const DEFAULT_PROTEIN_TARGET: i32 = 150;
pub const DEFAULT_WATER_TARGET_ML: i32 = 3000;

/// Personal targets for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DailyGoal {
    #[serde(with = "day_format")]
    pub date: Date,
    pub calorie_target: i32,
    pub protein_target: i32,
    pub water_target_ml: i32,
}

impl DailyGoal {
    pub fn default_for(date: Date) -> Self {
        Self {
            date,
            calorie_target: DEFAULT_CALORIE_TARGET,
            protein_target: DEFAULT_PROTEIN_TARGET,
            water_target_ml: DEFAULT_WATER_TARGET_ML,
        }
    }

    /// Goals keyed the same way as the nutrient maps.
    pub fn targets(&self) -> BTreeMap<String, f64> {
        BTreeMap::from([
            ("calories".to_string(), f64::from(self.calorie_target)),
            ("protein".to_string(), f64::from(self.protein_target)),
            ("water_ml".to_string(), f64::from(self.water_target_ml)),
        ])
    }
}

#[derive(Debug, Deserialize)]
pub struct PutGoalRequest {
    pub calorie_target: i32,
    pub protein_target: i32,
    pub water_target_ml: i32,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::date;

    use super::*;

    #[test]
    fn serializes_date_as_calendar_day() {
        let goal = DailyGoal::default_for(date!(2024 - 03 - 10));
        let v = serde_json::to_value(&goal).unwrap();
        assert_eq!(
            v,
            json!({"date": "2024-03-10", "calorie_target": 2000, "protein_target": 150, "water_target_ml": 3000})
        );
    }

    #[test]
    fn targets_use_nutrient_keys() {
        let targets = DailyGoal::default_for(date!(2024 - 03 - 10)).targets();
        assert_eq!(targets.get("calories"), Some(&2000.0));
        assert_eq!(targets.get("protein"), Some(&150.0));
        assert_eq!(targets.get("water_ml"), Some(&3000.0));
    }
}
