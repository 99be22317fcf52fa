use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::{DailyGoal, PutGoalRequest};
use crate::http::{bad_request, day_or_today, internal, ApiError};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/goals/:date", get(get_goal).put(put_goal))
}

#[instrument(skip(state))]
pub async fn get_goal(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<DailyGoal>, ApiError> {
    let day = day_or_today(Some(date.as_str()))?;
    state.goals.goal_for(day).await.map(Json).map_err(internal)
}

/// PUT /goals/:date { calorie_target, protein_target, water_target_ml }
#[instrument(skip(state))]
pub async fn put_goal(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Json(body): Json<PutGoalRequest>,
) -> Result<Json<DailyGoal>, ApiError> {
    let day = day_or_today(Some(date.as_str()))?;
    if body.calorie_target <= 0 || body.protein_target <= 0 || body.water_target_ml <= 0 {
        return Err(bad_request("targets must be positive"));
    }

    let goal = state
        .goals
        .upsert_goal(DailyGoal {
            date: day,
            calorie_target: body.calorie_target,
            protein_target: body.protein_target,
            water_target_ml: body.water_target_ml,
        })
        .await
        .map_err(internal)?;
    info!(%day, "daily goal updated");
    Ok(Json(goal))
}
