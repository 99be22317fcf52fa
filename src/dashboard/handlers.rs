use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::dto::{DayQuery, DaySnapshot, NutrientDetail};
use super::services;
use crate::http::{bad_request, day_or_today, internal, ApiError};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/nutrients/:key", get(get_nutrient))
}

/// GET /dashboard?date=YYYY-MM-DD
#[instrument(skip(state))]
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(q): Query<DayQuery>,
) -> Result<Json<DaySnapshot>, ApiError> {
    let day = day_or_today(q.date.as_deref())?;
    services::day_snapshot(&state, day)
        .await
        .map(Json)
        .map_err(internal)
}

/// GET /dashboard/nutrients/:key?date=YYYY-MM-DD
#[instrument(skip(state))]
pub async fn get_nutrient(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(q): Query<DayQuery>,
) -> Result<Json<NutrientDetail>, ApiError> {
    if key.trim().is_empty() {
        return Err(bad_request("nutrient key is required"));
    }
    let day = day_or_today(q.date.as_deref())?;
    services::nutrient_detail(&state, day, &key)
        .await
        .map(Json)
        .map_err(internal)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::app::testing::call;
    use crate::oracle::scripted::ScriptedOracle;
    use crate::state::AppState;

    #[tokio::test]
    async fn dashboard_reflects_logged_entries() {
        let state = AppState::fake(ScriptedOracle::answering(json!({
            "food_name": "Salmon bowl",
            "items": [
                {"name": "Salmon", "quantity": "150 g", "nutrients": {"protein": 30, "omega3_epa_mg": 500}},
                {"name": "Rice", "quantity": "1 cup", "nutrients": {"carbs": 45}}
            ],
            "total_macros": {"calories": 550, "protein": 34, "carbs": 48, "fats": 18},
            "micros": {"epa_mg": 500}
        })));
        call(
            state.clone(),
            "POST",
            "/api/v1/log",
            Some(json!({"raw_text": "salmon rice bowl", "date": "2024-03-10"})),
        )
        .await;

        let (status, _, body) = call(state.clone(), "GET", "/api/v1/dashboard?date=2024-03-10", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["date"], json!("2024-03-10"));
        assert_eq!(body["totals"]["calories"], json!(550.0));
        assert_eq!(body["nutrients"]["epa_mg"], json!(500.0));
        assert_eq!(body["targets"]["epa_mg"], json!(250.0));
        assert_eq!(body["entries"].as_array().map(Vec::len), Some(1));

        let (status, _, body) = call(
            state,
            "GET",
            "/api/v1/dashboard/nutrients/omega3_epa_mg?date=2024-03-10",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["key"], json!("epa_mg"));
        assert_eq!(body["value"], json!(500.0));
        assert_eq!(body["percent"], json!(200.0));
        assert_eq!(body["contributors"][0]["name"], json!("Salmon"));
        assert_eq!(body["contributors"][0]["level"], json!("item"));
    }

    #[tokio::test]
    async fn bad_date_is_rejected() {
        let state = AppState::fake(ScriptedOracle::failing());
        let (status, _, _) = call(state, "GET", "/api/v1/dashboard?date=March", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
