use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{instrument, warn};
use uuid::Uuid;

use super::dto::{LogRequest, MealBreakdown, ParseRequest};
use super::services;
use crate::http::{bad_request, day_or_today, internal, not_found, ApiError};
use crate::nutrients::Entry;
use crate::oracle::ParsedItems;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/parse", post(parse_text))
        .route("/log", post(create_log))
        .route("/log/:id", delete(delete_log))
        .route("/log/:id/breakdown", get(get_breakdown))
}

/// POST /parse { raw_text }: item split for review, nothing is stored.
#[instrument(skip(state, body))]
pub async fn parse_text(
    State(state): State<AppState>,
    Json(body): Json<ParseRequest>,
) -> Result<Json<ParsedItems>, ApiError> {
    if body.raw_text.trim().is_empty() {
        return Err(bad_request("raw_text is required"));
    }
    services::parse_items(&state, &body.raw_text)
        .await
        .map(Json)
        .map_err(|e| {
            warn!(error = %e, "parse_items failed");
            (StatusCode::BAD_GATEWAY, e.to_string())
        })
}

/// POST /log { raw_text, date? }
#[instrument(skip(state, body))]
pub async fn create_log(
    State(state): State<AppState>,
    Json(body): Json<LogRequest>,
) -> Result<(StatusCode, HeaderMap, Json<Entry>), ApiError> {
    if body.raw_text.trim().is_empty() {
        return Err(bad_request("raw_text is required"));
    }
    let day = match body.date.as_deref() {
        Some(raw) => Some(day_or_today(Some(raw))?),
        None => None,
    };

    let entry = services::log_entry(&state, &body.raw_text, day)
        .await
        .map_err(internal)?;

    let mut headers = HeaderMap::new();
    let location = HeaderValue::from_str(&format!("/api/v1/log/{}/breakdown", entry.id))
        .map_err(|e| internal(e.into()))?;
    headers.insert(header::LOCATION, location);

    Ok((StatusCode::CREATED, headers, Json(entry)))
}

#[instrument(skip(state))]
pub async fn delete_log(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if services::delete_entry(&state, id).await.map_err(internal)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("entry"))
    }
}

#[instrument(skip(state))]
pub async fn get_breakdown(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MealBreakdown>, ApiError> {
    services::meal_breakdown(&state, id)
        .await
        .map_err(internal)?
        .map(Json)
        .ok_or_else(|| not_found("entry"))
}
