use axum::http::StatusCode;
use time::{Date, OffsetDateTime};
use tracing::error;

use crate::day::parse_day;

pub type ApiError = (StatusCode, String);

pub fn internal(e: anyhow::Error) -> ApiError {
    error!(error = %e, "internal error");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

pub fn bad_request(msg: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, msg.into())
}

pub fn not_found(what: &str) -> ApiError {
    (StatusCode::NOT_FOUND, format!("{what} not found"))
}

/// `YYYY-MM-DD` from a request, or today (UTC) when absent.
pub fn day_or_today(raw: Option<&str>) -> Result<Date, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(OffsetDateTime::now_utc().date()),
        Some(s) => parse_day(s)
            .map_err(|_| bad_request(format!("invalid date '{s}', expected YYYY-MM-DD"))),
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    #[test]
    fn day_param() {
        assert_eq!(day_or_today(Some("2024-03-10")).unwrap(), date!(2024 - 03 - 10));
        assert_eq!(day_or_today(Some(" ")).unwrap(), OffsetDateTime::now_utc().date());
        let (status, _) = day_or_today(Some("10/03/2024")).unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
