use time::{macros::format_description, Date, Duration, OffsetDateTime, Time};

time::serde::format_description!(pub day_format, Date, "[year]-[month]-[day]");

/// Parse a `YYYY-MM-DD` calendar day.
pub fn parse_day(s: &str) -> Result<Date, time::error::Parse> {
    Date::parse(s.trim(), format_description!("[year]-[month]-[day]"))
}

/// Half-open UTC range `[start, end)` covering `day`.
pub fn bounds(day: Date) -> (OffsetDateTime, OffsetDateTime) {
    let start = day.midnight().assume_utc();
    (start, start + Duration::days(1))
}

/// Noon UTC on `day`; used as the consumption time when the user picks a
/// day but no time can be extracted.
pub fn noon(day: Date) -> OffsetDateTime {
    day.with_time(Time::MIDNIGHT + Duration::hours(12)).assume_utc()
}

#[cfg(test)]
mod tests {
    use time::macros::{date, datetime};

    use super::*;

    #[test]
    fn parses_calendar_days() {
        assert_eq!(parse_day("2024-03-10").unwrap(), date!(2024 - 03 - 10));
        assert_eq!(parse_day(" 2024-12-31 ").unwrap(), date!(2024 - 12 - 31));
        assert!(parse_day("10/03/2024").is_err());
        assert!(parse_day("2024-02-30").is_err());
    }

    #[test]
    fn bounds_cover_one_day() {
        let (start, end) = bounds(date!(2024 - 03 - 10));
        assert_eq!(start, datetime!(2024-03-10 0:00 UTC));
        assert_eq!(end, datetime!(2024-03-11 0:00 UTC));
    }

    #[test]
    fn noon_is_midday_utc() {
        assert_eq!(noon(date!(2024 - 03 - 10)), datetime!(2024-03-10 12:00 UTC));
    }
}
