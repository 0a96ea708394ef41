use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];
const TIME_FORMATS: [&str; 2] = ["%H:%M:%S", "%H:%M"];

/// Parses a backend timestamp as a wall-clock instant.
///
/// The backend sends `LocalDateTime` values without an offset; an offset, if
/// present, is dropped rather than converted.
pub fn parse_local_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Some(with_offset.naive_local());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Accepts either a full timestamp or a bare `HH:MM[:SS]` time of day.
pub fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    if raw.contains('T') {
        return parse_local_datetime(raw).map(|dt| dt.time());
    }
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(raw, fmt).ok())
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

pub fn format_hhmm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// `dd/mm/yyyy`, as dates are shown across the site.
pub fn format_date_human(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Start instant sent with a booking request: `YYYY-MM-DDTHH:MM:00`.
pub fn format_start_instant(instant: NaiveDateTime) -> String {
    instant.format("%Y-%m-%dT%H:%M:00").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_of_day_from_iso_and_plain() {
        let eight = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        assert_eq!(parse_time_of_day("2024-01-01T08:00"), Some(eight));
        assert_eq!(parse_time_of_day("2024-01-01T08:00:00"), Some(eight));
        assert_eq!(parse_time_of_day("08:00"), Some(eight));
        assert_eq!(parse_time_of_day(" 08:00:00 "), Some(eight));
        assert_eq!(parse_time_of_day("8h"), None);
        assert_eq!(parse_time_of_day(""), None);
    }

    #[test]
    fn offset_is_dropped_not_converted() {
        let parsed = parse_local_datetime("2024-01-01T14:00:00+02:00").unwrap();
        assert_eq!(format_hhmm(parsed.time()), "14:00");
    }

    #[test]
    fn human_formats() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(format_date_human(date), "05/03/2024");
        let instant = date.and_hms_opt(9, 30, 0).unwrap();
        assert_eq!(format_start_instant(instant), "2024-03-05T09:30:00");
    }
}
