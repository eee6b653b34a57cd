//! Lenient parsing of backend timestamps for display.

use time::{
    Date, OffsetDateTime, PrimitiveDateTime, format_description::FormatItem,
    format_description::well_known::Rfc3339, macros::format_description,
};

pub const DISPLAY_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

const NAIVE_FRACTIONAL_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");
const NAIVE_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

/// Extract the calendar date from an RFC 3339 timestamp, a naive ISO
/// date-time, or a bare date.
pub fn parse_date(raw: &str) -> Option<Date> {
    let raw = raw.trim();
    if let Ok(parsed) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(parsed.date());
    }
    if let Ok(parsed) = PrimitiveDateTime::parse(raw, NAIVE_FRACTIONAL_FORMAT) {
        return Some(parsed.date());
    }
    if let Ok(parsed) = PrimitiveDateTime::parse(raw, NAIVE_FORMAT) {
        return Some(parsed.date());
    }
    Date::parse(raw, DISPLAY_DATE_FORMAT).ok()
}

/// Render a backend timestamp as `YYYY-MM-DD`, or echo it when unparseable.
pub fn format_created_at(raw: &str) -> String {
    parse_date(raw)
        .and_then(|date| date.format(DISPLAY_DATE_FORMAT).ok())
        .unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_backend_timestamp_shapes() {
        assert_eq!(format_created_at("2024-01-01"), "2024-01-01");
        assert_eq!(format_created_at("2024-03-05T10:11:12"), "2024-03-05");
        assert_eq!(format_created_at("2024-03-05T10:11:12.123456"), "2024-03-05");
        assert_eq!(format_created_at("2024-03-05T23:59:59+00:00"), "2024-03-05");
    }

    #[test]
    fn unparseable_values_are_echoed() {
        assert_eq!(format_created_at("yesterday"), "yesterday");
        assert!(parse_date("").is_none());
    }
}
