//! Timestamps as they are exchanged with the backend.
//!
//! The backend sends ISO-8601 strings without a reliable zone
//! (sometimes with fractional seconds and a `Z` suffix),
//! the browser's `datetime-local` input produces minutes only.

use time::{format_description::FormatItem, macros::format_description, PrimitiveDateTime};

const WIRE: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
const LOCAL_INPUT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]");
const DISPLAY: &[FormatItem<'static>] =
    format_description!("[day]/[month]/[year] [hour]:[minute]");

/// Parse a backend timestamp, ignoring fractions and offsets.
#[must_use]
pub fn parse_timestamp(s: &str) -> Option<PrimitiveDateTime> {
    let s = s.trim().replacen(' ', "T", 1);
    if let Some(dt) = s
        .get(..19)
        .and_then(|prefix| PrimitiveDateTime::parse(prefix, WIRE).ok())
    {
        return Some(dt);
    }
    s.get(..16)
        .filter(|_| s.len() == 16)
        .and_then(|prefix| PrimitiveDateTime::parse(prefix, LOCAL_INPUT).ok())
}

/// E.g. `01/05/2024 20:30`.
///
/// Unparsable values are shown as they are.
#[must_use]
pub fn format_timestamp(s: &str) -> String {
    parse_timestamp(s)
        .and_then(|dt| dt.format(DISPLAY).ok())
        .unwrap_or_else(|| s.to_string())
}

/// Convert the value of a `datetime-local` input
/// into the format expected by the backend.
#[must_use]
pub fn local_input_to_wire(s: &str) -> Option<String> {
    parse_timestamp(s).and_then(|dt| dt.format(WIRE).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_backend_timestamps() {
        for s in [
            "2024-05-01T20:30:00",
            "2024-05-01T20:30:00.000Z",
            "2024-05-01T20:30:00.123+02:00",
            "2024-05-01 20:30:00",
            "2024-05-01T20:30",
        ] {
            let dt = parse_timestamp(s).unwrap();
            assert_eq!((dt.hour(), dt.minute()), (20, 30), "{s}");
        }
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("2024-13-01T20:30:00").is_none());
    }

    #[test]
    fn format_for_display() {
        assert_eq!(format_timestamp("2024-05-01T20:30:00.000Z"), "01/05/2024 20:30");
        assert_eq!(format_timestamp("soon"), "soon");
    }

    #[test]
    fn convert_local_input() {
        assert_eq!(
            local_input_to_wire("2024-05-01T20:30").as_deref(),
            Some("2024-05-01T20:30:00")
        );
        assert!(local_input_to_wire("").is_none());
        assert!(local_input_to_wire("2024-05-01").is_none());
    }
}
