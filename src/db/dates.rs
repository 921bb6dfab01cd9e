use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Human readable calendar string used in every response, e.g. `Sun Jan 15 2023`.
pub const DISPLAY_FORMAT: &str = "%a %b %d %Y";

/// Storage format. Lexical order equals calendar order.
pub const STORAGE_FORMAT: &str = "%Y-%m-%d";

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Lower bound used when a log query has no `from`.
pub fn epoch() -> NaiveDate {
    DateTime::<Utc>::UNIX_EPOCH.date_naive()
}

/// Calendar-day spellings accepted on input, tried in order after ISO.
const DATE_FORMATS: &[&str] = &[
    "%Y/%m/%d",
    "%m/%d/%Y",
    DISPLAY_FORMAT,
    "%B %d %Y",
    "%B %d, %Y",
    "%d %B %Y",
];

/// Date-and-time spellings; only the calendar day is kept. Trailing text
/// after the time (an offset or zone name) is ignored.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%a %b %d %Y %H:%M:%S",
];

/// Parses the date spellings clients send: ISO dates and timestamps, the
/// common slash and month-name forms, and the display format itself so
/// responses can be fed back in.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, STORAGE_FORMAT) {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc).date_naive());
    }
    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
    {
        return Some(date);
    }
    DATETIME_FORMATS.iter().find_map(|format| {
        NaiveDateTime::parse_and_remainder(raw, format)
            .ok()
            .map(|(ts, _)| ts.date())
    })
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(ymd(2023, 1, 15)), "Sun Jan 15 2023");
        // Day is zero padded
        assert_eq!(format_date(ymd(2023, 1, 2)), "Mon Jan 02 2023");
    }

    #[test]
    fn test_parse_date_spellings() {
        assert_eq!(parse_date("2023-01-15"), Some(ymd(2023, 1, 15)));
        assert_eq!(parse_date(" 2023-01-15 "), Some(ymd(2023, 1, 15)));
        assert_eq!(parse_date("2023-01-15T23:30:00Z"), Some(ymd(2023, 1, 15)));
        assert_eq!(parse_date("2023-01-15T01:00:00+02:00"), Some(ymd(2023, 1, 14)));
        assert_eq!(parse_date("2023-01-15T10:00:00"), Some(ymd(2023, 1, 15)));
        assert_eq!(parse_date("Sun Jan 15 2023"), Some(ymd(2023, 1, 15)));
    }

    #[test]
    fn test_parse_date_loose_spellings() {
        let expected = Some(ymd(2023, 1, 15));
        assert_eq!(parse_date("2023/01/15"), expected);
        assert_eq!(parse_date("2023/1/15"), expected);
        assert_eq!(parse_date("01/15/2023"), expected);
        assert_eq!(parse_date("Jan 15 2023"), expected);
        assert_eq!(parse_date("January 15, 2023"), expected);
        assert_eq!(parse_date("15 Jan 2023"), expected);
        assert_eq!(parse_date("2023-01-15 08:30:00"), expected);
        assert_eq!(
            parse_date("Sun Jan 15 2023 08:30:00 GMT+0000 (Coordinated Universal Time)"),
            expected
        );
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("2023-13-01"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_epoch() {
        assert_eq!(epoch(), ymd(1970, 1, 1));
    }
}
