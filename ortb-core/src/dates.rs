//! Date formats used by the source files, the database and the UI.

use chrono::NaiveDate;

/// Date format of the `date` column in the observation CSV files: "DD/MM/YYYY"
pub const SOURCE_DATE_FORMAT: &str = "%d/%m/%Y";

/// Date format used for storage, facet values and CSV exports: "YYYY-MM-DD"
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a date from the observation files.
///
/// Returns `None` for anything that does not match [`SOURCE_DATE_FORMAT`];
/// callers drop those rows.
pub fn parse_source_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), SOURCE_DATE_FORMAT).ok()
}

/// Parse an ISO date ("YYYY-MM-DD").
pub fn parse_iso_date(s: &str) -> anyhow::Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(s.trim(), ISO_DATE_FORMAT)?)
}

/// Parse a date typed by a user: ISO first, then the source format.
pub fn parse_any_date(s: &str) -> Option<NaiveDate> {
    parse_iso_date(s).ok().or_else(|| parse_source_date(s))
}

/// Format a date as "DD/MM/YYYY" for display.
pub fn format_display(date: &NaiveDate) -> String {
    date.format(SOURCE_DATE_FORMAT).to_string()
}

/// Format a date as "YYYY-MM-DD".
pub fn format_iso(date: &NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

/// Convert an ISO date string to display format, leaving anything else as-is.
pub fn iso_to_display(s: &str) -> String {
    match parse_iso_date(s) {
        Ok(date) => format_display(&date),
        Err(_) => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_source_dates() {
        let date = parse_source_date("01/02/2024").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(parse_source_date(" 31/12/2023 "), NaiveDate::from_ymd_opt(2023, 12, 31));
    }

    #[test]
    fn rejects_malformed_source_dates() {
        assert!(parse_source_date("2024-02-01").is_none());
        assert!(parse_source_date("31/02/2024").is_none());
        assert!(parse_source_date("").is_none());
        assert!(parse_source_date("n/a").is_none());
    }

    #[test]
    fn parse_any_date_accepts_both_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 2, 1);
        assert_eq!(parse_any_date("2024-02-01"), expected);
        assert_eq!(parse_any_date("01/02/2024"), expected);
        assert_eq!(parse_any_date("Feb 1st"), None);
    }

    #[test]
    fn display_and_iso_formatting() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(format_display(&date), "05/01/2024");
        assert_eq!(format_iso(&date), "2024-01-05");
        assert_eq!(iso_to_display("2024-01-05"), "05/01/2024");
        assert_eq!(iso_to_display("bogus"), "bogus");
    }
}
