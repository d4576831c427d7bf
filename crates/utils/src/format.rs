//! Date and status formatting for the bills table.
//!
//! This is the only place raw bill fields are validated. Formatting never
//! fails: anything it cannot read is passed through as-is.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use tracing::debug;

use billed_common::types::BillStatus;
use billed_types::config::DateLocale;

const MONTHS_FR: [&str; 12] = [
    "Jan", "Fév", "Mar", "Avr", "Mai", "Jui", "Jui", "Aoû", "Sep", "Oct", "Nov", "Déc",
];

const MONTHS_EN: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Parse a store date. Accepts `2004-04-04`, `2004-04-04T10:00:00`,
/// `2004-04-04 10:00:00` and RFC 3339 (normalized to UTC).
pub fn parse_bill_date(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, pattern) {
            return Some(dt);
        }
    }
    None
}

/// Format a store date as a short French date (`4 Avr. 04`).
/// Unparseable input is returned unchanged.
pub fn format_date(raw: &str) -> String {
    format_date_with(raw, DateLocale::Fr)
}

/// Format a store date in the given locale. Unparseable input is returned unchanged.
pub fn format_date_with(raw: &str, locale: DateLocale) -> String {
    let Some(dt) = parse_bill_date(raw) else {
        debug!(date = %raw, "unparseable bill date, passing through");
        return raw.to_string();
    };
    let months = match locale {
        DateLocale::Fr => &MONTHS_FR,
        DateLocale::En => &MONTHS_EN,
    };
    let month = months[dt.month0() as usize];
    format!("{} {}. {:02}", dt.day(), month, dt.year().rem_euclid(100))
}

/// Map a raw status code to its display label. Unknown codes pass through.
pub fn format_status(code: &str) -> String {
    match BillStatus::from_code(code) {
        Some(status) => status.label().to_string(),
        None => code.to_string(),
    }
}

/// Format an amount in euros (`400 €`, `12.50 €`). Missing amounts print `—`.
pub fn format_amount(amount: Option<f64>) -> String {
    match amount {
        Some(n) if n.fract() == 0.0 => format!("{n:.0} €"),
        Some(n) => format!("{n:.2} €"),
        None => "—".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_fr() {
        assert_eq!(format_date("2004-04-04"), "4 Avr. 04");
        assert_eq!(format_date("2001-01-01"), "1 Jan. 01");
        assert_eq!(format_date("2021-12-25"), "25 Déc. 21");
    }

    #[test]
    fn test_format_date_en() {
        assert_eq!(format_date_with("2004-04-04", DateLocale::En), "4 Apr. 04");
        assert_eq!(format_date_with("2003-08-15", DateLocale::En), "15 Aug. 03");
    }

    #[test]
    fn test_format_date_accepts_datetime() {
        assert_eq!(format_date("2002-02-02T08:30:00"), "2 Fév. 02");
        assert_eq!(format_date("2002-02-02T08:30:00Z"), "2 Fév. 02");
        assert_eq!(format_date("2002-02-02 08:30:00"), "2 Fév. 02");
    }

    #[test]
    fn test_format_date_passes_through_garbage() {
        assert_eq!(format_date("not a date"), "not a date");
        assert_eq!(format_date("2004-13-45"), "2004-13-45");
        assert_eq!(format_date(""), "");
    }

    #[test]
    fn test_parse_bill_date_order() {
        let a = parse_bill_date("2004-04-04").unwrap();
        let b = parse_bill_date("2003-03-03T23:59:59").unwrap();
        assert!(a > b);
        assert!(parse_bill_date("04/04/2004").is_none());
    }

    #[test]
    fn test_format_status() {
        assert_eq!(format_status("pending"), "En attente");
        assert_eq!(format_status("accepted"), "Accepté");
        assert_eq!(format_status("refused"), "Refusé");
        assert_eq!(format_status("archived"), "archived");
        assert_eq!(format_status(""), "");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(Some(400.0)), "400 €");
        assert_eq!(format_amount(Some(12.5)), "12.50 €");
        assert_eq!(format_amount(None), "—");
    }
}
