//! Labels and date formatting
//!
//! Defaults are Serbian (Latin script), matching the site copy.

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use crate::CalendarCursor;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Locale {
    /// Calendar header, starting on Sunday
    pub weekdays_short: Vec<String>,
    /// Month names for the calendar title
    pub months: Vec<String>,
    /// Month names inside a long date
    pub months_long: Vec<String>,
    /// Submit label with nothing selected
    pub prompt_label: String,
    /// Submit label with a date only; `{date}` is replaced
    pub choose_time_label: String,
    /// Submit label with date and time; `{date}` and `{time}` are replaced
    pub book_label: String,
    pub no_slots: String,
}

impl Default for Locale {
    fn default() -> Self {
        let strings = |s: &[&str]| s.iter().map(|s| s.to_string()).collect();
        Self {
            weekdays_short: strings(&["Ned", "Pon", "Uto", "Sri", "Čet", "Pet", "Sub"]),
            months: strings(&[
                "Januar", "Februar", "Mart", "April", "Maj", "Jun", "Jul", "Avgust",
                "Septembar", "Oktobar", "Novembar", "Decembar",
            ]),
            months_long: strings(&[
                "januar", "februar", "mart", "april", "maj", "jun", "jul", "avgust",
                "septembar", "oktobar", "novembar", "decembar",
            ]),
            prompt_label: "Odaberite datum i vrijeme za zakazivanje".into(),
            choose_time_label: "Zakažite termin za {date} (izaberite vrijeme)".into(),
            book_label: "Zakaži termin za {date} u {time}".into(),
            no_slots: "Nema dostupnih termina za ovaj dan.".into(),
        }
    }
}

impl Locale {
    /// `"Novembar 2025"`
    pub fn month_title(&self, cursor: CalendarCursor) -> String {
        match self.months.get(cursor.month0() as usize) {
            Some(name) => format!("{} {}", name, cursor.year()),
            None => format!("{:02}/{}", cursor.month0() + 1, cursor.year()),
        }
    }

    /// Long form: `"12. novembar 2025."`
    pub fn format_date(&self, date: NaiveDate) -> String {
        match self.months_long.get(date.month0() as usize) {
            Some(month) => format!("{}. {} {}.", date.day(), month, date.year()),
            None => format!("{}.{}.{}.", date.day(), date.month(), date.year()),
        }
    }

    /// Format an ISO date, falling back to the raw text when it does not parse
    pub fn format_iso(&self, iso: &str) -> String {
        match NaiveDate::parse_from_str(iso, "%Y-%m-%d") {
            Ok(date) => self.format_date(date),
            Err(_) => iso.to_string(),
        }
    }

    pub fn choose_time(&self, date: &str) -> String {
        self.choose_time_label.replace("{date}", date)
    }

    pub fn book(&self, date: &str, time: &str) -> String {
        self.book_label.replace("{date}", date).replace("{time}", time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        let locale = Locale::default();
        let date = NaiveDate::from_ymd_opt(2025, 11, 12).unwrap();
        assert_eq!(locale.format_date(date), "12. novembar 2025.");
        assert_eq!(locale.format_iso("2025-06-01"), "1. jun 2025.");
        assert_eq!(locale.format_iso("not-a-date"), "not-a-date");
    }

    #[test]
    fn test_month_title() {
        let locale = Locale::default();
        let cursor = CalendarCursor::containing(NaiveDate::from_ymd_opt(2025, 8, 3).unwrap());
        assert_eq!(locale.month_title(cursor), "Avgust 2025");
    }

    #[test]
    fn test_labels() {
        let locale = Locale::default();
        assert_eq!(
            locale.book("12. novembar 2025.", "10:00"),
            "Zakaži termin za 12. novembar 2025. u 10:00"
        );
        assert_eq!(
            locale.choose_time("1. jun 2025."),
            "Zakažite termin za 1. jun 2025. (izaberite vrijeme)"
        );
    }
}
