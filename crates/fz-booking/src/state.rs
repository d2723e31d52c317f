//! Selection and submit button state

use chrono::NaiveDate;

use crate::Locale;

/// The chosen date and time. A time only exists alongside a date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    date: Option<NaiveDate>,
    time: Option<String>,
}

impl Selection {
    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn time(&self) -> Option<&str> {
        self.time.as_deref()
    }

    /// ISO form of the selected date
    pub fn date_iso(&self) -> Option<String> {
        self.date.map(|d| d.format("%Y-%m-%d").to_string())
    }

    /// Pick a date; any chosen time is dropped
    pub fn select_date(&mut self, date: NaiveDate) {
        self.date = Some(date);
        self.time = None;
    }

    /// Pick a time. Ignored (returns false) without a date.
    pub fn select_time(&mut self, time: &str) -> bool {
        if self.date.is_none() {
            return false;
        }
        self.time = Some(time.to_string());
        true
    }

    pub fn clear(&mut self) {
        self.date = None;
        self.time = None;
    }

    pub fn is_complete(&self) -> bool {
        self.date.is_some() && self.time.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitState {
    pub enabled: bool,
    pub label: String,
}

/// Button state for `selection`. The date in the label comes from the
/// form's date value, shown as-is when it is not an ISO date.
pub fn submit_state(selection: &Selection, date_value: &str, locale: &Locale) -> SubmitState {
    match (selection.date(), selection.time()) {
        (None, _) => SubmitState {
            enabled: false,
            label: locale.prompt_label.clone(),
        },
        (Some(_), None) => SubmitState {
            enabled: false,
            label: locale.choose_time(&locale.format_iso(date_value)),
        },
        (Some(_), Some(time)) => SubmitState {
            enabled: true,
            label: locale.book(&locale.format_iso(date_value), time),
        },
    }
}
