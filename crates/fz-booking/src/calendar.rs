//! Calendar model
//!
//! A month grid aligned to a Sunday-first week: `first_weekday`
//! placeholders followed by one cell per day.

use chrono::{Datelike, Months, NaiveDate};

/// The month on display
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CalendarCursor {
    /// Always the first of the month
    first: NaiveDate,
}

impl CalendarCursor {
    /// Cursor on the month containing `date`
    pub fn containing(date: NaiveDate) -> Self {
        Self { first: date.with_day(1).unwrap_or(date) }
    }

    /// Cursor on `month0` (0-11) of `year`
    pub fn new(year: i32, month0: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month0 + 1, 1).map(|first| Self { first })
    }

    pub fn year(self) -> i32 {
        self.first.year()
    }

    /// Month, 0-11
    pub fn month0(self) -> u32 {
        self.first.month0()
    }

    pub fn first_day(self) -> NaiveDate {
        self.first
    }

    /// Following month; stays put at the end of the supported range
    pub fn next(self) -> Self {
        Self { first: self.first.checked_add_months(Months::new(1)).unwrap_or(self.first) }
    }

    pub fn prev(self) -> Self {
        Self { first: self.first.checked_sub_months(Months::new(1)).unwrap_or(self.first) }
    }

    pub fn days_in_month(self) -> u32 {
        let next = self.next();
        if next == self {
            return 31;
        }
        next.first.signed_duration_since(self.first).num_days() as u32
    }

    /// Weekday of the first day, Sunday = 0
    pub fn first_weekday(self) -> u32 {
        self.first.weekday().num_days_from_sunday()
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        Self::containing(date) == self
    }
}

/// One cell of the month grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayCell {
    /// Leading blank before the first day
    Placeholder,
    Day {
        date: NaiveDate,
        /// Today or earlier
        disabled: bool,
        today: bool,
        selected: bool,
    },
}

impl DayCell {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            DayCell::Day { date, .. } => Some(*date),
            DayCell::Placeholder => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub cursor: CalendarCursor,
    pub cells: Vec<DayCell>,
    /// False while the cursor is on today's month
    pub prev_enabled: bool,
}

impl MonthGrid {
    pub fn placeholders(&self) -> usize {
        self.cells.iter().filter(|c| **c == DayCell::Placeholder).count()
    }

    pub fn days(&self) -> impl Iterator<Item = &DayCell> {
        self.cells.iter().filter(|c| **c != DayCell::Placeholder)
    }
}

/// Lay out the month under `cursor`. Only dates strictly after `today`
/// are selectable, so a past `selected` date is never marked.
pub fn render_month(cursor: CalendarCursor, today: NaiveDate, selected: Option<NaiveDate>) -> MonthGrid {
    let mut cells = vec![DayCell::Placeholder; cursor.first_weekday() as usize];
    for date in cursor.first_day().iter_days().take(cursor.days_in_month() as usize) {
        let disabled = date <= today;
        cells.push(DayCell::Day {
            date,
            disabled,
            today: date == today,
            selected: !disabled && selected == Some(date),
        });
    }
    MonthGrid {
        cursor,
        cells,
        prev_enabled: !cursor.contains(today),
    }
}
