//! Date Cursor
//!
//! The single calendar day currently displayed and queried.

use chrono::{Days, NaiveDate};

/// Currently viewed day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateCursor {
    date: NaiveDate,
}

impl DateCursor {
    pub fn new(today: NaiveDate) -> Self {
        Self { date: today }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Move by `days` calendar days (negative goes back). No bounds are
    /// enforced beyond chrono's representable range, where the cursor stays put.
    pub fn shift(&mut self, days: i64) -> NaiveDate {
        let magnitude = Days::new(days.unsigned_abs());
        let shifted = if days >= 0 {
            self.date.checked_add_days(magnitude)
        } else {
            self.date.checked_sub_days(magnitude)
        };

        match shifted {
            Some(date) => self.date = date,
            None => tracing::warn!(from = %self.date, days, "Date shift out of range"),
        }
        self.date
    }

    pub fn set(&mut self, date: NaiveDate) {
        self.date = date;
    }
}
