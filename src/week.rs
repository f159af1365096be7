use chrono::{Datelike, Days, Duration, NaiveDate};
use serde::Serialize;

use crate::error::{Result, SchedulerError};
use crate::schedule::Day;

/// A scheduling week, anchored on its Monday. Every day through Saturday is a
/// representable date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Week {
    start: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeekView {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub label: String,
    pub days: Vec<(Day, NaiveDate)>,
}

impl Week {
    fn from_start(start: NaiveDate) -> Result<Self> {
        start
            .checked_add_days(Days::new(u64::from(Day::Sat.offset())))
            .map(|_| Week { start })
            .ok_or(SchedulerError::WeekOutOfRange)
    }

    /// The week containing `date`. Sundays belong to the week before.
    pub fn containing(date: NaiveDate) -> Result<Self> {
        let back = date.weekday().num_days_from_monday();
        let start = date
            .checked_sub_days(Days::new(u64::from(back)))
            .ok_or(SchedulerError::WeekOutOfRange)?;
        Week::from_start(start)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Saturday, the last working day.
    pub fn end(&self) -> NaiveDate {
        self.date_of(Day::Sat)
    }

    pub fn previous(&self) -> Result<Self> {
        self.offset(-1)
    }

    pub fn next(&self) -> Result<Self> {
        self.offset(1)
    }

    pub fn offset(&self, weeks: i64) -> Result<Self> {
        let start = Duration::try_weeks(weeks)
            .and_then(|delta| self.start.checked_add_signed(delta))
            .ok_or(SchedulerError::WeekOutOfRange)?;
        Week::from_start(start)
    }

    pub fn date_of(&self, day: Day) -> NaiveDate {
        // in range: checked when the week was built
        self.start + Days::new(u64::from(day.offset()))
    }

    /// Range label, e.g. `"3/3 ~ 3/8"`.
    pub fn label(&self) -> String {
        let end = self.end();
        format!(
            "{}/{} ~ {}/{}",
            self.start.month(),
            self.start.day(),
            end.month(),
            end.day()
        )
    }

    pub fn view(&self) -> WeekView {
        WeekView {
            start: self.start,
            end: self.end(),
            label: self.label(),
            days: Day::ALL.into_iter().map(|day| (day, self.date_of(day))).collect(),
        }
    }
}

/// Hour label as shown in schedules, e.g. `"9:00"`.
pub fn format_hour(hour: u8) -> String {
    format!("{}:00", hour)
}
