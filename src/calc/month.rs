use anyhow::{bail, Context, Result};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

/// A calendar month, always anchored at its first day.
///
/// Only constructible through [`Month::new`], [`Month::from_date`] or parsing,
/// all of which reject years outside `MIN_YEAR..=MAX_YEAR`, so every `Month`
/// maps to a real first-of-month date.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Month {
    first: NaiveDate,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return None;
        }
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Month { first })
    }

    /// The month containing `date`, clamped into the supported year range.
    pub fn from_date(date: NaiveDate) -> Self {
        if date.year() < MIN_YEAR {
            Self::min()
        } else if date.year() > MAX_YEAR {
            Self::max()
        } else {
            Month {
                first: date.with_day(1).unwrap_or(date),
            }
        }
    }

    pub fn min() -> Self {
        Month {
            first: NaiveDate::from_ymd_opt(MIN_YEAR, 1, 1).unwrap_or(NaiveDate::MIN),
        }
    }

    pub fn max() -> Self {
        Month {
            first: NaiveDate::from_ymd_opt(MAX_YEAR, 12, 1).unwrap_or(NaiveDate::MAX),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    /// 1-based month number.
    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn last_day(&self) -> NaiveDate {
        self.date_at(self.days_in_month() as i32 - 1)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    pub fn days_in_month(&self) -> u32 {
        days_in_month(self.year(), self.month())
    }

    /// Zero-based column of the first day when weeks start on `week_start`.
    pub fn first_weekday_index(&self, week_start: Weekday) -> u32 {
        weekday_column(self.first.weekday(), week_start)
    }

    /// The month `delta` months away. Saturates at [`Month::min`] / [`Month::max`].
    pub fn shift(&self, delta: i32) -> Month {
        let index = self.year() as i64 * 12 + (self.month() as i64 - 1) + delta as i64;
        let year = index.div_euclid(12);
        let month = index.rem_euclid(12) as u32 + 1;
        if year < MIN_YEAR as i64 {
            return Self::min();
        }
        if year > MAX_YEAR as i64 {
            return Self::max();
        }
        Month::new(year as i32, month).unwrap_or(*self)
    }

    pub fn previous(&self) -> Month {
        self.shift(-1)
    }

    /// The date `offset` days after the first of the month; negative offsets
    /// land in earlier months.
    pub fn date_at(&self, offset: i32) -> NaiveDate {
        self.first
            .checked_add_signed(Duration::days(offset as i64))
            .unwrap_or(if offset < 0 { NaiveDate::MIN } else { NaiveDate::MAX })
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for Month {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (year, month) = match s.trim().split_once('-') {
            Some(parts) => parts,
            None => bail!("invalid month '{}', expected YYYY-MM", s),
        };
        let year: i32 = year
            .parse()
            .with_context(|| format!("invalid year in '{}'", s))?;
        let month: u32 = month
            .parse()
            .with_context(|| format!("invalid month number in '{}'", s))?;
        match Month::new(year, month) {
            Some(m) => Ok(m),
            None => bail!(
                "month '{}' out of range (year {}..={}, month 1..=12)",
                s,
                MIN_YEAR,
                MAX_YEAR
            ),
        }
    }
}

impl TryFrom<String> for Month {
    type Error = anyhow::Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Month> for String {
    fn from(m: Month) -> String {
        m.to_string()
    }
}

/// Number of days in the given month of the proleptic Gregorian calendar.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Column of `day` in a week that starts on `week_start` (0..=6).
pub fn weekday_column(day: Weekday, week_start: Weekday) -> u32 {
    (day.num_days_from_sunday() + 7 - week_start.num_days_from_sunday()) % 7
}
