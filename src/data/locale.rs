use crate::calc::Month;
use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Label language for the month title and weekday header.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ko,
    En,
}

impl Locale {
    /// Header title, e.g. `2024년 09월` or `September 2024`.
    pub fn month_title(&self, month: Month) -> String {
        match self {
            Locale::Ko => format!("{}년 {:02}월", month.year(), month.month()),
            Locale::En => format!("{} {}", month_name(month.month()), month.year()),
        }
    }

    pub fn weekday_symbol(&self, day: Weekday) -> &'static str {
        match self {
            Locale::Ko => match day {
                Weekday::Sun => "일",
                Weekday::Mon => "월",
                Weekday::Tue => "화",
                Weekday::Wed => "수",
                Weekday::Thu => "목",
                Weekday::Fri => "금",
                Weekday::Sat => "토",
            },
            Locale::En => match day {
                Weekday::Sun => "Su",
                Weekday::Mon => "Mo",
                Weekday::Tue => "Tu",
                Weekday::Wed => "We",
                Weekday::Thu => "Th",
                Weekday::Fri => "Fr",
                Weekday::Sat => "Sa",
            },
        }
    }
}

/// The seven weekdays in column order for a week starting on `week_start`.
pub fn week_days(week_start: Weekday) -> [Weekday; 7] {
    let mut days = [week_start; 7];
    for i in 1..7 {
        days[i] = days[i - 1].succ();
    }
    days
}

pub(crate) fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}
