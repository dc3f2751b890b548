use crate::calc::month::{days_in_month, Month};
use crate::data::MarkedDates;
use chrono::{NaiveDate, Weekday};
use serde::Serialize;

/// One rendered cell of the month grid.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct GridCell {
    /// 1-based day within the cell's own month.
    pub day: u32,
    pub in_month: bool,
    pub marked: bool,
    /// Only set for current-month cells; filler cells are not addressable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl GridCell {
    fn filler(day: u32) -> Self {
        GridCell {
            day,
            in_month: false,
            marked: false,
            date: None,
        }
    }
}

/// Builds the whole-week cell sequence for `month`: previous-month filler,
/// the month's own days, then next-month filler.
pub fn compute_grid(month: Month, week_start: Weekday, marked: &MarkedDates) -> Vec<GridCell> {
    let lead = month.first_weekday_index(week_start);
    let days = month.days_in_month();
    let total = (lead + days).div_ceil(7) * 7;

    let prev = month.previous();
    let prev_days = days_in_month(prev.year(), prev.month());

    let mut cells = Vec::with_capacity(total as usize);
    for i in 0..lead {
        cells.push(GridCell::filler(prev_days - (lead - i - 1)));
    }
    for offset in 0..days {
        let date = month.date_at(offset as i32);
        cells.push(GridCell {
            day: offset + 1,
            in_month: true,
            marked: marked.contains(date),
            date: Some(date),
        });
    }
    for i in (lead + days)..total {
        cells.push(GridCell::filler(i - (lead + days) + 1));
    }
    cells
}

/// Splits a grid into rows of seven.
pub fn weeks(cells: &[GridCell]) -> impl Iterator<Item = &[GridCell]> {
    cells.chunks(7)
}
