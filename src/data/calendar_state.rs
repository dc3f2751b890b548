use crate::calc::{compute_grid, GridCell, Month};
use crate::data::MarkedDates;
use chrono::{NaiveDate, Weekday};
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn delta(self) -> i32 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

/// Per-session calendar state. All mutation goes through [`navigate`],
/// [`toggle_mark`] and the drag pair.
///
/// [`navigate`]: CalendarState::navigate
/// [`toggle_mark`]: CalendarState::toggle_mark
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CalendarState {
    current_month: Month,
    marked: MarkedDates,
    /// In-progress horizontal drag, in logical units. Zero when idle.
    drag_offset: i32,
}

impl CalendarState {
    pub fn new(month: Month) -> Self {
        CalendarState {
            current_month: month,
            marked: MarkedDates::default(),
            drag_offset: 0,
        }
    }

    pub fn current_month(&self) -> Month {
        self.current_month
    }

    pub fn marked(&self) -> &MarkedDates {
        &self.marked
    }

    pub fn drag_offset(&self) -> i32 {
        self.drag_offset
    }

    pub fn navigate(&mut self, direction: Direction) {
        let from = self.current_month;
        self.current_month = from.shift(direction.delta());
        debug!("navigate {:?}: {} -> {}", direction, from, self.current_month);
    }

    /// Flips `date` in the marked set. Dates outside the current month are
    /// ignored; returns whether anything changed.
    pub fn toggle_mark(&mut self, date: NaiveDate) -> bool {
        if !self.current_month.contains(date) {
            debug!("ignoring toggle of {} outside {}", date, self.current_month);
            return false;
        }
        let now_marked = self.marked.toggle(date);
        debug!("{} {}", if now_marked { "marked" } else { "unmarked" }, date);
        true
    }

    pub fn drag_changed(&mut self, delta: i32) {
        self.drag_offset = delta;
    }

    /// Commits a drag gesture. Travel beyond `threshold` to the left moves
    /// forward, to the right moves backward. The offset always resets.
    pub fn drag_ended(&mut self, delta: i32, threshold: u32) -> Option<Direction> {
        self.drag_offset = 0;
        let threshold = threshold as i64;
        let delta = delta as i64;
        let direction = if delta < -threshold {
            Some(Direction::Forward)
        } else if delta > threshold {
            Some(Direction::Backward)
        } else {
            None
        };
        if let Some(direction) = direction {
            self.navigate(direction);
        }
        direction
    }

    pub fn grid(&self, week_start: Weekday) -> Vec<GridCell> {
        compute_grid(self.current_month, week_start, &self.marked)
    }
}
