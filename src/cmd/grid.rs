use crate::calc::{weeks, GridCell, Month};
use crate::data::locale::week_days;
use crate::data::{CalendarSettings, CalendarState};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use serde::Serialize;

const CELL_WIDTH: usize = 4;

/// Everything the interactive header and grid show, for scripting.
#[derive(Serialize)]
struct GridOutput<'a> {
    month: Month,
    title: String,
    weekdays: Vec<&'static str>,
    cells: &'a [GridCell],
}

pub fn run(month: Option<Month>, marks: &[String], json: bool) -> Result<()> {
    let settings = CalendarSettings::load()?;
    let month = month.unwrap_or_else(|| Month::from_date(Local::now().date_naive()));
    let mut state = CalendarState::new(month);
    write_marks(&mut state, marks, &mut std::io::stderr())?;
    let mut out = std::io::stdout();
    if json {
        write_grid_json(&state, &settings, &mut out)
    } else {
        write_grid(&state, &settings, &mut out)
    }
}

/// Toggles each `--mark` date, reporting the ones outside the shown month to `out`.
pub(crate) fn write_marks<W: std::io::Write>(
    state: &mut CalendarState,
    marks: &[String],
    out: &mut W,
) -> Result<()> {
    for raw in marks {
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("invalid --mark date '{}', expected YYYY-MM-DD", raw))?;
        if !state.toggle_mark(date) {
            log::warn!("--mark {} is outside {}; ignored", date, state.current_month());
            writeln!(
                out,
                "ignoring --mark {}: outside {}",
                date,
                state.current_month()
            )?;
        }
    }
    Ok(())
}

pub(crate) fn write_grid<W: std::io::Write>(
    state: &CalendarState,
    settings: &CalendarSettings,
    out: &mut W,
) -> Result<()> {
    let cells = state.grid(settings.week_start);
    writeln!(out, "{}", settings.locale.month_title(state.current_month()))?;
    let header: String = week_days(settings.week_start)
        .iter()
        .map(|d| pad_left(settings.locale.weekday_symbol(*d)))
        .collect();
    writeln!(out, "{}", header)?;
    for week in weeks(&cells) {
        let row: String = week.iter().map(format_cell).collect();
        writeln!(out, "{}", row)?;
    }
    Ok(())
}

pub(crate) fn write_grid_json<W: std::io::Write>(
    state: &CalendarState,
    settings: &CalendarSettings,
    out: &mut W,
) -> Result<()> {
    let cells = state.grid(settings.week_start);
    let output = GridOutput {
        month: state.current_month(),
        title: settings.locale.month_title(state.current_month()),
        weekdays: week_days(settings.week_start)
            .iter()
            .map(|d| settings.locale.weekday_symbol(*d))
            .collect(),
        cells: &cells,
    };
    serde_json::to_writer_pretty(&mut *out, &output).context("failed to serialize grid")?;
    writeln!(out)?;
    Ok(())
}

/// `  15` for a plain day, ` 15✓` when marked, `(31)` for filler.
fn format_cell(cell: &GridCell) -> String {
    if !cell.in_month {
        format!("({:>2})", cell.day)
    } else if cell.marked {
        format!("{:>3}✓", cell.day)
    } else {
        format!("{:>4}", cell.day)
    }
}

/// Right-aligns a weekday label in a cell, counting Hangul as two columns.
fn pad_left(label: &str) -> String {
    let width: usize = label
        .chars()
        .map(|c| if c.is_ascii() { 1 } else { 2 })
        .sum();
    format!("{}{}", " ".repeat(CELL_WIDTH.saturating_sub(width)), label)
}
