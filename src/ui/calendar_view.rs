use crate::calc::{weeks, GridCell, Month};
use crate::data::locale::week_days;
use crate::data::{CalendarSettings, CalendarState, Direction};
use crate::ui::Tui;
use anyhow::Result;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use crossterm::event::{self, Event as CEvent, KeyCode, KeyModifiers, MouseButton, MouseEventKind};
use log::info;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::time::Duration as StdDuration;

const MARK_COLOR: Color = Color::Blue;
const CHECK: &str = "✓";

pub struct App {
    state: CalendarState,
    settings: CalendarSettings,
    /// Keyboard cursor; always inside the current month.
    selected_date: NaiveDate,
    today: NaiveDate,
    /// Screen position where the left button went down, while it is held.
    drag_origin: Option<(u16, u16)>,
    /// Hit boxes of the current-month cells from the last render.
    cell_rects: Vec<(Rect, NaiveDate)>,
}

impl App {
    pub fn new(settings: CalendarSettings, month: Month, today: NaiveDate) -> Self {
        let selected_date = if month.contains(today) {
            today
        } else {
            month.first_day()
        };
        App {
            state: CalendarState::new(month),
            settings,
            selected_date,
            today,
            drag_origin: None,
            cell_rects: Vec::new(),
        }
    }

    pub fn state(&self) -> &CalendarState {
        &self.state
    }

    fn navigate(&mut self, direction: Direction) {
        self.state.navigate(direction);
        self.clamp_selection();
    }

    /// Keeps the cursor on the same day number after a month change, capped at
    /// the month's last day.
    fn clamp_selection(&mut self) {
        let month = self.state.current_month();
        if month.contains(self.selected_date) {
            return;
        }
        let day = self.selected_date.day().min(month.days_in_month());
        self.selected_date = month.date_at(day as i32 - 1);
    }

    fn move_selection(&mut self, days: i64) {
        let target = match self.selected_date.checked_add_signed(Duration::days(days)) {
            Some(d) => d,
            None => return,
        };
        let month = self.state.current_month();
        if target > month.last_day() {
            self.state.navigate(Direction::Forward);
        } else if target < month.first_day() {
            self.state.navigate(Direction::Backward);
        }
        self.selected_date = target;
        self.clamp_selection();
    }

    /// Returns true if the app should quit.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        match code {
            KeyCode::Left => self.move_selection(-1),
            KeyCode::Right => self.move_selection(1),
            KeyCode::Up => self.move_selection(-7),
            KeyCode::Down => self.move_selection(7),
            KeyCode::Char('n') | KeyCode::PageDown => self.navigate(Direction::Forward),
            KeyCode::Char('p') | KeyCode::PageUp => self.navigate(Direction::Backward),
            KeyCode::Char(' ') | KeyCode::Enter => {
                self.state.toggle_mark(self.selected_date);
            }
            KeyCode::Char('q') => return true,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
            _ => {}
        }
        false
    }

    /// Left button drags page between months; a press and release on the
    /// same spot is a tap on the cell under it.
    pub fn handle_mouse(&mut self, kind: MouseEventKind, column: u16, row: u16) {
        match kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.drag_origin = Some((column, row));
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(origin) = self.drag_origin {
                    let delta = self.drag_delta(origin, column);
                    self.state.drag_changed(delta);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let origin = match self.drag_origin.take() {
                    Some(o) => o,
                    None => return,
                };
                let delta = self.drag_delta(origin, column);
                if let Some(direction) = self.state.drag_ended(delta, self.settings.swipe_threshold) {
                    info!("swipe {:?} to {}", direction, self.state.current_month());
                    self.clamp_selection();
                } else if origin == (column, row) {
                    self.tap(column, row);
                }
            }
            MouseEventKind::ScrollDown => self.navigate(Direction::Forward),
            MouseEventKind::ScrollUp => self.navigate(Direction::Backward),
            _ => {}
        }
    }

    fn drag_delta(&self, origin: (u16, u16), column: u16) -> i32 {
        let columns = column as i64 - origin.0 as i64;
        let units = columns.saturating_mul(self.settings.units_per_column as i64);
        units.clamp(i32::MIN as i64, i32::MAX as i64) as i32
    }

    fn tap(&mut self, column: u16, row: u16) {
        let hit = self
            .cell_rects
            .iter()
            .find(|(rect, _)| inside_rect(*rect, column, row))
            .map(|(_, date)| *date);
        if let Some(date) = hit {
            self.selected_date = date;
            self.state.toggle_mark(date);
        }
    }

    pub fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::vertical([
            Constraint::Length(1), // month title
            Constraint::Length(1), // weekday labels
            Constraint::Min(5),    // grid
            Constraint::Length(1), // help
        ])
        .split(f.area());

        self.render_title(f, chunks[0]);
        self.render_weekdays(f, chunks[1]);
        self.render_grid(f, chunks[2]);
        self.render_help(f, chunks[3]);
    }

    fn render_title(&self, f: &mut Frame, area: Rect) {
        let title = self
            .settings
            .locale
            .month_title(self.state.current_month());
        let p = Paragraph::new(Line::from(Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )));
        f.render_widget(p, area);
    }

    fn render_weekdays(&self, f: &mut Frame, area: Rect) {
        let width = column_width(area);
        for (col, day) in week_days(self.settings.week_start).iter().enumerate() {
            let rect = Rect::new(area.x + col as u16 * width, area.y, width, area.height);
            let symbol = self.settings.locale.weekday_symbol(*day);
            let p = Paragraph::new(Span::styled(symbol, weekday_style(*day)))
                .alignment(Alignment::Center);
            f.render_widget(p, rect);
        }
    }

    fn render_grid(&mut self, f: &mut Frame, area: Rect) {
        let cells = self.state.grid(self.settings.week_start);
        let rows = cells.len().div_ceil(7).max(1) as u16;
        let width = column_width(area);
        let height = (area.height / rows).clamp(1, 3);
        let shift = (self.state.drag_offset() as i64
            / self.settings.units_per_column.max(1) as i64) as i32;

        self.cell_rects.clear();
        for (r, week) in weeks(&cells).enumerate() {
            let y = area.y + r as u16 * height;
            if y + height > area.bottom() {
                break;
            }
            for (c, cell) in week.iter().enumerate() {
                let x = area.x as i32 + shift + (c as u16 * width) as i32;
                if x < area.x as i32 || x + width as i32 > area.right() as i32 {
                    continue;
                }
                let rect = Rect::new(x as u16, y, width, height);
                let is_selected = cell.date == Some(self.selected_date);
                let is_today = cell.date == Some(self.today);
                let p = Paragraph::new(cell_label(cell))
                    .alignment(Alignment::Center)
                    .style(cell_style(cell, is_selected, is_today));
                f.render_widget(p, rect);
                if let Some(date) = cell.date {
                    self.cell_rects.push((rect, date));
                }
            }
        }
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let marked = self.state.marked().len();
        let line = Line::from(vec![
            Span::styled(
                "←↑↓→ select  space mark  n/p month  drag swipe  q quit",
                Style::default().fg(Color::DarkGray),
            ),
            Span::raw(format!("   {} marked", marked)),
        ]);
        f.render_widget(Paragraph::new(line), area);
    }
}

// ── App event loop ────────────────────────────────────────────────────────────

pub fn run_app(terminal: &mut Tui, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;
        if event::poll(StdDuration::from_millis(16))? {
            match event::read()? {
                CEvent::Key(key) => {
                    if app.handle_key(key.code, key.modifiers) {
                        break;
                    }
                }
                CEvent::Mouse(mouse) => app.handle_mouse(mouse.kind, mouse.column, mouse.row),
                _ => {}
            }
        }
    }
    Ok(())
}

// ── Cell helpers ──────────────────────────────────────────────────────────────

fn column_width(area: Rect) -> u16 {
    (area.width / 7).max(1)
}

fn inside_rect(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.right() && row >= rect.y && row < rect.bottom()
}

pub(crate) fn cell_label(cell: &GridCell) -> String {
    if cell.marked {
        format!("{}{}", cell.day, CHECK)
    } else {
        cell.day.to_string()
    }
}

pub(crate) fn weekday_style(day: Weekday) -> Style {
    if day == Weekday::Sun {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Gray)
    }
}

/// Determines the ratatui `Style` for a grid cell based on its state.
pub(crate) fn cell_style(cell: &GridCell, is_selected: bool, is_today: bool) -> Style {
    if !cell.in_month {
        return Style::default().fg(Color::DarkGray);
    }
    if cell.marked {
        let mut s = Style::default()
            .fg(Color::White)
            .bg(MARK_COLOR)
            .add_modifier(Modifier::BOLD);
        if is_selected {
            s = s.add_modifier(Modifier::UNDERLINED);
        }
        s
    } else if is_selected {
        Style::default()
            .fg(Color::Black)
            .bg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else if is_today {
        Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
    } else {
        Style::default().fg(MARK_COLOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn sep_2024() -> Month {
        Month::new(2024, 9).unwrap()
    }

    fn make_test_app() -> App {
        App::new(CalendarSettings::default(), sep_2024(), d(2024, 9, 19))
    }

    fn draw(app: &mut App) {
        let mut terminal = Terminal::new(TestBackend::new(42, 20)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
    }

    fn cell_center(app: &App, date: NaiveDate) -> (u16, u16) {
        let (rect, _) = app
            .cell_rects
            .iter()
            .find(|(_, d)| *d == date)
            .copied()
            .unwrap();
        (rect.x + rect.width / 2, rect.y)
    }

    fn in_month(day: u32) -> GridCell {
        GridCell {
            day,
            in_month: true,
            marked: false,
            date: Some(d(2024, 9, day)),
        }
    }

    // ── cell_style tests ──────────────────────────────────────────────────────

    #[test]
    fn test_style_filler_is_dim_gray() {
        let cell = GridCell {
            day: 31,
            in_month: false,
            marked: false,
            date: None,
        };
        assert_eq!(cell_style(&cell, false, false), Style::default().fg(Color::DarkGray));
    }

    #[test]
    fn test_style_marked() {
        let mut cell = in_month(15);
        cell.marked = true;
        assert_eq!(
            cell_style(&cell, false, false),
            Style::default().fg(Color::White).bg(MARK_COLOR).add_modifier(Modifier::BOLD)
        );
    }

    #[test]
    fn test_style_marked_selected_underlined() {
        let mut cell = in_month(15);
        cell.marked = true;
        assert_eq!(
            cell_style(&cell, true, false),
            Style::default()
                .fg(Color::White)
                .bg(MARK_COLOR)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        );
    }

    #[test]
    fn test_style_selected_plain() {
        assert_eq!(
            cell_style(&in_month(3), true, false),
            Style::default().fg(Color::Black).bg(Color::White).add_modifier(Modifier::BOLD)
        );
    }

    #[test]
    fn test_style_today() {
        assert_eq!(
            cell_style(&in_month(3), false, true),
            Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
        );
    }

    #[test]
    fn test_style_plain_day() {
        assert_eq!(cell_style(&in_month(3), false, false), Style::default().fg(MARK_COLOR));
    }

    #[test]
    fn test_cell_label_shows_check_when_marked() {
        let mut cell = in_month(15);
        assert_eq!(cell_label(&cell), "15");
        cell.marked = true;
        assert_eq!(cell_label(&cell), "15✓");
    }

    #[test]
    fn test_sunday_label_is_red() {
        assert_eq!(weekday_style(Weekday::Sun), Style::default().fg(Color::Red));
        assert_eq!(weekday_style(Weekday::Sat), Style::default().fg(Color::Gray));
    }

    // ── key handling ──────────────────────────────────────────────────────────

    #[test]
    fn test_new_selects_today_in_month() {
        let app = make_test_app();
        assert_eq!(app.selected_date, d(2024, 9, 19));
        let other = App::new(CalendarSettings::default(), sep_2024(), d(2025, 1, 1));
        assert_eq!(other.selected_date, d(2024, 9, 1));
    }

    #[test]
    fn test_space_toggles_selected_date() {
        let mut app = make_test_app();
        app.handle_key(KeyCode::Char(' '), KeyModifiers::NONE);
        assert!(app.state().marked().contains(d(2024, 9, 19)));
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert!(app.state().marked().is_empty());
    }

    #[test]
    fn test_n_and_p_change_month() {
        let mut app = make_test_app();
        app.handle_key(KeyCode::Char('p'), KeyModifiers::NONE);
        assert_eq!(app.state().current_month(), Month::new(2024, 8).unwrap());
        assert_eq!(app.selected_date, d(2024, 8, 19));
        app.handle_key(KeyCode::Char('n'), KeyModifiers::NONE);
        app.handle_key(KeyCode::PageDown, KeyModifiers::NONE);
        assert_eq!(app.state().current_month(), Month::new(2024, 10).unwrap());
    }

    #[test]
    fn test_navigation_clamps_selection_to_month_end() {
        let mut app = App::new(
            CalendarSettings::default(),
            Month::new(2024, 1).unwrap(),
            d(2024, 1, 31),
        );
        app.handle_key(KeyCode::Char('n'), KeyModifiers::NONE);
        assert_eq!(app.selected_date, d(2024, 2, 29));
    }

    #[test]
    fn test_arrow_past_month_end_navigates() {
        let mut app = App::new(CalendarSettings::default(), sep_2024(), d(2024, 9, 30));
        app.handle_key(KeyCode::Right, KeyModifiers::NONE);
        assert_eq!(app.selected_date, d(2024, 10, 1));
        assert_eq!(app.state().current_month(), Month::new(2024, 10).unwrap());
        app.handle_key(KeyCode::Up, KeyModifiers::NONE);
        assert_eq!(app.selected_date, d(2024, 9, 24));
        assert_eq!(app.state().current_month(), sep_2024());
    }

    #[test]
    fn test_q_returns_true() {
        let mut app = make_test_app();
        assert!(app.handle_key(KeyCode::Char('q'), KeyModifiers::NONE));
    }

    #[test]
    fn test_ctrl_c_returns_true() {
        let mut app = make_test_app();
        assert!(app.handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!app.handle_key(KeyCode::Char('c'), KeyModifiers::NONE));
    }

    // ── mouse handling ────────────────────────────────────────────────────────

    #[test]
    fn test_click_toggles_cell_under_pointer() {
        let mut app = make_test_app();
        draw(&mut app);
        let (x, y) = cell_center(&app, d(2024, 9, 15));
        app.handle_mouse(MouseEventKind::Down(MouseButton::Left), x, y);
        app.handle_mouse(MouseEventKind::Up(MouseButton::Left), x, y);
        assert!(app.state().marked().contains(d(2024, 9, 15)));
        assert_eq!(app.selected_date, d(2024, 9, 15));
        assert_eq!(app.state().marked().len(), 1);
    }

    #[test]
    fn test_click_on_filler_does_nothing() {
        let mut app = make_test_app();
        draw(&mut app);
        // September 2024 ends on a Monday; the cell right of it is Oct 1 filler
        let (rect, _) = *app.cell_rects.last().unwrap();
        let x = rect.right() + 1;
        app.handle_mouse(MouseEventKind::Down(MouseButton::Left), x, rect.y);
        app.handle_mouse(MouseEventKind::Up(MouseButton::Left), x, rect.y);
        assert!(app.state().marked().is_empty());
    }

    #[test]
    fn test_short_drag_does_not_navigate() {
        let mut app = make_test_app();
        // 5 columns * 10 units = 50, under the 100 threshold
        app.handle_mouse(MouseEventKind::Down(MouseButton::Left), 20, 5);
        app.handle_mouse(MouseEventKind::Drag(MouseButton::Left), 15, 5);
        assert_eq!(app.state().drag_offset(), -50);
        app.handle_mouse(MouseEventKind::Up(MouseButton::Left), 15, 5);
        assert_eq!(app.state().current_month(), sep_2024());
        assert_eq!(app.state().drag_offset(), 0);
        assert!(app.state().marked().is_empty());
    }

    #[test]
    fn test_drag_left_goes_to_next_month() {
        let mut app = make_test_app();
        app.handle_mouse(MouseEventKind::Down(MouseButton::Left), 30, 5);
        app.handle_mouse(MouseEventKind::Drag(MouseButton::Left), 18, 5);
        app.handle_mouse(MouseEventKind::Up(MouseButton::Left), 18, 5);
        assert_eq!(app.state().current_month(), Month::new(2024, 10).unwrap());
        assert_eq!(app.selected_date, d(2024, 10, 19));
    }

    #[test]
    fn test_drag_right_goes_to_previous_month() {
        let mut app = make_test_app();
        app.handle_mouse(MouseEventKind::Down(MouseButton::Left), 2, 5);
        app.handle_mouse(MouseEventKind::Up(MouseButton::Left), 14, 5);
        assert_eq!(app.state().current_month(), Month::new(2024, 8).unwrap());
    }

    #[test]
    fn test_huge_units_per_column_keeps_swipe_direction() {
        for units_per_column in [300_000_000, 3_000_000_000, u32::MAX] {
            let settings = CalendarSettings {
                units_per_column,
                ..CalendarSettings::default()
            };
            let mut app = App::new(settings, sep_2024(), d(2024, 9, 19));
            app.handle_mouse(MouseEventKind::Down(MouseButton::Left), 30, 5);
            app.handle_mouse(MouseEventKind::Drag(MouseButton::Left), 18, 5);
            assert!(app.state().drag_offset() < 0);
            draw(&mut app);
            app.handle_mouse(MouseEventKind::Up(MouseButton::Left), 29, 5);
            assert_eq!(app.state().current_month(), Month::new(2024, 10).unwrap());
        }
    }

    #[test]
    fn test_release_without_press_is_ignored() {
        let mut app = make_test_app();
        app.handle_mouse(MouseEventKind::Up(MouseButton::Left), 2, 5);
        assert_eq!(app.state().current_month(), sep_2024());
    }

    #[test]
    fn test_render_records_only_current_month_cells() {
        let mut app = make_test_app();
        draw(&mut app);
        assert_eq!(app.cell_rects.len(), 30);
    }

    #[test]
    fn test_render_shows_korean_title() {
        let mut app = make_test_app();
        let mut terminal = Terminal::new(TestBackend::new(42, 20)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        let buffer = terminal.backend().buffer();
        let first_row: String = (0..20u16)
            .map(|x| buffer[(x, 0u16)].symbol().to_string())
            .collect();
        assert!(first_row.starts_with("2024"));
    }
}
