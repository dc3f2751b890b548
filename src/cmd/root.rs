use crate::calc::Month;
use crate::data::CalendarSettings;
use crate::ui::calendar_view::{run_app, App};
use crate::ui::{restore_terminal, setup_terminal};
use anyhow::Result;
use chrono::Local;
use log::info;

pub fn run(month: Option<Month>) -> Result<()> {
    let settings = CalendarSettings::load()?;
    let today = Local::now().date_naive();
    let month = month.unwrap_or_else(|| Month::from_date(today));
    info!(
        "starting calendar at {} (week starts {:?}, locale {:?})",
        month, settings.week_start, settings.locale
    );

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::event::DisableMouseCapture,
            crossterm::terminal::LeaveAlternateScreen
        );
        original_hook(info);
    }));

    let mut terminal = setup_terminal()?;
    let mut app = App::new(settings, month, today);

    let result = run_app(&mut terminal, &mut app);

    restore_terminal(&mut terminal)?;
    info!(
        "session ended on {} with {} marked date(s)",
        app.state().current_month(),
        app.state().marked().len()
    );

    result
}
