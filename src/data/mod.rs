pub mod calendar_state;
pub mod locale;
pub mod marked_dates;
pub mod persistence;
pub mod settings;

pub use calendar_state::{CalendarState, Direction};
pub use locale::Locale;
pub use marked_dates::MarkedDates;
pub use settings::CalendarSettings;
