pub mod grid;
pub mod month;

pub use grid::{compute_grid, weeks, GridCell};
pub use month::Month;
