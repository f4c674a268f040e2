//! Charts module - Chart rendering

mod plotter;

pub use plotter::{ChartPlotter, NATIONAL_COLOR, WHO_COLOR};
