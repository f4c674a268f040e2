//! Data module - CSV loading and normalization

mod loader;
mod normalizer;
pub mod schema;
mod table;

pub use loader::{DataLoader, Delimiter, LoaderError};
pub use normalizer::{NormalizeError, Normalizer};
pub use table::{MeasurementRow, MeasurementTable};
