//! Data module - CSV loading, cleaning, transformation and output

mod cleaner;
mod loader;
mod processor;
mod writer;

pub use cleaner::{CleanReport, DataCleaner};
pub use loader::{DataLoader, REQUIRED_COLUMNS};
pub use processor::DataProcessor;
pub use writer::DataWriter;
