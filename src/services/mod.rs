pub mod export;
pub mod validation;

pub use export::{ExportFile, export_dsd};
pub use validation::validate_dsd;
