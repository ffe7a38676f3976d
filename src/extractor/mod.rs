pub mod file_writer;
pub mod output_manager;

pub use file_writer::{ExtractionProgress, FileWriter};
pub use output_manager::{ConfigSnapshot, ExtractionReport, ExtractionSummary, OutputManager};
