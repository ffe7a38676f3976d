pub mod manifest;

pub use manifest::{BundleStatistics, FileEntry, ProjectBundle};
