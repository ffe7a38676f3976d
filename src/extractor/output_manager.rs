use crate::bundle::ProjectBundle;
use crate::error::{Result, UnbundleError};
use crate::extractor::ExtractionProgress;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub bundle_path: PathBuf,
    pub output_directory: PathBuf,
    pub summary: ExtractionSummary,
    pub extraction_time: DateTime<Utc>,
    pub config_used: ConfigSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionSummary {
    pub total_entries: usize,
    pub distinct_files: usize,
    pub bytes_written: u64,
    pub extraction_duration: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    pub bundle_path: PathBuf,
    pub output_directory: PathBuf,
    pub write_report: bool,
}

/// Owns the output root: creates it, verifies it is writable, and persists
/// the optional run report under a metadata directory inside it.
pub struct OutputManager {
    output_directory: PathBuf,
    write_report: bool,
}

impl OutputManager {
    pub fn new(output_directory: PathBuf) -> Self {
        Self {
            output_directory,
            write_report: false,
        }
    }

    pub fn with_write_report(mut self, write_report: bool) -> Self {
        self.write_report = write_report;
        self
    }

    /// Create the output directory if absent. Idempotent: an existing
    /// directory is reused as-is.
    pub fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.output_directory).map_err(|e| UnbundleError::Filesystem {
            path: self.output_directory.clone(),
            source: e,
        })?;

        self.check_writable()?;

        Ok(())
    }

    pub fn get_output_directory(&self) -> &Path {
        &self.output_directory
    }

    pub fn get_metadata_dir(&self) -> PathBuf {
        self.output_directory.join(".unbundle")
    }

    pub fn create_extraction_report(
        &self,
        bundle_path: &Path,
        bundle: &ProjectBundle,
        progress: &ExtractionProgress,
        config: &ConfigSnapshot,
    ) -> Result<ExtractionReport> {
        let stats = bundle.statistics();

        let report = ExtractionReport {
            bundle_path: bundle_path.to_path_buf(),
            output_directory: self.output_directory.clone(),
            summary: ExtractionSummary {
                total_entries: progress.entries_written,
                distinct_files: stats.distinct_names,
                bytes_written: progress.bytes_written,
                extraction_duration: progress.elapsed(),
            },
            extraction_time: Utc::now(),
            config_used: config.clone(),
        };

        if self.write_report {
            self.save_report_json(&report)?;
        }

        Ok(report)
    }

    fn save_report_json(&self, report: &ExtractionReport) -> Result<()> {
        let metadata_dir = self.get_metadata_dir();
        fs::create_dir_all(&metadata_dir).map_err(|e| UnbundleError::Filesystem {
            path: metadata_dir.clone(),
            source: e,
        })?;

        let report_path = metadata_dir.join("extraction_report.json");
        let json_content =
            serde_json::to_string_pretty(report).map_err(|e| UnbundleError::Config {
                message: format!("Failed to serialize report to JSON: {}", e),
            })?;

        fs::write(&report_path, json_content).map_err(|e| UnbundleError::Filesystem {
            path: report_path,
            source: e,
        })?;

        Ok(())
    }

    fn check_writable(&self) -> Result<()> {
        let test_file = self.output_directory.join(".unbundle_write_test");
        match fs::File::create(&test_file) {
            Ok(_) => {
                let _ = fs::remove_file(&test_file);
                Ok(())
            }
            Err(e) => Err(UnbundleError::Permission {
                path: format!(
                    "No write permission for directory {}: {}",
                    self.output_directory.display(),
                    e
                ),
            }),
        }
    }
}
