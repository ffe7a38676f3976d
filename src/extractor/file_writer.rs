use crate::bundle::FileEntry;
use crate::error::{Result, UnbundleError};
use crate::ui::GracefulShutdown;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct ExtractionProgress {
    pub entries_written: usize,
    pub total_entries: usize,
    pub bytes_written: u64,
    pub total_bytes: u64,
    pub current_entry: Option<String>,
    pub start_time: Instant,
}

impl ExtractionProgress {
    pub fn new(total_entries: usize, total_bytes: u64) -> Self {
        Self {
            entries_written: 0,
            total_entries,
            bytes_written: 0,
            total_bytes,
            current_entry: None,
            start_time: Instant::now(),
        }
    }

    pub fn update_entry(&mut self, name: String, bytes: u64) {
        self.entries_written += 1;
        self.bytes_written += bytes;
        self.current_entry = Some(name);
    }

    pub fn percentage(&self) -> f64 {
        if self.total_entries == 0 {
            0.0
        } else {
            (self.entries_written as f64 / self.total_entries as f64) * 100.0
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Writes bundle entries to disk in sequence order.
///
/// Later entries with the same name silently overwrite earlier ones; any
/// filesystem failure aborts the run, leaving already-written files in place.
pub struct FileWriter;

impl FileWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_entries(
        &self,
        entries: &[FileEntry],
        output_root: &Path,
        shutdown: Option<&GracefulShutdown>,
        progress_callback: Option<&dyn Fn(&ExtractionProgress)>,
    ) -> Result<ExtractionProgress> {
        let total_bytes = entries.iter().map(FileEntry::size).sum();
        let mut progress = ExtractionProgress::new(entries.len(), total_bytes);

        if !output_root.exists() {
            fs::create_dir_all(output_root).map_err(|e| UnbundleError::Filesystem {
                path: output_root.to_path_buf(),
                source: e,
            })?;
        }

        for entry in entries {
            if let Some(shutdown) = shutdown {
                shutdown.check_shutdown()?;
            }

            if let Some(callback) = progress_callback {
                callback(&progress);
            }

            let bytes_written = self.write_entry(entry, output_root)?;
            progress.update_entry(entry.name.clone(), bytes_written);
        }

        if let Some(callback) = progress_callback {
            callback(&progress);
        }

        Ok(progress)
    }

    pub fn write_entry(&self, entry: &FileEntry, output_root: &Path) -> Result<u64> {
        let relative_path = validate_entry_path(&entry.name)?;
        let dest_path = output_root.join(relative_path);

        if let Some(parent) = dest_path.parent() {
            fs::create_dir_all(parent).map_err(|e| UnbundleError::Filesystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let contents = entry.contents_str();
        fs::write(&dest_path, contents).map_err(|e| UnbundleError::Filesystem {
            path: dest_path,
            source: e,
        })?;

        Ok(contents.len() as u64)
    }
}

impl Default for FileWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate an entry name as a safe relative path.
///
/// Rejects empty names, absolute paths, and any `..` component so a bundle
/// cannot write outside the output root.
pub fn validate_entry_path(name: &str) -> Result<PathBuf> {
    if name.is_empty() {
        return Err(UnbundleError::InvalidEntryPath {
            name: name.to_string(),
        });
    }

    let path = Path::new(name);

    for component in path.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(UnbundleError::InvalidEntryPath {
                    name: name.to_string(),
                });
            }
        }
    }

    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(name: &str, contents: Option<&str>) -> FileEntry {
        FileEntry {
            name: name.to_string(),
            contents: contents.map(str::to_string),
        }
    }

    #[test]
    fn test_write_entries() {
        let dest_dir = TempDir::new().unwrap();
        let entries = vec![
            entry("README.md", Some("# Test")),
            entry("src/main.rs", Some("fn main() {}")),
        ];

        let writer = FileWriter::new();
        let progress = writer
            .write_entries(&entries, dest_dir.path(), None, None)
            .unwrap();

        assert_eq!(progress.entries_written, 2);
        assert_eq!(
            fs::read_to_string(dest_dir.path().join("README.md")).unwrap(),
            "# Test"
        );
        assert_eq!(
            fs::read_to_string(dest_dir.path().join("src/main.rs")).unwrap(),
            "fn main() {}"
        );
    }

    #[test]
    fn test_nested_directories_created() {
        let dest_dir = TempDir::new().unwrap();
        let entries = vec![entry("a/b/c/deep.txt", Some("nested"))];

        let writer = FileWriter::new();
        writer
            .write_entries(&entries, dest_dir.path(), None, None)
            .unwrap();

        assert_eq!(
            fs::read_to_string(dest_dir.path().join("a/b/c/deep.txt")).unwrap(),
            "nested"
        );
    }

    #[test]
    fn test_missing_contents_produces_empty_file() {
        let dest_dir = TempDir::new().unwrap();
        let entries = vec![entry("empty.txt", None)];

        let writer = FileWriter::new();
        let progress = writer
            .write_entries(&entries, dest_dir.path(), None, None)
            .unwrap();

        assert_eq!(progress.bytes_written, 0);
        let written = fs::read(dest_dir.path().join("empty.txt")).unwrap();
        assert!(written.is_empty());
    }

    #[test]
    fn test_duplicate_names_last_write_wins() {
        let dest_dir = TempDir::new().unwrap();
        let entries = vec![
            entry("dup.txt", Some("first")),
            entry("dup.txt", Some("second")),
        ];

        let writer = FileWriter::new();
        writer
            .write_entries(&entries, dest_dir.path(), None, None)
            .unwrap();

        assert_eq!(
            fs::read_to_string(dest_dir.path().join("dup.txt")).unwrap(),
            "second"
        );
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let dest_dir = TempDir::new().unwrap();
        let entries = vec![entry("stable.txt", Some("same"))];

        let writer = FileWriter::new();
        writer
            .write_entries(&entries, dest_dir.path(), None, None)
            .unwrap();
        writer
            .write_entries(&entries, dest_dir.path(), None, None)
            .unwrap();

        assert_eq!(
            fs::read_to_string(dest_dir.path().join("stable.txt")).unwrap(),
            "same"
        );
    }

    #[test]
    fn test_traversal_entry_rejected() {
        let dest_dir = TempDir::new().unwrap();
        let entries = vec![entry("../escape.txt", Some("nope"))];

        let writer = FileWriter::new();
        let result = writer.write_entries(&entries, dest_dir.path(), None, None);
        assert!(matches!(
            result,
            Err(UnbundleError::InvalidEntryPath { .. })
        ));
    }

    #[test]
    fn test_failure_aborts_remaining_entries() {
        let dest_dir = TempDir::new().unwrap();
        let entries = vec![
            entry("ok.txt", Some("written")),
            entry("", Some("invalid")),
            entry("after.txt", Some("never written")),
        ];

        let writer = FileWriter::new();
        assert!(writer
            .write_entries(&entries, dest_dir.path(), None, None)
            .is_err());

        // Fail-fast: earlier entries stay, later ones are never written.
        assert!(dest_dir.path().join("ok.txt").exists());
        assert!(!dest_dir.path().join("after.txt").exists());
    }

    #[test]
    fn test_cancellation_between_entries() {
        let dest_dir = TempDir::new().unwrap();
        let entries = vec![entry("a.txt", Some("a"))];

        let shutdown = GracefulShutdown::new_for_test();
        shutdown.request_shutdown();

        let writer = FileWriter::new();
        let result = writer.write_entries(&entries, dest_dir.path(), Some(&shutdown), None);
        assert!(matches!(result, Err(UnbundleError::Cancelled)));
        assert!(!dest_dir.path().join("a.txt").exists());
    }

    #[test]
    fn test_validate_entry_path() {
        assert!(validate_entry_path("a/b.txt").is_ok());
        assert!(validate_entry_path("./relative.txt").is_ok());
        assert!(validate_entry_path("").is_err());
        assert!(validate_entry_path("/absolute.txt").is_err());
        assert!(validate_entry_path("a/../../escape.txt").is_err());
    }

    #[test]
    fn test_progress_tracking() {
        let mut progress = ExtractionProgress::new(10, 1000);

        assert_eq!(progress.percentage(), 0.0);

        progress.update_entry("file1.txt".to_string(), 100);
        assert_eq!(progress.percentage(), 10.0);
        assert_eq!(progress.bytes_written, 100);
        assert_eq!(progress.entries_written, 1);
    }
}
