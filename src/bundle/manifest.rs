use crate::error::{Result, UnbundleError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Parsed bundle manifest: a flat, ordered list of files to materialize.
///
/// Unknown top-level keys are ignored; a missing `files` key is a parse error.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProjectBundle {
    pub files: Vec<FileEntry>,
}

/// One file described by the bundle. `name` is a relative path and may
/// contain separators; `contents` absent or null means an empty file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FileEntry {
    pub name: String,
    #[serde(default)]
    pub contents: Option<String>,
}

impl FileEntry {
    pub fn contents_str(&self) -> &str {
        self.contents.as_deref().unwrap_or("")
    }

    pub fn size(&self) -> u64 {
        self.contents_str().len() as u64
    }
}

impl ProjectBundle {
    /// Load and parse a bundle manifest from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(UnbundleError::InputNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path).map_err(|e| UnbundleError::Filesystem {
            path: path.to_path_buf(),
            source: e,
        })?;

        let bundle: ProjectBundle =
            serde_json::from_str(&content).map_err(|e| UnbundleError::Parse {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(bundle)
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(FileEntry::size).sum()
    }

    pub fn statistics(&self) -> BundleStatistics {
        let mut distinct = HashSet::new();
        for entry in &self.files {
            distinct.insert(entry.name.as_str());
        }

        BundleStatistics {
            total_entries: self.files.len(),
            distinct_names: distinct.len(),
            total_bytes: self.total_bytes(),
            empty_entries: self
                .files
                .iter()
                .filter(|e| e.contents.is_none())
                .count(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BundleStatistics {
    pub total_entries: usize,
    pub distinct_names: usize,
    pub total_bytes: u64,
    pub empty_entries: usize,
}

impl BundleStatistics {
    pub fn display_summary(&self) -> String {
        format!(
            "Bundle: {} entries ({} distinct names, {} without contents), {} bytes",
            self.total_entries, self.distinct_names, self.empty_entries, self.total_bytes
        )
    }
}
