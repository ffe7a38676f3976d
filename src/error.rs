use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UnbundleError {
    #[error("Bundle file not found: {path}")]
    InputNotFound { path: PathBuf },

    #[error("Failed to parse bundle {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Filesystem operation failed for {path}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid entry path in bundle: {name}")]
    InvalidEntryPath { name: String },

    #[error("Permission denied: {path}")]
    Permission { path: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Operation was cancelled by user")]
    Cancelled,
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for UnbundleError {
    fn user_message(&self) -> String {
        match self {
            UnbundleError::InputNotFound { path } => {
                format!("Bundle file not found: {}", path.display())
            }
            UnbundleError::Parse { path, source } => {
                format!("Could not parse bundle {}: {}", path.display(), source)
            }
            UnbundleError::Filesystem { path, source } => {
                format!("Could not write {}: {}", path.display(), source)
            }
            UnbundleError::InvalidEntryPath { name } => {
                format!("Bundle contains an invalid entry path: {:?}", name)
            }
            UnbundleError::Permission { path } => {
                format!("Permission denied accessing: {}", path)
            }
            UnbundleError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            UnbundleError::Cancelled => "Operation was cancelled by user".to_string(),
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            UnbundleError::InputNotFound { .. } => Some(
                "Check the bundle path, or pass it explicitly: unbundle <bundle.json>".to_string(),
            ),
            UnbundleError::Parse { .. } => Some(
                "The bundle must be a JSON object with a top-level \"files\" array of \
                 {\"name\": ..., \"contents\": ...} objects."
                    .to_string(),
            ),
            UnbundleError::Filesystem { .. } => Some(
                "Ensure the output directory is writable and the disk is not full.".to_string(),
            ),
            UnbundleError::InvalidEntryPath { .. } => Some(
                "Entry names must be non-empty relative paths without '..' components.".to_string(),
            ),
            UnbundleError::Permission { .. } => Some(
                "Ensure you have the necessary read/write permissions for the target directory."
                    .to_string(),
            ),
            UnbundleError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all required fields are present."
                    .to_string(),
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for UnbundleError {
    fn from(error: toml::de::Error) -> Self {
        UnbundleError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, UnbundleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_friendly_messages() {
        let error = UnbundleError::InputNotFound {
            path: PathBuf::from("missing.json"),
        };
        assert!(error.user_message().contains("missing.json"));
        assert!(error.suggestion().is_some());
    }

    #[test]
    fn test_parse_error_keeps_source() {
        let json_error = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let error = UnbundleError::Parse {
            path: PathBuf::from("project.json"),
            source: json_error,
        };
        assert!(error.user_message().contains("project.json"));
    }

    #[test]
    fn test_invalid_entry_path_message() {
        let error = UnbundleError::InvalidEntryPath {
            name: "../escape".to_string(),
        };
        assert!(error.user_message().contains("../escape"));
        assert!(error.suggestion().unwrap().contains(".."));
    }
}
