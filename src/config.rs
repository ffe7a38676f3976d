use crate::error::{Result, UnbundleError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_BUNDLE_PATH: &str = "project.json";
pub const DEFAULT_OUTPUT_DIR: &str = "project_files";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub bundle: BundleConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BundleConfig {
    /// Path of the bundle manifest read when no positional argument is given.
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Root directory the bundle is unpacked into.
    pub directory: PathBuf,
    /// Persist a JSON extraction report under the output root.
    pub write_report: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bundle: BundleConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_BUNDLE_PATH),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_OUTPUT_DIR),
            write_report: false,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(UnbundleError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| UnbundleError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| UnbundleError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["unbundle.toml", ".unbundle.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref bundle_path) = cli_args.bundle_path {
            self.bundle.path = bundle_path.clone();
        }

        if let Some(ref output_dir) = cli_args.output_dir {
            self.output.directory = output_dir.clone();
        }

        if let Some(write_report) = cli_args.write_report {
            self.output.write_report = write_report;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| UnbundleError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| UnbundleError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.bundle.path.as_os_str().is_empty() {
            return Err(UnbundleError::Config {
                message: "Bundle path must not be empty".to_string(),
            });
        }

        if self.output.directory.as_os_str().is_empty() {
            return Err(UnbundleError::Config {
                message: "Output directory must not be empty".to_string(),
            });
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub bundle_path: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub write_report: Option<bool>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bundle_path(mut self, bundle_path: Option<PathBuf>) -> Self {
        self.bundle_path = bundle_path;
        self
    }

    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        self.output_dir = output_dir;
        self
    }

    pub fn with_write_report(mut self, write_report: Option<bool>) -> Self {
        self.write_report = write_report;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.bundle.path, PathBuf::from(DEFAULT_BUNDLE_PATH));
        assert_eq!(config.output.directory, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert!(!config.output.write_report);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.output.directory = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_file_operations() {
        let config = Config::default();
        let temp_file = NamedTempFile::new().unwrap();

        config.save_to_file(temp_file.path()).unwrap();

        let loaded_config = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(config.bundle.path, loaded_config.bundle.path);
        assert_eq!(config.output.directory, loaded_config.output.directory);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Config::default();

        let overrides = CliOverrides::new()
            .with_bundle_path(Some(PathBuf::from("other.json")))
            .with_output_dir(Some(PathBuf::from("out")))
            .with_write_report(Some(true));

        config.merge_with_cli_args(&overrides);

        assert_eq!(config.bundle.path, PathBuf::from("other.json"));
        assert_eq!(config.output.directory, PathBuf::from("out"));
        assert!(config.output.write_report);
    }

    #[test]
    fn test_sample_config_generation() {
        let sample = Config::create_sample_config();
        assert!(!sample.is_empty());
        assert!(sample.contains("[bundle]"));
        assert!(sample.contains("[output]"));
    }
}
