use crate::config::{CliOverrides, Config};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "unbundle")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Recreate project files from a JSON bundle")]
#[command(
    long_about = "Unbundle reads a JSON document describing a set of files (name + contents) \
                       and writes them to disk under an output directory, creating intermediate \
                       directories as needed."
)]
#[command(after_help = "EXAMPLES:\n  \
    unbundle\n  \
    unbundle project.json --output my-project\n  \
    unbundle export.json --output-format json --quiet\n  \
    unbundle --config my-config.toml --dry-run")]
pub struct Cli {
    /// Path to the JSON bundle (defaults to project.json)
    pub bundle: Option<PathBuf>,

    /// Output directory the bundle is unpacked into
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Write a JSON extraction report under the output directory
    #[arg(long, help = "Persist an extraction report alongside the files")]
    pub write_report: bool,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Dry run (show what would be done without executing)
    #[arg(long, help = "Show what would be extracted without writing anything")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        let write_report = if self.write_report { Some(true) } else { None };

        CliOverrides::new()
            .with_bundle_path(self.bundle.clone())
            .with_output_dir(self.output.clone())
            .with_write_report(write_report)
    }

    pub fn should_use_colors(&self) -> bool {
        !self.quiet && console::Term::stdout().features().colors_supported()
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose > 0 && !self.quiet
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_BUNDLE_PATH, DEFAULT_OUTPUT_DIR};

    fn cli_with_defaults() -> Cli {
        Cli {
            bundle: None,
            output: None,
            config: None,
            output_format: OutputFormat::Human,
            write_report: false,
            verbose: 0,
            quiet: false,
            dry_run: false,
            generate_config: false,
        }
    }

    #[test]
    fn test_defaults_resolve_to_fixed_literals() {
        let cli = cli_with_defaults();
        let config = cli.load_config().unwrap();

        assert_eq!(config.bundle.path, PathBuf::from(DEFAULT_BUNDLE_PATH));
        assert_eq!(config.output.directory, PathBuf::from(DEFAULT_OUTPUT_DIR));
    }

    #[test]
    fn test_positional_bundle_overrides_config() {
        let mut cli = cli_with_defaults();
        cli.bundle = Some(PathBuf::from("export.json"));
        cli.output = Some(PathBuf::from("restored"));

        let config = cli.load_config().unwrap();
        assert_eq!(config.bundle.path, PathBuf::from("export.json"));
        assert_eq!(config.output.directory, PathBuf::from("restored"));
    }

    #[test]
    fn test_verbosity_levels() {
        let mut cli = cli_with_defaults();
        cli.verbose = 2;
        assert!(cli.is_verbose());
        assert_eq!(cli.verbosity_level(), 2);

        cli.quiet = true;
        cli.verbose = 0;
        assert!(!cli.is_verbose());
        assert_eq!(cli.verbosity_level(), 0);
    }

    #[test]
    fn test_write_report_override_only_when_set() {
        let cli = cli_with_defaults();
        assert!(cli.create_cli_overrides().write_report.is_none());

        let mut cli = cli_with_defaults();
        cli.write_report = true;
        assert_eq!(cli.create_cli_overrides().write_report, Some(true));
    }
}
