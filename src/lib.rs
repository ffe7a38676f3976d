pub mod bundle;
pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod ui;

// Public API re-exports
pub use bundle::{FileEntry, ProjectBundle};
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config};
pub use error::{Result, UnbundleError, UserFriendlyError};
pub use extractor::{
    ConfigSnapshot, ExtractionProgress, ExtractionReport, FileWriter, OutputManager,
};
pub use ui::{GracefulShutdown, OutputFormatter, OutputMode, ProgressManager};

use std::path::Path;

/// Main library interface for the bundle extraction pipeline
pub struct Unbundler {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
    shutdown: GracefulShutdown,
}

impl Unbundler {
    /// Create a new Unbundler instance with the provided configuration
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Result<Self> {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet);
        let shutdown = GracefulShutdown::new()?;

        Ok(Self {
            config,
            output_formatter,
            progress_manager,
            shutdown,
        })
    }

    /// Create a new Unbundler instance for testing (no signal handler registration)
    pub fn new_for_test(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet);
        let shutdown = GracefulShutdown::new_for_test();

        Self {
            config,
            output_formatter,
            progress_manager,
            shutdown,
        }
    }

    /// Create Unbundler instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Self::new(config, output_mode, cli_args.verbose, cli_args.quiet)
    }

    /// Unpack the configured bundle into the configured output directory.
    ///
    /// One pass over the entry sequence, in bundle order. Fails fast on the
    /// first error; files written before the failure stay on disk.
    pub fn unpack(&self) -> Result<ExtractionReport> {
        self.shutdown.check_shutdown()?;

        let bundle_path = self.config.bundle.path.clone();

        // Step 1: Load and parse the bundle manifest
        self.output_formatter.start_operation("Reading bundle");
        let bundle = ProjectBundle::load(&bundle_path)?;
        self.output_formatter
            .debug(&bundle.statistics().display_summary());
        self.shutdown.check_shutdown()?;

        // Step 2: Set up the output directory
        let output_manager = OutputManager::new(self.config.output.directory.clone())
            .with_write_report(self.config.output.write_report);
        output_manager.initialize()?;
        self.output_formatter.info(&format!(
            "Initialized output directory: {}",
            output_manager.get_output_directory().display()
        ));
        self.shutdown.check_shutdown()?;

        // Step 3: Write entries
        let progress = self.write_entries(&bundle, output_manager.get_output_directory())?;

        // Step 4: Build the report
        let config_snapshot = self.create_config_snapshot();
        let report = output_manager.create_extraction_report(
            &bundle_path,
            &bundle,
            &progress,
            &config_snapshot,
        )?;

        self.output_formatter.print_extraction_summary(&progress);
        self.output_formatter.success(&format!(
            "Project saved in {}",
            output_manager.get_output_directory().display()
        ));

        Ok(report)
    }

    /// Write all bundle entries with progress tracking
    fn write_entries(&self, bundle: &ProjectBundle, output_dir: &Path) -> Result<ExtractionProgress> {
        self.output_formatter.start_operation("Writing files");

        let entry_progress = self
            .progress_manager
            .create_entry_progress(bundle.len() as u64);
        let progress_callback = {
            let pb = entry_progress.clone();
            move |progress: &ExtractionProgress| {
                ui::progress::update_entry_progress(&pb, progress);
            }
        };

        let writer = FileWriter::new();
        let progress = writer.write_entries(
            &bundle.files,
            output_dir,
            Some(&self.shutdown),
            Some(&progress_callback),
        )?;

        ui::progress::finish_progress_with_summary(
            &entry_progress,
            &format!("Wrote {} entries", progress.entries_written),
            progress.elapsed(),
        );

        Ok(progress)
    }

    /// Create configuration snapshot for reporting
    fn create_config_snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot {
            bundle_path: self.config.bundle.path.clone(),
            output_directory: self.config.output.directory.clone(),
            write_report: self.config.output.write_report,
        }
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config).map_err(UnbundleError::Io)?;
        Ok(())
    }

    /// Get configuration reference
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get output formatter reference
    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Check if shutdown has been requested
    pub fn is_running(&self) -> bool {
        self.shutdown.is_running()
    }

    /// Request graceful shutdown
    pub fn request_shutdown(&self) {
        self.shutdown.request_shutdown();
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &UnbundleError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Convenience function to unpack a bundle with minimal setup.
///
/// Same pipeline as [`Unbundler::unpack`] without terminal output, progress
/// bars, or signal handling.
pub fn unpack_simple<P: AsRef<Path>>(
    bundle_path: P,
    output_dir: Option<&Path>,
) -> Result<ExtractionReport> {
    let bundle_path = bundle_path.as_ref();
    let output_dir = output_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| std::path::PathBuf::from(config::DEFAULT_OUTPUT_DIR));

    let bundle = ProjectBundle::load(bundle_path)?;

    let output_manager = OutputManager::new(output_dir.clone());
    output_manager.initialize()?;

    let writer = FileWriter::new();
    let progress = writer.write_entries(&bundle.files, &output_dir, None, None)?;

    let snapshot = ConfigSnapshot {
        bundle_path: bundle_path.to_path_buf(),
        output_directory: output_dir,
        write_report: false,
    };
    output_manager.create_extraction_report(bundle_path, &bundle, &progress, &snapshot)
}

/// Get version information
pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
