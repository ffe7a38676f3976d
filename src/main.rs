use clap::Parser;
use std::process;
use unbundle::{
    Cli, OutputFormatter, OutputMode, ProjectBundle, UnbundleError, Unbundler, UserFriendlyError,
};

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();

    // Handle special commands first
    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let unbundler = match Unbundler::from_cli(&cli) {
        Ok(unbundler) => unbundler,
        Err(e) => {
            print_startup_error(&e);
            return 1;
        }
    };

    if cli.dry_run {
        return handle_dry_run(&unbundler);
    }

    // Execute main extraction workflow
    match unbundler.unpack() {
        Ok(report) => {
            unbundler.output_formatter().print_extraction_report(&report);
            0
        }
        Err(e) => {
            unbundler.handle_error(&e);

            // Map error types to appropriate exit codes
            match e {
                UnbundleError::Cancelled => 130, // Interrupted (SIGINT)
                UnbundleError::Parse { .. } => 2,
                UnbundleError::InvalidEntryPath { .. } => 2,
                UnbundleError::InputNotFound { .. } => 3,
                UnbundleError::Permission { .. } => 7,
                _ => 1, // General error
            }
        }
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "unbundle.toml".to_string());

    match Unbundler::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  unbundle --config {}", config_path);
            println!("\nEdit the file to customize settings for your needs.");
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn handle_dry_run(unbundler: &Unbundler) -> i32 {
    let formatter = unbundler.output_formatter();
    let config = unbundler.config();

    formatter.info("DRY RUN MODE - No files will be written");
    formatter.print_separator();

    let bundle = match ProjectBundle::load(&config.bundle.path) {
        Ok(bundle) => bundle,
        Err(e) => {
            formatter.print_user_friendly_error(&e);
            return 1;
        }
    };

    let stats = bundle.statistics();
    formatter.info("Extraction plan:");
    println!("  Bundle:           {}", config.bundle.path.display());
    println!("  Output directory: {}", config.output.directory.display());
    println!("  Entries:          {}", stats.total_entries);
    println!("  Distinct files:   {}", stats.distinct_names);
    println!("  Total bytes:      {}", stats.total_bytes);
    if stats.empty_entries > 0 {
        println!("  Empty entries:    {}", stats.empty_entries);
    }

    formatter.print_separator();
    formatter.success("Dry run completed successfully");
    formatter.info("Run without --dry-run to perform actual extraction");

    0
}

fn print_startup_error(error: &UnbundleError) {
    // Create a basic formatter for startup errors
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use unbundle::OutputFormat;

    #[test]
    fn test_generate_config_command() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let cli = Cli {
            bundle: None,
            output: None,
            config: Some(config_path.clone()),
            output_format: OutputFormat::Human,
            write_report: false,
            verbose: 0,
            quiet: false,
            dry_run: false,
            generate_config: true,
        };

        let exit_code = handle_generate_config(&cli);
        assert_eq!(exit_code, 0);
        assert!(config_path.exists());

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[output]"));
    }

    #[test]
    fn test_dry_run_missing_bundle() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = unbundle::Config::default();
        config.bundle.path = temp_dir.path().join("missing.json");

        let unbundler =
            Unbundler::new_for_test(config, OutputMode::Plain, 0, true);

        let exit_code = handle_dry_run(&unbundler);
        assert_eq!(exit_code, 1);
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let bundle_path = temp_dir.path().join("bundle.json");
        fs::write(
            &bundle_path,
            r#"{"files": [{"name": "a.txt", "contents": "a"}]}"#,
        )
        .unwrap();

        let output_dir: PathBuf = temp_dir.path().join("out");
        let mut config = unbundle::Config::default();
        config.bundle.path = bundle_path;
        config.output.directory = output_dir.clone();

        let unbundler =
            Unbundler::new_for_test(config, OutputMode::Plain, 0, true);

        let exit_code = handle_dry_run(&unbundler);
        assert_eq!(exit_code, 0);
        assert!(!output_dir.exists());
    }
}
