//! Shared components for CLI commands
//!
//! This module contains common types, utilities, and functions used by the
//! process command: logging setup, configuration layering and progress bars.

use crate::cli::args::Args;
use crate::config::Config;
use crate::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

/// Processing statistics for reporting
#[derive(Debug, Clone, Default)]
pub struct ProcessingStats {
    /// Number of input lines read
    pub lines_read: usize,
    /// Number of CPU rows in the final table
    pub cpu_rows: usize,
    /// Number of memory rows in the final table
    pub mem_rows: usize,
    /// Number of warnings raised while parsing
    pub warnings: usize,
    /// Total processing time
    pub processing_time: std::time::Duration,
    /// Output file sizes in bytes
    pub output_sizes: Vec<(String, u64)>,
}

impl ProcessingStats {
    /// Calculate total output size in bytes
    pub fn total_output_size(&self) -> u64 {
        self.output_sizes.iter().map(|(_, size)| size).sum()
    }

    /// Format output size in human-readable format
    pub fn format_size(bytes: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = bytes as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", bytes, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }
}

/// Set up structured logging at the given level
///
/// `RUST_LOG` takes precedence when set.
pub fn setup_logging(log_level: &str, quiet: bool) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pidstat_processor={}", log_level)));

    let result = if quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    // A subscriber installed by an embedding application stays in place
    if let Err(e) = result {
        debug!("Keeping existing tracing subscriber: {}", e);
        return Ok(());
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load configuration using layered approach (file -> env -> args)
pub fn load_configuration(args: &Args) -> Result<Config> {
    let config_file = args.config_file.as_deref();

    if let Some(config_path) = config_file {
        info!("Using config file: {}", config_path.display());
    }

    let mut config = Config::load_layered(config_file)?;
    apply_cli_overrides(&mut config, args)?;
    config.validate()?;

    Ok(config)
}

/// Apply CLI argument overrides to configuration
pub fn apply_cli_overrides(config: &mut Config, args: &Args) -> Result<()> {
    // An explicit date always wins over the banner. Without one from any
    // layer, the banner date replaces today's date.
    match args.reference_date()? {
        Some(date) => {
            config.parser.reference_date = Some(date);
            config.parser.prefer_banner_date = false;
        }
        None if config.parser.reference_date.is_none() => {
            config.parser.prefer_banner_date = true;
        }
        None => {}
    }

    if let Some(max) = args.max_percent {
        config.parser.max_percent = max;
    }

    if let Some(dir) = &args.output_dir {
        config.output.output_dir = dir.clone();
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if args.no_output {
        config.output.no_output = true;
    }
    if let Some(rows) = args.tail {
        config.output.tail = Some(rows);
    }
    if let Some(count) = args.show_warnings {
        config.output.show_warnings = count;
    }

    if let Some(level) = args.get_log_level() {
        config.logging.level = level.to_string();
    }

    Ok(())
}

/// Create a byte-based progress bar for reading a file of `total` bytes
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}
