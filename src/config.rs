//! Configuration management and validation.
//!
//! Provides configuration structures for parsing and output, loaded in
//! layers: built-in defaults, an optional TOML file, `PIDSTAT_*` environment
//! variables and finally command-line overrides.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::app::services::table_builder::OutputFormat;
use crate::constants::{
    DEFAULT_MAX_PERCENT, DEFAULT_OUTPUT_DIR, DEFAULT_WARNINGS_SHOWN, ENV_PREFIX,
};
use crate::{Error, Result};

/// Log levels accepted in the `[logging]` table
const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Settings that affect how lines are interpreted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Date combined with header times, today's local date when unset
    pub reference_date: Option<NaiveDate>,

    /// Replace the reference date with the banner's date when one is printed
    pub prefer_banner_date: bool,

    /// Upper bound for percentage fields
    pub max_percent: f64,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            reference_date: None,
            prefer_banner_date: false,
            max_percent: DEFAULT_MAX_PERCENT,
        }
    }
}

impl ParserConfig {
    /// Use a fixed reference date
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// The configured reference date, or today's local date
    pub fn effective_date(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Local::now().date_naive())
    }

    /// Let the banner's date override the reference date
    pub fn with_banner_date(mut self) -> Self {
        self.prefer_banner_date = true;
        self
    }

    /// Set the upper bound for percentage fields
    pub fn with_max_percent(mut self, max_percent: f64) -> Self {
        self.max_percent = max_percent;
        self
    }
}

/// Where and how tables are written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving `cpu_stats.*` and `mem_stats.*`
    pub output_dir: PathBuf,

    pub format: OutputFormat,

    /// Skip writing tables entirely
    pub no_output: bool,

    /// Keep only the last N rows of each table
    pub tail: Option<usize>,

    /// Number of warnings printed in the summary
    pub show_warnings: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            format: OutputFormat::Csv,
            no_output: false,
            tail: None,
            show_warnings: DEFAULT_WARNINGS_SHOWN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level used when no `-v`/`-q` flag is given
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Global configuration for pidstat processing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub parser: ParserConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(
                format!("Failed to read config file {}", path.display()),
                e,
            )
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::configuration(format!("Invalid configuration file: {}", e)))
    }

    /// Defaults, then the optional file, then environment variables
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                Self::load(path)?
            }
            None => Self::default(),
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `PIDSTAT_*` overrides using the given variable lookup
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

        if let Some(dir) = var("OUTPUT_DIR") {
            debug!("Output directory from environment: {}", dir);
            self.output.output_dir = PathBuf::from(dir);
        }

        if let Some(format) = var("FORMAT") {
            self.output.format = format.parse()?;
        }

        if let Some(max) = var("MAX_PERCENT") {
            self.parser.max_percent = max.trim().parse().map_err(|_| {
                Error::configuration(format!(
                    "{}MAX_PERCENT must be a number, got: {}",
                    ENV_PREFIX, max
                ))
            })?;
        }

        Ok(())
    }

    /// Set the output directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output.output_dir = dir.into();
        self
    }

    /// Set the table file format
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.output.format = format;
        self
    }

    /// Parse and report only
    pub fn without_output(mut self) -> Self {
        self.output.no_output = true;
        self
    }

    /// Keep only the last `rows` rows of each table
    pub fn with_tail(mut self, rows: usize) -> Self {
        self.output.tail = Some(rows);
        self
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<()> {
        let max = self.parser.max_percent;
        if !max.is_finite() || max <= 0.0 {
            return Err(Error::configuration(format!(
                "max_percent must be a positive number, got: {}",
                max
            )));
        }

        if !self.output.no_output && self.output.output_dir.as_os_str().is_empty() {
            return Err(Error::configuration("output_dir must not be empty"));
        }

        if self.output.tail == Some(0) {
            return Err(Error::configuration("tail must be at least 1"));
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(Error::configuration(format!(
                "Unknown log level '{}'. Expected one of: {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.output.output_dir, PathBuf::from("outputs"));
        assert_eq!(config.output.format, OutputFormat::Csv);
        assert_eq!(config.output.show_warnings, 10);
        assert_eq!(config.parser.max_percent, 100.0);
        assert!(!config.parser.prefer_banner_date);
        assert_eq!(config.parser.reference_date, None);
        assert_eq!(config.parser.effective_date(), Local::now().date_naive());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [parser]
            reference_date = "2025-03-02"
            max_percent = 400.0

            [output]
            format = "parquet"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.parser.reference_date,
            NaiveDate::from_ymd_opt(2025, 3, 2)
        );
        assert_eq!(config.parser.max_percent, 400.0);
        assert_eq!(config.output.format, OutputFormat::Parquet);
        assert_eq!(config.output.output_dir, PathBuf::from("outputs"));
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_invalid_toml() {
        let result = Config::from_toml("[parser]\nmax_percent = \"lots\"");
        assert!(matches!(result, Err(Error::Configuration { .. })));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[output]\noutput_dir = \"reports\"\ntail = 500").unwrap();

        let config = Config::load_layered(Some(file.path())).unwrap();
        assert_eq!(config.output.output_dir, PathBuf::from("reports"));
        assert_eq!(config.output.tail, Some(500));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = Config::from_toml("[output]\noutput_dir = \"reports\"").unwrap();
        config
            .apply_env_overrides(env(&[
                ("PIDSTAT_OUTPUT_DIR", "/tmp/pidstat"),
                ("PIDSTAT_FORMAT", "parquet"),
                ("PIDSTAT_MAX_PERCENT", "800"),
            ]))
            .unwrap();

        assert_eq!(config.output.output_dir, PathBuf::from("/tmp/pidstat"));
        assert_eq!(config.output.format, OutputFormat::Parquet);
        assert_eq!(config.parser.max_percent, 800.0);
    }

    #[test]
    fn test_env_override_errors() {
        let mut config = Config::default();
        assert!(
            config
                .apply_env_overrides(env(&[("PIDSTAT_MAX_PERCENT", "abc")]))
                .is_err()
        );
        assert!(
            config
                .apply_env_overrides(env(&[("PIDSTAT_FORMAT", "xlsx")]))
                .is_err()
        );
    }

    #[test]
    fn test_validation() {
        let mut config = Config::default();
        config.parser.max_percent = 0.0;
        assert!(config.validate().is_err());

        let config = Config::default().with_tail(0);
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());

        let config = Config::default().with_output_dir("").without_output();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let parser = ParserConfig::default()
            .with_reference_date(date)
            .with_banner_date()
            .with_max_percent(200.0);

        assert_eq!(parser.reference_date, Some(date));
        assert_eq!(parser.effective_date(), date);
        assert!(parser.prefer_banner_date);
        assert_eq!(parser.max_percent, 200.0);

        let config = Config::default()
            .with_format(OutputFormat::Parquet)
            .with_tail(10);
        assert_eq!(config.output.format, OutputFormat::Parquet);
        assert_eq!(config.output.tail, Some(10));
    }
}
