//! Process command implementation for pidstat processor CLI
//!
//! This module contains the complete workflow: configuration loading, parsing
//! with progress reporting, table building, output and report generation.

use super::shared::{
    ProcessingStats, create_progress_bar, load_configuration, setup_logging,
};
use crate::app::models::SectionKind;
use crate::app::services::pidstat_parser::{ParseResult, PidstatParser};
use crate::app::services::table_builder::{ProcessTables, TableSummary, write_tables};
use crate::cli::args::Args;
use crate::config::Config;
use crate::Result;
use colored::*;
use indicatif::HumanDuration;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Process command runner
///
/// 1. Validate arguments and load layered configuration
/// 2. Parse the log with a progress bar over the bytes read
/// 3. Build the CPU and memory tables
/// 4. Report shapes and warnings, then write the tables
pub fn run_process(args: Args) -> Result<ProcessingStats> {
    let start_time = Instant::now();

    args.validate()?;
    let config = load_configuration(&args)?;
    setup_logging(&config.logging.level, args.quiet)?;

    info!("Starting pidstat processor");
    debug!("Loaded configuration: {:?}", config);

    let result = parse_with_progress(&args.file_path, &config, args.show_progress())?;

    let mut tables = ProcessTables::from_parse_result(&result)?;
    if let Some(rows) = config.output.tail {
        debug!("Keeping last {} rows of each table", rows);
        tables = tables.tail(rows);
    }

    let cpu_summary = tables.summary(SectionKind::Cpu)?;
    let mem_summary = tables.summary(SectionKind::Memory)?;

    let mut stats = ProcessingStats {
        lines_read: result.stats.total_lines,
        cpu_rows: cpu_summary.rows,
        mem_rows: mem_summary.rows,
        warnings: result.warnings.len(),
        ..Default::default()
    };

    if !args.quiet {
        print_parse_report(&result, &cpu_summary, &mem_summary, &config);
    }

    if config.output.no_output {
        info!("Skipping table output (--no-output)");
    } else {
        let written = write_tables(&tables, &config.output.output_dir, config.output.format)?;
        stats.output_sizes = written
            .iter()
            .map(|w| (w.path.display().to_string(), w.bytes))
            .collect();
    }

    stats.processing_time = start_time.elapsed();

    if !args.quiet {
        print_final_report(&stats);
    }

    Ok(stats)
}

/// Parse a log file, showing a byte progress bar when enabled
pub fn parse_with_progress(path: &Path, config: &Config, show_progress: bool) -> Result<ParseResult> {
    let parser = PidstatParser::new(config.parser.clone());
    let progress = show_progress.then(|| create_progress_bar(0, "Parsing"));
    parser.parse_file_with_progress(path, progress.as_ref())
}

fn print_parse_report(
    result: &ParseResult,
    cpu: &TableSummary,
    memory: &TableSummary,
    config: &Config,
) {
    println!("\n{}", "Parse Summary".bright_green().bold());
    println!("   Reference date: {}", result.reference_date);
    println!(
        "   Lines read: {}",
        result.stats.total_lines.to_string().bright_white().bold()
    );
    print_table_line("CPU", cpu);
    print_table_line("Memory", memory);

    if result.warnings.is_empty() {
        return;
    }

    println!(
        "   Warnings: {}",
        result.warnings.len().to_string().bright_yellow().bold()
    );
    for warning in result.warnings.iter().take(config.output.show_warnings) {
        println!("     {}", warning.to_string().yellow());
    }
    let hidden = result
        .warnings
        .len()
        .saturating_sub(config.output.show_warnings);
    if hidden > 0 {
        println!("     ... and {} more", hidden);
    }
}

fn print_table_line(label: &str, summary: &TableSummary) {
    println!(
        "   {} table: {} rows x {} columns, {} unique timestamps, {} unique pids",
        label,
        summary.rows.to_string().bright_white().bold(),
        summary.columns,
        summary.unique_timestamps,
        summary.unique_pids
    );
}

fn print_final_report(stats: &ProcessingStats) {
    if !stats.output_sizes.is_empty() {
        println!("\n{}", "Output Files".bright_green().bold());
        for (filename, size) in &stats.output_sizes {
            println!("   {}: {}", filename, ProcessingStats::format_size(*size));
        }
    }

    println!(
        "\nCompleted in {}",
        HumanDuration(stats.processing_time).to_string().bright_white()
    );
}
