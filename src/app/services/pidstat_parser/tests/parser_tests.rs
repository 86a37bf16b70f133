//! Tests for the section state machine and parser entry points

use super::*;
use crate::Error;
use crate::app::models::SectionKind;
use crate::app::services::pidstat_parser::stats::WarningKind;
use crate::app::services::pidstat_parser::{
    DecodeFailure, ParserState, PidstatParser, SectionParser, parse_stream,
};
use std::io::Cursor;

fn parse(content: &str) -> crate::app::services::pidstat_parser::ParseResult {
    parse_stream(content.lines(), &test_config())
}

#[test]
fn test_cpu_then_memory_end_to_end() {
    let content = format!("{}\n{}", SAMPLE_CPU_SECTION, SAMPLE_MEM_SECTION);
    let result = parse(&content);

    assert_eq!(result.cpu_records.len(), 2);
    assert_eq!(result.mem_records.len(), 2);
    assert!(result.warnings.is_empty());

    assert_eq!(result.cpu_records[0].pid, 497);
    assert_eq!(result.cpu_records[0].command, "systemd-journal");
    assert_eq!(result.cpu_records[1].pid, 670);
    assert!(result.cpu_records.iter().all(|r| r.timestamp == at(21, 55, 46)));
    assert_eq!(result.mem_records[1].rss, 67_916);
}

#[test]
fn test_two_cpu_rows_and_one_mem_row() {
    let content = "\
Linux 5.15.0 (host) \t03/02/2025 \t_x86_64_\t(4 CPU)

10:00:00 AM   UID       PID    %usr %system  %guest   %wait    %CPU   CPU  Command
10:00:00 AM     0         1    0.10    0.20    0.00    0.00    0.30     1  init
10:00:00 AM  1000      2024    5.00    1.00    0.00    0.50    6.00     2  code --type=renderer

10:00:00 AM   UID       PID  minflt/s  majflt/s     VSZ     RSS   %MEM  Command
10:00:00 AM  1000      2024     12.00      0.00  812344   90210   2.25  code --type=renderer
";
    let result = parse(content);

    assert_eq!(result.cpu_records.len(), 2);
    assert_eq!(result.mem_records.len(), 1);
    assert!(result.warnings.is_empty());
    assert_eq!(result.cpu_records[1].command, "code --type=renderer");
    assert_eq!(result.mem_records[0].timestamp, at(10, 0, 0));
}

#[test]
fn test_data_before_header_warns_once() {
    let content = format!(
        "0  497  0.02  0.02  0.00  0.02  0.03  0  orphan\n{}",
        SAMPLE_CPU_SECTION
    );
    let result = parse(&content);

    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].line_number, 1);
    assert_eq!(result.warnings[0].kind, WarningKind::DataBeforeHeader);
    assert!(result.warnings[0].raw_line.contains("orphan"));
    assert_eq!(result.cpu_records.len(), 2);
}

#[test]
fn test_rows_use_most_recent_header() {
    let content = "\
09:55:46 PM   UID       PID    %usr %system  %guest   %wait    %CPU   CPU  Command
09:55:46 PM     0       497    0.02    0.02    0.00    0.02    0.03     0  systemd-journal
09:55:46 PM   UID       PID  minflt/s  majflt/s     VSZ     RSS   %MEM  Command
09:55:46 PM     0       497      0.17      0.00  129300    7036   0.89  systemd-journal
09:56:46 PM   UID       PID    %usr %system  %guest   %wait    %CPU   CPU  Command
09:56:46 PM     0       497    0.05    0.01    0.00    0.00    0.06     0  systemd-journal
09:56:46 PM   UID       PID  minflt/s  majflt/s     VSZ     RSS   %MEM  Command
09:56:46 PM     0       497      0.00      0.00  129300    7040   0.89  systemd-journal
";
    let result = parse(content);

    assert!(result.warnings.is_empty());
    let cpu_times: Vec<_> = result.cpu_records.iter().map(|r| r.timestamp).collect();
    let mem_times: Vec<_> = result.mem_records.iter().map(|r| r.timestamp).collect();
    assert_eq!(cpu_times, vec![at(21, 55, 46), at(21, 56, 46)]);
    assert_eq!(mem_times, vec![at(21, 55, 46), at(21, 56, 46)]);
    assert_eq!(result.stats.cpu_sections, 2);
    assert_eq!(result.stats.mem_sections, 2);
}

#[test]
fn test_parsing_is_idempotent() {
    let report = create_test_report();
    assert_eq!(parse(&report), parse(&report));
}

#[test]
fn test_bad_row_is_skipped_and_parsing_continues() {
    let content = "\
09:55:46 PM   UID       PID    %usr %system  %guest   %wait    %CPU   CPU  Command
09:56:46 PM     0       497    0.02    oops    0.00    0.02    0.03     0  systemd-journal
09:56:46 PM   993       670    0.17    0.02    0.00    0.00    0.18     0  prometheus
";
    let result = parse(content);

    assert_eq!(result.cpu_records.len(), 1);
    assert_eq!(result.cpu_records[0].pid, 670);
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].line_number, 2);
    match &result.warnings[0].kind {
        WarningKind::Decode { section, failure } => {
            assert_eq!(*section, SectionKind::Cpu);
            assert!(matches!(failure, DecodeFailure::BadField { index: 3, .. }));
        }
        other => panic!("unexpected warning: {:?}", other),
    }
    assert_eq!(result.stats.lines_skipped, 1);
}

#[test]
fn test_malformed_header_closes_section() {
    let content = "\
09:55:46 PM   UID       PID    %usr %system  %guest   %wait    %CPU   CPU  Command
09:56:46 PM     0       497    0.02    0.02    0.00    0.02    0.03     0  systemd-journal
99:99:99 PM   UID       PID  minflt/s  majflt/s     VSZ     RSS   %MEM  Command
09:56:46 PM     0       497      0.17      0.00  129300    7036   0.89  systemd-journal
";
    let result = parse(content);

    assert_eq!(result.cpu_records.len(), 1);
    assert!(result.mem_records.is_empty());
    assert_eq!(result.warnings.len(), 2);
    assert!(matches!(
        result.warnings[0].kind,
        WarningKind::MalformedHeader(_)
    ));
    assert_eq!(result.warnings[1].kind, WarningKind::NoActiveSection);
    assert_eq!(result.warnings[1].line_number, 4);
}

#[test]
fn test_unknown_header_closes_section() {
    let content = "\
09:55:46 PM   UID       PID    %usr %system  %guest   %wait    %CPU   CPU  Command
09:56:46 PM     0       497    0.02    0.02    0.00    0.02    0.03     0  systemd-journal
09:55:46 PM   UID       PID   kB_rd/s   kB_wr/s kB_ccwr/s iodelay  Command
09:56:46 PM     0       497      0.00      0.00      0.00       0  systemd-journal
";
    let result = parse(content);

    assert_eq!(result.cpu_records.len(), 1);
    assert_eq!(result.warnings.len(), 2);
    assert_eq!(result.warnings[0].kind, WarningKind::UnknownHeader);
    assert_eq!(result.warnings[1].kind, WarningKind::NoActiveSection);
}

#[test]
fn test_summary_block_is_ignored() {
    let result = parse(&create_test_report());

    assert_eq!(result.cpu_records.len(), 2);
    assert_eq!(result.mem_records.len(), 2);
    assert!(result.warnings.is_empty());
}

#[test]
fn test_duplicate_pid_is_kept_with_warning() {
    let content = "\
09:55:46 PM   UID       PID    %usr %system  %guest   %wait    %CPU   CPU  Command
09:56:46 PM     0       497    0.02    0.02    0.00    0.02    0.03     0  systemd-journal
09:56:46 PM     0       497    0.04    0.02    0.00    0.02    0.05     0  systemd-journal
";
    let result = parse(content);

    assert_eq!(result.cpu_records.len(), 2);
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(
        result.warnings[0].kind,
        WarningKind::DuplicatePid { pid: 497 }
    );
    assert_eq!(result.stats.lines_skipped, 0);
}

#[test]
fn test_same_pid_in_different_sections_is_not_duplicate() {
    let content = format!(
        "{}\n{}\n{}",
        SAMPLE_CPU_SECTION, SAMPLE_MEM_SECTION, SAMPLE_CPU_SECTION
    );
    let result = parse(&content);

    assert_eq!(result.cpu_records.len(), 4);
    assert!(result.warnings.is_empty());
}

#[test]
fn test_banner_date_used_when_preferred() {
    let config = test_config()
        .with_reference_date(chrono::NaiveDate::from_ymd_opt(2000, 1, 1).unwrap())
        .with_banner_date();
    let result = parse_stream(create_test_report().lines(), &config);

    assert_eq!(result.reference_date, test_date());
    assert_eq!(result.cpu_records[0].timestamp, at(21, 55, 46));
}

#[test]
fn test_banner_date_ignored_by_default() {
    let date = chrono::NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
    let config = test_config().with_reference_date(date);
    let result = parse_stream(create_test_report().lines(), &config);

    assert_eq!(result.reference_date, date);
    assert_eq!(result.cpu_records[0].timestamp.date(), date);
}

#[test]
fn test_section_parser_state_transitions() {
    let mut parser = SectionParser::new(&test_config());
    assert_eq!(parser.state(), ParserState::NoSection);

    parser.feed(CPU_HEADER);
    assert_eq!(parser.state(), ParserState::InCpuSection(at(21, 55, 46)));

    parser.feed("");
    assert_eq!(parser.state(), ParserState::InCpuSection(at(21, 55, 46)));

    parser.feed(MEM_HEADER);
    assert_eq!(parser.state(), ParserState::InMemSection(at(21, 55, 46)));
    assert_eq!(
        parser.state().active_header().map(|h| h.kind),
        Some(SectionKind::Memory)
    );

    parser.feed("UID PID %CPU Command");
    assert_eq!(parser.state(), ParserState::NoSection);

    let result = parser.finish();
    assert_eq!(result.stats.total_lines, 4);
    assert_eq!(result.warnings.len(), 1);
}

#[test]
fn test_parse_str_matches_parse_stream() {
    let parser = PidstatParser::new(test_config());
    let report = create_test_report();
    assert_eq!(parser.parse_str(&report), parse(&report));
}

#[test]
fn test_parse_reader() {
    let parser = PidstatParser::new(test_config());
    let report = create_test_report();
    let result = parser.parse_reader(Cursor::new(report), "memory").unwrap();

    assert_eq!(result.total_records(), 4);
}

#[test]
fn test_parse_reader_invalid_utf8() {
    let parser = PidstatParser::new(test_config());
    let mut bytes = format!("{}\n", CPU_HEADER).into_bytes();
    bytes.extend_from_slice(&[0xff, 0xfe, b'\n']);

    match parser.parse_reader(Cursor::new(bytes), "broken.log") {
        Err(Error::InvalidEncoding { path, line_number }) => {
            assert_eq!(path, "broken.log");
            assert_eq!(line_number, 2);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_parse_file() {
    let file = create_temp_file(&create_test_report());
    let parser = PidstatParser::new(test_config());
    let result = parser.parse_file(file.path()).unwrap();

    assert_eq!(result.cpu_records.len(), 2);
    assert_eq!(result.mem_records.len(), 2);
    assert_eq!(result.stats.total_lines, create_test_report().lines().count());
}

#[test]
fn test_parse_file_missing() {
    let parser = PidstatParser::new(test_config());
    let result = parser.parse_file(std::path::Path::new("/nonexistent/pidstat.log"));
    assert!(matches!(result, Err(Error::FileNotFound { .. })));
}

#[test]
fn test_parse_file_with_progress() {
    let report = create_test_report();
    let file = create_temp_file(&report);
    let parser = PidstatParser::new(test_config());
    let pb = indicatif::ProgressBar::hidden();

    let result = parser
        .parse_file_with_progress(file.path(), Some(&pb))
        .unwrap();

    assert_eq!(result, parser.parse_file(file.path()).unwrap());
    let size = std::fs::metadata(file.path()).unwrap().len();
    assert_eq!(pb.length(), Some(size));
    assert_eq!(pb.position(), size);
    assert!(pb.is_finished());
}

#[test]
fn test_command_naming_columns_stays_in_section() {
    let content = "\
09:55:46 PM   UID       PID    %usr %system  %guest   %wait    %CPU   CPU  Command
09:56:46 PM     0      2201    0.00    0.01    0.00    0.00    0.01     3  ps -o UID PID
09:56:46 PM     0       497    0.02    0.02    0.00    0.02    0.03     0  systemd-journal
";
    let result = parse(content);

    assert!(result.warnings.is_empty());
    assert_eq!(result.cpu_records.len(), 2);
    assert_eq!(result.cpu_records[0].command, "ps -o UID PID");
}
