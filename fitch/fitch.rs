//! Natural deduction proof checker for propositional logic

use clap::{Arg, ArgMatches};
use fitch_common::{
    _log, comment, config, die, log,
    derivation::{check_fitch_lines, check_sequent_lines},
    output::{install_signal_handler, print_key_value, print_solution, Timer},
    parser::{open_file_for_writing, read_compressed_file_or_stdin},
    report::DerivationReport,
    warn, write_to_stdout,
};
use std::io::Write;

/// Run `fitch`.
fn main() {
    std::process::exit(run_frontend());
}

/// Run `fitch`, returning its exit code.
///
/// This is a separate function because `std::process::exit` does not
/// call destructors.
fn run_frontend() -> i32 {
    install_signal_handler();
    let mut app = clap::App::new("fitch")
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .after_help(
            "The derivation is checked line by line; failed lines are reported but do not
stop the batch. Input files may be compressed - supported file extensions are:
zst, gz, bz2, xz and lz4. Use \"-\" to read the derivation from standard input.",
        )
        .arg(Arg::with_name("DERIVATION").required(true).help(
            "derivation file, one inference per line: [assumptions] |- conclusion :RULE",
        ))
        .arg(
            Arg::with_name("FITCH")
                .short("f")
                .long("fitch")
                .help("Interpret the derivation as an indentation-nested Fitch proof."),
        )
        .arg(
            Arg::with_name("REPORT_FILE")
                .takes_value(true)
                .short("r")
                .long("report")
                .help("Write a TOML report with per-line verdicts to this file."),
        );
    if config::ENABLE_LOGGING {
        app = app.arg(
            Arg::with_name("v")
                .short("v")
                .multiple(true)
                .help("Verbose output. Print the accumulated sequent record after checking."),
        );
    }

    let flags = Flags::new(app.get_matches());
    let timer = Timer::name("total time");
    let stdin = std::io::stdin();
    let lines: Vec<String> =
        read_compressed_file_or_stdin(&flags.derivation_filename, stdin.lock()).collect();

    let (sequent_record, results) = if flags.fitch {
        let (fitch, results) = check_fitch_lines(&lines);
        let record = fitch
            .sequent_style(fitch.root())
            .expect("the root scope owns the sequent record");
        let rendered: Vec<String> = record.sequents().iter().map(ToString::to_string).collect();
        (rendered, results)
    } else {
        let (proof, results) = check_sequent_lines(&lines);
        let rendered: Vec<String> = proof.sequents().iter().map(ToString::to_string).collect();
        (rendered, results)
    };

    if results.is_empty() {
        warn!("the derivation contains no lines to check");
    }
    let mut accepted = 0;
    for verdict in &results {
        if verdict.valid {
            accepted += 1;
            comment!(
                "line {}: {}",
                verdict.line,
                verdict.sequent.as_deref().unwrap_or("")
            );
        } else {
            comment!(
                "line {}: REJECTED: {}",
                verdict.line,
                verdict.error.as_deref().unwrap_or("")
            );
        }
    }
    log!(flags, 1, "c sequent record:");
    for sequent in &sequent_record {
        log!(flags, 1, "c   {}", sequent);
    }

    let report = DerivationReport::from_results(results);
    let verified = report.valid && !report.results.is_empty();
    print_key_value("derivation lines", report.total_lines);
    print_key_value("accepted lines", accepted);
    print_key_value("recorded sequents", sequent_record.len());
    drop(timer);

    if let Some(filename) = &flags.report_filename {
        let rendered = toml::to_string(&report)
            .unwrap_or_else(|err| die!("failed to serialize the report: {}", err));
        let mut file = open_file_for_writing(filename);
        file.write_all(rendered.as_bytes())
            .unwrap_or_else(|err| die!("failed to write the report: {}", err));
    }

    print_solution(if verified { "VERIFIED" } else { "NOT VERIFIED" });
    if verified {
        0
    } else {
        1
    }
}

/// Parsed arguments. See `fitch --help`.
#[derive(Debug)]
pub struct Flags {
    pub fitch: bool,
    pub verbosity: u64,
    /// Input derivation
    pub derivation_filename: String,
    /// Present when we want to write a TOML report
    pub report_filename: Option<String>,
}

impl Flags {
    /// Create a flags instance from commandline arguments.
    pub fn new(matches: ArgMatches) -> Flags {
        Flags {
            fitch: matches.is_present("FITCH"),
            verbosity: matches.occurrences_of("v"),
            derivation_filename: matches.value_of("DERIVATION").unwrap().to_string(),
            report_filename: matches.value_of("REPORT_FILE").map(String::from),
        }
    }
}
