//! # cpuid-report
//!
//! Prints one `<name> enabled` / `<name> disabled` line per feature on
//! stderr.
//!
//! ```text
//! cpuid-report                 default list
//! cpuid-report avx2 sha ...    the named features (at most 32)
//! cpuid-report --all           every feature in the table
//! cpuid-report --flags         the fixed-identifier features
//! ```

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use cpuid_probe::{features, query_by_flags, query_by_names, FeatureFlags, FeatureId, MAX_NAMES};
use env_logger::Env;

/// Environment variable selecting the log level (`off` when unset)
const LOG_ENV: &str = "CPUID_REPORT_LOG";

/// Features reported when no arguments are given
const DEFAULT_NAMES: &[&str] = &[
    "sse3",
    "ssse3",
    "sse4.1",
    "sse4.2",
    "avx",
    "avx2",
    "avx512f",
    "aes",
    "pclmulqdq",
    "sha",
];

#[derive(Parser, Debug)]
#[command(version, about = "Reports x86 instruction-set extensions supported by this processor", long_about = None)]
struct Args {
    /// Report every feature in the table
    #[arg(long, conflicts_with_all = ["flags", "names"])]
    all: bool,

    /// Report the fixed-identifier features
    #[arg(long, conflicts_with = "names")]
    flags: bool,

    /// Feature names to report (at most 32)
    names: Vec<String>,
}

/// What to report
#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Names(Vec<String>),
    All,
    Flags,
}

impl From<Args> for Mode {
    fn from(args: Args) -> Self {
        if args.all {
            Mode::All
        } else if args.flags {
            Mode::Flags
        } else if args.names.is_empty() {
            Mode::Names(DEFAULT_NAMES.iter().map(|name| (*name).to_owned()).collect())
        } else {
            Mode::Names(args.names)
        }
    }
}

/// `(name, present)` pairs in report order
fn collect(mode: &Mode) -> Result<Vec<(String, bool)>, cpuid_probe::Error> {
    match mode {
        Mode::Names(names) => {
            let bits = query_by_names(names)?;
            Ok(pair_bits(names.iter().map(String::as_str), bits))
        },
        Mode::All => {
            let names: Vec<&str> = features().iter().map(|desc| desc.name).collect();
            let mut lines = Vec::with_capacity(names.len());
            for chunk in names.chunks(MAX_NAMES) {
                let bits = query_by_names(chunk)?;
                lines.extend(pair_bits(chunk.iter().copied(), bits));
            }
            Ok(lines)
        },
        Mode::Flags => {
            let found = query_by_flags(FeatureFlags::all());
            Ok(FeatureId::ALL
                .iter()
                .map(|id| (id.name().to_owned(), found.contains(id.flag())))
                .collect())
        },
    }
}

fn pair_bits<'a>(names: impl Iterator<Item = &'a str>, bits: u32) -> Vec<(String, bool)> {
    names
        .enumerate()
        .map(|(n, name)| (name.to_owned(), bits & (1 << n) != 0))
        .collect()
}

fn format_line(name: &str, present: bool) -> String {
    format!("{} {}", name, if present { "enabled" } else { "disabled" })
}

/// Logger reading its filter from `var`, silent when the variable is unset
fn log_builder(var: &str) -> env_logger::Builder {
    env_logger::Builder::from_env(Env::default().filter_or(var, "off"))
}

fn main() -> ExitCode {
    log_builder(LOG_ENV).init();

    let mode = Mode::from(Args::parse());
    log::debug!("mode: {:?}", mode);

    let lines = match collect(&mode) {
        Ok(lines) => lines,
        Err(err) => {
            eprintln!("cpuid-report: {err}");
            return ExitCode::from(2);
        },
    };

    let mut err = std::io::stderr().lock();
    for (name, present) in &lines {
        let _ = writeln!(err, "{}", format_line(name, *present));
    }

    ExitCode::SUCCESS
}
