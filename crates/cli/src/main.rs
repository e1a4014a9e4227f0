//! Cache simulator CLI.
//!
//! This binary replays a valgrind memory trace through a simulated cache. It performs:
//! 1. **Configuration:** Builds the cache organization from `-s`, `-E` and `-b`.
//! 2. **Replay:** Streams the trace named by `-t`, optionally echoing every record with
//!    its outcomes (`-v`).
//! 3. **Reporting:** Prints `hits:<h> misses:<m> evictions:<e>`, or a JSON report with `--json`.
//!    `--stats` adds a breakdown with hit and miss rates on stderr.
//!
//! Log output goes to stderr and is controlled by `RUST_LOG` (default `warn`).

use std::error::Error;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use csim_core::sim::open_trace;
use csim_core::{CacheConfig, CacheStats, Replayer};

#[derive(Parser, Debug)]
#[allow(clippy::struct_excessive_bools)]
#[command(
    name = "csim",
    author,
    version,
    about = "Trace-driven set-associative cache simulator",
    override_usage = "csim [-hv] -s <s> -E <E> -b <b> -t <tracefile>",
    long_about = "Replays a valgrind memory trace against a cache of 2^s sets, E lines per set \
                  and 2^b-byte blocks, with LRU replacement, and reports hits, misses and \
                  evictions.\n\nExamples:\n  csim -s 4 -E 1 -b 4 -t traces/yi.trace\n  csim -v -s 8 -E 2 -b 4 -t traces/trans.trace"
)]
struct Cli {
    /// Optional verbose flag that displays trace info
    #[arg(short, long)]
    verbose: bool,

    /// Number of set index bits (S = 2^s is the number of sets)
    #[arg(short = 's', value_name = "s")]
    set_bits: u32,

    /// Associativity (number of lines per set)
    #[arg(short = 'E', value_name = "E")]
    ways: usize,

    /// Number of block bits (B = 2^b is the block size)
    #[arg(short = 'b', value_name = "b")]
    block_bits: u32,

    /// Name of the valgrind trace to replay
    #[arg(short = 't', value_name = "tracefile")]
    trace: PathBuf,

    /// Print the final state of every cache line after the replay
    #[arg(long)]
    dump: bool,

    /// Print the configuration and counters as JSON instead of the summary line
    #[arg(long)]
    json: bool,

    /// Print a breakdown of the counters and hit/miss rates to stderr
    #[arg(long)]
    stats: bool,
}

/// JSON report emitted with `--json`.
#[derive(Serialize, Debug)]
struct Report<'a> {
    config: &'a CacheConfig,
    stats: &'a CacheStats,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version go to stdout and are not failures.
            let code = if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
            let _ = err.print();
            return code;
        }
    };

    init_tracing();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("csim: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Installs a stderr fmt subscriber filtered by `RUST_LOG`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr)
        .init();
}

/// Builds the cache, replays the trace and prints the report.
///
/// A malformed trace record ends the replay early; the counters gathered up
/// to that record are still reported and the run is not treated as failed.
/// The replayer logs the offending record as a warning, so nothing more is
/// printed for it here.
fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let config = CacheConfig::new(cli.set_bits, cli.ways, cli.block_bits);
    let mut replayer = Replayer::new(&config)?;
    let events = open_trace(&cli.trace)?;
    tracing::info!(trace = %cli.trace.display(), ?config, "replaying trace");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let verbose = cli.verbose;
    let mut echo_error = None;
    let replayed = replayer.run_with(events, |event, outcome| {
        if verbose && !outcome.is_skipped() && echo_error.is_none() {
            if let Err(e) = writeln!(out, "{event} {outcome}") {
                echo_error = Some(e);
            }
        }
    });
    if let Some(e) = echo_error {
        return Err(e.into());
    }
    // A bad record is already reported on stderr by the replayer's warning.
    let truncated = replayed.is_err();

    if cli.dump {
        replayer.cache().dump(&mut out)?;
    }

    let stats = replayer.stats();
    if cli.json {
        let report = Report {
            config: &config,
            stats,
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        writeln!(out, "{stats}")?;
    }
    out.flush()?;

    if cli.stats {
        stats.write_breakdown(&mut io::stderr().lock())?;
    }
    tracing::debug!(truncated, "report written");
    Ok(())
}
