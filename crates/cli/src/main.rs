use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use systract::commands::{list_syscalls_command, run_extract_command, ExtractOptions};
use systract_core::analysis::CancellationToken;

/// Static system call extraction for statically linked Go executables.
///
/// This CLI is a thin wrapper around `systract-core` (exposed in code as `systract_core`).
#[derive(Parser, Debug)]
#[command(
    name = "systract",
    version,
    about = "List the system calls a Go executable may invoke",
    long_about = None
)]
struct Cli {
    /// Log analysis progress at debug level on stderr (`RUST_LOG` overrides).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract the system calls reachable from the program entry points.
    ///
    /// By default PATH is an executable disassembled with `go tool objdump`;
    /// `--dumpfile` reads an existing listing instead.
    Extract {
        /// Executable (or dump file with `--dumpfile`) to analyze.
        path: PathBuf,

        /// Handle a dump file instead of a Go executable.
        #[arg(long, short = 'd', default_value_t = false)]
        dumpfile: bool,

        /// Per-result output template, e.g. "{id} - {name}\n".
        #[arg(long, conflicts_with = "json")]
        template: Option<String>,

        /// Emit a JSON report instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Engine config file (YAML, or JSON with a `.json` extension).
        #[arg(long)]
        config: Option<PathBuf>,

        /// Worker threads for the call graph walk. Defaults to one per CPU.
        #[arg(long)]
        jobs: Option<usize>,

        /// Entry point symbol; repeat to seed several. Replaces the configured list.
        #[arg(long = "entry-point")]
        entry_points: Vec<String>,

        /// Path to the `go` toolchain binary (falls back to `GO_BIN`, then `go`).
        #[arg(long = "go")]
        go_path: Option<PathBuf>,
    },

    /// List the system call table used to label results.
    Syscalls {
        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let json_output = match &cli.command {
        Command::Extract { json, .. } | Command::Syscalls { json } => *json,
    };
    // Keep stderr quiet for --json consumers; --verbose enables debug; RUST_LOG overrides.
    if !json_output {
        let level = if cli.verbose { log::LevelFilter::Debug } else { log::LevelFilter::Warn };
        env_logger::Builder::new()
            .filter_module("systract_core", level)
            .filter_module("systract", level)
            .parse_default_env()
            .target(env_logger::Target::Stderr)
            .format_timestamp(None)
            .format_target(false)
            .init();
    }

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    ctrlc::set_handler(move || {
        eprintln!("\nCancelling...");
        on_interrupt.cancel();
    })
    .context("Failed to set Ctrl+C handler")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Extract {
            path,
            dumpfile,
            template,
            json,
            config,
            jobs,
            entry_points,
            go_path,
        } => {
            let opts = ExtractOptions {
                path,
                dumpfile,
                template,
                json,
                config,
                jobs,
                entry_points,
                go_path,
            };
            run_extract_command(&opts, cancel, &mut out)?
        }
        Command::Syscalls { json } => list_syscalls_command(json, &mut out)?,
    }

    out.flush()?;
    Ok(())
}
