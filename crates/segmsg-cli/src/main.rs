/// segmsg command-line tool: inspect segmented message files and resolve
/// individual pointer words.
///
/// # Command overview
///
/// ```text
/// segmsg <COMMAND> [OPTIONS]
///
/// Commands:
///   inspect    Print the segment table and an annotated word dump
///   pointer    Resolve one pointer word and print its target
///   help       Print help information
///
/// Global options:
///   --single             Treat the file as one unframed segment
///   --strict             Disable defaults for fields past a struct's declared size
///   --max-far-hops <N>   Far pointers followed per resolution (default 4)
///   -v, --verbose        Log reader events at debug level
///   -h, --help           Print help
///   -V, --version        Print version
/// ```
///
/// # Exit codes
///
/// | Code | Meaning                                  |
/// |------|------------------------------------------|
/// | 0    | Success                                  |
/// | 1    | Error (I/O failure, malformed message)   |
///
/// All error details are written to stderr so stdout can be piped cleanly.
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd_inspect;
mod cmd_pointer;
mod source;

// ── CLI root ──────────────────────────────────────────────────────────────────

/// Inspect and debug segmented message files.
#[derive(Parser)]
#[command(name = "segmsg", version, about = "Segmented message reader CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalArgs,
}

/// Options shared by every sub-command; they decide how the file is
/// framed and how the message reader is configured.
///
/// ```text
/// ┌──────────────────┬──────────────────────────────────────────────────┐
/// │ Flag             │ Effect                                           │
/// ├──────────────────┼──────────────────────────────────────────────────┤
/// │ --single         │ No segment table: the whole file is segment 0    │
/// │ --strict         │ ReaderOptions::defaults_past_end = false         │
/// │ --max-far-hops N │ ReaderOptions::max_far_hops = N                  │
/// │ -v / --verbose   │ debug-level tracing on stderr                    │
/// └──────────────────┴──────────────────────────────────────────────────┘
/// ```
#[derive(clap::Args)]
pub struct GlobalArgs {
    /// Treat the file as a single unframed segment.
    #[arg(long, global = true)]
    pub single: bool,

    /// Disable default values for fields past a struct's declared size.
    #[arg(long, global = true)]
    pub strict: bool,

    /// Maximum far-pointer hops followed while resolving one pointer.
    #[arg(long, global = true)]
    pub max_far_hops: Option<u8>,

    /// Log reader events at debug level.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ── Sub-commands ──────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum Commands {
    /// Print the segment table and an annotated word dump of each segment.
    Inspect(InspectArgs),
    /// Resolve the pointer word at a segment and offset.
    Pointer(PointerArgs),
}

// ── Argument structs ──────────────────────────────────────────────────────────

/// Arguments for `segmsg inspect`.
///
/// Every 8-byte word is printed in hex next to its decoding as a pointer
/// word, which makes struct, list, and far pointers easy to spot by eye.
#[derive(clap::Args)]
pub struct InspectArgs {
    /// Path to the message file.
    pub file: PathBuf,

    /// Inspect only the segment at this index.
    #[arg(long)]
    pub segment: Option<u32>,
}

/// Arguments for `segmsg pointer`.
#[derive(clap::Args)]
pub struct PointerArgs {
    /// Path to the message file.
    pub file: PathBuf,

    /// Segment holding the pointer word.
    #[arg(long, default_value_t = 0)]
    pub segment: u32,

    /// Byte offset of the pointer word within the segment.
    #[arg(long, default_value_t = 0)]
    pub offset: usize,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    let result = match cli.command {
        Commands::Inspect(args) => cmd_inspect::run(&args, &cli.global),
        Commands::Pointer(args) => cmd_pointer::run(&args, &cli.global),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

/// Log to stderr, honouring `RUST_LOG` when set.
fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
