// Command-line interface for bsdiffhs.
//
// Explicit subcommands (`diff`, `patch`, `info`) over the file-level
// helpers in `io`, with shared global flags for overwrite behavior and
// output verbosity.

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::compress::Params;
use crate::container;
use crate::io::{diff_file, patch_file, patch_file_in_place};

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// BSDIFFHS binary diff/patch tool.
#[derive(Parser, Debug)]
#[command(
    name = "bsdiffhs",
    version,
    about = "BSDIFFHS binary diff/patch tool",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Force overwrite existing output files.
    #[arg(short = 'f', long, global = true)]
    force: bool,

    /// Quiet mode (suppress non-error output).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Output stats as JSON to stderr.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Compute a patch that transforms SOURCE into TARGET.
    Diff(DiffArgs),
    /// Apply a patch to SOURCE, reconstructing the target.
    Patch(PatchArgs),
    /// Print the header and segment structure of a patch file.
    Info(InfoArgs),
}

#[derive(Args, Debug, Clone, Copy)]
struct CodecArgs {
    /// LZSS window size, as a power of two (4-15).
    #[arg(long = "window-bits", short = 'w', value_parser = clap::value_parser!(u8).range(4..=15), default_value_t = Params::DEFAULT_WINDOW_SZ2)]
    window_bits: u8,

    /// LZSS lookahead size, as a power of two (3 to window-bits - 1).
    #[arg(long = "lookahead-bits", short = 'l', value_parser = clap::value_parser!(u8).range(3..=14), default_value_t = Params::DEFAULT_LOOKAHEAD_SZ2)]
    lookahead_bits: u8,
}

impl CodecArgs {
    fn params(self) -> Result<Params, String> {
        Params::new(self.window_bits, self.lookahead_bits).map_err(|e| e.to_string())
    }
}

#[derive(Args, Debug)]
struct DiffArgs {
    /// Source file.
    #[arg(value_hint = ValueHint::FilePath)]
    source: PathBuf,

    /// Target file to diff against.
    #[arg(value_hint = ValueHint::FilePath)]
    target: PathBuf,

    /// Output patch file.
    #[arg(value_hint = ValueHint::FilePath)]
    patch: PathBuf,

    #[command(flatten)]
    codec: CodecArgs,
}

#[derive(Args, Debug)]
struct PatchArgs {
    /// Source file.
    #[arg(value_hint = ValueHint::FilePath)]
    source: PathBuf,

    /// Patch file to apply.
    #[arg(value_hint = ValueHint::FilePath)]
    patch: PathBuf,

    /// Output file. Omit with --in-place to rewrite SOURCE.
    #[arg(value_hint = ValueHint::FilePath, required_unless_present = "in_place")]
    output: Option<PathBuf>,

    /// Rewrite SOURCE with the reconstructed target.
    #[arg(long = "in-place", conflicts_with = "output")]
    in_place: bool,

    #[command(flatten)]
    codec: CodecArgs,
}

#[derive(Args, Debug)]
struct InfoArgs {
    /// Patch file to inspect.
    #[arg(value_hint = ValueHint::FilePath)]
    patch: PathBuf,

    #[command(flatten)]
    codec: CodecArgs,
}

// ---------------------------------------------------------------------------
// Diff command
// ---------------------------------------------------------------------------

fn cmd_diff(cli: &Cli, args: &DiffArgs) -> i32 {
    let params = match args.codec.params() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("bsdiffhs: {e}");
            return 1;
        }
    };

    if args.patch.exists() && !cli.force {
        eprintln!(
            "bsdiffhs: output file exists, use -f to overwrite: {}",
            args.patch.display()
        );
        return 1;
    }

    let stats = match diff_file(&args.source, &args.target, &args.patch, params) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("bsdiffhs: diff: {e}");
            return 1;
        }
    };

    if cli.verbose > 0 && !cli.quiet {
        eprintln!(
            "bsdiffhs: diff: source {} B, target {} B, patch {} B, {} tuples",
            stats.source_size, stats.target_size, stats.patch_size, stats.tuples
        );
    }

    if cli.json_output {
        let json = serde_json::json!({
            "command": "diff",
            "source_size": stats.source_size,
            "target_size": stats.target_size,
            "patch_size": stats.patch_size,
            "tuples": stats.tuples,
            "window_bits": args.codec.window_bits,
            "lookahead_bits": args.codec.lookahead_bits,
        });
        eprintln!("{}", serde_json::to_string_pretty(&json).unwrap());
    }

    0
}

// ---------------------------------------------------------------------------
// Patch command
// ---------------------------------------------------------------------------

fn cmd_patch(cli: &Cli, args: &PatchArgs) -> i32 {
    let params = match args.codec.params() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("bsdiffhs: {e}");
            return 1;
        }
    };

    let result = if args.in_place {
        patch_file_in_place(&args.source, &args.patch, params)
    } else {
        let output = args.output.as_ref().unwrap();
        if output.exists() && !cli.force {
            eprintln!(
                "bsdiffhs: output file exists, use -f to overwrite: {}",
                output.display()
            );
            return 1;
        }
        patch_file(&args.source, &args.patch, output, params)
    };

    let stats = match result {
        Ok(s) => s,
        Err(e) => {
            eprintln!("bsdiffhs: patch: {e}");
            return 1;
        }
    };

    if cli.verbose > 0 && !cli.quiet {
        eprintln!(
            "bsdiffhs: patch: source {} B, patch {} B, output {} B, {} tuples",
            stats.source_size, stats.patch_size, stats.output_size, stats.tuples
        );
    }

    if cli.json_output {
        let json = serde_json::json!({
            "command": "patch",
            "source_size": stats.source_size,
            "patch_size": stats.patch_size,
            "output_size": stats.output_size,
            "tuples": stats.tuples,
            "in_place": args.in_place,
        });
        eprintln!("{}", serde_json::to_string_pretty(&json).unwrap());
    }

    0
}

// ---------------------------------------------------------------------------
// Info command
// ---------------------------------------------------------------------------

fn cmd_info(cli: &Cli, args: &InfoArgs) -> i32 {
    let params = match args.codec.params() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("bsdiffhs: {e}");
            return 1;
        }
    };

    let stream = match std::fs::read(&args.patch) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("bsdiffhs: {}: {e}", args.patch.display());
            return 1;
        }
    };

    let plan = match container::read_patch(&stream, params) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("bsdiffhs: invalid patch: {e}");
            return 1;
        }
    };

    if cli.json_output {
        let tuples: Vec<_> = plan
            .tuples
            .iter()
            .map(|t| {
                serde_json::json!({
                    "diff_len": t.diff_len,
                    "extra_len": t.extra_len,
                    "seek": t.seek,
                })
            })
            .collect();
        let json = serde_json::json!({
            "command": "info",
            "patch_size": stream.len() as u64,
            "destination_length": plan.dst_len,
            "tuples": tuples,
        });
        eprintln!("{}", serde_json::to_string_pretty(&json).unwrap());
        return 0;
    }

    println!("BSDIFFHS patch size:     {}", stream.len());
    println!("BSDIFFHS destination:    {} bytes", plan.dst_len);
    println!("BSDIFFHS control tuples: {}", plan.tuples.len());
    println!("BSDIFFHS diff stream:    {} bytes", plan.diff.len());
    println!("BSDIFFHS extra stream:   {} bytes", plan.extra.len());

    if cli.verbose > 0 {
        println!("  Tuple DiffLen ExtraLen    Seek");
        for (n, t) in plan.tuples.iter().enumerate() {
            println!("  {n:5} {:7} {:8} {:7}", t.diff_len, t.extra_len, t.seek);
        }
    }

    0
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let cli = Cli::parse();

    let exit_code = match &cli.command {
        Cmd::Diff(args) => cmd_diff(&cli, args),
        Cmd::Patch(args) => cmd_patch(&cli, args),
        Cmd::Info(args) => cmd_info(&cli, args),
    };

    process::exit(exit_code);
}

#[cfg(any(test, feature = "fuzzing"))]
pub fn fuzz_try_parse_args(args: &[String]) {
    let argv: Vec<String> = std::iter::once("bsdiffhs".to_string())
        .chain(args.iter().cloned())
        .collect();
    let _ = Cli::try_parse_from(argv);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
