//! tcp - Tree Copy
//!
//! Recursive directory copy command powered by treecopy. The source may be a
//! plain directory or a directory inside a zip archive.

use clap::{Parser, ValueEnum};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;
use treecopy::{CopyOptions, CopySession, CopyStats, DiagnosticSink, Error as TreecopyError};

/// Every entry copied, no diagnostics.
const EXIT_OK: i32 = 0;
/// The copy ran but at least one diagnostic was reported.
const EXIT_DIAGNOSTICS: i32 = 1;
/// The session could not be opened; nothing was copied.
const EXIT_NOT_STARTED: i32 = 2;

const SCHEMA_VERSION: &str = "1.0";

/// tcp - Recursive tree copy
///
/// Copy a directory tree onto the local filesystem, keeping modification times.
/// Existing directories are merged into, existing files are overwritten.
///
/// Usage:
///   tcp SOURCE TARGET
///   tcp ARCHIVE.zip!/PATH TARGET
#[derive(Parser, Debug)]
#[command(name = "tcp", version, about, long_about = None)]
struct Args {
    /// Source directory, or `<archive>!<path inside archive>`
    ///
    /// The archive may also be given as a `jar:file://` or `zip:file://` URI.
    /// An empty path after `!` copies the whole archive.
    source: String,

    /// Target directory (created if missing)
    target: PathBuf,

    /// Do not preserve modification times
    #[arg(long)]
    no_preserve: bool,

    /// Do not call fsync after each file (faster but less safe)
    #[arg(long)]
    no_sync: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    output: OutputMode,

    /// Do not print the summary
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Verbose output, including debug logs on stderr
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
    Jsonl,
}

impl OutputMode {
    fn as_str(self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::Json => "json",
            Self::Jsonl => "jsonl",
        }
    }
}

type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
enum CliError {
    #[error("Failed to install logger: {message}")]
    Logging { message: String },

    #[error("Failed to serialize JSON output: {source}")]
    JsonSerialize { source: serde_json::Error },
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            Self::Logging { .. } => EXIT_NOT_STARTED,
            Self::JsonSerialize { .. } => EXIT_DIAGNOSTICS,
        }
    }
}

#[derive(Debug, Clone)]
struct EffectiveConfig {
    preserve_attributes: bool,
    fsync: bool,
    output_mode: OutputMode,
}

impl EffectiveConfig {
    fn to_json_value(&self) -> Value {
        json!({
            "preserve_attributes": self.preserve_attributes,
            "fsync": self.fsync,
            "output_mode": self.output_mode.as_str(),
        })
    }

    fn print_human_stderr(&self) {
        eprintln!("Effective configuration:");
        eprintln!("  preserve_attributes: {}", self.preserve_attributes);
        eprintln!("  fsync: {}", self.fsync);
        eprintln!("  output_mode: {}", self.output_mode.as_str());
    }
}

/// How the session ended, as far as the exit status is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Complete,
    Partial,
    NotStarted,
}

impl Outcome {
    fn as_str(self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Partial => "partial",
            Self::NotStarted => "not_started",
        }
    }

    fn exit_code(self) -> i32 {
        match self {
            Self::Complete => EXIT_OK,
            Self::Partial => EXIT_DIAGNOSTICS,
            Self::NotStarted => EXIT_NOT_STARTED,
        }
    }
}

/// Routes diagnostics according to the output mode.
///
/// Human mode prints each one on stderr as it happens, jsonl streams one
/// record per diagnostic on stdout, json keeps them for the final object.
struct CliSink {
    mode: OutputMode,
    collected: Vec<Value>,
    reported: u64,
    /// A reported error stopped the session before anything was copied
    fatal: bool,
}

impl CliSink {
    fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            collected: Vec::new(),
            reported: 0,
            fatal: false,
        }
    }
}

impl DiagnosticSink for CliSink {
    fn report(&mut self, error: TreecopyError) {
        self.reported += 1;
        self.fatal |= error.is_fatal();
        match self.mode {
            OutputMode::Human => eprintln!("error[{}]: {}", error.code(), error),
            OutputMode::Json => self.collected.push(diagnostic_json(&error)),
            OutputMode::Jsonl => println!("{}", diagnostic_record(&error)),
        }
    }
}

fn diagnostic_json(error: &TreecopyError) -> Value {
    json!({
        "code": error.code(),
        "message": error.to_string(),
    })
}

fn diagnostic_record(error: &TreecopyError) -> Value {
    json!({
        "schema_version": SCHEMA_VERSION,
        "record_type": "diagnostic",
        "code": error.code(),
        "message": error.to_string(),
    })
}

fn main() {
    match run() {
        Ok(outcome) => std::process::exit(outcome.exit_code()),
        Err(error) => {
            eprintln!("error: {error}");
            std::process::exit(error.exit_code());
        }
    }
}

fn run() -> CliResult<Outcome> {
    let args = Args::parse();

    if args.verbose {
        init_logging()?;
    }

    let (options, config) = build_options_and_effective_config(&args);
    if args.verbose && args.output == OutputMode::Human {
        config.print_human_stderr();
    }

    let mut sink = CliSink::new(args.output);
    let stats = match CopySession::open(&args.source, &args.target, options) {
        Ok(mut session) => {
            let stats = match session.run(&mut sink) {
                Ok(stats) => stats,
                Err(error) => {
                    sink.report(error);
                    CopyStats::default()
                }
            };
            if let Err(error) = session.close() {
                sink.report(error);
            }
            stats
        }
        Err(error) => {
            sink.report(error);
            CopyStats::default()
        }
    };

    let outcome = if sink.fatal {
        Outcome::NotStarted
    } else if sink.reported == 0 {
        Outcome::Complete
    } else {
        Outcome::Partial
    };

    match args.output {
        OutputMode::Human => {
            if outcome != Outcome::NotStarted && !args.quiet {
                print_stats(&stats, sink.reported, args.verbose);
            }
        }
        OutputMode::Json => {
            let value = json!({
                "schema_version": SCHEMA_VERSION,
                "source": args.source,
                "target": display_path(&args.target),
                "status": outcome.as_str(),
                "config": config.to_json_value(),
                "stats": stats_json(&stats, sink.reported),
                "diagnostics": sink.collected,
            });
            print_json_value(&value)?;
        }
        OutputMode::Jsonl => {
            if !args.quiet {
                let record = json!({
                    "schema_version": SCHEMA_VERSION,
                    "record_type": "summary",
                    "source": args.source,
                    "target": display_path(&args.target),
                    "status": outcome.as_str(),
                    "stats": stats_json(&stats, sink.reported),
                });
                print_json_value(&record)?;
            }
        }
    }

    Ok(outcome)
}

fn init_logging() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(LevelFilter::DEBUG)
        .with_target(false)
        .try_init()
        .map_err(|error| CliError::Logging {
            message: error.to_string(),
        })
}

fn build_options_and_effective_config(args: &Args) -> (CopyOptions, EffectiveConfig) {
    let mut options = CopyOptions::default().with_preserve_attributes(!args.no_preserve);
    if args.no_sync {
        options = options.without_fsync();
    }

    let config = EffectiveConfig {
        preserve_attributes: options.preserve_attributes,
        fsync: options.fsync,
        output_mode: args.output,
    };

    (options, config)
}

fn stats_json(stats: &CopyStats, diagnostics: u64) -> Value {
    json!({
        "files_copied": stats.files_copied,
        "bytes_copied": stats.bytes_copied,
        "dirs_created": stats.dirs_created,
        "dirs_existing": stats.dirs_existing,
        "errors": diagnostics,
        "duration_ms": u64::try_from(stats.duration.as_millis()).unwrap_or(u64::MAX),
    })
}

fn print_stats(stats: &CopyStats, diagnostics: u64, verbose: bool) {
    if stats.files_copied == 0 && stats.dirs_created == 0 && stats.dirs_existing == 0 {
        if diagnostics > 0 {
            println!("Nothing copied ({diagnostics} errors)");
        } else {
            println!("Nothing to copy");
        }
        return;
    }

    let bytes_str = format_bytes(stats.bytes_copied);

    if verbose {
        println!("Copy completed in {:?}", stats.duration);
        println!("  Files copied:   {}", stats.files_copied);
        println!("  Dirs created:   {}", stats.dirs_created);
        println!("  Dirs existing:  {}", stats.dirs_existing);
        println!("  Errors:         {}", diagnostics);
        println!("  Total size:     {}", bytes_str);

        if stats.duration.as_secs_f64() > 0.0 {
            let speed = stats.bytes_copied as f64 / stats.duration.as_secs_f64();
            println!("  Speed:          {}/s", format_bytes(speed as u64));
        }
    } else {
        let mut parts = vec![format!("{} files", stats.files_copied)];
        if stats.dirs_created > 0 {
            parts.push(format!("{} dirs", stats.dirs_created));
        }

        if diagnostics > 0 {
            println!(
                "Copied {} ({}) with {} errors",
                parts.join(", "),
                bytes_str,
                diagnostics
            );
        } else {
            println!("Copied {} ({})", parts.join(", "), bytes_str);
        }
    }
}

fn print_json_value(value: &Value) -> CliResult<()> {
    let serialized =
        serde_json::to_string(value).map_err(|source| CliError::JsonSerialize { source })?;
    println!("{serialized}");
    Ok(())
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}

fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.2} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
