// src/main.rs

//! gatepass entry-point.
//!
//! 1. Parse the command line and load configuration
//! 2. Set up structured logging
//! 3. Run exactly one user action (scan, list, export, clear, generate)
//! 4. Report its outcome inline and exit
//!

// ───── std / 3rd-party imports ──────────────────────────────────────────────
use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use fern::Dispatch;
use log::LevelFilter;
use std::{
    path::{Path, PathBuf},
    process::{self, ExitCode},
    thread,
};

// ───── local imports ────────────────────────────────────────────────────────
use gatepass::clock::LocalClock;
use gatepass::config::{self, Config};
use gatepass::db::RecordStore;
use gatepass::export::{csv_data_uri, export_bytes, export_file};
use gatepass::policy::ReentryPolicy;
use gatepass::qr::{PngRenderer, generate};
use gatepass::scan::{ImageFileSource, QrDecoder, ScanOutcome, ScanPipeline};
use shared::Identity;

const CONFIG_FILE: &str = "gatepass.toml";

// ───── command line ─────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "gatepass", version, about = "QR entry desk: scan, record and print identity codes.")]
struct Cli {
    /// Configuration file (default: gatepass.toml next to the executable).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at DEBUG regardless of the configured level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Capture a frame from an image file and record the QR code it shows.
    Scan {
        /// Still image holding the code.
        image: PathBuf,
    },

    /// Print every stored entry.
    List {
        #[arg(long)]
        json: bool,
    },

    /// Export all entries as CSV.
    Export {
        /// Output file (default from `[export] file`).
        #[arg(long)]
        out: Option<PathBuf>,

        /// Print a base64 data URI instead of writing a file.
        #[arg(long)]
        data_uri: bool,
    },

    /// Delete every stored entry.
    Clear {
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },

    /// Generate a printable QR code for one identity.
    Generate {
        #[arg(long)]
        name: String,
        #[arg(long)]
        branch: String,
        #[arg(long)]
        roll_number: String,

        /// Output PNG (default from `[generator] output`).
        #[arg(long)]
        out: Option<PathBuf>,

        /// Print a base64 data URI instead of writing a file.
        #[arg(long)]
        data_uri: bool,
    },
}

// ───── helpers ──────────────────────────────────────────────────────────────

/// Print an error with context and terminate the process.
macro_rules! fatal {
    ($ctx:expr, $($arg:tt)+) => {{
        eprintln!(
            "[{}][ERROR][{}] {}",
            chrono::Local::now().to_rfc3339(),
            $ctx,
            format!($($arg)+)
        );
        std::process::exit(1);
    }};
}

/// Directory that contains the running executable, or the working directory
/// when that cannot be determined.
fn exe_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Explicit `--config` must exist; the default location is optional.
/// Relative paths in the config are resolved against the directory holding
/// it, which is returned alongside.
fn load_config(cli: &Cli) -> (Config, PathBuf) {
    match &cli.config {
        Some(path) => {
            let cfg = config::load(path).unwrap_or_else(|e| fatal!("config", "{}: {}", path.display(), e));
            let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
            (cfg.resolve_paths(&base), base)
        }
        None => {
            let dir = exe_dir();
            let cfg = config::load_or_default(&dir.join(CONFIG_FILE))
                .unwrap_or_else(|e| fatal!("config", "{}", e));
            (cfg.resolve_paths(&dir), dir)
        }
    }
}

/// Configure global logging as requested in `config.logging`. Logs go to
/// stderr; stdout carries command output.
fn setup_logging(config: &Config, verbose: bool) -> Result<(), fern::InitError> {
    let level = if verbose { LevelFilter::Debug } else { config.logging.level };

    let log_path = config.logging.file.as_deref().filter(|_| config.logging.enable);

    let mut dispatch = Dispatch::new()
        .format(|out, msg, record| {
            out.finish(format_args!(
                "[{}][{:5}][{}][pid={}][tid={:?}] {}",
                Local::now().to_rfc3339(),
                record.level(),
                record.target(),
                process::id(),
                thread::current().id(),
                msg
            ))
        })
        .level(level)
        .chain(std::io::stderr());

    if let Some(path) = log_path {
        dispatch = dispatch.chain(fern::log_file(path)?);
    }

    dispatch.apply()?;
    Ok(())
}

fn open_store(config: &Config) -> Result<RecordStore> {
    let path = &config.database.path;
    RecordStore::open(path, &config.database)
        .with_context(|| format!("opening record store {}", path.display()))
}

// ───── commands ─────────────────────────────────────────────────────────────

fn run(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Scan { image } => {
            let store = open_store(config)?;
            let policy = ReentryPolicy::new(config.policy.reentry_interval);
            let pipeline = ScanPipeline::new(&store, policy, QrDecoder, LocalClock);
            let outcome = pipeline
                .scan(ImageFileSource::new(&image))
                .with_context(|| format!("scanning {}", image.display()))?;
            match outcome {
                ScanOutcome::Stored { .. } => println!("{outcome}"),
                _ => eprintln!("{outcome}"),
            }
        }

        Commands::List { json } => {
            let entries = open_store(config)?.all_records()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                println!("Database Contents:");
                for e in &entries {
                    let id = &e.record.identity;
                    println!(
                        "({}, '{}', '{}', '{}', '{}')",
                        e.id,
                        id.name,
                        id.branch,
                        id.roll_number,
                        e.record.timestamp_text()
                    );
                }
            }
        }

        Commands::Export { out, data_uri } => {
            let store = open_store(config)?;
            if data_uri {
                println!("{}", csv_data_uri(&export_bytes(&store)?));
            } else {
                let path = out.unwrap_or_else(|| config.export.file.clone());
                let n = export_file(&store, &path)
                    .with_context(|| format!("exporting to {}", path.display()))?;
                println!("Exported {n} entries to {}", path.display());
            }
        }

        Commands::Clear { yes } => {
            if !yes {
                eprintln!("This deletes every stored entry and cannot be undone. Re-run with --yes to confirm.");
                return Ok(());
            }
            let removed = open_store(config)?.clear_all()?;
            println!("All data in the database has been deleted! ({removed} entries)");
        }

        Commands::Generate { name, branch, roll_number, out, data_uri } => {
            let identity = Identity::new(name, branch, roll_number).trimmed();
            let renderer = PngRenderer::from(&config.generator);
            let code = generate(&identity, &renderer)?;
            if data_uri {
                println!("{}", code.data_uri()?);
            } else {
                let path = out.unwrap_or_else(|| config.generator.output.clone());
                code.save_png(&path)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("QR Code for {} written to {}", identity.name, path.display());
            }
            println!("{}", code.caption);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // 1 ─ Context
    let (config, base_dir) = load_config(&cli);

    // 2 ─ Logging
    if let Err(e) = setup_logging(&config, cli.verbose) {
        fatal!("logging", "{}", e);
    }
    log::debug!("Using base directory {}", base_dir.display());

    // 3 ─ Action
    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
