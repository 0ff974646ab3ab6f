//! # CLI Module
//!
//! Command-line interface for the photo dumper.
//!
//! ## Usage
//! ```bash
//! # Copy new photos from a camera card into the library
//! photo-dumper dump /media/card/DCIM ~/Pictures/Library
//!
//! # See what would happen without writing anything
//! photo-dumper dump /media/card/DCIM ~/Pictures/Library --dry-run
//!
//! # List photos hidden away in dot-folders of the library
//! photo-dumper hidden ~/Pictures/Library
//! ```

use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use photo_dumper::core::hidden::find_hidden_photos;
use photo_dumper::core::pipeline::{CopyPipeline, RunReport};
use photo_dumper::error::Result;
use photo_dumper::events::{DirectoryEvent, Event, EventChannel, FileOutcome};
use std::path::{Path, PathBuf};
use std::thread;

const TOOL_NAME: &str = "Photo Dumper";

/// Photo Dumper - sort photos into a dated library without losing a byte
#[derive(Parser, Debug)]
#[command(name = "photo-dumper")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Copy photos into a year/month structured target directory
    Dump {
        /// Directory to read photos from
        source: PathBuf,

        /// Directory to copy photos into
        target: PathBuf,

        /// Decide and report everything, write nothing
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Directory for the run's log file
        #[arg(long, default_value = ".")]
        log_dir: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Hide the progress bar
        #[arg(short, long)]
        quiet: bool,
    },
    /// List photos stored inside hidden folders
    Hidden {
        /// Photo library to inspect
        path: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Dump {
            source,
            target,
            dry_run,
            log_dir,
            output,
            quiet,
        } => run_dump(source, target, dry_run, &log_dir, output, quiet),
        Commands::Hidden { path } => run_hidden(&path),
    }
}

fn log_file_path(log_dir: &Path) -> PathBuf {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    log_dir.join(format!("photo_dumper_{}.log", timestamp))
}

fn run_dump(
    source: PathBuf,
    target: PathBuf,
    dry_run: bool,
    log_dir: &Path,
    output: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let term = Term::stderr();

    let log_path = log_file_path(log_dir);
    photo_dumper::init_tracing(Some(log_path.as_path()))?;
    tracing::info!("{} v.{}", TOOL_NAME, env!("CARGO_PKG_VERSION"));

    let pretty = matches!(output, OutputFormat::Pretty);
    if pretty {
        term.write_line(&format!(
            "{} {}",
            style(TOOL_NAME).bold().cyan(),
            style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        if dry_run {
            term.write_line(&format!(
                "{}",
                style("Dry run: nothing will be written to the target.").yellow()
            ))
            .ok();
        }
        term.write_line("").ok();
    }

    let pipeline = CopyPipeline::builder()
        .source(source)
        .target(target)
        .dry_run(dry_run)
        .build();

    let (sender, receiver) = EventChannel::new();

    let progress = if pretty && !quiet {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("█▓░"),
        );
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();

    // Handle events in a separate thread
    let event_thread = thread::spawn(move || {
        let mut conflicts = Vec::new();
        for event in receiver.iter() {
            match event {
                Event::Directory(DirectoryEvent::Started { total_files, .. }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.set_length(total_files as u64);
                        pb.set_position(0);
                    }
                }
                Event::Progress(p) => {
                    if let Some(ref pb) = progress_clone {
                        pb.set_position(p.processed as u64);
                        pb.set_message(format!(
                            "{} ({} skipped)",
                            p.directory.display(),
                            p.skipped
                        ));
                    }
                }
                Event::File(f) if f.outcome == FileOutcome::Conflict => {
                    conflicts.push(f.source);
                }
                _ => {}
            }
        }
        if let Some(ref pb) = progress_clone {
            pb.finish_and_clear();
        }
        conflicts
    });

    let result = pipeline.run_with_events(&sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    let conflicts = event_thread.join().unwrap_or_default();

    let report = result?;

    match output {
        OutputFormat::Pretty => print_pretty_results(&term, &report, &conflicts, &log_path),
        OutputFormat::Json => print_json_results(&report),
    }

    Ok(())
}

fn run_hidden(path: &Path) -> Result<()> {
    photo_dumper::init_tracing(None)?;
    let photos = find_hidden_photos(path)?;
    for photo in &photos {
        println!("{}", photo.display());
    }
    Ok(())
}

fn print_pretty_results(term: &Term, report: &RunReport, conflicts: &[PathBuf], log_path: &Path) {
    let totals = &report.totals;

    term.write_line(&format!(
        "{} {}",
        style("✓").green().bold(),
        if report.dry_run { "Dry Run Complete" } else { "Dump Complete" }
    ))
    .ok();
    term.write_line("").ok();

    let rows = [
        ("copied", totals.copied),
        ("duplicates", totals.duplicates),
        ("conflicts", totals.conflicts),
        ("errors", totals.errors),
        ("unsupported", totals.unsupported),
        ("total", totals.total),
    ];
    for (label, value) in rows {
        term.write_line(&format!("  {:>12} {}", style(label).dim(), style(value).cyan()))
            .ok();
    }

    term.write_line(&format!(
        "  {} directories in {:.1}s, {} hidden folders skipped",
        report.directories.len(),
        report.duration_ms as f64 / 1000.0,
        report.hidden_directories.len()
    ))
    .ok();

    if !conflicts.is_empty() {
        term.write_line("").ok();
        term.write_line(&format!(
            "{}",
            style("Conflicts (same name, different content):").yellow().bold()
        ))
        .ok();
        for path in conflicts {
            term.write_line(&format!("    {} {}", style("!").yellow(), path.display()))
                .ok();
        }
    }

    for error in &report.errors {
        term.write_line(&format!("  {} {}", style("✗").red(), error)).ok();
    }

    term.write_line("").ok();
    term.write_line(&format!(
        "{}",
        style(format!("Log written to {}", log_path.display())).dim()
    ))
    .ok();
}

fn print_json_results(report: &RunReport) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{}", json),
        Err(e) => tracing::error!(error = %e, "cannot serialize report"),
    }
}
