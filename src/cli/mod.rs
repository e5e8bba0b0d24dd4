//! # CLI Module
//!
//! Command-line interface for the image deduplicator.
//!
//! ## Usage
//! ```bash
//! # Quarantine duplicates in a directory
//! imgdedup scan ~/Pictures
//!
//! # Only report what would happen
//! imgdedup scan ~/Pictures --dry-run
//!
//! # Perceptual matching with some tolerance, JSON output
//! imgdedup scan ~/Pictures --algorithm perceptual --sensitivity 5 --output json
//!
//! # Put everything back
//! imgdedup undo ~/Pictures
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use image_dedup::core::hasher::HashAlgorithmKind;
use image_dedup::core::pipeline::{self, Pipeline, PipelineResult, DEFAULT_SENSITIVITY};
use image_dedup::core::quarantine::{UndoReport, DEFAULT_QUARANTINE_DIR};
use image_dedup::core::resolver::DuplicatePair;
use image_dedup::error::Result;
use image_dedup::events::{Event, EventChannel, HashEvent, PipelineEvent, ScanEvent};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::thread;

/// Image Dedup - keep the best copy, quarantine the rest
#[derive(Parser, Debug)]
#[command(name = "imgdedup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Find duplicates and move the smaller copy into quarantine
    Scan {
        /// Directory to deduplicate
        path: PathBuf,

        /// Fingerprint algorithm
        #[arg(short, long, default_value = "average")]
        algorithm: Algorithm,

        /// Match ceiling for the perceptual algorithm (lower = stricter, may be negative)
        #[arg(short, long, default_value_t = DEFAULT_SENSITIVITY, allow_negative_numbers = true)]
        sensitivity: i32,

        /// Report duplicates without moving anything
        #[arg(long)]
        dry_run: bool,

        /// Descend into sub-directories
        #[arg(short, long)]
        recursive: bool,

        /// Include hidden files and directories
        #[arg(long)]
        include_hidden: bool,

        /// Name of the quarantine directory inside PATH
        #[arg(long, default_value = DEFAULT_QUARANTINE_DIR)]
        quarantine_dir: String,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Restore quarantined files and remove the quarantine directory
    Undo {
        /// Directory that was deduplicated
        path: PathBuf,

        /// Report what would be restored without changing anything
        #[arg(long)]
        dry_run: bool,

        /// Name of the quarantine directory inside PATH
        #[arg(long, default_value = DEFAULT_QUARANTINE_DIR)]
        quarantine_dir: String,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Algorithm {
    /// Average Hash - exact buckets, fast
    Average,
    /// Difference Hash - exact buckets, follows edges
    Difference,
    /// Perceptual Hash - scored, tolerant to edits
    Perceptual,
}

impl From<Algorithm> for HashAlgorithmKind {
    fn from(algo: Algorithm) -> Self {
        match algo {
            Algorithm::Average => HashAlgorithmKind::Average,
            Algorithm::Difference => HashAlgorithmKind::Difference,
            Algorithm::Perceptual => HashAlgorithmKind::Perceptual,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// Discarded paths only
    Minimal,
}

/// Options for one `scan` invocation
struct ScanArgs {
    path: PathBuf,
    algorithm: HashAlgorithmKind,
    sensitivity: i32,
    dry_run: bool,
    recursive: bool,
    include_hidden: bool,
    quarantine_dir: String,
    output: OutputFormat,
    verbose: bool,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            path,
            algorithm,
            sensitivity,
            dry_run,
            recursive,
            include_hidden,
            quarantine_dir,
            output,
            verbose,
        } => {
            image_dedup::init_tracing(verbose);
            run_scan(ScanArgs {
                path,
                algorithm: algorithm.into(),
                sensitivity,
                dry_run,
                recursive,
                include_hidden,
                quarantine_dir,
                output,
                verbose,
            })
        }
        Commands::Undo {
            path,
            dry_run,
            quarantine_dir,
            verbose,
        } => {
            image_dedup::init_tracing(verbose);
            run_undo(&path, &quarantine_dir, dry_run)
        }
    }
}

fn progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    if let Ok(bar_style) =
        ProgressStyle::default_bar().template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(bar_style.progress_chars("█▓░"));
    }
    pb
}

fn run_scan(args: ScanArgs) -> Result<()> {
    let term = Term::stderr();
    let pretty = matches!(args.output, OutputFormat::Pretty);

    if pretty {
        term.write_line(&format!(
            "{} {}",
            style("Image Dedup").bold().cyan(),
            style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        term.write_line(&format!(
            "  {} {}",
            style("Algorithm:").dim(),
            args.algorithm.description()
        ))
        .ok();
        term.write_line("").ok();
    }

    let pipeline = Pipeline::builder()
        .root(args.path)
        .algorithm(args.algorithm)
        .sensitivity(args.sensitivity)
        .dry_run(args.dry_run)
        .recursive(args.recursive)
        .include_hidden(args.include_hidden)
        .quarantine_dir(args.quarantine_dir)
        .build();

    let (sender, receiver) = EventChannel::new();
    let progress = pretty.then(progress_bar);
    let progress_clone = progress.clone();
    let verbose = args.verbose;

    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            let Some(ref pb) = progress_clone else {
                continue;
            };
            match event {
                Event::Pipeline(PipelineEvent::PhaseChanged { phase }) => {
                    pb.set_message(format!("{}", phase));
                }
                Event::Scan(ScanEvent::Completed { total_photos }) => {
                    pb.set_length(total_photos as u64);
                }
                Event::Hash(HashEvent::Progress(p)) => {
                    pb.set_position(p.completed as u64);
                    if verbose {
                        pb.set_message(
                            p.current_path
                                .file_name()
                                .unwrap_or_default()
                                .to_string_lossy()
                                .into_owned(),
                        );
                    }
                }
                Event::Pipeline(PipelineEvent::Completed { .. })
                | Event::Pipeline(PipelineEvent::Error { .. }) => {
                    pb.finish_and_clear();
                }
                _ => {}
            }
        }
    });

    let result = pipeline.run_with_events(&sender);

    drop(sender);
    event_thread.join().ok();
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
    let result = result?;

    match args.output {
        OutputFormat::Pretty => print_pretty_results(&term, &result, pipeline.config().root.as_path(), args.verbose),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Minimal => print_minimal_results(&result),
    }

    Ok(())
}

fn print_pretty_results(term: &Term, result: &PipelineResult, root: &Path, verbose: bool) {
    let heading = if result.dry_run {
        "Dry Run Complete"
    } else {
        "Scan Complete"
    };
    term.write_line(&format!("{} {}", style("✓").green().bold(), heading))
        .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} images scanned in {:.1}s",
        style(result.files_scanned).cyan(),
        result.duration_ms as f64 / 1000.0
    ))
    .ok();
    term.write_line(&format!(
        "  {} unique images kept",
        style(result.images_indexed).cyan()
    ))
    .ok();
    let verb = if result.dry_run {
        "would be quarantined"
    } else {
        "quarantined"
    };
    term.write_line(&format!(
        "  {} duplicates {}",
        style(result.pairs.len()).cyan(),
        verb
    ))
    .ok();

    if !result.skipped.is_empty() {
        term.write_line(&format!(
            "  {} files skipped (not decodable)",
            style(result.skipped.len()).yellow()
        ))
        .ok();
    }
    if !result.failed.is_empty() {
        term.write_line(&format!(
            "  {} duplicates could not be moved",
            style(result.failed.len()).red()
        ))
        .ok();
    }

    term.write_line("").ok();

    if result.pairs.is_empty() {
        term.write_line(&format!("  {} No duplicates found!", style("🎉").green()))
            .ok();
    } else {
        term.write_line(&format!("{}", style("Duplicates:").bold().underlined()))
            .ok();
        term.write_line("").ok();
        for pair in &result.pairs {
            print_pair(term, pair, root, verbose);
        }
    }

    if verbose {
        for failed in &result.failed {
            term.write_line(&format!(
                "  {} {}",
                style("✗").red(),
                style(&failed.message).dim()
            ))
            .ok();
        }
        for skipped in &result.skipped {
            term.write_line(&format!(
                "  {} {}",
                style("-").yellow(),
                style(&skipped.reason).dim()
            ))
            .ok();
        }
    }

    if !result.dry_run && !result.pairs.is_empty() {
        term.write_line("").ok();
        term.write_line(&format!(
            "{}",
            style("Run `imgdedup undo` on the same directory to restore everything.").dim()
        ))
        .ok();
    }
}

fn print_pair(term: &Term, pair: &DuplicatePair, root: &Path, verbose: bool) {
    let score = pair
        .score
        .map(|s| format!(" (score {})", s))
        .unwrap_or_default();
    term.write_line(&format!(
        "  {} {}{}",
        style(format!("[{}]", pair.relocation.tag)).bold(),
        style(display_path(&pair.keeper.path, root)).green(),
        style(score).dim()
    ))
    .ok();
    term.write_line(&format!(
        "    {} {}",
        style("○").dim(),
        display_path(&pair.discarded.path, root)
    ))
    .ok();

    if verbose {
        term.write_line(&format!(
            "    {} {} px kept over {} px",
            style("Area:").dim(),
            pair.keeper.area,
            pair.discarded.area
        ))
        .ok();
    }
}

fn print_minimal_results(result: &PipelineResult) {
    for pair in &result.pairs {
        println!("{}", pair.discarded.path.display());
    }
}

fn run_undo(path: &Path, quarantine_dir: &str, dry_run: bool) -> Result<()> {
    let term = Term::stderr();
    let report = pipeline::undo(path, quarantine_dir, dry_run)?;
    print_undo_report(&term, &report, path);
    Ok(())
}

fn print_undo_report(term: &Term, report: &UndoReport, root: &Path) {
    let (removed_verb, restored_verb) = if report.dry_run {
        ("would be removed", "would be restored")
    } else {
        ("removed", "restored")
    };

    for (from, to) in &report.restored {
        term.write_line(&format!(
            "  {} {} -> {}",
            style("↩").green(),
            display_path(from, root),
            display_path(to, root)
        ))
        .ok();
    }

    term.write_line("").ok();
    term.write_line(&format!(
        "  {} kept copies {}",
        style(report.removed.len()).cyan(),
        removed_verb
    ))
    .ok();
    term.write_line(&format!(
        "  {} files {}",
        style(report.restored.len()).cyan(),
        restored_verb
    ))
    .ok();

    for error in &report.errors {
        term.write_line(&format!("  {} {}", style("✗").red(), error))
            .ok();
    }

    if report.directory_removed {
        term.write_line(&format!(
            "  {}",
            style("Quarantine directory removed").dim()
        ))
        .ok();
    }
}

/// Show paths relative to the run root when possible
fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .map(|relative| relative.display().to_string())
        .unwrap_or_else(|_| path.display().to_string())
}
