//! # CLI Module
//!
//! Command-line interface for the photo fingerprinter.
//!
//! ## Usage
//! ```bash
//! # Fingerprint every file in a folder
//! photo-fingerprint scan ~/Photos
//!
//! # Only files with an exact suffix, eight workers
//! photo-fingerprint scan ~/Photos --extension .jpg --workers 8
//!
//! # Also run external algorithms, with a progress bar
//! photo-fingerprint scan ~/Photos -a phash,checksum --progress
//! ```
//!
//! The result document goes to stdout; logs, the progress bar and the
//! summary go to stderr, so output can be piped or redirected cleanly.

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use photo_fingerprinter::core::hasher::ExternalAlgorithmKind;
use photo_fingerprinter::core::pipeline::{Pipeline, PipelineResult};
use photo_fingerprinter::error::Result;
use photo_fingerprinter::events::{Event, EventChannel, HashEvent, PipelineEvent, ScanEvent};
use photo_fingerprinter::init_tracing;
use std::path::PathBuf;
use std::thread;

/// Photo Fingerprinter - content-derived fingerprints for image folders
#[derive(Parser, Debug)]
#[command(name = "photo-fingerprint")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fingerprint the images of one or more folders
    Scan {
        /// Folders to process, one at a time
        #[arg(required = true)]
        folders: Vec<PathBuf>,

        /// File-name suffix filter (exact, case-sensitive); empty matches all
        #[arg(short, long, default_value = "")]
        extension: String,

        /// Worker pool size
        #[arg(short, long, default_value_t = 4)]
        workers: usize,

        /// External hash algorithms to run alongside the fingerprint engine
        #[arg(short, long, value_delimiter = ',')]
        algorithms: Vec<Algorithm>,

        /// Render a progress bar on stderr
        #[arg(long)]
        progress: bool,

        /// Verbose logging
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Algorithm {
    /// Mean hash - fast, coarse brightness comparison
    Average,
    /// Block hash - brightness over coarse blocks
    Blockmean,
    /// DCT-based perceptual hash - robust to edits
    Phash,
    /// xxh3 checksum over decoded pixels - exact matches only
    Checksum,
}

impl From<Algorithm> for ExternalAlgorithmKind {
    fn from(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Average => ExternalAlgorithmKind::Average,
            Algorithm::Blockmean => ExternalAlgorithmKind::BlockMean,
            Algorithm::Phash => ExternalAlgorithmKind::Perceptual,
            Algorithm::Checksum => ExternalAlgorithmKind::Checksum,
        }
    }
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            folders,
            extension,
            workers,
            algorithms,
            progress,
            verbose,
        } => run_scan(folders, extension, workers, algorithms, progress, verbose),
    }
}

fn run_scan(
    folders: Vec<PathBuf>,
    extension: String,
    workers: usize,
    algorithms: Vec<Algorithm>,
    progress: bool,
    verbose: bool,
) -> Result<()> {
    init_tracing(if verbose { "debug" } else { "info" });

    let term = Term::stderr();
    term.write_line(&format!(
        "{} {}",
        style("Photo Fingerprinter").bold().cyan(),
        style(env!("CARGO_PKG_VERSION")).dim()
    ))
    .ok();

    let mut builder = Pipeline::builder()
        .folders(folders)
        .extension(extension)
        .workers(workers);
    for algorithm in algorithms {
        builder = builder.register(ExternalAlgorithmKind::from(algorithm).build());
    }
    let pipeline = builder.build();

    let (sender, receiver) = EventChannel::new();

    let bar = if progress {
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

    let bar_clone = bar.clone();
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            match event {
                Event::Pipeline(PipelineEvent::FolderStarted { folder }) => {
                    if let Some(ref pb) = bar_clone {
                        pb.set_message(folder.display().to_string());
                    }
                }
                Event::Scan(ScanEvent::Completed { total, .. }) => {
                    if let Some(ref pb) = bar_clone {
                        pb.set_length(total as u64);
                        pb.set_position(0);
                    }
                }
                Event::Hash(HashEvent::Progress(p)) => {
                    if let Some(ref pb) = bar_clone {
                        pb.set_position(p.completed as u64);
                        pb.set_message(p.file);
                    }
                }
                Event::Pipeline(PipelineEvent::Completed { .. }) => {
                    if let Some(ref pb) = bar_clone {
                        pb.finish_and_clear();
                    }
                }
                _ => {}
            }
        }
    });

    let result = pipeline.run_with_events(&sender);

    // Drop the sender so the event thread sees the channel close.
    drop(sender);
    event_thread.join().ok();

    let result = result?;
    print_summary(&term, &result);
    println!("{}", serde_json::to_string_pretty(&result.results).unwrap());

    Ok(())
}

fn print_summary(term: &Term, result: &PipelineResult) {
    term.write_line(&format!(
        "{} {} files fingerprinted in {:.1}s",
        style("✓").green().bold(),
        style(result.total_files).cyan(),
        result.duration_ms as f64 / 1000.0
    ))
    .ok();
}
