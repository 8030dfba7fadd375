//! Pipeline execution implementation.

use crate::core::fingerprint::SignatureHasher;
use crate::core::grid::PixelGrid;
use crate::core::hasher::{self, HashAlgorithm};
use crate::core::scanner::FolderScanner;
use crate::error::Result;
use crate::events::{
    null_sender, Event, EventSender, HashEvent, HashProgress, PipelineEvent, PipelinePhase,
    PipelineSummary, ScanEvent,
};
use crossbeam_channel::bounded;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Default size of the worker pool.
const DEFAULT_WORKERS: usize = 4;

/// One file's computed set of named hashes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    /// File name within its folder
    pub file: String,
    /// Algorithm name -> hex hash (empty string where a hash is unavailable)
    pub hashes: BTreeMap<String, String>,
}

/// File name -> algorithm name -> hex hash.
///
/// Keyed by file name, not insertion order: records arrive from the worker
/// pool in whatever order the race resolves. A `BTreeMap` also keeps the
/// serialized document stable across runs.
pub type ResultSet = BTreeMap<String, BTreeMap<String, String>>;

/// Result of a pipeline run
#[derive(Debug)]
pub struct PipelineResult {
    /// The aggregated hashes for every enumerated file
    pub results: ResultSet,
    /// Files processed across all folders
    pub total_files: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

/// Configuration for the pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Folders to process, one at a time
    pub folders: Vec<PathBuf>,
    /// Case-sensitive file-name suffix filter; empty matches everything
    pub extension: String,
    /// Size of the worker pool
    pub workers: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            folders: Vec::new(),
            extension: String::new(),
            workers: DEFAULT_WORKERS,
        }
    }
}

/// Builder for the pipeline
pub struct PipelineBuilder {
    config: PipelineConfig,
    algorithms: Vec<Box<dyn HashAlgorithm>>,
}

impl PipelineBuilder {
    /// Create a builder with the fingerprint engine pre-registered.
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
            algorithms: vec![Box::new(SignatureHasher)],
        }
    }

    /// Folders to process.
    pub fn folders(mut self, folders: Vec<PathBuf>) -> Self {
        self.config.folders = folders;
        self
    }

    /// File-name suffix filter (exact, case-sensitive).
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.config.extension = extension.into();
        self
    }

    /// Worker pool size; values below 1 are raised to 1.
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers.max(1);
        self
    }

    /// Register an additional hash algorithm to run per file.
    pub fn register(mut self, algorithm: Box<dyn HashAlgorithm>) -> Self {
        self.algorithms.push(algorithm);
        self
    }

    /// Build the pipeline.
    pub fn build(self) -> Pipeline {
        Pipeline {
            config: self.config,
            algorithms: self.algorithms,
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The fingerprinting pipeline
pub struct Pipeline {
    config: PipelineConfig,
    algorithms: Vec<Box<dyn HashAlgorithm>>,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Run the pipeline without progress events
    pub fn run(&self) -> Result<PipelineResult> {
        self.run_with_events(&null_sender())
    }

    /// Run the pipeline, reporting progress through `events`.
    ///
    /// Folders are processed strictly one after another; an unlistable
    /// folder aborts the run. Per-file failures degrade to empty hash
    /// strings and never stop the batch.
    pub fn run_with_events(&self, events: &EventSender) -> Result<PipelineResult> {
        let start_time = Instant::now();
        events.send(Event::Pipeline(PipelineEvent::Started));

        let scanner = FolderScanner::new(self.config.extension.clone());
        let mut results = ResultSet::new();
        let mut total_files = 0;

        for folder in &self.config.folders {
            events.send(Event::Pipeline(PipelineEvent::FolderStarted {
                folder: folder.clone(),
            }));
            events.send(Event::Scan(ScanEvent::Started {
                folder: folder.clone(),
            }));

            let files = scanner.list_files(folder)?;
            total_files += files.len();
            info!(
                "folder '{}': {} matching files",
                folder.display(),
                files.len()
            );
            events.send(Event::Scan(ScanEvent::Completed {
                folder: folder.clone(),
                total: files.len(),
            }));

            results = self.process_folder(folder, files, results, events);
        }

        let duration_ms = start_time.elapsed().as_millis() as u64;
        events.send(Event::Pipeline(PipelineEvent::Completed {
            summary: PipelineSummary {
                folders: self.config.folders.len(),
                total_files,
                duration_ms,
            },
        }));

        Ok(PipelineResult {
            results,
            total_files,
            duration_ms,
        })
    }

    /// Run one folder through the generator / worker pool / merger stages.
    ///
    /// The result set moves into the merger thread and comes back through
    /// its join handle, so exactly one thread ever writes it. Queue closure
    /// is the only termination signal: the input queue closes when the
    /// generator drops its sender, the record queue when the last worker
    /// drops its clone. Each stage is joined before the next folder starts.
    fn process_folder(
        &self,
        folder: &Path,
        files: Vec<String>,
        results: ResultSet,
        events: &EventSender,
    ) -> ResultSet {
        let total = files.len();
        let capacity = self.config.workers + 1;
        let (job_tx, job_rx) = bounded::<String>(capacity);
        let (record_tx, record_rx) = bounded::<JobRecord>(capacity);

        thread::scope(|scope| {
            let generator = scope.spawn(move || {
                for file in files {
                    if job_tx.send(file).is_err() {
                        return;
                    }
                }
            });

            let workers: Vec<_> = (0..self.config.workers)
                .map(|n| {
                    let jobs = job_rx.clone();
                    let records = record_tx.clone();
                    let algorithms = &self.algorithms;
                    let events = events.clone();
                    scope.spawn(move || {
                        debug!("worker {} started", n + 1);
                        for file in jobs.iter() {
                            let path = folder.join(&file);
                            let hashes = hash_file(&path, &file, algorithms, &events);
                            if records.send(JobRecord { file, hashes }).is_err() {
                                return;
                            }
                        }
                        debug!("worker {} finished", n + 1);
                    })
                })
                .collect();

            // The scope's own endpoints must go, or the queues never close.
            drop(job_rx);
            drop(record_tx);

            let merger = {
                let events = events.clone();
                scope.spawn(move || {
                    let mut results = results;
                    let mut completed = 0;
                    for record in record_rx.iter() {
                        completed += 1;
                        let progress = HashProgress {
                            completed,
                            total,
                            file: record.file.clone(),
                        };
                        info!(
                            "({:.2} %) [{}/{}] processing {}",
                            progress.percent(),
                            completed,
                            total,
                            record.file
                        );
                        events.send(Event::Hash(HashEvent::Progress(progress)));
                        results.insert(record.file, record.hashes);
                    }
                    results
                })
            };

            if let Err(panic) = generator.join() {
                std::panic::resume_unwind(panic);
            }
            info!(
                "all file names for folder '{}' are enqueued",
                folder.display()
            );
            events.send(Event::Pipeline(PipelineEvent::PhaseCompleted {
                folder: folder.to_path_buf(),
                phase: PipelinePhase::Generation,
            }));

            for worker in workers {
                if let Err(panic) = worker.join() {
                    std::panic::resume_unwind(panic);
                }
            }
            info!("all workers for folder '{}' are done", folder.display());
            events.send(Event::Pipeline(PipelineEvent::PhaseCompleted {
                folder: folder.to_path_buf(),
                phase: PipelinePhase::Hashing,
            }));

            let merged = match merger.join() {
                Ok(results) => results,
                Err(panic) => std::panic::resume_unwind(panic),
            };
            info!("merge for folder '{}' is done", folder.display());
            events.send(Event::Pipeline(PipelineEvent::PhaseCompleted {
                folder: folder.to_path_buf(),
                phase: PipelinePhase::Merging,
            }));

            merged
        })
    }
}

/// Decode one file and run every registered algorithm over it.
///
/// A file that cannot be decoded, or an algorithm that fails on it, yields
/// an empty string for the affected entries; the batch never stops for a
/// bad file.
fn hash_file(
    path: &Path,
    file: &str,
    algorithms: &[Box<dyn HashAlgorithm>],
    events: &EventSender,
) -> BTreeMap<String, String> {
    let grid = PixelGrid::from_file(path);
    if grid.is_empty() {
        events.send(Event::Hash(HashEvent::DecodeFailed {
            file: file.to_string(),
        }));
    }

    let mut hashes = BTreeMap::new();
    for algorithm in algorithms {
        let hex = match grid.as_image() {
            Some(image) => match algorithm.compute(image) {
                Ok(bytes) => hasher::to_hex(&bytes),
                Err(e) => {
                    warn!(
                        "error computing {} for {}: {}",
                        algorithm.name(),
                        path.display(),
                        e
                    );
                    events.send(Event::Hash(HashEvent::AlgorithmFailed {
                        file: file.to_string(),
                        algorithm: algorithm.name().to_string(),
                    }));
                    String::new()
                }
            },
            None => String::new(),
        };
        hashes.insert(algorithm.name().to_string(), hex);
    }
    hashes
}
