//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the fingerprinting pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Folder enumeration events
    Scan(ScanEvent),
    /// Per-file hashing events
    Hash(HashEvent),
    /// Pipeline-level events
    Pipeline(PipelineEvent),
}

/// Events while enumerating a folder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Enumeration of a folder has started
    Started { folder: PathBuf },
    /// Enumeration finished; `total` files matched the suffix filter
    Completed { folder: PathBuf, total: usize },
}

/// Events while hashing files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HashEvent {
    /// A file's record was merged into the result set
    Progress(HashProgress),
    /// A file could not be decoded; its hashes degrade to empty strings
    DecodeFailed { file: String },
    /// One algorithm failed on an otherwise readable file
    AlgorithmFailed { file: String, algorithm: String },
}

/// Progress information as records reach the merger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashProgress {
    /// Records merged so far for the current folder
    pub completed: usize,
    /// Total matching files in the current folder
    pub total: usize,
    /// File the latest record belongs to
    pub file: String,
}

impl HashProgress {
    /// Fraction of the folder completed, in percent.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.completed as f64 * 100.0 / self.total as f64
    }
}

/// Pipeline-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// Pipeline has started
    Started,
    /// Work on a folder has started
    FolderStarted { folder: PathBuf },
    /// A stage of the current folder finished
    PhaseCompleted { folder: PathBuf, phase: PipelinePhase },
    /// Pipeline finished every folder
    Completed { summary: PipelineSummary },
}

/// Stages of one folder's processing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePhase {
    /// All file names enqueued, input queue closed
    Generation,
    /// All workers drained the input queue and exited
    Hashing,
    /// Merger absorbed every record
    Merging,
}

/// Summary of a completed run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Folders processed
    pub folders: usize,
    /// Files fingerprinted across all folders
    pub total_files: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelinePhase::Generation => write!(f, "generation"),
            PipelinePhase::Hashing => write!(f, "hashing"),
            PipelinePhase::Merging => write!(f, "merging"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_serializable() {
        let event = Event::Hash(HashEvent::Progress(HashProgress {
            completed: 7,
            total: 28,
            file: "photo.jpg".to_string(),
        }));

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: Event = serde_json::from_str(&json).unwrap();

        match deserialized {
            Event::Hash(HashEvent::Progress(p)) => {
                assert_eq!(p.completed, 7);
                assert_eq!(p.file, "photo.jpg");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn percent_handles_zero_total() {
        let progress = HashProgress {
            completed: 0,
            total: 0,
            file: String::new(),
        };
        assert_eq!(progress.percent(), 100.0);
    }

    #[test]
    fn percent_reports_fraction_of_total() {
        let progress = HashProgress {
            completed: 1,
            total: 4,
            file: "a.jpg".to_string(),
        };
        assert_eq!(progress.percent(), 25.0);
    }
}
