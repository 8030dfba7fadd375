//! # Hasher Module
//!
//! The pluggable hash-algorithm seam of the pipeline.
//!
//! Every algorithm - the crate's own fingerprint engine as well as the
//! third-party ones - implements a single capability: compute a byte hash
//! from a decoded image. The pipeline iterates a registered list of these,
//! so algorithms can be added or removed without touching pipeline code.
//!
//! External algorithms are provided by the `image_hasher` vision library and
//! are called, never reimplemented here.

mod external;

pub use external::{LibraryHasher, PixelChecksum};

use crate::error::HashError;
use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// A named hash algorithm over a decoded image.
///
/// Implementations must be cheap to share across worker threads. A failed
/// computation is reported per file; the pipeline records an empty string
/// for that file/algorithm pair and keeps going.
pub trait HashAlgorithm: Send + Sync {
    /// The name this algorithm's results are keyed by in the output.
    fn name(&self) -> &'static str;

    /// Compute the raw hash bytes for an already-decoded image.
    fn compute(&self, image: &DynamicImage) -> Result<Vec<u8>, HashError>;
}

/// External algorithms that can be registered alongside the fingerprint
/// engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExternalAlgorithmKind {
    /// Mean hash - fast, coarse brightness comparison
    Average,
    /// Block hash - brightness comparison over coarse blocks
    BlockMean,
    /// DCT-preprocessed mean hash - robust to edits
    Perceptual,
    /// xxh3 checksum over the raw pixels - exact-content match only
    Checksum,
}

impl ExternalAlgorithmKind {
    /// Instantiate the algorithm this kind names.
    pub fn build(&self) -> Box<dyn HashAlgorithm> {
        match self {
            ExternalAlgorithmKind::Average => Box::new(LibraryHasher::average()),
            ExternalAlgorithmKind::BlockMean => Box::new(LibraryHasher::block_mean()),
            ExternalAlgorithmKind::Perceptual => Box::new(LibraryHasher::perceptual()),
            ExternalAlgorithmKind::Checksum => Box::new(PixelChecksum),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ExternalAlgorithmKind::Average => {
                "Mean hash - fast comparison based on average brightness"
            }
            ExternalAlgorithmKind::BlockMean => {
                "Block hash - compares brightness over coarse blocks"
            }
            ExternalAlgorithmKind::Perceptual => {
                "DCT-based perceptual hash - robust to edits and recompression"
            }
            ExternalAlgorithmKind::Checksum => {
                "Pixel checksum - exact-content match over decoded pixels"
            }
        }
    }
}

impl std::fmt::Display for ExternalAlgorithmKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExternalAlgorithmKind::Average => write!(f, "average"),
            ExternalAlgorithmKind::BlockMean => write!(f, "blockmean"),
            ExternalAlgorithmKind::Perceptual => write!(f, "phash"),
            ExternalAlgorithmKind::Checksum => write!(f, "checksum"),
        }
    }
}

/// Hex-encode raw hash bytes the way they appear in the output document.
pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
