//! # Photo Fingerprinter
//!
//! Scans folders of images and produces, for every image, a compact
//! content-derived fingerprint usable for near-duplicate detection and
//! indexing.
//!
//! ## Architecture
//! The library is split into a core engine (UI-agnostic) and presentation
//! layers:
//! - `core` - Fingerprint engine, pluggable hashers and the bounded
//!   generator / worker pool / merger pipeline
//! - `events` - Event-driven progress reporting
//! - `error` - Error taxonomy: fatal per folder, degraded per file
//!
//! Comparing or indexing the produced fingerprints is left to downstream
//! systems; this crate only emits them.

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{FingerprinterError, Result};

/// Initialize tracing for the library.
///
/// This should be called once by the application entry point. Logs go to
/// stderr so the result document on stdout stays clean; `RUST_LOG`
/// overrides `default_filter` when set.
pub fn init_tracing(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
