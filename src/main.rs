//! # photo-fingerprint CLI
//!
//! Command-line interface for the photo fingerprinter.
//!
//! ## Usage
//! ```bash
//! photo-fingerprint scan ~/Photos --extension .jpg
//! photo-fingerprint scan ~/Photos --workers 8 --progress
//! ```

mod cli;

use photo_fingerprinter::Result;

fn main() -> Result<()> {
    cli::run()
}
