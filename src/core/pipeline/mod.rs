//! # Pipeline Module
//!
//! Orchestrates fingerprinting across folders of images.
//!
//! ## Pipeline Stages (per folder)
//! 1. **Enumerate** - List the folder's files matching the suffix filter
//! 2. **Generate** - One task feeds file names into a bounded queue
//! 3. **Hash** - A fixed worker pool decodes each file and runs every
//!    registered algorithm
//! 4. **Merge** - One task folds the records into the result set and
//!    reports progress
//!
//! ## Parallelism
//! Workers share a bounded crossbeam channel; queue closure (dropping the
//! producer side) is the only shutdown signal, and each stage is joined
//! before the next folder starts.

mod executor;

pub use executor::{
    JobRecord, Pipeline, PipelineBuilder, PipelineConfig, PipelineResult, ResultSet,
};
