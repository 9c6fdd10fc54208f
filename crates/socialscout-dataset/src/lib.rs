//! Tabular company dataset: CSV load and save with an encoding fallback
//! chain, plus the batch export, merge, and status helpers built on it.

pub mod batch;
pub mod dataset;
pub mod encoding;
pub mod error;
pub mod merge;
pub mod status;

pub use batch::{export_batch, write_batch, BatchEntry};
pub use dataset::Dataset;
pub use error::DatasetError;
pub use merge::{merge_platform, MergeStats};
pub use status::{status, StatusReport};
