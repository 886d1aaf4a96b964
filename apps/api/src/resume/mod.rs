// Resume analysis: document text extraction, rubric scoring, PDF report rendering.
// Extraction and scoring are CPU-bound and run inside tokio::task::spawn_blocking.

pub mod analyzer;
pub mod catalog;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod report;

pub use error::AnalysisError;
