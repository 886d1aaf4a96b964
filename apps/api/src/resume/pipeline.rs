//! Analysis pipeline: validates an upload, extracts its text and runs the rubric.
//!
//! Order of checks:
//! 1. filename extension → `UnsupportedFormat`
//! 2. byte length vs limit → `OversizedInput`
//! 3. extraction → `ExtractionFailed`
//! 4. whitespace-only text → `EmptyDocument`
//!
//! Steps 1–2 never touch the document bytes.

use rand::Rng;

use crate::resume::analyzer::{analyze_with_progress, AnalysisStage};
use crate::resume::error::AnalysisError;
use crate::resume::extract::{extract_text, DocumentFormat};
use crate::resume::models::AnalysisResult;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Copy)]
pub struct AnalysisLimits {
    pub max_upload_bytes: usize,
}

impl Default for AnalysisLimits {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// Runs one complete analysis. All-or-nothing: any failure returns an error
/// and no partial result.
pub fn run_analysis<R: Rng>(
    bytes: &[u8],
    filename: &str,
    limits: &AnalysisLimits,
    rng: &mut R,
    on_stage: &mut dyn FnMut(AnalysisStage),
) -> Result<AnalysisResult, AnalysisError> {
    let format = DocumentFormat::from_filename(filename)?;

    if bytes.len() > limits.max_upload_bytes {
        return Err(AnalysisError::OversizedInput {
            size: bytes.len(),
            limit: limits.max_upload_bytes,
        });
    }

    on_stage(AnalysisStage::ExtractingText);
    let text = extract_text(bytes, format)?;
    if text.trim().is_empty() {
        return Err(AnalysisError::EmptyDocument);
    }

    let result = analyze_with_progress(&text, rng, on_stage);
    on_stage(AnalysisStage::Completed);
    Ok(result)
}
