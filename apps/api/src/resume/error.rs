use thiserror::Error;

use crate::resume::extract::DocumentFormat;

/// Terminal failures of a single analysis call. None of them is retried and
/// no partial result is produced.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Only PDF and DOCX files are supported (got '{0}')")]
    UnsupportedFormat(String),

    #[error("Failed to extract text from {format}: {source}")]
    ExtractionFailed {
        format: DocumentFormat,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("No text content found in the resume")]
    EmptyDocument,

    #[error("File size must be less than {} MB ({size} bytes received)", .limit / (1024 * 1024))]
    OversizedInput { size: usize, limit: usize },
}

impl AnalysisError {
    /// Stable machine-readable code used in error response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            AnalysisError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            AnalysisError::ExtractionFailed { .. } => "EXTRACTION_FAILED",
            AnalysisError::EmptyDocument => "EMPTY_DOCUMENT",
            AnalysisError::OversizedInput { .. } => "OVERSIZED_INPUT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oversized_message_reports_limit_in_mib() {
        let err = AnalysisError::OversizedInput {
            size: 11 * 1024 * 1024,
            limit: 10 * 1024 * 1024,
        };
        assert!(err.to_string().contains("less than 10 MB"));
        assert_eq!(err.code(), "OVERSIZED_INPUT");
    }

    #[test]
    fn test_extraction_failed_carries_cause() {
        let err = AnalysisError::ExtractionFailed {
            format: DocumentFormat::Docx,
            source: "missing word/document.xml".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("DOCX"));
        assert!(msg.contains("missing word/document.xml"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
