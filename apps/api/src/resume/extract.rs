//! Text extraction: turns an uploaded PDF or DOCX byte stream into plain text.
//!
//! PDF: every page in page order, joined by newline.
//! DOCX: every `w:p` paragraph of `word/document.xml` in document order, joined by newline.
//! Both outputs are trimmed. Whitespace-only output is NOT an error here; the
//! pipeline decides what to do with it.

use std::fmt;
use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use zip::ZipArchive;

use crate::resume::error::AnalysisError;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const DOCX_BODY_PART: &str = "word/document.xml";

/// The two document formats accepted for analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Resolves the format from a filename's extension (case-insensitive).
    pub fn from_filename(filename: &str) -> Result<Self, AnalysisError> {
        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("pdf") => Ok(DocumentFormat::Pdf),
            Some("docx") => Ok(DocumentFormat::Docx),
            _ => Err(AnalysisError::UnsupportedFormat(filename.to_string())),
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Pdf => f.write_str("PDF"),
            DocumentFormat::Docx => f.write_str("DOCX"),
        }
    }
}

/// Extracts trimmed plain text from `bytes` parsed as `format`.
pub fn extract_text(bytes: &[u8], format: DocumentFormat) -> Result<String, AnalysisError> {
    let text = match format {
        DocumentFormat::Pdf => extract_pdf(bytes),
        DocumentFormat::Docx => extract_docx(bytes),
    }
    .map_err(|source| AnalysisError::ExtractionFailed { format, source })?;

    Ok(text.trim().to_string())
}

fn extract_pdf(bytes: &[u8]) -> Result<String, BoxError> {
    // pdf-extract panics on some malformed font programs instead of erroring.
    let pages = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
        .map_err(|_| BoxError::from("PDF parser aborted on malformed input"))?
        .map_err(|e| BoxError::from(e.to_string()))?;

    Ok(pages.join("\n"))
}

fn extract_docx(bytes: &[u8]) -> Result<String, BoxError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive.by_name(DOCX_BODY_PART)?.read_to_string(&mut xml)?;

    Ok(docx_paragraphs(&xml)?.join("\n"))
}

/// Walks WordprocessingML and returns the text of each paragraph.
/// Runs (`w:t`) are concatenated; tabs and breaks become `\t` and `\n`.
/// Paragraphs nested in text boxes are emitted when they close.
fn docx_paragraphs(xml: &str) -> Result<Vec<String>, BoxError> {
    let mut reader = Reader::from_str(xml);
    let mut open: Vec<String> = Vec::new();
    let mut paragraphs = Vec::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => open.push(String::new()),
                b"w:t" => in_text_run = true,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:p" => paragraphs.push(String::new()),
                b"w:tab" => push_to_open(&mut open, "\t"),
                b"w:br" | b"w:cr" => push_to_open(&mut open, "\n"),
                _ => {}
            },
            Event::Text(t) if in_text_run => {
                let text = t.unescape()?;
                push_to_open(&mut open, &text);
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => {
                    if let Some(paragraph) = open.pop() {
                        paragraphs.push(paragraph);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn push_to_open(open: &mut [String], text: &str) {
    if let Some(paragraph) = open.last_mut() {
        paragraph.push_str(text);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;

    /// Builds a minimal .docx archive whose body holds one `w:p` per paragraph.
    pub(crate) fn docx_fixture(paragraphs: &[&str]) -> Vec<u8> {
        let body: String = paragraphs
            .iter()
            .map(|p| format!(r#"<w:p><w:r><w:t xml:space="preserve">{p}</w:t></w:r></w:p>"#))
            .collect();
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        );
        zip_with_document(&xml)
    }

    fn zip_with_document(xml: &str) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut buf);
            zip.start_file(DOCX_BODY_PART, zip::write::SimpleFileOptions::default())
                .unwrap();
            zip.write_all(xml.as_bytes()).unwrap();
            zip.finish().unwrap();
        }
        buf.into_inner()
    }

    #[test]
    fn test_format_from_extension_case_insensitive() {
        assert_eq!(
            DocumentFormat::from_filename("cv.PDF").unwrap(),
            DocumentFormat::Pdf
        );
        assert_eq!(
            DocumentFormat::from_filename("my.resume.Docx").unwrap(),
            DocumentFormat::Docx
        );
    }

    #[test]
    fn test_format_rejects_other_extensions() {
        for name in ["resume.txt", "resume.doc", "resume", "pdf", "resume.pdf.exe"] {
            let err = DocumentFormat::from_filename(name).unwrap_err();
            assert!(
                matches!(err, AnalysisError::UnsupportedFormat(_)),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn test_docx_paragraphs_joined_in_order() {
        let bytes = docx_fixture(&["  John Doe", "Summary: backend engineer", "Skills: rust  "]);
        let text = extract_text(&bytes, DocumentFormat::Docx).unwrap();
        assert_eq!(text, "John Doe\nSummary: backend engineer\nSkills: rust");
    }

    #[test]
    fn test_docx_runs_tabs_and_entities() {
        let xml = r#"<w:document xmlns:w="x"><w:body>
            <w:p><w:r><w:t>R&amp;D</w:t></w:r><w:r><w:tab/><w:t>Lead</w:t></w:r></w:p>
            <w:p/>
            <w:p><w:r><w:t>Line one</w:t><w:br/><w:t>Line two</w:t></w:r></w:p>
        </w:body></w:document>"#;
        let paragraphs = docx_paragraphs(xml).unwrap();
        assert_eq!(paragraphs, vec!["R&D\tLead", "", "Line one\nLine two"]);
    }

    #[test]
    fn test_docx_whitespace_only_is_not_an_extractor_error() {
        let bytes = docx_fixture(&["   ", ""]);
        let text = extract_text(&bytes, DocumentFormat::Docx).unwrap();
        assert!(text.is_empty());
    }

    #[test]
    fn test_docx_garbage_bytes_fail_extraction() {
        let err = extract_text(b"definitely not a zip archive", DocumentFormat::Docx).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::ExtractionFailed {
                format: DocumentFormat::Docx,
                ..
            }
        ));
    }

    #[test]
    fn test_docx_archive_without_body_fails_extraction() {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut buf);
            zip.start_file("docProps/app.xml", zip::write::SimpleFileOptions::default())
                .unwrap();
            zip.write_all(b"<Properties/>").unwrap();
            zip.finish().unwrap();
        }
        let err = extract_text(&buf.into_inner(), DocumentFormat::Docx).unwrap_err();
        assert_eq!(err.code(), "EXTRACTION_FAILED");
    }

    #[test]
    fn test_pdf_garbage_bytes_fail_extraction() {
        let err = extract_text(b"%PDF-nope", DocumentFormat::Pdf).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::ExtractionFailed {
                format: DocumentFormat::Pdf,
                ..
            }
        ));
    }
}
