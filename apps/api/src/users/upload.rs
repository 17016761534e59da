//! PDF résumé intake: validation, text extraction and page counting.

use bytes::Bytes;
use once_cell::sync::Lazy;
use regex::bytes::Regex;
use serde_json::{Map, Value};

use crate::errors::AppError;
use crate::interview::models::ResumeData;

pub const MAX_RESUME_BYTES: usize = 10 * 1024 * 1024;

// Page objects only; `/Type /Pages` tree nodes are excluded by the boundary.
static PAGE_OBJECT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?-u)/Type\s*/Page\b").expect("valid regex"));

/// An uploaded file, as received from the multipart form.
#[derive(Debug)]
pub struct ResumeUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl ResumeUpload {
    /// Accepts an `application/pdf` content type, or a `.pdf` file name when the
    /// client sent none. The payload must carry the PDF magic bytes either way.
    pub fn is_pdf(&self) -> bool {
        let declared = match self.content_type.as_deref() {
            Some(ct) => ct.eq_ignore_ascii_case("application/pdf"),
            None => self
                .file_name
                .as_deref()
                .is_some_and(|name| name.to_ascii_lowercase().ends_with(".pdf")),
        };
        declared && self.bytes.starts_with(b"%PDF")
    }
}

pub fn count_pages(bytes: &[u8]) -> u32 {
    PAGE_OBJECT_RE.find_iter(bytes).count() as u32
}

/// Extracts the text layer. CPU-bound; call from `spawn_blocking`.
pub fn extract_resume(upload: &ResumeUpload) -> Result<ResumeData, AppError> {
    if !upload.is_pdf() {
        return Err(AppError::Validation("Resume must be a PDF file".to_string()));
    }

    let text = pdf_extract::extract_text_from_mem(&upload.bytes)
        .map_err(|e| AppError::Validation(format!("Could not read resume PDF: {e}")))?;

    let mut metadata = Map::new();
    if let Some(name) = &upload.file_name {
        metadata.insert("fileName".to_string(), Value::from(name.clone()));
    }
    metadata.insert("sizeBytes".to_string(), Value::from(upload.bytes.len()));

    Ok(ResumeData {
        page_count: count_pages(&upload.bytes),
        metadata,
        ..ResumeData::from_text(text.trim())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(content_type: Option<&str>, file_name: Option<&str>, bytes: &[u8]) -> ResumeUpload {
        ResumeUpload {
            file_name: file_name.map(str::to_string),
            content_type: content_type.map(str::to_string),
            bytes: Bytes::copy_from_slice(bytes),
        }
    }

    #[test]
    fn test_is_pdf_requires_type_and_magic() {
        assert!(upload(Some("application/pdf"), None, b"%PDF-1.7").is_pdf());
        assert!(upload(None, Some("CV.PDF"), b"%PDF-1.4").is_pdf());
        assert!(!upload(Some("text/plain"), Some("cv.pdf"), b"%PDF-1.4").is_pdf());
        assert!(!upload(Some("application/pdf"), None, b"hello").is_pdf());
        assert!(!upload(None, None, b"%PDF-1.4").is_pdf());
    }

    #[test]
    fn test_count_pages_skips_page_tree_nodes() {
        let body = b"1 0 obj << /Type /Pages /Kids [2 0 R 3 0 R] >>\n\
                     2 0 obj << /Type /Page >>\n\
                     3 0 obj << /Type/Page /Parent 1 0 R >>";
        assert_eq!(count_pages(body), 2);
        assert_eq!(count_pages(b"no pages here"), 0);
    }

    #[test]
    fn test_extract_rejects_non_pdf() {
        let err = extract_resume(&upload(Some("image/png"), Some("cv.png"), b"\x89PNG")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
