//! Turns an uploaded résumé (PDF, DOCX or plain text) into plain text.
//!
//! Pure and synchronous. Callers on the async runtime run it via `spawn_blocking`,
//! since PDF decoding is CPU-bound.

use std::panic;

use thiserror::Error;

mod docx;

/// Hard cap on upload size: 8 MiB.
pub const MAX_UPLOAD_BYTES: usize = 8 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("file too large ({size} bytes, limit {limit} bytes)")]
    TooLarge { size: usize, limit: usize },

    #[error("{0}")]
    Unparsable(String),
}

impl ExtractError {
    pub(crate) fn unparsable(cause: impl std::fmt::Display) -> Self {
        ExtractError::Unparsable(cause.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentKind {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentKind {
    /// Dispatches on the filename extension, case-insensitively.
    fn from_filename(filename: &str) -> Self {
        let lower = filename.to_lowercase();
        if lower.ends_with(".pdf") {
            DocumentKind::Pdf
        } else if lower.ends_with(".docx") {
            DocumentKind::Docx
        } else {
            DocumentKind::PlainText
        }
    }
}

/// Extracts plain text from an uploaded file.
///
/// Anything that is neither `.pdf` nor `.docx` is decoded as UTF-8, replacing
/// invalid sequences instead of failing.
pub fn extract_text(filename: &str, content: &[u8]) -> Result<String, ExtractError> {
    if content.len() > MAX_UPLOAD_BYTES {
        return Err(ExtractError::TooLarge {
            size: content.len(),
            limit: MAX_UPLOAD_BYTES,
        });
    }

    match DocumentKind::from_filename(filename) {
        DocumentKind::Pdf => extract_pdf(content),
        DocumentKind::Docx => docx::extract_docx(content),
        DocumentKind::PlainText => Ok(String::from_utf8_lossy(content).into_owned()),
    }
}

fn extract_pdf(content: &[u8]) -> Result<String, ExtractError> {
    // pdf-extract panics on some malformed inputs instead of returning Err.
    match panic::catch_unwind(|| pdf_extract::extract_text_from_mem(content)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(ExtractError::unparsable(e)),
        Err(_) => Err(ExtractError::Unparsable(
            "PDF decoder failed on malformed input".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_is_case_insensitive() {
        assert_eq!(DocumentKind::from_filename("CV.PDF"), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_filename("resume.Docx"), DocumentKind::Docx);
        assert_eq!(DocumentKind::from_filename("notes.txt"), DocumentKind::PlainText);
        assert_eq!(DocumentKind::from_filename(""), DocumentKind::PlainText);
        assert_eq!(DocumentKind::from_filename("cv.pdf.txt"), DocumentKind::PlainText);
    }

    #[test]
    fn test_plain_text_passthrough() {
        let text = extract_text("cv.txt", "Jane Doe\nRust, Go".as_bytes()).unwrap();
        assert_eq!(text, "Jane Doe\nRust, Go");
    }

    #[test]
    fn test_plain_text_invalid_utf8_is_replaced_not_rejected() {
        let bytes = [b'J', b'a', 0xff, 0xfe, b'n', b'e'];
        let text = extract_text("cv.txt", &bytes).unwrap();
        assert!(text.starts_with("Ja"));
        assert!(text.ends_with("ne"));
    }

    #[test]
    fn test_upload_over_limit_is_rejected() {
        let content = vec![b'a'; MAX_UPLOAD_BYTES + 1];
        let err = extract_text("cv.txt", &content).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::TooLarge { size, limit } if size == MAX_UPLOAD_BYTES + 1 && limit == MAX_UPLOAD_BYTES
        ));
    }

    #[test]
    fn test_upload_at_limit_is_accepted() {
        let content = vec![b'a'; MAX_UPLOAD_BYTES];
        assert!(extract_text("cv.txt", &content).is_ok());
    }

    /// Assembles a single-page PDF showing `line` in Helvetica, with a
    /// correct cross-reference table.
    fn one_page_pdf(line: &str) -> Vec<u8> {
        let content = format!("BT /F1 18 Tf 72 720 Td ({line}) Tj ET");
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
                .to_string(),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
            format!("<< /Length {} >>\nstream\n{content}\nendstream", content.len()),
        ];

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
        }

        let xref_at = pdf.len();
        pdf.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
        pdf.extend_from_slice(b"0000000000 65535 f \n");
        for offset in offsets {
            pdf.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }
        pdf.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
                objects.len() + 1
            )
            .as_bytes(),
        );
        pdf
    }

    #[test]
    fn test_pdf_text_is_recovered() {
        let pdf = one_page_pdf("Jane Doe Backend Engineer");
        let text = extract_text("cv.pdf", &pdf).unwrap();
        assert!(text.contains("Jane"), "{text:?}");
        assert!(text.contains("Engineer"), "{text:?}");
    }

    #[test]
    fn test_corrupt_pdf_is_unparsable() {
        let err = extract_text("cv.pdf", b"this is not a pdf").unwrap_err();
        assert!(matches!(err, ExtractError::Unparsable(_)));
    }

    #[test]
    fn test_corrupt_docx_is_unparsable() {
        let err = extract_text("cv.docx", b"PK but not really a zip").unwrap_err();
        assert!(matches!(err, ExtractError::Unparsable(_)));
    }
}
