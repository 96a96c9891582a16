//! Upload handling: text extraction from uploaded resume files.
//!
//! PDFs are extracted with `pdf-extract` on a blocking thread (the parser is
//! CPU-bound); anything else is treated as UTF-8 text. The original bytes
//! are archived to S3 by the handler regardless of format.

use std::io::Write;

use bytes::Bytes;
use tempfile::NamedTempFile;

use crate::errors::AppError;

const PDF_MAGIC: &[u8] = b"%PDF";

pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
}

/// Extracts plain text from an uploaded resume file.
pub async fn extract_resume_text(bytes: Bytes) -> Result<String, AppError> {
    if !is_pdf(&bytes) {
        return Ok(String::from_utf8_lossy(&bytes).into_owned());
    }

    let text = tokio::task::spawn_blocking(move || -> Result<String, AppError> {
        let mut file = NamedTempFile::new()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Tempfile creation failed: {e}")))?;
        file.write_all(&bytes)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Tempfile write failed: {e}")))?;

        pdf_extract::extract_text(file.path())
            .map_err(|e| AppError::Validation(format!("Could not extract text from PDF: {e}")))
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Extraction task panicked: {e}")))??;

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(AppError::Validation(
            "Uploaded PDF contains no extractable text".to_string(),
        ));
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_magic_detection() {
        assert!(is_pdf(b"%PDF-1.7 ..."));
        assert!(!is_pdf(b"Jane Doe\nBackend Engineer"));
        assert!(!is_pdf(b""));
    }

    #[tokio::test]
    async fn test_plain_text_passes_through_unchanged() {
        let body = Bytes::from_static(b"Jane Doe\nBackend Engineer\nRust, PostgreSQL");
        let text = extract_resume_text(body.clone()).await.unwrap();
        assert_eq!(text.as_bytes(), &body[..]);
    }
}
