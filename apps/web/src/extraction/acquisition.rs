//! Resume text acquisition from uploaded files (plain text or PDF).

use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::extraction::pdf::PdfDecoder;

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumeFileKind {
    PlainText,
    Pdf,
}

impl ResumeFileKind {
    /// Declared content type wins, then the file extension, then the PDF magic bytes.
    pub fn detect(file_name: Option<&str>, content_type: Option<&str>, bytes: &[u8]) -> Option<Self> {
        let content_type = content_type
            .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase());

        match content_type.as_deref() {
            Some("application/pdf") => return Some(Self::Pdf),
            Some("text/plain") => return Some(Self::PlainText),
            _ => {}
        }

        let extension = file_name
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("pdf") => Some(Self::Pdf),
            Some("txt") => Some(Self::PlainText),
            _ if bytes.starts_with(PDF_MAGIC) => Some(Self::Pdf),
            _ => None,
        }
    }
}

/// Text recovered from an upload.
#[derive(Debug, Clone, Serialize)]
pub struct AcquiredText {
    pub kind: ResumeFileKind,
    pub text: String,
    pub characters: usize,
}

/// Reads an uploaded resume. Plain text is taken verbatim; PDFs are decoded
/// and their lines reconstructed.
pub async fn acquire_resume_text(
    decoder: &PdfDecoder,
    file_name: Option<&str>,
    content_type: Option<&str>,
    bytes: Bytes,
) -> Result<AcquiredText, AppError> {
    if bytes.is_empty() {
        return Err(AppError::Validation("The uploaded file is empty".to_string()));
    }
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::Validation(format!(
            "The uploaded file is larger than {} MB",
            MAX_UPLOAD_BYTES / (1024 * 1024)
        )));
    }

    let kind = ResumeFileKind::detect(file_name, content_type, &bytes).ok_or_else(|| {
        AppError::Validation("Unsupported file type. Upload a .txt or .pdf file".to_string())
    })?;

    let text = match kind {
        ResumeFileKind::PlainText => String::from_utf8_lossy(&bytes).into_owned(),
        ResumeFileKind::Pdf => {
            let text = decoder.extract_text(bytes).await?;
            if text.is_empty() {
                warn!("PDF {:?} produced no text; likely image-only", file_name);
                return Err(AppError::Decode(
                    "no extractable text (image-only PDFs are not supported)".to_string(),
                ));
            }
            text
        }
    };

    let characters = text.chars().count();
    info!("Acquired {characters} characters of resume text from {kind:?} upload");

    Ok(AcquiredText {
        kind,
        text,
        characters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::pdf::build_pdf;

    #[test]
    fn test_detect_by_content_type() {
        assert_eq!(
            ResumeFileKind::detect(Some("resume.bin"), Some("application/pdf"), b""),
            Some(ResumeFileKind::Pdf)
        );
        assert_eq!(
            ResumeFileKind::detect(None, Some("text/plain; charset=utf-8"), b""),
            Some(ResumeFileKind::PlainText)
        );
    }

    #[test]
    fn test_detect_by_extension() {
        assert_eq!(
            ResumeFileKind::detect(Some("CV.PDF"), Some("application/octet-stream"), b""),
            Some(ResumeFileKind::Pdf)
        );
        assert_eq!(
            ResumeFileKind::detect(Some("cv.txt"), None, b""),
            Some(ResumeFileKind::PlainText)
        );
    }

    #[test]
    fn test_detect_by_magic_bytes() {
        assert_eq!(
            ResumeFileKind::detect(Some("upload"), None, b"%PDF-1.7\n..."),
            Some(ResumeFileKind::Pdf)
        );
    }

    #[test]
    fn test_detect_unsupported() {
        assert_eq!(ResumeFileKind::detect(Some("cv.docx"), None, b"PK\x03\x04"), None);
    }

    #[tokio::test]
    async fn test_plain_text_read_verbatim() {
        let decoder = PdfDecoder::unchecked();
        let raw = "  Jane Doe\n\nRust engineer  \n";
        let acquired = acquire_resume_text(
            &decoder,
            Some("cv.txt"),
            Some("text/plain"),
            Bytes::from(raw),
        )
        .await
        .unwrap();
        assert_eq!(acquired.kind, ResumeFileKind::PlainText);
        assert_eq!(acquired.text, raw);
        assert_eq!(acquired.characters, raw.chars().count());
    }

    #[tokio::test]
    async fn test_empty_upload_rejected() {
        let decoder = PdfDecoder::unchecked();
        let err = acquire_resume_text(&decoder, Some("cv.txt"), None, Bytes::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_oversized_upload_rejected() {
        let decoder = PdfDecoder::unchecked();
        let bytes = Bytes::from(vec![b'a'; MAX_UPLOAD_BYTES + 1]);
        let err = acquire_resume_text(&decoder, Some("cv.txt"), None, bytes)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_decode_error() {
        let decoder = PdfDecoder::unchecked();
        let err = acquire_resume_text(
            &decoder,
            Some("cv.pdf"),
            Some("application/pdf"),
            Bytes::from_static(b"%PDF-1.4 garbage"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
    }

    #[tokio::test]
    async fn test_pdf_without_text_is_decode_error() {
        let decoder = PdfDecoder::unchecked();
        let pdf = build_pdf(&[vec![]]).unwrap();
        let err = acquire_resume_text(&decoder, Some("scan.pdf"), None, Bytes::from(pdf))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
    }

    #[tokio::test]
    async fn test_pdf_upload_reconstructs_lines() {
        let decoder = PdfDecoder::unchecked();
        let pdf = build_pdf(&[vec![(72, 720, "Jane Doe"), (72, 700, "Skills: Rust")]]).unwrap();
        let acquired = acquire_resume_text(&decoder, Some("cv.pdf"), None, Bytes::from(pdf))
            .await
            .unwrap();
        assert_eq!(acquired.kind, ResumeFileKind::Pdf);
        assert_eq!(acquired.text, "Jane Doe\nSkills: Rust");
    }
}
