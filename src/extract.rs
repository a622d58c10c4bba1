//! The text-extraction boundary (spec §6).
//!
//! The engine never decodes documents, archives, or images itself — it
//! only gates which media classes are *offered* to an extractor via
//! [`crate::ignore::IgnoreList::enable_documents`] and friends. A real
//! deployment supplies its own [`TextExtractor`] backed by an office/PDF
//! parser, an archive reader, and/or OCR; [`NullExtractor`] ships as the
//! crate's self-contained default.

use crate::error::ExtractError;
use crate::image_analyzer::ImageMeta;
use std::path::Path;

/// Plain text recovered from a non-trivially-textual file, plus the format
/// tag the extractor recognized it as (`"pdf"`, `"docx"`, `"zip-member"`,
/// `"ocr"`, ...) and, for images, the decoded pixel dimensions the image
/// document analyzer needs for its geometry/quality signals.
#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub text: String,
    pub format: String,
    pub image_meta: Option<ImageMeta>,
}

/// Capability to turn a document/archive/image file into plain text.
///
/// Implementers are expected to be cheap to clone or share via `Arc`, and
/// `Send + Sync` so the worker pool can call them from any thread.
pub trait TextExtractor: Send + Sync {
    /// Extracts text from `path`. `rotation_degrees` is one of
    /// `{0, 90, 180, 270}`; an implementation that can re-decode and re-OCR
    /// an image at a given orientation should honor it, returning text (and
    /// `image_meta`) as seen after that rotation. Implementations that
    /// don't support rotation may ignore the parameter and always answer
    /// for the image's natural orientation.
    fn extract(&self, path: &Path, rotation_degrees: u16) -> Result<ExtractedText, ExtractError>;
}

/// The crate's self-contained default: every call fails with "unsupported
/// media". Embedders supply a real extractor backed by their own
/// office/PDF/archive/OCR stack.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullExtractor;

impl TextExtractor for NullExtractor {
    fn extract(&self, path: &Path, _rotation_degrees: u16) -> Result<ExtractedText, ExtractError> {
        Err(ExtractError {
            path: path.to_path_buf(),
            reason: "no text extractor configured for this media type".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn null_extractor_always_errors() {
        let extractor = NullExtractor;
        let result = extractor.extract(&PathBuf::from("report.pdf"), 0);
        assert!(result.is_err());
    }
}
