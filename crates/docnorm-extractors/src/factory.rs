//! Extractor kinds and the factory that builds them.

use std::sync::Arc;

use docnorm_core::Extractor;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::{
    AudioExtractor, DocumentAnalysisExtractor, DocxExtractor, PresentationExtractor,
    SpreadsheetExtractor, TextExtractor,
};

/// The closed set of extractors, by registry name.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    IntoStaticStr,
)]
pub enum ExtractorKind {
    /// Speech-to-text for audio and video files.
    #[strum(serialize = "whisper_speech_to_text")]
    Audio,
    /// Spreadsheet cells by column or by row.
    #[strum(serialize = "xlsx_to_string")]
    Spreadsheet,
    /// Plain text file, whole.
    #[strum(serialize = "txt_to_string")]
    PlainText,
    /// Word-processing document paragraphs.
    #[strum(serialize = "docx_to_string")]
    Docx,
    /// Presentation slide text.
    #[strum(serialize = "pptx_to_string")]
    Presentation,
    /// Structured document analysis (read model).
    #[strum(serialize = "azure_di_read")]
    DocumentAnalysis,
}

impl ExtractorKind {
    /// Registry name of this kind.
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Every kind, in declaration order.
    pub fn all() -> impl Iterator<Item = ExtractorKind> {
        Self::iter()
    }
}

/// Factory for creating extractors.
pub struct ExtractorFactory;

impl ExtractorFactory {
    /// Create the extractor for a kind.
    pub fn create(kind: ExtractorKind) -> Arc<dyn Extractor> {
        match kind {
            ExtractorKind::Audio => Self::audio(),
            ExtractorKind::Spreadsheet => Self::spreadsheet(),
            ExtractorKind::PlainText => Self::text(),
            ExtractorKind::Docx => Self::docx(),
            ExtractorKind::Presentation => Self::presentation(),
            ExtractorKind::DocumentAnalysis => Self::document_analysis(),
        }
    }

    /// Create a Whisper-backed audio extractor.
    pub fn audio() -> Arc<dyn Extractor> {
        Arc::new(AudioExtractor::new())
    }

    pub fn spreadsheet() -> Arc<dyn Extractor> {
        Arc::new(SpreadsheetExtractor::new())
    }

    pub fn text() -> Arc<dyn Extractor> {
        Arc::new(TextExtractor::new())
    }

    pub fn docx() -> Arc<dyn Extractor> {
        Arc::new(DocxExtractor::new())
    }

    pub fn presentation() -> Arc<dyn Extractor> {
        Arc::new(PresentationExtractor::new())
    }

    /// Create an Azure Document Intelligence backed extractor.
    pub fn document_analysis() -> Arc<dyn Extractor> {
        Arc::new(DocumentAnalysisExtractor::new())
    }

    /// Get all extractors, in declaration order.
    pub fn all() -> Vec<Arc<dyn Extractor>> {
        ExtractorKind::all().map(Self::create).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_kind_names() {
        let names: Vec<&str> = ExtractorKind::all().map(ExtractorKind::as_str).collect();
        assert_eq!(
            names,
            vec![
                "whisper_speech_to_text",
                "xlsx_to_string",
                "txt_to_string",
                "docx_to_string",
                "pptx_to_string",
                "azure_di_read",
            ]
        );
    }

    #[test]
    fn test_kind_parses_from_name() {
        assert_eq!(
            ExtractorKind::from_str("pptx_to_string").unwrap(),
            ExtractorKind::Presentation
        );
        assert_eq!(ExtractorKind::Docx.to_string(), "docx_to_string");
        assert!(ExtractorKind::from_str("pdf_to_string").is_err());
    }

    #[test]
    fn test_created_extractor_reports_its_kind() {
        for kind in ExtractorKind::all() {
            assert_eq!(ExtractorFactory::create(kind).name(), kind.as_str());
        }
    }

    #[test]
    fn test_factory_all_extractors() {
        assert_eq!(ExtractorFactory::all().len(), 6);
    }
}
