//! docnorm-extractors - Format extractors for document normalization.
//!
//! Every extractor turns one source document into an ordered list of text
//! [`Segment`]s behind the shared [`Extractor`] trait:
//!
//! | Name | Extractor |
//! |---|---|
//! | `whisper_speech_to_text` | [`AudioExtractor`] |
//! | `xlsx_to_string` | [`SpreadsheetExtractor`] |
//! | `txt_to_string` | [`TextExtractor`] |
//! | `docx_to_string` | [`DocxExtractor`] |
//! | `pptx_to_string` | [`PresentationExtractor`] |
//! | `azure_di_read` | [`DocumentAnalysisExtractor`] |
//!
//! # Example
//!
//! ```ignore
//! use docnorm_extractors::ExtractorRegistry;
//!
//! let extractor = ExtractorRegistry::global()
//!     .get("pptx_to_string")
//!     .expect("registered");
//! let segments = extractor
//!     .extract("deck.pptx", &serde_json::json!({ "doc_per_slide": true }))
//!     .await?;
//! ```

pub mod audio;
mod azure;
mod document_analysis;
mod docx;
mod factory;
mod ooxml;
mod pptx;
mod registry;
mod spreadsheet;
mod text;

pub use audio::{AudioExtractor, WhisperTranscriber};
pub use azure::AzureDocumentIntelligence;
pub use document_analysis::{DocumentAnalysisExtractor, DocumentAnalysisOptions};
pub use docx::DocxExtractor;
pub use factory::{ExtractorFactory, ExtractorKind};
pub use pptx::{render_slides, PresentationExtractor, PresentationOptions};
pub use registry::ExtractorRegistry;
pub use spreadsheet::{
    render_sheet, sheet_blocks, Orientation, Sheet, SpreadsheetExtractor, SpreadsheetOptions,
};
pub use text::TextExtractor;

pub use docnorm_core::{DocnormError, DocnormResult, Extractor, Segment};
