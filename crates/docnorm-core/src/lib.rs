//! docnorm-core - Core library for docnorm.
//!
//! Provides the types and traits shared by every extractor: the [`Segment`]
//! output unit, the error taxonomy, collaborator traits, collaborator
//! configuration, audio window planning and the structured-document renderer.
//!
//! # Example
//!
//! ```ignore
//! use docnorm_core::analysis::{render, AnalyzeResult, RenderConfig};
//!
//! let config = RenderConfig {
//!     include_line_numbers: true,
//!     doc_per_page: true,
//!     ..Default::default()
//! };
//! let segments = render(&result, &config);
//! ```

pub mod analysis;
pub mod chunking;
pub mod config;
pub mod error;
pub mod segment;
pub mod traits;

// Re-export commonly used types
pub use analysis::{AnalyzeResult, RenderConfig};
pub use chunking::{AudioWindow, ChunkingPolicy};
pub use config::{DocumentIntelligenceConfig, TranscriptionConfig};
pub use error::{DocnormError, DocnormResult, ErrorCode};
pub use segment::Segment;
pub use traits::{parse_options, DocumentAnalyzer, DocumentSource, Extractor, Transcriber};
