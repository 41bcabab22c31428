//! DocumentAnalyzer trait - the structured-document-analysis collaborator.

use async_trait::async_trait;

use crate::analysis::AnalyzeResult;
use crate::error::DocnormResult;

/// What to hand the analysis service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// Raw document bytes read from a local file.
    Bytes(Vec<u8>),
    /// A URL the service fetches itself.
    Url(String),
}

/// Produces a Structured Document Result for one document.
#[async_trait]
pub trait DocumentAnalyzer: Send + Sync {
    /// Analyze a document and wait for the finished result.
    async fn analyze(&self, source: DocumentSource) -> DocnormResult<AnalyzeResult>;

    /// Identifier of the analysis model in use.
    fn model_id(&self) -> &str;
}
