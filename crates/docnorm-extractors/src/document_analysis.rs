//! Structured document analysis extractor.
//!
//! Sends a document (or its URL) to the analysis service and flattens the
//! returned pages, lines, styles and selection marks into segments with the
//! render engine from `docnorm_core::analysis`.

use std::sync::Arc;

use async_trait::async_trait;
use docnorm_core::analysis::RenderConfig;
use docnorm_core::{DocnormResult, DocumentAnalyzer, DocumentSource, Extractor, Segment};
use serde::{Deserialize, Serialize};

use crate::azure::AzureDocumentIntelligence;
use crate::ExtractorKind;

/// Options accepted by [`DocumentAnalysisExtractor`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocumentAnalysisOptions {
    /// Treat the source as a URL the service fetches itself.
    pub use_url: bool,
    pub include_line_numbers: bool,
    pub include_handwritten: bool,
    pub include_font_styles: bool,
    pub include_selection_marks: bool,
    pub doc_per_page: bool,
}

impl DocumentAnalysisOptions {
    /// The rendering toggles of these options.
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            include_line_numbers: self.include_line_numbers,
            include_handwritten: self.include_handwritten,
            include_font_styles: self.include_font_styles,
            include_selection_marks: self.include_selection_marks,
            doc_per_page: self.doc_per_page,
        }
    }
}

/// Extractor backed by a structured document analysis service.
///
/// Without an injected analyzer, an Azure Document Intelligence client is
/// built from the environment for each call, so missing credentials fail
/// before the source is touched.
#[derive(Clone, Default)]
pub struct DocumentAnalysisExtractor {
    analyzer: Option<Arc<dyn DocumentAnalyzer>>,
}

impl DocumentAnalysisExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific analyzer instead of Azure Document Intelligence.
    pub fn with_analyzer(mut self, analyzer: Arc<dyn DocumentAnalyzer>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    fn acquire_analyzer(&self) -> DocnormResult<Arc<dyn DocumentAnalyzer>> {
        match &self.analyzer {
            Some(analyzer) => Ok(Arc::clone(analyzer)),
            None => Ok(Arc::new(AzureDocumentIntelligence::from_env()?)),
        }
    }
}

#[async_trait]
impl Extractor for DocumentAnalysisExtractor {
    #[tracing::instrument(skip(self, options), fields(extractor = self.name()))]
    async fn extract(
        &self,
        source: &str,
        options: &serde_json::Value,
    ) -> DocnormResult<Vec<Segment>> {
        let options: DocumentAnalysisOptions = docnorm_core::parse_options(self.name(), options)?;
        let analyzer = self.acquire_analyzer()?;

        let document = if options.use_url {
            DocumentSource::Url(source.to_string())
        } else {
            DocumentSource::Bytes(tokio::fs::read(source).await?)
        };

        let result = analyzer.analyze(document).await?;
        let segments = options.render_config().render(&result);

        tracing::info!(
            pages = result.pages.len(),
            segments = segments.len(),
            "Document analysis completed"
        );
        Ok(segments)
    }

    fn name(&self) -> &str {
        ExtractorKind::DocumentAnalysis.as_str()
    }
}
