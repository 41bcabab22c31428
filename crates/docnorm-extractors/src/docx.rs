//! DOCX text extraction using docx-rs.
//!
//! Only top-level body paragraphs are read. Tables, headers and footers are
//! not part of the output.

use async_trait::async_trait;
use docnorm_core::{DocnormError, DocnormResult, Extractor, Segment};
use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use serde::Deserialize;

use crate::ExtractorKind;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DocxOptions {}

/// DOCX extractor using the docx-rs library.
///
/// Wraps the synchronous docx-rs parser in spawn_blocking to avoid blocking
/// the async runtime.
#[derive(Debug, Clone, Default)]
pub struct DocxExtractor;

impl DocxExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract paragraph text synchronously (called within spawn_blocking).
    fn extract_sync(content: Vec<u8>) -> DocnormResult<String> {
        let docx = docx_rs::read_docx(&content)
            .map_err(|e| DocnormError::parse("docx", format!("Failed to parse DOCX: {}", e)))?;

        let paragraphs: Vec<String> = docx
            .document
            .children
            .iter()
            .filter_map(|child| match child {
                DocumentChild::Paragraph(p) => Some(Self::extract_paragraph_text(p)),
                _ => None,
            })
            .collect();

        Ok(paragraphs.join("\n"))
    }

    /// Extract text from a paragraph.
    fn extract_paragraph_text(p: &docx_rs::Paragraph) -> String {
        let mut text = String::new();

        for child in &p.children {
            match child {
                ParagraphChild::Run(r) => Self::push_run_text(r, &mut text),
                ParagraphChild::Hyperlink(h) => {
                    for child in &h.children {
                        if let ParagraphChild::Run(r) = child {
                            Self::push_run_text(r, &mut text);
                        }
                    }
                }
                _ => {}
            }
        }

        text
    }

    fn push_run_text(run: &docx_rs::Run, text: &mut String) {
        for run_child in &run.children {
            match run_child {
                RunChild::Text(t) => text.push_str(&t.text),
                RunChild::Tab(_) => text.push('\t'),
                RunChild::Break(_) => text.push('\n'),
                _ => {}
            }
        }
    }
}

#[async_trait]
impl Extractor for DocxExtractor {
    #[tracing::instrument(skip(self, options), fields(extractor = self.name()))]
    async fn extract(
        &self,
        source: &str,
        options: &serde_json::Value,
    ) -> DocnormResult<Vec<Segment>> {
        let _: DocxOptions = docnorm_core::parse_options(self.name(), options)?;

        let content = tokio::fs::read(source).await?;
        let content_len = content.len();

        let text = tokio::task::spawn_blocking(move || Self::extract_sync(content)).await??;

        tracing::info!(bytes = content_len, chars = text.len(), "DOCX extracted");
        Ok(vec![Segment::from(text)])
    }

    fn name(&self) -> &str {
        ExtractorKind::Docx.as_str()
    }
}
