//! Plain-text extraction.

use async_trait::async_trait;
use docnorm_core::{DocnormResult, Extractor, Segment};
use serde::Deserialize;

use crate::ExtractorKind;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TextOptions {}

/// Reads a UTF-8 text file whole into a single segment.
#[derive(Debug, Clone, Default)]
pub struct TextExtractor;

impl TextExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Extractor for TextExtractor {
    #[tracing::instrument(skip(self, options), fields(extractor = self.name()))]
    async fn extract(
        &self,
        source: &str,
        options: &serde_json::Value,
    ) -> DocnormResult<Vec<Segment>> {
        let _: TextOptions = docnorm_core::parse_options(self.name(), options)?;

        let text = tokio::fs::read_to_string(source).await?;
        tracing::info!(chars = text.len(), "Text file read");

        Ok(vec![Segment::from(text)])
    }

    fn name(&self) -> &str {
        ExtractorKind::PlainText.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docnorm_core::DocnormError;

    #[tokio::test]
    async fn test_whole_file_is_one_segment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "first line\nsecond line\n").unwrap();

        let segments = TextExtractor::new()
            .extract(path.to_str().unwrap(), &serde_json::Value::Null)
            .await
            .unwrap();

        assert_eq!(segments, vec![Segment::from("first line\nsecond line\n")]);
    }

    #[tokio::test]
    async fn test_empty_file_yields_one_empty_segment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, "").unwrap();

        let segments = TextExtractor::new()
            .extract(path.to_str().unwrap(), &serde_json::json!({}))
            .await
            .unwrap();

        assert_eq!(segments, vec![Segment::from("")]);
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("binary.txt");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0xc3]).unwrap();

        let result = TextExtractor::new()
            .extract(path.to_str().unwrap(), &serde_json::Value::Null)
            .await;

        assert!(matches!(result, Err(DocnormError::Io(_))));
    }

    #[tokio::test]
    async fn test_missing_file_fails() {
        let result = TextExtractor::new()
            .extract("/nonexistent/notes.txt", &serde_json::Value::Null)
            .await;
        assert!(matches!(result, Err(DocnormError::Io(_))));
    }
}
