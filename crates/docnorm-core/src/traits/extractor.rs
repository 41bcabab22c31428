//! Extractor trait and option parsing.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::{DocnormError, DocnormResult};
use crate::segment::Segment;

/// Core Extractor trait - every format extractor implements this.
///
/// `source` is a file path, or a URL for extractors that accept one.
/// `options` is a JSON object holding the format-specific options; `null`
/// selects the defaults.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Convert one source document into an ordered sequence of segments.
    async fn extract(
        &self,
        source: &str,
        options: &serde_json::Value,
    ) -> DocnormResult<Vec<Segment>>;

    /// Registry name of this extractor.
    fn name(&self) -> &str;
}

/// Deserialize an extractor's options, treating `null` as the defaults.
pub fn parse_options<T>(extractor: &str, options: &serde_json::Value) -> DocnormResult<T>
where
    T: DeserializeOwned + Default,
{
    if options.is_null() {
        return Ok(T::default());
    }

    serde_json::from_value(options.clone())
        .map_err(|e| DocnormError::invalid_options(extractor, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(default, deny_unknown_fields)]
    struct SampleOptions {
        doc_per_slide: bool,
    }

    #[test]
    fn test_null_options_use_defaults() {
        let options: SampleOptions = parse_options("sample", &serde_json::Value::Null).unwrap();
        assert_eq!(options, SampleOptions::default());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let options: SampleOptions = parse_options("sample", &serde_json::json!({})).unwrap();
        assert!(!options.doc_per_slide);
    }

    #[test]
    fn test_unknown_option_is_rejected() {
        let result: DocnormResult<SampleOptions> =
            parse_options("sample", &serde_json::json!({ "per_slide": true }));
        match result {
            Err(DocnormError::InvalidOptions { extractor, .. }) => assert_eq!(extractor, "sample"),
            other => panic!("expected invalid options, got {:?}", other),
        }
    }
}
