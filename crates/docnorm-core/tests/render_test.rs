//! Integration tests for the structured render engine and window planning.
//!
//! Drives the public API the way an extractor does: a service response body
//! is deserialized into an `AnalyzeResult` and rendered under different
//! configurations.

use async_trait::async_trait;
use docnorm_core::analysis::{render, AnalyzeResult, RenderConfig};
use docnorm_core::chunking::{ChunkingPolicy, OVERLAP_MS, WINDOW_LENGTH_MS};
use docnorm_core::{parse_options, DocnormError, DocnormResult, Extractor, Segment};

const SERVICE_RESPONSE: &str = r#"{
    "apiVersion": "2024-11-30",
    "modelId": "prebuilt-read",
    "content": "Invoice 42\nPaid by Jane\nTotal: 10",
    "pages": [
        {
            "pageNumber": 1,
            "width": 8.5,
            "height": 11,
            "unit": "inch",
            "lines": [
                { "content": "Invoice 42", "polygon": [0.5, 0.5, 2, 0.5, 2, 0.8, 0.5, 0.8] },
                { "content": "Paid by Jane", "polygon": [] }
            ],
            "selectionMarks": [
                { "state": "selected", "polygon": [1, 2, 3, 4], "confidence": 0.5 }
            ]
        },
        {
            "pageNumber": 2,
            "lines": [ { "content": "Total: 10" } ]
        }
    ],
    "styles": [
        { "isHandwritten": true, "spans": [ { "offset": 19, "length": 4 } ], "confidence": 0.9 },
        { "fontStyle": "italic", "spans": [ { "offset": 0, "length": 7 } ], "confidence": 0.7 }
    ]
}"#;

fn service_result() -> AnalyzeResult {
    serde_json::from_str(SERVICE_RESPONSE).unwrap()
}

#[test]
fn test_default_config_renders_labeled_document() {
    let segments = render(&service_result(), &RenderConfig::default());

    assert_eq!(
        segments,
        vec![Segment::from(
            "\n\nPage 1:\nInvoice 42\nPaid by Jane\n\nPage 2:\nTotal: 10"
        )]
    );
}

#[test]
fn test_all_toggles_per_page() {
    let config = RenderConfig {
        include_line_numbers: true,
        include_handwritten: true,
        include_font_styles: true,
        include_selection_marks: true,
        doc_per_page: true,
    };

    let segments = config.render(&service_result());

    assert_eq!(
        segments,
        vec![
            Segment::from("Handwritten content: Jane"),
            Segment::from("'italic' font style: Invoice"),
            Segment::from(
                " Line #0: Invoice 42\n Line #1: Paid by Jane\n\
                 Selection mark #0: State is 'selected' within bounding polygon '[1.0, 2.0, 3.0, 4.0]' and has a confidence of 0.5"
            ),
            Segment::from(" Line #0: Total: 10"),
        ]
    );
}

#[test]
fn test_style_lines_head_the_whole_document() {
    let config = RenderConfig {
        include_handwritten: true,
        include_font_styles: true,
        ..Default::default()
    };

    let segments = config.render(&service_result());

    assert_eq!(segments.len(), 1);
    assert!(segments[0].starts_with(
        "Handwritten content: Jane\n'italic' font style: Invoice\n\nPage 1:\n"
    ));
}

#[test]
fn test_options_json_maps_onto_render_config() {
    let config: RenderConfig = parse_options(
        "azure_di_read",
        &serde_json::json!({ "include_line_numbers": true }),
    )
    .unwrap();

    let segments = config.render(&service_result());
    assert!(segments[0].contains("\n Line #1: Paid by Jane"));
}

#[test]
fn test_one_hour_asset_plan() {
    let policy = ChunkingPolicy::default();
    let duration: u64 = 60 * 60 * 1_000;

    let windows = policy.plan(duration);

    let stride = WINDOW_LENGTH_MS - OVERLAP_MS;
    assert_eq!(windows.len() as u64, duration.div_ceil(stride));
    assert_eq!(windows[0].start_ms, 0);
    assert_eq!(windows[0].end_ms, WINDOW_LENGTH_MS);
    assert_eq!(windows.last().unwrap().end_ms, duration);
    for (index, window) in windows.iter().enumerate() {
        assert_eq!(window.index, index);
        assert!(window.duration_ms() <= WINDOW_LENGTH_MS);
    }
}

/// An extractor that echoes its source, one segment per line.
struct LinesExtractor;

#[derive(Default, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
struct LinesOptions {
    skip_empty: bool,
}

#[async_trait]
impl Extractor for LinesExtractor {
    async fn extract(
        &self,
        source: &str,
        options: &serde_json::Value,
    ) -> DocnormResult<Vec<Segment>> {
        let options: LinesOptions = parse_options(self.name(), options)?;
        Ok(source
            .lines()
            .filter(|line| !(options.skip_empty && line.is_empty()))
            .map(Segment::from)
            .collect())
    }

    fn name(&self) -> &str {
        "lines"
    }
}

#[test]
fn test_extractor_trait_object_contract() {
    let extractor: Box<dyn Extractor> = Box::new(LinesExtractor);

    let segments = tokio_test::block_on(
        extractor.extract("a\n\nb", &serde_json::json!({ "skip_empty": true })),
    )
    .unwrap();
    assert_eq!(segments, vec![Segment::from("a"), Segment::from("b")]);

    let err = tokio_test::block_on(extractor.extract("a", &serde_json::json!({ "skip": 1 })))
        .unwrap_err();
    assert!(matches!(err, DocnormError::InvalidOptions { ref extractor, .. } if extractor == "lines"));
}
