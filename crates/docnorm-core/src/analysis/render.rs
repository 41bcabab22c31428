//! Structured Render Engine.
//!
//! Flattens an [`AnalyzeResult`] into segments. Each toggle in
//! [`RenderConfig`] drives exactly one pass:
//!
//! - style pass: handwritten and font-style summary lines
//! - line pass: page lines, optionally numbered
//! - selection-mark pass: one descriptive line per mark
//!
//! The passes are assembled per page (`doc_per_page`) or into a single
//! labeled document. Rendering is a pure function of its two inputs.

use serde::{Deserialize, Serialize};

use super::types::{AnalyzeResult, DocumentPage, DocumentStyle, SelectionMark};
use crate::segment::Segment;

/// Formatting toggles for structured-document rendering.
///
/// No toggle implies another and every combination is valid, including the
/// all-false default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Prefix each line with ` Line #<index>: `.
    pub include_line_numbers: bool,
    /// Emit a summary line for each handwritten style.
    pub include_handwritten: bool,
    /// Emit a summary line for each named font style.
    pub include_font_styles: bool,
    /// Describe selection marks after each page's lines.
    pub include_selection_marks: bool,
    /// One segment per page instead of one labeled document.
    pub doc_per_page: bool,
}

impl RenderConfig {
    /// Render a result with this configuration.
    pub fn render(&self, result: &AnalyzeResult) -> Vec<Segment> {
        render(result, self)
    }
}

/// Render a Structured Document Result into ordered segments.
pub fn render(result: &AnalyzeResult, config: &RenderConfig) -> Vec<Segment> {
    let styles = style_lines(result, config);
    let pages: Vec<String> = result
        .pages
        .iter()
        .map(|page| render_page(page, config))
        .collect();

    if config.doc_per_page {
        styles
            .into_iter()
            .chain(pages)
            .map(Segment::from)
            .collect()
    } else {
        vec![Segment::from(assemble_document(&styles, &pages))]
    }
}

/// Style pass: summary lines in the order the service returned the styles.
///
/// A style that is both handwritten and carries a font style yields two
/// lines, handwritten first.
pub fn style_lines(result: &AnalyzeResult, config: &RenderConfig) -> Vec<String> {
    let mut lines = Vec::new();

    for style in &result.styles {
        if config.include_handwritten && style.is_handwritten == Some(true) {
            lines.push(format!(
                "Handwritten content: {}",
                joined_span_text(result, style)
            ));
        }

        if config.include_font_styles {
            if let Some(font_style) = &style.font_style {
                lines.push(format!(
                    "'{}' font style: {}",
                    font_style,
                    joined_span_text(result, style)
                ));
            }
        }
    }

    lines
}

/// Line pass for one page.
pub fn page_lines(page: &DocumentPage, config: &RenderConfig) -> Vec<String> {
    page.lines
        .iter()
        .enumerate()
        .map(|(index, line)| {
            if config.include_line_numbers {
                format!(" Line #{}: {}", index, line.content)
            } else {
                line.content.clone()
            }
        })
        .collect()
}

/// Selection-mark pass for one page; empty unless enabled.
pub fn selection_mark_lines(page: &DocumentPage, config: &RenderConfig) -> Vec<String> {
    if !config.include_selection_marks {
        return Vec::new();
    }

    page.selection_marks
        .iter()
        .enumerate()
        .map(|(index, mark)| describe_selection_mark(index, mark))
        .collect()
}

/// A page's rendered text: its lines, then its marks, newline-joined.
pub fn render_page(page: &DocumentPage, config: &RenderConfig) -> String {
    let mut lines = page_lines(page, config);
    lines.extend(selection_mark_lines(page, config));
    lines.join("\n")
}

fn describe_selection_mark(index: usize, mark: &SelectionMark) -> String {
    format!(
        "Selection mark #{}: State is '{}' within bounding polygon '{}' and has a confidence of {}",
        index,
        mark.state,
        format_polygon(&mark.polygon),
        format_number(mark.confidence)
    )
}

fn joined_span_text(result: &AnalyzeResult, style: &DocumentStyle) -> String {
    style
        .spans
        .iter()
        .map(|span| result.span_text(span))
        .collect::<Vec<_>>()
        .join(",")
}

// The style section is always present, so an empty one still contributes
// its "\n\n" separator ahead of the first page label.
fn assemble_document(styles: &[String], pages: &[String]) -> String {
    let labeled_pages = pages
        .iter()
        .enumerate()
        .map(|(index, text)| format!("Page {}:\n{}", index + 1, text))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("{}\n\n{}", styles.join("\n"), labeled_pages)
}

fn format_polygon(polygon: &[f64]) -> String {
    let points = polygon
        .iter()
        .map(|value| format_number(*value))
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{}]", points)
}

/// Shortest round-trip form, keeping `.0` on integral values.
fn format_number(value: f64) -> String {
    format!("{:?}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::types::DocumentSpan;

    fn two_page_result() -> AnalyzeResult {
        AnalyzeResult {
            content: "A\nB\nC".to_string(),
            pages: vec![
                DocumentPage::with_lines(1, ["A", "B"]),
                DocumentPage::with_lines(2, ["C"]),
            ],
            styles: Vec::new(),
        }
    }

    fn styled_result() -> AnalyzeResult {
        AnalyzeResult {
            content: "Signed John Smith on Monday".to_string(),
            pages: vec![DocumentPage::with_lines(1, ["Signed John Smith on Monday"])],
            styles: vec![
                DocumentStyle::handwritten(vec![
                    DocumentSpan::new(7, 4),
                    DocumentSpan::new(12, 5),
                ]),
                DocumentStyle::font("italic", vec![DocumentSpan::new(21, 6)]),
            ],
        }
    }

    #[test]
    fn test_whole_document_without_styles_keeps_leading_separator() {
        let segments = render(&two_page_result(), &RenderConfig::default());
        assert_eq!(segments, vec![Segment::from("\n\nPage 1:\nA\nB\n\nPage 2:\nC")]);
    }

    #[test]
    fn test_per_page_all_toggles_off() {
        let config = RenderConfig {
            doc_per_page: true,
            ..Default::default()
        };
        let segments = render(&two_page_result(), &config);
        assert_eq!(segments, vec![Segment::from("A\nB"), Segment::from("C")]);
    }

    #[test]
    fn test_line_numbers_are_zero_based_per_page() {
        let config = RenderConfig {
            include_line_numbers: true,
            doc_per_page: true,
            ..Default::default()
        };
        let segments = render(&two_page_result(), &config);
        assert_eq!(segments[0], " Line #0: A\n Line #1: B");
        assert_eq!(segments[1], " Line #0: C");
    }

    #[test]
    fn test_style_lines_follow_service_order() {
        let config = RenderConfig {
            include_handwritten: true,
            include_font_styles: true,
            ..Default::default()
        };
        let lines = style_lines(&styled_result(), &config);
        assert_eq!(
            lines,
            vec![
                "Handwritten content: John,Smith".to_string(),
                "'italic' font style: Monday".to_string(),
            ]
        );
    }

    #[test]
    fn test_style_toggles_are_independent() {
        let handwritten_only = RenderConfig {
            include_handwritten: true,
            ..Default::default()
        };
        assert_eq!(
            style_lines(&styled_result(), &handwritten_only),
            vec!["Handwritten content: John,Smith".to_string()]
        );

        let fonts_only = RenderConfig {
            include_font_styles: true,
            ..Default::default()
        };
        assert_eq!(
            style_lines(&styled_result(), &fonts_only),
            vec!["'italic' font style: Monday".to_string()]
        );

        assert!(style_lines(&styled_result(), &RenderConfig::default()).is_empty());
    }

    #[test]
    fn test_style_with_both_annotations_emits_two_lines() {
        let mut result = styled_result();
        result.styles = vec![DocumentStyle {
            is_handwritten: Some(true),
            font_style: Some("bold".to_string()),
            spans: vec![DocumentSpan::new(0, 6)],
            confidence: 0.5,
        }];
        let config = RenderConfig {
            include_handwritten: true,
            include_font_styles: true,
            ..Default::default()
        };

        assert_eq!(
            style_lines(&result, &config),
            vec![
                "Handwritten content: Signed".to_string(),
                "'bold' font style: Signed".to_string(),
            ]
        );
    }

    #[test]
    fn test_per_page_style_lines_lead_as_own_segments() {
        let config = RenderConfig {
            include_handwritten: true,
            include_font_styles: true,
            doc_per_page: true,
            ..Default::default()
        };
        let segments = render(&styled_result(), &config);
        assert_eq!(
            segments,
            vec![
                Segment::from("Handwritten content: John,Smith"),
                Segment::from("'italic' font style: Monday"),
                Segment::from("Signed John Smith on Monday"),
            ]
        );
    }

    #[test]
    fn test_whole_document_with_styles() {
        let config = RenderConfig {
            include_handwritten: true,
            ..Default::default()
        };
        let segments = render(&styled_result(), &config);
        assert_eq!(
            segments,
            vec![Segment::from(
                "Handwritten content: John,Smith\n\nPage 1:\nSigned John Smith on Monday"
            )]
        );
    }

    #[test]
    fn test_selection_marks_follow_lines() {
        let mut result = two_page_result();
        result.pages[1].selection_marks = vec![
            SelectionMark {
                state: "selected".to_string(),
                polygon: vec![1.0, 2.5, 3.0, 2.5],
                confidence: 0.988,
            },
            SelectionMark {
                state: "unselected".to_string(),
                polygon: Vec::new(),
                confidence: 1.0,
            },
        ];
        let config = RenderConfig {
            include_selection_marks: true,
            doc_per_page: true,
            ..Default::default()
        };

        let segments = render(&result, &config);

        assert_eq!(segments[0], "A\nB");
        assert_eq!(
            segments[1],
            "C\n\
             Selection mark #0: State is 'selected' within bounding polygon '[1.0, 2.5, 3.0, 2.5]' and has a confidence of 0.988\n\
             Selection mark #1: State is 'unselected' within bounding polygon '[]' and has a confidence of 1.0"
        );
    }

    #[test]
    fn test_selection_marks_hidden_when_disabled() {
        let mut result = two_page_result();
        result.pages[0].selection_marks = vec![SelectionMark::default()];
        let config = RenderConfig {
            doc_per_page: true,
            ..Default::default()
        };
        assert_eq!(render(&result, &config)[0], "A\nB");
    }

    #[test]
    fn test_empty_page_renders_empty_text() {
        let result = AnalyzeResult {
            pages: vec![DocumentPage::default()],
            ..Default::default()
        };
        let per_page = RenderConfig {
            doc_per_page: true,
            ..Default::default()
        };
        assert_eq!(render(&result, &per_page), vec![Segment::from("")]);
        assert_eq!(
            render(&result, &RenderConfig::default()),
            vec![Segment::from("\n\nPage 1:\n")]
        );
    }

    #[test]
    fn test_render_is_deterministic_for_every_config() {
        let mut result = styled_result();
        result.pages[0].selection_marks = vec![SelectionMark {
            state: "selected".to_string(),
            polygon: vec![0.1, 0.2],
            confidence: 0.5,
        }];

        for bits in 0u8..32 {
            let config = RenderConfig {
                include_line_numbers: bits & 1 != 0,
                include_handwritten: bits & 2 != 0,
                include_font_styles: bits & 4 != 0,
                include_selection_marks: bits & 8 != 0,
                doc_per_page: bits & 16 != 0,
            };
            let first = config.render(&result);
            let second = config.render(&result);
            assert_eq!(first, second);
            assert!(!first.is_empty());
        }
    }
}
