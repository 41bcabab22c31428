//! Structured Document Result model.
//!
//! Field names follow the analysis service's JSON (`analyzeResult`) so a
//! response body deserializes straight into [`AnalyzeResult`]. Every
//! collection defaults to empty; rendering degrades instead of failing when
//! the service omits data.

use serde::{Deserialize, Serialize};

/// Hierarchical result of analyzing one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyzeResult {
    /// Flat text of the whole document; spans index into it.
    pub content: String,
    /// Pages in document order.
    pub pages: Vec<DocumentPage>,
    /// Document-level style annotations, in service order.
    pub styles: Vec<DocumentStyle>,
}

impl AnalyzeResult {
    /// Text covered by a span.
    ///
    /// Offsets count Unicode code points. A span reaching past the end of
    /// the content is clamped; one starting past the end yields `""`.
    pub fn span_text(&self, span: &DocumentSpan) -> &str {
        slice_chars(&self.content, span.offset, span.length)
    }
}

/// A `(offset, length)` reference into [`AnalyzeResult::content`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentSpan {
    pub offset: usize,
    pub length: usize,
}

impl DocumentSpan {
    pub fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }
}

/// A style annotation covering one or more spans.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentStyle {
    /// Whether the covered text is handwritten.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_handwritten: Option<bool>,
    /// Named font style, e.g. "italic".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,
    pub spans: Vec<DocumentSpan>,
    pub confidence: f64,
}

impl DocumentStyle {
    /// A handwritten-text annotation.
    pub fn handwritten(spans: Vec<DocumentSpan>) -> Self {
        Self {
            is_handwritten: Some(true),
            spans,
            ..Default::default()
        }
    }

    /// A named font style annotation.
    pub fn font(font_style: impl Into<String>, spans: Vec<DocumentSpan>) -> Self {
        Self {
            font_style: Some(font_style.into()),
            spans,
            ..Default::default()
        }
    }
}

/// One page of the analyzed document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentPage {
    /// 1-based page number as reported by the service.
    pub page_number: u32,
    pub lines: Vec<DocumentLine>,
    pub selection_marks: Vec<SelectionMark>,
}

impl DocumentPage {
    /// A page holding only the given lines.
    pub fn with_lines<I, S>(page_number: u32, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            page_number,
            lines: lines.into_iter().map(DocumentLine::new).collect(),
            selection_marks: Vec::new(),
        }
    }
}

/// A recognized text line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentLine {
    pub content: String,
    pub polygon: Vec<f64>,
    pub spans: Vec<DocumentSpan>,
}

impl DocumentLine {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }
}

/// A detected checkbox or radio mark.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionMark {
    /// "selected" or "unselected".
    pub state: String,
    /// Bounding polygon as a flat `[x1, y1, x2, y2, ...]` list.
    pub polygon: Vec<f64>,
    pub confidence: f64,
}

fn slice_chars(text: &str, offset: usize, length: usize) -> &str {
    let mut bounds = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()));

    let Some(start) = bounds.nth(offset) else {
        return "";
    };
    let end = if length == 0 {
        start
    } else {
        bounds.nth(length - 1).unwrap_or(text.len())
    };

    &text[start..end]
}
