//! Structured document analysis: the result model and its renderer.

mod render;
mod types;

pub use render::{
    page_lines, render, render_page, selection_mark_lines, style_lines, RenderConfig,
};
pub use types::{
    AnalyzeResult, DocumentLine, DocumentPage, DocumentSpan, DocumentStyle, SelectionMark,
};
