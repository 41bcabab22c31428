//! Core traits for docnorm extractors and their collaborators.

mod analyzer;
mod extractor;
mod transcriber;

pub use analyzer::*;
pub use extractor::*;
pub use transcriber::*;
