//! PPTX text extraction using zip and quick-xml.
//!
//! Slides are read in presentation order: the slide id list in
//! `ppt/presentation.xml` resolved through `ppt/_rels/presentation.xml.rels`.
//! Within a slide, every top-level autoshape contributes its paragraphs,
//! newline-joined; an autoshape without a text body contributes an empty
//! entry. Grouped shapes, pictures and tables are skipped.

use std::collections::HashMap;
use std::io::Cursor;

use async_trait::async_trait;
use docnorm_core::{DocnormError, DocnormResult, Extractor, Segment};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};

use crate::ooxml::{attribute, read_part};
use crate::ExtractorKind;

const FORMAT: &str = "pptx";
const PRESENTATION_PART: &str = "ppt/presentation.xml";
const PRESENTATION_RELS_PART: &str = "ppt/_rels/presentation.xml.rels";

/// Options accepted by [`PresentationExtractor`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PresentationOptions {
    /// One segment per slide instead of one for the whole deck.
    pub doc_per_slide: bool,
}

fn parse_error(message: impl Into<String>) -> DocnormError {
    DocnormError::parse(FORMAT, message)
}

/// Turn per-slide shape texts into segments.
pub fn render_slides(slides: &[Vec<String>], doc_per_slide: bool) -> Vec<Segment> {
    if doc_per_slide {
        slides
            .iter()
            .map(|shapes| Segment::from(shapes.join("\n")))
            .collect()
    } else {
        let all: Vec<&str> = slides.iter().flatten().map(String::as_str).collect();
        vec![Segment::from(all.join("\n"))]
    }
}

/// Zip part names of the slides, in presentation order.
pub fn slide_order(presentation_xml: &str, rels_xml: &str) -> DocnormResult<Vec<String>> {
    let targets = relationship_targets(rels_xml)?;
    let ids = slide_relationship_ids(presentation_xml)?;

    ids.iter()
        .map(|id| {
            targets
                .get(id)
                .map(|target| resolve_part("ppt", target))
                .ok_or_else(|| parse_error(format!("slide relationship '{}' not found", id)))
        })
        .collect()
}

/// `r:id` of every `p:sldId`, in document order.
fn slide_relationship_ids(xml: &str) -> DocnormResult<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut ids = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.local_name().as_ref() == b"sldId" => {
                if let Some(id) = relationship_id(&e)? {
                    ids.push(id);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(parse_error(format!("presentation.xml: {}", e))),
        }
    }

    Ok(ids)
}

/// The namespaced `id` attribute (`r:id`), as opposed to the numeric `id`.
fn relationship_id(element: &BytesStart) -> DocnormResult<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| parse_error(format!("attribute: {}", e)))?;
        if attr.key.prefix().is_some() && attr.key.local_name().as_ref() == b"id" {
            let value = attr
                .unescape_value()
                .map_err(|e| parse_error(format!("attribute: {}", e)))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Relationship id to target, from a `.rels` part.
fn relationship_targets(xml: &str) -> DocnormResult<HashMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    let mut targets = HashMap::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let id = attribute(&e, FORMAT, b"Id")?;
                let target = attribute(&e, FORMAT, b"Target")?;
                if let (Some(id), Some(target)) = (id, target) {
                    targets.insert(id, target);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(parse_error(format!("relationships: {}", e))),
        }
    }

    Ok(targets)
}

/// Resolve a relationship target against the directory of its source part.
fn resolve_part(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut parts: Vec<&str> = base_dir.split('/').filter(|p| !p.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    parts.join("/")
}

/// Text of one top-level shape being collected.
#[derive(Default)]
struct ShapeText {
    depth: usize,
    paragraphs: Vec<String>,
}

/// Texts of the top-level autoshapes on one slide, in z-order.
pub fn slide_texts(xml: &str) -> DocnormResult<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut shape: Option<ShapeText> = None;
    let mut texts = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.local_name().as_ref().to_vec();
                if let Some(current) = shape.as_mut() {
                    open_in_shape(current, &stack, &name);
                } else if name == b"sp" && is_top_level(&stack) {
                    shape = Some(ShapeText {
                        depth: stack.len(),
                        ..Default::default()
                    });
                }
                stack.push(name);
            }
            Ok(Event::Empty(e)) => {
                if let Some(current) = shape.as_mut() {
                    open_in_shape(current, &stack, e.local_name().as_ref());
                }
            }
            Ok(Event::Text(e)) => {
                if let Some(current) = shape.as_mut() {
                    if stack.last().map(Vec::as_slice) == Some(b"t".as_slice()) {
                        let text = e
                            .unescape()
                            .map_err(|e| parse_error(format!("slide text: {}", e)))?;
                        if let Some(paragraph) = current.paragraphs.last_mut() {
                            paragraph.push_str(&text);
                        }
                    }
                }
            }
            Ok(Event::End(_)) => {
                stack.pop();
                if shape.as_ref().is_some_and(|s| s.depth == stack.len()) {
                    if let Some(done) = shape.take() {
                        texts.push(done.paragraphs.join("\n"));
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(parse_error(format!("slide: {}", e))),
        }
    }

    Ok(texts)
}

/// A shape directly inside the slide's own shape tree.
fn is_top_level(stack: &[Vec<u8>]) -> bool {
    stack.last().map(Vec::as_slice) == Some(b"spTree".as_slice())
        && stack
            .iter()
            .filter(|name| name.as_slice() == b"spTree" || name.as_slice() == b"grpSp")
            .count()
            == 1
}

fn open_in_shape(shape: &mut ShapeText, stack: &[Vec<u8>], name: &[u8]) {
    match name {
        b"p" if stack.last().map(Vec::as_slice) == Some(b"txBody".as_slice()) => {
            shape.paragraphs.push(String::new());
        }
        b"br" => {
            if let Some(paragraph) = shape.paragraphs.last_mut() {
                paragraph.push('\n');
            }
        }
        _ => {}
    }
}

/// Read every slide's shape texts from a PPTX archive.
fn load_slides(content: Vec<u8>) -> DocnormResult<Vec<Vec<String>>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(content))
        .map_err(|e| parse_error(format!("Invalid PPTX archive: {}", e)))?;

    let presentation = read_part(&mut archive, FORMAT, PRESENTATION_PART)?;
    let rels = read_part(&mut archive, FORMAT, PRESENTATION_RELS_PART)?;

    slide_order(&presentation, &rels)?
        .iter()
        .map(|part| slide_texts(&read_part(&mut archive, FORMAT, part)?))
        .collect()
}

/// Presentation extractor for PPTX decks.
#[derive(Debug, Clone, Default)]
pub struct PresentationExtractor;

impl PresentationExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Extractor for PresentationExtractor {
    #[tracing::instrument(skip(self, options), fields(extractor = self.name()))]
    async fn extract(
        &self,
        source: &str,
        options: &serde_json::Value,
    ) -> DocnormResult<Vec<Segment>> {
        let options: PresentationOptions = docnorm_core::parse_options(self.name(), options)?;

        let content = tokio::fs::read(source).await?;
        let slides = tokio::task::spawn_blocking(move || load_slides(content)).await??;

        let segments = render_slides(&slides, options.doc_per_slide);
        tracing::info!(
            slides = slides.len(),
            segments = segments.len(),
            "Presentation extracted"
        );
        Ok(segments)
    }

    fn name(&self) -> &str {
        ExtractorKind::Presentation.as_str()
    }
}
