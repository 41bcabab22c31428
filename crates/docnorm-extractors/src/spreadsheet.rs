//! Spreadsheet extraction using calamine.
//!
//! Each sheet is read into a [`Sheet`] (header row plus data rows of cell
//! text) and rendered into text blocks by a pure function, column by column
//! or row by row. A sheet's blocks are newline-joined into one segment.
//!
//! Without `doc_per_sheet` only the active sheet is emitted. For xlsx/xlsm
//! the active tab is read from `xl/workbook.xml`; other formats use the
//! first sheet.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use calamine::{open_workbook_auto, Data, Range, Reader};
use docnorm_core::{DocnormError, DocnormResult, Extractor, Segment};
use quick_xml::events::Event;
use serde::{Deserialize, Serialize};

use crate::ooxml::{attribute, read_part};
use crate::ExtractorKind;

const FORMAT: &str = "xlsx";
const WORKBOOK_PART: &str = "xl/workbook.xml";

fn parse_error(message: impl Into<String>) -> DocnormError {
    DocnormError::parse(FORMAT, message)
}

/// How cells are arranged in the output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// One block per column: the header, then every value of that column.
    #[default]
    Col,
    /// One block per data row: `header: value` pairs separated by ` | `.
    Row,
}

/// Options accepted by [`SpreadsheetExtractor`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpreadsheetOptions {
    pub orientation: Orientation,
    /// Header names to emit, in this order. Names missing from the header
    /// row are skipped.
    pub col_order: Option<Vec<String>>,
    /// Emit every worksheet instead of only the active one.
    pub doc_per_sheet: bool,
}

/// A worksheet as text: the first row is the header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Indices of the columns to emit, in emission order.
    fn selected_columns(&self, col_order: Option<&[String]>) -> Vec<usize> {
        match col_order {
            Some(names) => names
                .iter()
                .filter_map(|name| self.headers.iter().position(|h| h == name))
                .collect(),
            None => (0..self.headers.len()).collect(),
        }
    }
}

/// Render a sheet into its ordered text blocks.
pub fn sheet_blocks(sheet: &Sheet, options: &SpreadsheetOptions) -> Vec<String> {
    let columns = sheet.selected_columns(options.col_order.as_deref());

    match options.orientation {
        Orientation::Col => columns
            .iter()
            .flat_map(|&column| {
                let values: Vec<&str> = (0..sheet.rows.len())
                    .map(|row| sheet.cell(row, column))
                    .collect();
                [
                    format!("{}: {}", sheet.headers[column], values.join("\n")),
                    String::new(),
                ]
            })
            .collect(),
        Orientation::Row => (0..sheet.rows.len())
            .map(|row| {
                columns
                    .iter()
                    .filter(|&&column| !sheet.headers[column].is_empty())
                    .map(|&column| {
                        format!("{}: {}", sheet.headers[column], sheet.cell(row, column))
                    })
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .collect(),
    }
}

/// Render a sheet into its single segment text.
pub fn render_sheet(sheet: &Sheet, options: &SpreadsheetOptions) -> String {
    sheet_blocks(sheet, options).join("\n")
}

/// Text of one cell. Empty cells are empty strings; integral floats drop
/// their fractional part.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

/// `workbookView@activeTab` of a workbook part, 0 when absent.
fn active_tab(workbook_xml: &str) -> DocnormResult<usize> {
    let mut reader = quick_xml::Reader::from_str(workbook_xml);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e))
                if e.local_name().as_ref() == b"workbookView" =>
            {
                return Ok(attribute(&e, FORMAT, b"activeTab")?
                    .and_then(|tab| tab.parse().ok())
                    .unwrap_or(0));
            }
            Ok(Event::Eof) => return Ok(0),
            Ok(_) => {}
            Err(e) => return Err(parse_error(format!("workbook.xml: {}", e))),
        }
    }
}

/// Index of the active sheet among the workbook's sheets.
fn active_sheet_index(path: &Path) -> DocnormResult<usize> {
    let is_ooxml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "xlsx" | "xlsm"));
    if !is_ooxml {
        return Ok(0);
    }

    let file = std::fs::File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| parse_error(format!("Invalid workbook archive: {}", e)))?;
    active_tab(&read_part(&mut archive, FORMAT, WORKBOOK_PART)?)
}

/// Lay a used range onto the sheet grid.
///
/// calamine trims leading blank rows and columns, so they are restored here:
/// row 1 is always the header row and column A the first column.
fn sheet_from_range(range: &Range<Data>) -> Sheet {
    let Some((start_row, start_col)) = range.start() else {
        return Sheet::default();
    };
    let leading = start_col as usize;

    let mut rows = (0..start_row).map(|_| Vec::new()).chain(range.rows().map(|row| {
        std::iter::repeat(String::new())
            .take(leading)
            .chain(row.iter().map(cell_text))
            .collect::<Vec<String>>()
    }));

    let mut headers = rows.next().unwrap_or_default();
    headers.resize(leading + range.width(), String::new());
    Sheet::new(headers, rows.collect())
}

/// Load worksheets from disk: the active one, or all of them.
fn load_sheets(path: PathBuf, all_sheets: bool) -> DocnormResult<Vec<Sheet>> {
    let mut workbook = open_workbook_auto(&path)
        .map_err(|e| parse_error(format!("Failed to open workbook: {}", e)))?;

    let names = workbook.sheet_names();
    let names: Vec<String> = if all_sheets {
        names
    } else {
        let active = active_sheet_index(&path)?;
        names
            .get(active)
            .or_else(|| names.first())
            .cloned()
            .into_iter()
            .collect()
    };

    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| parse_error(format!("Failed to read sheet '{}': {}", name, e)))?;
        sheets.push(sheet_from_range(&range));
    }

    Ok(sheets)
}

/// Spreadsheet extractor (xlsx, xls, ods).
#[derive(Debug, Clone, Default)]
pub struct SpreadsheetExtractor;

impl SpreadsheetExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Extractor for SpreadsheetExtractor {
    #[tracing::instrument(skip(self, options), fields(extractor = self.name()))]
    async fn extract(
        &self,
        source: &str,
        options: &serde_json::Value,
    ) -> DocnormResult<Vec<Segment>> {
        let options: SpreadsheetOptions = docnorm_core::parse_options(self.name(), options)?;

        let path = PathBuf::from(source);
        let all_sheets = options.doc_per_sheet;
        let sheets = tokio::task::spawn_blocking(move || load_sheets(path, all_sheets)).await??;

        let segments: Vec<Segment> = sheets
            .iter()
            .map(|sheet| Segment::from(render_sheet(sheet, &options)))
            .collect();

        tracing::info!(
            sheets = sheets.len(),
            orientation = ?options.orientation,
            "Spreadsheet extracted"
        );
        Ok(segments)
    }

    fn name(&self) -> &str {
        ExtractorKind::Spreadsheet.as_str()
    }
}
