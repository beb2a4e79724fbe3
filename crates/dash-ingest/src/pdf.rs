//! PDF text extraction into a single-cell table.

use std::io::{Read, Seek, SeekFrom};

use dash_model::Dataset;
use lopdf::Document;
use polars::prelude::{IntoColumn, NamedFrom, Series};
use tracing::{debug, warn};

use crate::error::{IngestError, Result};

/// Name of the only column a PDF upload produces.
pub const PDF_TEXT_COLUMN: &str = "Content";

/// Extracts the text of every page, in page order, into a 1x1 dataset.
pub fn read_pdf<R: Read + Seek>(reader: &mut R) -> Result<Dataset> {
    reader.seek(SeekFrom::Start(0))?;
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    let document = Document::load_mem(&bytes).map_err(|e| IngestError::Pdf {
        message: e.to_string(),
    })?;

    let mut text = String::new();
    let pages = document.get_pages();
    for page_number in pages.keys() {
        match document.extract_text(&[*page_number]) {
            Ok(page_text) => text.push_str(&page_text),
            Err(error) => warn!(page = page_number, %error, "no text extracted from page"),
        }
    }
    debug!(pages = pages.len(), chars = text.chars().count(), "PDF text extracted");

    text_dataset(text)
}

/// Wraps extracted document text in the one-row, one-column table.
pub fn text_dataset(text: String) -> Result<Dataset> {
    let column = Series::new(PDF_TEXT_COLUMN.into(), vec![text]).into_column();
    Ok(Dataset::from_columns(vec![column])?)
}
