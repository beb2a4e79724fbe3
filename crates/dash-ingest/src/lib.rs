//! Upload ingestion for the dashboard.
//!
//! This crate turns an uploaded byte stream into a [`dash_model::Dataset`].
//!
//! # Features
//!
//! - **CSV**: strict UTF-8 first, one retry with a detected encoding
//! - **XLSX**: first worksheet, row 1 as headers, typed columns
//! - **JSON**: nested objects flattened to dotted column names
//! - **PDF**: text of every page in a single `Content` cell
//!
//! # Example
//!
//! ```ignore
//! use std::io::Cursor;
//! use dash_ingest::{FileFormat, IngestOptions, read_dataset};
//!
//! let format = FileFormat::from_file_name("sales.csv")?;
//! let mut reader = Cursor::new(std::fs::read("sales.csv")?);
//! let dataset = read_dataset(format, &mut reader, &IngestOptions::default())?;
//! ```

mod csv;
mod encoding;
mod error;
mod excel;
mod format;
mod json;
mod pdf;

// === Error Types ===
pub use error::{IngestError, Result};

// === Dispatch ===
pub use format::{FileFormat, IngestOptions, read_dataset};

// === Encoding Detection ===
pub use encoding::{
    ENCODING_SAMPLE_BYTES, EncodingGuess, decode_strict, detect_encoding,
    detect_encoding_with_limit, guess_encoding,
};

// === Parsers ===
pub use csv::{CsvOptions, DEFAULT_NULL_MARKERS, parse_csv_text, read_csv, read_csv_with_encoding};
pub use excel::read_excel;
pub use json::{json_to_dataset, read_json};
pub use pdf::{PDF_TEXT_COLUMN, read_pdf, text_dataset};
