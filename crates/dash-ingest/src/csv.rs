//! Delimited-text reading with a single encoding fallback.

use std::io::{Cursor, Read, Seek, SeekFrom};

use dash_model::Dataset;
use encoding_rs::{Encoding, UTF_8};
use polars::prelude::{CsvReadOptions, NullValues, SerReader};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::encoding::{ENCODING_SAMPLE_BYTES, decode_strict, detect_encoding_with_limit};
use crate::error::{IngestError, Result};

/// Cell values read as missing, besides empty fields.
pub const DEFAULT_NULL_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Options for delimited-text parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    /// Rows scanned when inferring column dtypes; `None` scans every row.
    pub infer_schema_rows: Option<usize>,
    /// Cell values treated as missing.
    pub null_markers: Vec<String>,
    /// Parse ISO date and datetime strings into temporal columns.
    pub parse_dates: bool,
    /// Bytes sampled by the encoding detector on fallback.
    pub encoding_sample_bytes: usize,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            infer_schema_rows: None,
            null_markers: DEFAULT_NULL_MARKERS
                .iter()
                .map(|marker| (*marker).to_string())
                .collect(),
            parse_dates: true,
            encoding_sample_bytes: ENCODING_SAMPLE_BYTES,
        }
    }
}

/// Reads delimited text, decoding as UTF-8 first.
///
/// Only a decode failure triggers encoding detection and one retry with
/// the detected encoding. Structural CSV errors are returned as-is.
pub fn read_csv<R: Read + Seek>(reader: &mut R, options: &CsvOptions) -> Result<Dataset> {
    match read_csv_with_encoding(reader, UTF_8, options) {
        Err(err) if err.is_decode_failure() => {
            debug!("default decode failed, detecting encoding");
            let guess = detect_encoding_with_limit(reader, options.encoding_sample_bytes)?;
            info!(encoding = guess.label(), confident = guess.confident, "retrying CSV decode");
            read_csv_with_encoding(reader, guess.encoding, options)
        }
        other => other,
    }
}

/// Reads delimited text in an explicit encoding, without fallback.
pub fn read_csv_with_encoding<R: Read + Seek>(
    reader: &mut R,
    encoding: &'static Encoding,
    options: &CsvOptions,
) -> Result<Dataset> {
    reader.seek(SeekFrom::Start(0))?;
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    let text = decode_strict(&bytes, encoding).ok_or(IngestError::Decode {
        encoding: encoding.name(),
    })?;
    parse_csv_text(text, options)
}

/// Parses already-decoded delimited text with a header row.
pub fn parse_csv_text(text: String, options: &CsvOptions) -> Result<Dataset> {
    if text.trim().is_empty() {
        return Err(IngestError::EmptyInput);
    }

    let parse_dates = options.parse_dates;
    let null_values = (!options.null_markers.is_empty()).then(|| {
        NullValues::AllColumns(
            options
                .null_markers
                .iter()
                .map(|marker| marker.as_str().into())
                .collect(),
        )
    });
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(options.infer_schema_rows)
        .map_parse_options(|parse| {
            parse
                .with_try_parse_dates(parse_dates)
                .with_null_values(null_values.clone())
        })
        .into_reader_with_file_handle(Cursor::new(text.into_bytes()))
        .finish()
        .map_err(|e| IngestError::CsvParse {
            message: e.to_string(),
        })?;

    debug!(rows = df.height(), columns = df.width(), "CSV parsed");
    Ok(Dataset::new(df))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use dash_model::ColumnKind;
    use encoding_rs::WINDOWS_1252;

    use super::*;

    fn read(content: &[u8]) -> Result<Dataset> {
        read_csv(&mut Cursor::new(content.to_vec()), &CsvOptions::default())
    }

    #[test]
    fn test_shape_matches_lines_and_header() {
        let dataset = read(b"A,B,C\n1,2,3\n4,5,6\n").unwrap();
        assert_eq!(dataset.height(), 2);
        assert_eq!(dataset.width(), 3);
    }

    #[test]
    fn test_column_kinds_are_inferred() {
        let dataset = read(
            b"Category,Value,Ratio,When\nA,10,0.5,2024-01-01\nB,20,1.5,2024-01-02\nC,30,2.5,2024-01-03\n",
        )
        .unwrap();
        let kinds: Vec<ColumnKind> = dataset.schema().iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ColumnKind::Text,
                ColumnKind::Integer,
                ColumnKind::Float,
                ColumnKind::Datetime
            ]
        );
    }

    #[test]
    fn test_dates_stay_text_when_disabled() {
        let options = CsvOptions {
            parse_dates: false,
            ..CsvOptions::default()
        };
        let dataset = read_csv(
            &mut Cursor::new(b"When,Value\n2024-01-01,1\n".to_vec()),
            &options,
        )
        .unwrap();
        assert_eq!(dataset.kind_of("When"), Some(ColumnKind::Text));
    }

    #[test]
    fn test_utf8_bom_is_ignored() {
        let dataset = read(b"\xEF\xBB\xBFA,B\n1,2\n").unwrap();
        assert_eq!(dataset.column_names(), vec!["A", "B"]);
    }

    #[test]
    fn test_empty_fields_are_missing() {
        let dataset = read(b"A,B\n1,\n,2\n3,4\n").unwrap();
        let a = dataset.column("A").unwrap();
        assert_eq!(a.null_count(), 1);
    }

    #[test]
    fn test_type_change_after_many_rows_still_parses() {
        let mut content = String::from("id,score\n");
        for i in 0..150 {
            content.push_str(&format!("{i},{i}\n"));
        }
        content.push_str("150,late entry\n");

        let dataset = read(content.as_bytes()).unwrap();
        assert_eq!(dataset.height(), 151);
        assert_eq!(dataset.kind_of("id"), Some(ColumnKind::Integer));
        assert_eq!(dataset.kind_of("score"), Some(ColumnKind::Text));
    }

    #[test]
    fn test_null_marker_after_many_rows_keeps_integers() {
        let mut content = String::from("id,score\n");
        for i in 0..150 {
            content.push_str(&format!("{i},{i}\n"));
        }
        content.push_str("150,n/a\n");

        let dataset = read(content.as_bytes()).unwrap();
        assert_eq!(dataset.kind_of("score"), Some(ColumnKind::Integer));
        assert_eq!(dataset.column("score").unwrap().null_count(), 1);
    }

    #[test]
    fn test_common_null_markers_are_missing() {
        let dataset =
            read(b"Category,Value,Ratio\nA,10,NaN\nB,NA,0.5\nC,30,null\nD,#N/A,1.5\n").unwrap();
        assert_eq!(dataset.kind_of("Value"), Some(ColumnKind::Integer));
        assert_eq!(dataset.column("Value").unwrap().null_count(), 2);
        assert_eq!(dataset.kind_of("Ratio"), Some(ColumnKind::Float));
        assert_eq!(dataset.column("Ratio").unwrap().null_count(), 2);
    }

    #[test]
    fn test_limited_schema_scan_is_opt_in() {
        let mut content = String::from("score\n");
        for i in 0..20 {
            content.push_str(&format!("{i}\n"));
        }
        content.push_str("1.5\n");
        let options = CsvOptions {
            infer_schema_rows: Some(10),
            ..CsvOptions::default()
        };

        let limited = read_csv(&mut Cursor::new(content.clone().into_bytes()), &options);
        assert!(matches!(limited, Err(IngestError::CsvParse { .. })));
        let full = read(content.as_bytes()).unwrap();
        assert_eq!(full.kind_of("score"), Some(ColumnKind::Float));
    }

    #[test]
    fn test_non_utf8_falls_back_to_detected_encoding() {
        let text = "Name,City,Score\n\
                    Jos\u{e9},M\u{fc}nchen,1\n\
                    Ren\u{e9}e,Z\u{fc}rich,2\n\
                    Fran\u{e7}ois,Besan\u{e7}on,3\n\
                    Ana\u{ef}s,Orl\u{e9}ans,4\n";
        let (bytes, _, _) = WINDOWS_1252.encode(text);
        let bytes = bytes.to_vec();

        let strict = read_csv_with_encoding(
            &mut Cursor::new(bytes.clone()),
            UTF_8,
            &CsvOptions::default(),
        );
        assert!(matches!(strict, Err(IngestError::Decode { .. })));

        let truth = read_csv_with_encoding(
            &mut Cursor::new(bytes.clone()),
            WINDOWS_1252,
            &CsvOptions::default(),
        )
        .unwrap();
        let detected = read(&bytes).unwrap();

        assert_eq!(detected.height(), truth.height());
        assert_eq!(detected.width(), truth.width());
        assert_eq!(detected.height(), 4);
        assert_eq!(detected.width(), 3);
    }

    #[test]
    fn test_structural_errors_are_not_retried() {
        let result = read(b"A,B\n1,2\n3,4,5,6\n");
        assert!(matches!(result, Err(IngestError::CsvParse { .. })));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(read(b""), Err(IngestError::EmptyInput)));
        assert!(matches!(read(b"  \n\n"), Err(IngestError::EmptyInput)));
    }
}
