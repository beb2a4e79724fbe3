//! Extension-based dispatch to the four parsers.

use std::fmt;
use std::io::{Read, Seek};
use std::str::FromStr;

use dash_model::Dataset;
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span};

use crate::csv::{CsvOptions, read_csv};
use crate::error::{IngestError, Result};
use crate::excel::read_excel;
use crate::json::read_json;
use crate::pdf::read_pdf;

/// Upload formats the dashboard understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Csv,
    Xlsx,
    Json,
    Pdf,
}

impl FileFormat {
    pub const ALL: [FileFormat; 4] = [
        FileFormat::Csv,
        FileFormat::Xlsx,
        FileFormat::Json,
        FileFormat::Pdf,
    ];

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
            Self::Json => "json",
            Self::Pdf => "pdf",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Csv => "Delimited text (encoding detected on decode failure)",
            Self::Xlsx => "Excel workbook (first sheet)",
            Self::Json => "JSON document (nested keys flattened)",
            Self::Pdf => "PDF document (text of all pages)",
        }
    }

    /// Picks the format from the text after the last `.` of a file name.
    pub fn from_file_name(name: &str) -> Result<Self> {
        let extension = name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .unwrap_or_default();
        extension.parse()
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for FileFormat {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.to_lowercase();
        FileFormat::ALL
            .into_iter()
            .find(|format| format.extension() == lowered)
            .ok_or(IngestError::UnsupportedType { extension: lowered })
    }
}

/// Ingestion settings shared by all parsers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestOptions {
    pub csv: CsvOptions,
}

/// Parses a stream with the parser for `format`.
pub fn read_dataset<R: Read + Seek>(
    format: FileFormat,
    reader: &mut R,
    options: &IngestOptions,
) -> Result<Dataset> {
    let span = info_span!("parse", format = %format);
    let _guard = span.enter();
    debug!("dispatching to parser");
    match format {
        FileFormat::Csv => read_csv(reader, &options.csv),
        FileFormat::Xlsx => read_excel(reader),
        FileFormat::Json => read_json(reader),
        FileFormat::Pdf => read_pdf(reader),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_is_case_insensitive() {
        assert_eq!(FileFormat::from_file_name("data.CSV").unwrap(), FileFormat::Csv);
        assert_eq!(
            FileFormat::from_file_name("report.final.Xlsx").unwrap(),
            FileFormat::Xlsx
        );
        assert_eq!(FileFormat::from_file_name("a.json").unwrap(), FileFormat::Json);
        assert_eq!(FileFormat::from_file_name("scan.pdf").unwrap(), FileFormat::Pdf);
    }

    #[test]
    fn test_unsupported_extensions() {
        let err = FileFormat::from_file_name("notes.txt").unwrap_err();
        assert!(matches!(
            err,
            IngestError::UnsupportedType { ref extension } if extension == "txt"
        ));
        assert!(matches!(
            FileFormat::from_file_name("README"),
            Err(IngestError::UnsupportedType { .. })
        ));
        assert!(matches!(
            FileFormat::from_file_name("old.xls"),
            Err(IngestError::UnsupportedType { .. })
        ));
    }
}
