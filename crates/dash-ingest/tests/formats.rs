//! Reading each supported format through the extension dispatcher.

use std::fs::File;
use std::io::{Cursor, Write};

use dash_ingest::{FileFormat, IngestError, IngestOptions, PDF_TEXT_COLUMN, read_dataset};
use dash_model::ColumnKind;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use zip::write::SimpleFileOptions;

const SHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PKG_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// One worksheet cell: inline text, a number, or an ISO date.
enum Cell<'a> {
    Text(&'a str),
    Number(f64),
    Date(&'a str),
    Blank,
}

fn sheet_xml(rows: &[Vec<Cell<'_>>]) -> String {
    let mut xml = format!(r#"<?xml version="1.0" encoding="UTF-8"?><worksheet xmlns="{SHEET_NS}"><sheetData>"#);
    for (row_index, row) in rows.iter().enumerate() {
        let row_number = row_index + 1;
        xml.push_str(&format!(r#"<row r="{row_number}">"#));
        for (col_index, cell) in row.iter().enumerate() {
            let reference = format!("{}{row_number}", char::from(b'A' + col_index as u8));
            match cell {
                Cell::Text(text) => xml.push_str(&format!(
                    r#"<c r="{reference}" t="inlineStr"><is><t>{text}</t></is></c>"#
                )),
                Cell::Number(value) => {
                    xml.push_str(&format!(r#"<c r="{reference}"><v>{value}</v></c>"#));
                }
                Cell::Date(iso) => {
                    xml.push_str(&format!(r#"<c r="{reference}" t="d"><v>{iso}</v></c>"#));
                }
                Cell::Blank => {}
            }
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

fn workbook(sheets: &[(&str, Vec<Vec<Cell<'_>>>)]) -> Vec<u8> {
    let mut sheet_entries = String::new();
    let mut sheet_rels = String::new();
    let mut overrides = String::new();
    for (index, (name, _)) in sheets.iter().enumerate() {
        let n = index + 1;
        sheet_entries.push_str(&format!(
            r#"<sheet name="{name}" sheetId="{n}" r:id="rId{n}"/>"#
        ));
        sheet_rels.push_str(&format!(
            r#"<Relationship Id="rId{n}" Type="{REL_NS}/worksheet" Target="worksheets/sheet{n}.xml"/>"#
        ));
        overrides.push_str(&format!(
            r#"<Override PartName="/xl/worksheets/sheet{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
        ));
    }

    let mut parts = vec![
        (
            "[Content_Types].xml".to_string(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>{overrides}</Types>"#
            ),
        ),
        (
            "_rels/.rels".to_string(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="{PKG_REL_NS}"><Relationship Id="rId1" Type="{REL_NS}/officeDocument" Target="xl/workbook.xml"/></Relationships>"#
            ),
        ),
        (
            "xl/workbook.xml".to_string(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8"?><workbook xmlns="{SHEET_NS}" xmlns:r="{REL_NS}"><sheets>{sheet_entries}</sheets></workbook>"#
            ),
        ),
        (
            "xl/_rels/workbook.xml.rels".to_string(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="{PKG_REL_NS}">{sheet_rels}</Relationships>"#
            ),
        ),
    ];
    for (index, (_, rows)) in sheets.iter().enumerate() {
        parts.push((format!("xl/worksheets/sheet{}.xml", index + 1), sheet_xml(rows)));
    }

    let mut buffer = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(Cursor::new(&mut buffer));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (path, content) in parts {
            zip.start_file(path, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }
    buffer
}

fn one_page_pdf(text: &str) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 24.into()]),
            Operation::new("Td", vec![100.into(), 600.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

#[test]
fn csv_from_a_file_on_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"Category,Value\nA,10\nB,20\nC,30\n").unwrap();
    let mut reader = File::open(file.path()).unwrap();

    let dataset = read_dataset(FileFormat::Csv, &mut reader, &IngestOptions::default()).unwrap();
    assert_eq!(dataset.height(), 3);
    assert_eq!(dataset.width(), 2);
    assert_eq!(dataset.kind_of("Category"), Some(ColumnKind::Text));
    assert_eq!(dataset.kind_of("Value"), Some(ColumnKind::Integer));
}

#[test]
fn json_array_dispatch() {
    let format = FileFormat::from_file_name("people.JSON").unwrap();
    let mut reader = Cursor::new(br#"[{"name":"a","age":3},{"name":"b","age":4}]"#.to_vec());
    let dataset = read_dataset(format, &mut reader, &IngestOptions::default()).unwrap();
    assert_eq!(dataset.column_names(), vec!["name", "age"]);
    assert_eq!(dataset.height(), 2);
}

#[test]
fn pdf_text_lands_in_one_cell() {
    let bytes = one_page_pdf("Quarterly totals");
    let mut reader = Cursor::new(bytes);
    let dataset = read_dataset(FileFormat::Pdf, &mut reader, &IngestOptions::default()).unwrap();

    assert_eq!(dataset.height(), 1);
    assert_eq!(dataset.column_names(), vec![PDF_TEXT_COLUMN]);
    let text = &dataset.preview_rows(1)[0][0];
    assert!(text.contains("Quarterly totals"), "extracted: {text:?}");
}

#[test]
fn workbook_first_sheet_with_typed_blank_and_repeated_headers() {
    use Cell::{Blank, Date, Number, Text};

    let bytes = workbook(&[
        (
            "Orders",
            vec![
                vec![Text("Name"), Text("Qty"), Text("Qty"), Text("Ordered")],
                vec![Text("Ana"), Number(3.0), Number(1.5), Date("2024-01-05")],
                vec![Text("Ben"), Blank, Number(2.5), Date("2024-01-06")],
                vec![Text("Cy"), Number(7.0), Blank, Blank],
            ],
        ),
        (
            "Notes",
            vec![vec![Text("Remark")], vec![Text("ignored")]],
        ),
    ]);

    let format = FileFormat::from_file_name("orders.xlsx").unwrap();
    let mut reader = Cursor::new(bytes);
    let dataset = read_dataset(format, &mut reader, &IngestOptions::default()).unwrap();

    assert_eq!(
        dataset.column_names(),
        vec!["Name", "Qty", "Qty_duplicated_0", "Ordered"]
    );
    assert_eq!(dataset.height(), 3);
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
    let nulls: Vec<usize> = dataset
        .frame()
        .get_columns()
        .iter()
        .map(|column| column.null_count())
        .collect();
    assert_eq!(nulls, vec![0, 1, 1, 1]);
}

#[test]
fn truncated_workbook_is_a_structural_error() {
    let mut reader = Cursor::new(b"PK\x03\x04broken".to_vec());
    let result = read_dataset(FileFormat::Xlsx, &mut reader, &IngestOptions::default());
    assert!(matches!(result, Err(IngestError::Workbook { .. })));
}
