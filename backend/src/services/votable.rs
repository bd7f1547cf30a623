//! VOTable 1.3 serialization of search results and errors.

use std::fmt::Write as _;

use crate::models::{CellValue, ObsCoreRecord, OBSCORE_COLUMNS};

use super::search::SearchResult;

/// Media type used for every VOTable response.
pub const VOTABLE_MEDIA_TYPE: &str = "text/xml";

const VOTABLE_OPEN: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<VOTABLE version="1.3" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
  xmlns="http://www.ivoa.net/xml/VOTable/v1.3"
  xsi:schemaLocation="http://www.ivoa.net/xml/VOTable/v1.3 http://www.ivoa.net/xml/VOTable/v1.3">
"#;

const SERVICE_DESCRIPTION: &str = "Simple Image Access Service";

pub fn xml_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn format_double(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() {
        if v > 0.0 { "+Inf" } else { "-Inf" }.to_string()
    } else {
        v.to_string()
    }
}

fn format_cell(cell: &CellValue<'_>) -> String {
    match cell {
        CellValue::Null => String::new(),
        CellValue::Int(v) => v.to_string(),
        CellValue::Double(v) => format_double(*v),
        CellValue::Text(s) => xml_escape(s),
    }
}

fn write_fields(out: &mut String) {
    for column in OBSCORE_COLUMNS.iter() {
        let _ = write!(
            out,
            r#"      <FIELD name="{name}" ID="{name}" datatype="{datatype}" ucd="{ucd}""#,
            name = column.name,
            datatype = column.datatype.votable_datatype(),
            ucd = column.ucd,
        );
        if column.datatype.votable_datatype() == "char" {
            out.push_str(r#" arraysize="*""#);
        }
        if let Some(unit) = column.unit {
            let _ = write!(out, r#" unit="{unit}""#);
        }
        out.push_str("/>\n");
    }
}

fn write_row(out: &mut String, record: &ObsCoreRecord) {
    out.push_str("          <TR>");
    for cell in record.cells().iter() {
        let _ = write!(out, "<TD>{}</TD>", format_cell(cell));
    }
    out.push_str("</TR>\n");
}

/// Render a result set as a VOTable document.
///
/// The `QUERY_STATUS` INFO is `OVERFLOW` when MAXREC truncated the result.
pub fn write_votable(result: &SearchResult) -> String {
    let status = if result.overflow { "OVERFLOW" } else { "OK" };

    let mut out = String::with_capacity(4096 + result.records.len() * 512);
    out.push_str(VOTABLE_OPEN);
    out.push_str("  <RESOURCE type=\"results\">\n");
    let _ = writeln!(out, "    <DESCRIPTION>{SERVICE_DESCRIPTION}</DESCRIPTION>");
    let _ = writeln!(out, r#"    <INFO name="QUERY_STATUS" value="{status}"/>"#);
    out.push_str("    <TABLE name=\"obscore\">\n");
    write_fields(&mut out);
    out.push_str("      <DATA>\n        <TABLEDATA>\n");
    for record in &result.records {
        write_row(&mut out, record);
    }
    out.push_str("        </TABLEDATA>\n      </DATA>\n    </TABLE>\n  </RESOURCE>\n</VOTABLE>\n");
    out
}

/// Render an error as a VOTable document with an `Error` INFO element.
///
/// Newlines in `message` are flattened to spaces.
pub fn votable_error(message: &str) -> String {
    let flattened = message.replace(['\r', '\n'], " ");
    let mut out = String::from(VOTABLE_OPEN);
    let _ = writeln!(out, "  <DESCRIPTION>{SERVICE_DESCRIPTION}</DESCRIPTION>");
    let _ = writeln!(
        out,
        r#"  <INFO ID="Error" name="Error" value="{}"/>"#,
        xml_escape(flattened.trim())
    );
    out.push_str("</VOTABLE>\n");
    out
}
