//! Heuristic source-format detection for uploaded result files.

use crate::api::SourceFormat;

/// Classify an uploaded file as one of the supported source formats.
///
/// Pure function of `(file_name, content)`. Decision order, first match wins:
///
/// 1. Content (after trimming leading whitespace) starts with an XML
///    declaration -> vendor XML.
/// 2. File name contains the vendor marker token (case-insensitive) ->
///    vendor CSV.
/// 3. File name ends in a spreadsheet extension -> generic CSV (spreadsheet
///    uploads are pre-converted to delimited text upstream; this is a thin
///    alias, not a spreadsheet parser).
/// 4. Default -> generic CSV.
///
/// This is a heuristic, not a schema validator. Misdetection surfaces later
/// as row-level parse errors, which the preview step lets the importer
/// notice before committing.
pub fn detect_format(file_name: &str, content: &str) -> SourceFormat {
    if content.trim_start().starts_with("<?xml") {
        return SourceFormat::VendorXml;
    }

    let lower = file_name.to_lowercase();
    if lower.contains("elogica") || lower.contains("elog") {
        return SourceFormat::VendorCsv;
    }

    if lower.ends_with(".xlsx") || lower.ends_with(".xls") {
        return SourceFormat::Csv;
    }

    SourceFormat::Csv
}
