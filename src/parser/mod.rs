//! Timing-export parsing: format detection plus the three row parsers.
//!
//! Each parser turns raw text into a [`ParseOutcome`]: canonical result
//! records in source order plus row-level errors. Parsing never aborts on a
//! single bad row; one malformed row produces one [`RowError`] and the scan
//! continues. A parser only returns an empty result set on totally
//! unrecoverable input, never an error.
//!
//! [`parse_any`] runs the detector and dispatches to the matching parser;
//! it is the only entry point the import orchestrator calls.
//!
//! [`RowError`]: crate::api::RowError

pub mod csv;
pub mod detect;
pub mod status;
pub mod vendor_csv;
pub mod vendor_xml;

pub use csv::parse_csv;
pub use detect::detect_format;
pub use status::StatusLexicon;
pub use vendor_csv::parse_vendor_csv;
pub use vendor_xml::parse_vendor_xml;

use crate::api::{Gender, ParseOutcome, SourceFormat};
use crate::models::{format_duration, parse_duration};

/// Parse a result file, selecting the parser via format detection.
pub fn parse_any(file_name: &str, content: &str, lexicon: &StatusLexicon) -> ParseOutcome {
    match detect_format(file_name, content) {
        SourceFormat::Csv => parse_csv(content, lexicon),
        SourceFormat::VendorCsv => parse_vendor_csv(content),
        SourceFormat::VendorXml => parse_vendor_xml(content),
    }
}

/// Collapse internal whitespace and trim. Used for athlete display names.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse a bib column. Bibs are strictly positive integers.
pub(crate) fn parse_bib(raw: &str) -> Option<u32> {
    match raw.trim().parse::<u32>() {
        Ok(0) => None,
        Ok(bib) => Some(bib),
        Err(_) => None,
    }
}

/// Map a raw gender cell to the enum. `allow_x` is set for the generic CSV
/// format; the vendor formats only ever export M/F. Anything unrecognized
/// is dropped to `None`, never fabricated.
pub(crate) fn parse_gender(raw: &str, allow_x: bool) -> Option<Gender> {
    match raw.trim().to_uppercase().as_str() {
        "M" => Some(Gender::M),
        "F" => Some(Gender::F),
        "X" if allow_x => Some(Gender::X),
        _ => None,
    }
}

/// Normalize a time cell: empty becomes `None`, valid durations are
/// canonicalized to `HH:MM:SS` (so `45:30` becomes `00:45:30`), and text
/// the codec cannot parse is kept verbatim for operator inspection.
pub(crate) fn normalize_time(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match parse_duration(trimmed) {
        Some(seconds) => Some(format_duration(seconds)),
        None => Some(trimmed.to_string()),
    }
}

/// Non-empty trimmed cell, or `None`.
pub(crate) fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
