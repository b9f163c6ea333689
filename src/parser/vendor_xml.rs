//! Vendor XML result parser (record-oriented timing export).
//!
//! The document is scanned for repeated `<result>` blocks; each block is
//! scanned for named leaf fields (bib, first name, last name, gender,
//! category, time). Blocks may appear in arbitrary order and fields in
//! arbitrary order within a block; no document-wide schema is assumed.
//!
//! Vendor XML has no natural line-row correspondence, so error numbering
//! uses a running counter incremented once per record encountered,
//! matching first-seen document order.

use super::{collapse_whitespace, normalize_time, parse_bib, parse_gender};
use crate::api::{CanonicalResult, ParseOutcome, RowError};
use roxmltree::{Document, Node};

/// Parse a vendor XML export.
///
/// One malformed block produces one [`RowError`] and the scan continues
/// with the next block. A document that fails to parse at all yields an
/// empty result set with a single row-0 error.
pub fn parse_vendor_xml(content: &str) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();

    let doc = match Document::parse(content) {
        Ok(doc) => doc,
        Err(err) => {
            outcome
                .errors
                .push(RowError::new(0, format!("invalid XML document: {}", err)));
            return outcome;
        }
    };

    let mut record = 0usize;
    for node in doc
        .descendants()
        .filter(|node| node.is_element() && node.has_tag_name("result"))
    {
        record += 1;

        let bib_number = field(node, "bib").and_then(|cell| parse_bib(&cell));
        let first_name = field(node, "firstname").unwrap_or_default();
        let last_name = field(node, "lastname").unwrap_or_default();
        let athlete_name = collapse_whitespace(&format!("{} {}", first_name, last_name));

        let (Some(bib_number), false) = (bib_number, athlete_name.is_empty()) else {
            outcome.errors.push(RowError::new(record, "incomplete data"));
            continue;
        };

        let gender = field(node, "gender").and_then(|cell| parse_gender(&cell, false));
        let category = field(node, "category");
        let finish_time = field(node, "time").and_then(|cell| normalize_time(&cell));

        outcome.results.push(CanonicalResult {
            bib_number,
            athlete_name,
            gender,
            category,
            finish_time,
            gun_time: None,
            net_time: None,
            status: Default::default(),
            split_times: Vec::new(),
        });
    }

    outcome
}

/// Extract the trimmed text of the first child element matching `name`
/// (case-insensitive). Empty text counts as absent.
fn field(block: Node<'_, '_>, name: &str) -> Option<String> {
    block
        .children()
        .find(|child| child.is_element() && child.tag_name().name().eq_ignore_ascii_case(name))
        .and_then(|child| child.text())
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Gender;

    fn wrap(blocks: &str) -> String {
        format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?><results>{}</results>", blocks)
    }

    #[test]
    fn test_single_record() {
        let xml = wrap(
            "<result><bib>12</bib><firstname>Jean</firstname><lastname>Dupont</lastname>\
             <gender>m</gender><category>SEM</category><time>00:45:30</time></result>",
        );
        let outcome = parse_vendor_xml(&xml);
        assert!(outcome.errors.is_empty());

        let result = &outcome.results[0];
        assert_eq!(result.bib_number, 12);
        assert_eq!(result.athlete_name, "Jean Dupont");
        assert_eq!(result.gender, Some(Gender::M));
        assert_eq!(result.category.as_deref(), Some("SEM"));
        assert_eq!(result.finish_time.as_deref(), Some("00:45:30"));
    }

    #[test]
    fn test_field_order_is_irrelevant() {
        let xml = wrap(
            "<result><time>01:02:03</time><lastname>Silva</lastname>\
             <bib>3</bib><firstname>Ana</firstname></result>",
        );
        let outcome = parse_vendor_xml(&xml);
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].bib_number, 3);
    }

    #[test]
    fn test_missing_bib_errors_and_scan_continues() {
        let xml = wrap(
            "<result><firstname>No</firstname><lastname>Bib</lastname></result>\
             <result><bib>7</bib><firstname>Ok</firstname><lastname>Next</lastname></result>",
        );
        let outcome = parse_vendor_xml(&xml);
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].bib_number, 7);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].row, 1);
        assert_eq!(outcome.errors[0].error, "incomplete data");
    }

    #[test]
    fn test_missing_name_is_incomplete() {
        let xml = wrap("<result><bib>9</bib></result>");
        let outcome = parse_vendor_xml(&xml);
        assert!(outcome.results.is_empty());
        assert_eq!(outcome.errors[0].error, "incomplete data");
    }

    #[test]
    fn test_record_counter_numbering() {
        let xml = wrap(
            "<result><bib>1</bib><firstname>A</firstname><lastname>B</lastname></result>\
             <result></result>\
             <result><bib>0</bib><firstname>C</firstname><lastname>D</lastname></result>",
        );
        let outcome = parse_vendor_xml(&xml);
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.errors.len(), 2);
        assert_eq!(outcome.errors[0].row, 2);
        assert_eq!(outcome.errors[1].row, 3);
    }

    #[test]
    fn test_unrecognized_gender_dropped() {
        let xml = wrap(
            "<result><bib>4</bib><firstname>E</firstname><lastname>F</lastname>\
             <gender>X</gender></result>",
        );
        let outcome = parse_vendor_xml(&xml);
        assert_eq!(outcome.results[0].gender, None);
    }

    #[test]
    fn test_unparseable_document() {
        let outcome = parse_vendor_xml("<?xml version=\"1.0\"?><results><result>");
        assert!(outcome.results.is_empty());
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].row, 0);
    }
}
