//! Vendor CSV result parser (semicolon-delimited timing export).
//!
//! Fixed column layout: bib; last name; first name; gender; category; club;
//! gun time; net time. At least 7 columns are required, extra trailing
//! columns (scratch/gender/category placements) are tolerated. This format
//! only exports finishers, so every row is `Finished`.

use super::{collapse_whitespace, non_empty, normalize_time, parse_bib, parse_gender};
use crate::api::{CanonicalResult, ParseOutcome, RowError};

/// Parse a vendor CSV export.
///
/// Populates both `gun_time` and `net_time`; `finish_time` is the net time
/// when present, else the gun time (net is more accurate for staggered
/// starts).
pub fn parse_vendor_csv(content: &str) -> ParseOutcome {
    let lines: Vec<&str> = content.lines().filter(|line| !line.trim().is_empty()).collect();
    let mut outcome = ParseOutcome::default();

    // Skip header
    for (index, line) in lines.iter().enumerate().skip(1) {
        let row = index + 1;
        let parts: Vec<&str> = line.split(';').collect();

        if parts.len() < 7 {
            outcome.errors.push(RowError::new(row, "too few columns for vendor format"));
            continue;
        }

        let Some(bib_number) = parts.first().and_then(|cell| parse_bib(cell)) else {
            outcome.errors.push(RowError::new(row, "invalid bib number"));
            continue;
        };

        let last_name = parts.get(1).map(|cell| cell.trim()).unwrap_or_default();
        let first_name = parts.get(2).map(|cell| cell.trim()).unwrap_or_default();
        let athlete_name = collapse_whitespace(&format!("{} {}", first_name, last_name));
        if athlete_name.is_empty() {
            outcome.errors.push(RowError::new(row, "missing athlete name"));
            continue;
        }

        let gender = parts.get(3).and_then(|cell| parse_gender(cell, false));
        let category = parts.get(4).and_then(|cell| non_empty(cell));
        let gun_time = parts.get(6).and_then(|cell| normalize_time(cell));
        let net_time = parts.get(7).and_then(|cell| normalize_time(cell));
        let finish_time = net_time.clone().or_else(|| gun_time.clone());

        outcome.results.push(CanonicalResult {
            bib_number,
            athlete_name,
            gender,
            category,
            finish_time,
            gun_time,
            net_time,
            status: Default::default(),
            split_times: Vec::new(),
        });
    }

    outcome
}
