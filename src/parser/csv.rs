//! Generic CSV result parser.
//!
//! Expected column order: bib, last name, first name, gender, category,
//! time, status text. The delimiter may be a comma or a semicolon, tolerated
//! per line. The header row is always skipped.

use super::status::StatusLexicon;
use super::{collapse_whitespace, non_empty, normalize_time, parse_bib, parse_gender};
use crate::api::{CanonicalResult, ParseOutcome, RowError};

/// Parse a generic CSV export.
///
/// Row numbering is 1-based over the non-empty lines of the file, so the
/// header is row 1 and the first data row reports as row 2.
pub fn parse_csv(content: &str, lexicon: &StatusLexicon) -> ParseOutcome {
    let lines: Vec<&str> = content.lines().filter(|line| !line.trim().is_empty()).collect();
    let mut outcome = ParseOutcome::default();

    // Skip header
    for (index, line) in lines.iter().enumerate().skip(1) {
        let row = index + 1;
        let parts: Vec<&str> = line.split([',', ';']).collect();

        let populated = parts.iter().filter(|cell| !cell.trim().is_empty()).count();
        if populated < 3 {
            outcome.errors.push(RowError::new(row, "too few columns"));
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

        let gender = parts.get(3).and_then(|cell| parse_gender(cell, true));
        let category = parts.get(4).and_then(|cell| non_empty(cell));
        let finish_time = parts.get(5).and_then(|cell| normalize_time(cell));
        let status = lexicon.classify(parts.get(6).unwrap_or(&""));

        outcome.results.push(CanonicalResult {
            bib_number,
            athlete_name,
            gender,
            category,
            finish_time,
            gun_time: None,
            net_time: None,
            status,
            split_times: Vec::new(),
        });
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Gender, ResultStatus};

    const HEADER: &str = "Dossard,Nom,Prénom,Sexe,Catégorie,Temps,Statut";

    fn parse(rows: &str) -> ParseOutcome {
        let content = format!("{}\n{}", HEADER, rows);
        parse_csv(&content, &StatusLexicon::default())
    }

    #[test]
    fn test_single_finisher() {
        let outcome = parse("101,Dupont,Jean,M,SEM,00:45:30,");
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.results.len(), 1);

        let result = &outcome.results[0];
        assert_eq!(result.bib_number, 101);
        assert_eq!(result.athlete_name, "Jean Dupont");
        assert_eq!(result.gender, Some(Gender::M));
        assert_eq!(result.category.as_deref(), Some("SEM"));
        assert_eq!(result.finish_time.as_deref(), Some("00:45:30"));
        assert_eq!(result.status, ResultStatus::Finished);
    }

    #[test]
    fn test_semicolon_delimiter_tolerated() {
        let outcome = parse("101;Dupont;Jean;F;SEM;00:45:30;");
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].gender, Some(Gender::F));
    }

    #[test]
    fn test_invalid_bib_errors_row() {
        let outcome = parse("abc,Dupont,Jean,M,SEM,00:45:30,");
        assert!(outcome.results.is_empty());
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].row, 2);
        assert!(outcome.errors[0].error.contains("bib"));
    }

    #[test]
    fn test_too_few_columns() {
        let outcome = parse("101,Dupont");
        assert!(outcome.results.is_empty());
        assert_eq!(outcome.errors[0].error, "too few columns");
    }

    #[test]
    fn test_missing_athlete_name() {
        let outcome = parse("101, , ,M,SEM,00:45:30,");
        assert!(outcome.results.is_empty());
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].error, "missing athlete name");
    }

    #[test]
    fn test_status_synonyms() {
        let outcome = parse("1,A,B,M,SEM,,Abandon\n2,C,D,F,SEF,,Absent\n3,E,F,M,SEM,,???");
        assert_eq!(outcome.results.len(), 3);
        assert_eq!(outcome.results[0].status, ResultStatus::Dnf);
        assert_eq!(outcome.results[1].status, ResultStatus::Dns);
        assert_eq!(outcome.results[2].status, ResultStatus::Finished);
    }

    #[test]
    fn test_unrecognized_gender_dropped() {
        let outcome = parse("101,Dupont,Jean,Z,SEM,00:45:30,");
        assert_eq!(outcome.results[0].gender, None);
    }

    #[test]
    fn test_gender_x_accepted() {
        let outcome = parse("101,Dupont,Jean,x,SEM,00:45:30,");
        assert_eq!(outcome.results[0].gender, Some(Gender::X));
    }

    #[test]
    fn test_bad_row_does_not_stop_scan() {
        let outcome = parse("101,Dupont,Jean,M,SEM,00:45:30,\nabc,Bad,Row,M,,,\n102,Martin,Luc,M,V1,00:50:00,");
        assert_eq!(outcome.results.len(), 2);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].row, 3);
        // Source order preserved
        assert_eq!(outcome.results[0].bib_number, 101);
        assert_eq!(outcome.results[1].bib_number, 102);
    }

    #[test]
    fn test_empty_input_returns_empty_outcome() {
        let outcome = parse_csv("", &StatusLexicon::default());
        assert!(outcome.results.is_empty());
        assert!(outcome.errors.is_empty());

        let outcome = parse_csv("\n   \n", &StatusLexicon::default());
        assert!(outcome.results.is_empty());
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn test_short_time_is_canonicalized() {
        let outcome = parse("101,Dupont,Jean,M,SEM,45:30,");
        assert_eq!(outcome.results[0].finish_time.as_deref(), Some("00:45:30"));
    }
}
