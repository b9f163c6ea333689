//! Public API surface for the results ingestion backend.
//!
//! This file consolidates the DTO types shared by the parsers, the import
//! orchestrator, the repository layer and the HTTP API. All types derive
//! Serialize/Deserialize for JSON serialization.

use serde::{Deserialize, Serialize};

/// Race identifier (database primary key).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RaceId(pub i64);

/// Import run identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImportRunId(pub i64);

impl RaceId {
    pub fn new(value: i64) -> Self {
        RaceId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl ImportRunId {
    pub fn new(value: i64) -> Self {
        ImportRunId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for RaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for ImportRunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<RaceId> for i64 {
    fn from(id: RaceId) -> Self {
        id.0
    }
}

/// Athlete gender as reported by the timing system.
///
/// Unrecognized source values are dropped to `None` on the result record,
/// never coerced into one of these variants.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    M,
    F,
    X,
}

/// Terminal status of an athlete's race.
///
/// Defaults to `Finished` unless the source file explicitly states
/// otherwise (see [`crate::parser::StatusLexicon`]).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    #[default]
    Finished,
    Dnf,
    Dns,
    Dsq,
}

/// One intermediate timing point for a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitTime {
    /// Name of the timing point (e.g. "km 10")
    pub point_name: String,
    /// Elapsed time at the point, canonical `HH:MM:SS`
    pub time: String,
    /// Distance of the point from the start, in kilometers (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

/// One athlete's finish record for one race, normalized from any of the
/// supported timing-system export formats.
///
/// A `CanonicalResult` is fully formed or it does not exist: rows that
/// cannot produce a valid bib and athlete name are emitted as [`RowError`]s
/// instead. Only the genuinely optional fields (gender, category, the
/// secondary times) may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalResult {
    /// Positive integer, unique per race. Natural key together with the race.
    pub bib_number: u32,
    /// Display name, `first + " " + last`, trimmed and whitespace-collapsed.
    pub athlete_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    /// Free-text age/competition category, vendor-defined.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Primary finish time, canonical `HH:MM:SS`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gun_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_time: Option<String>,
    pub status: ResultStatus,
    /// Intermediate timing points, only populated by formats that carry them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub split_times: Vec<SplitTime>,
}

/// A row-level parse failure.
///
/// `row` is the 1-based line/record index within the source file; for
/// CSV-like formats the header line is row 1, so the first data row
/// reports as row 2. Vendor XML uses a running record counter instead,
/// since it has no natural line-row correspondence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    pub row: usize,
    pub error: String,
}

impl RowError {
    pub fn new(row: usize, error: impl Into<String>) -> Self {
        Self {
            row,
            error: error.into(),
        }
    }
}

/// Output of one parse call: results in source order plus row-level errors.
///
/// Ordering of `results` mirrors the source file; the preview step relies
/// on this to truncate to the first N records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParseOutcome {
    pub results: Vec<CanonicalResult>,
    pub errors: Vec<RowError>,
}

/// Supported timing-system export formats.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    /// Generic comma/semicolon-delimited CSV (also used for pre-converted
    /// spreadsheet uploads).
    Csv,
    /// Vendor semicolon-delimited CSV with gun/net time columns.
    VendorCsv,
    /// Vendor record-oriented XML export.
    VendorXml,
}

impl SourceFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::Csv => "csv",
            SourceFormat::VendorCsv => "vendor_csv",
            SourceFormat::VendorXml => "vendor_xml",
        }
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Import run status. An import either runs to completion (possibly with
/// some row failures) or fails outright; there is no partial/paused state.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStatus {
    Processing,
    Completed,
    Failed,
}

impl ImportStatus {
    /// Whether this status is terminal. Runs are never mutated once terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ImportStatus::Completed | ImportStatus::Failed)
    }
}

/// Metadata record for one execution of the ingestion pipeline against one
/// uploaded file for one race. Created at import start, finalized at import
/// end, immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRun {
    pub id: ImportRunId,
    pub race_id: RaceId,
    pub file_name: String,
    pub source_format: SourceFormat,
    /// SHA-256 of the uploaded file content.
    pub checksum: String,
    /// Identity of the importer (organizer account).
    pub imported_by: String,
    /// Number of result rows produced by the parser.
    pub total_rows: usize,
    pub successful_rows: usize,
    pub failed_rows: usize,
    /// Row-level parse errors captured at parse time.
    pub errors: Vec<RowError>,
    pub status: ImportStatus,
    pub started_at: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Fields captured when an import run is created (status `Processing`).
#[derive(Debug, Clone)]
pub struct NewImportRun {
    pub race_id: RaceId,
    pub file_name: String,
    pub source_format: SourceFormat,
    pub checksum: String,
    pub imported_by: String,
    pub total_rows: usize,
}

/// Fields written when an import run is finalized.
#[derive(Debug, Clone)]
pub struct ImportRunUpdate {
    pub successful_rows: usize,
    pub failed_rows: usize,
    pub errors: Vec<RowError>,
    pub status: ImportStatus,
    pub completed_at: chrono::DateTime<chrono::Utc>,
}

/// Summary returned to the caller after a committed import.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ImportSummary {
    pub run_id: ImportRunId,
    pub success_count: usize,
    pub failed_count: usize,
}

/// A result row as persisted in the store, keyed by `(race_id, bib_number)`.
///
/// Rank fields are written by the ranking engine after each import; they are
/// `None` until the first recomputation and for non-finishers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredResult {
    pub race_id: RaceId,
    #[serde(flatten)]
    pub result: CanonicalResult,
    /// Format of the file this row was last imported from.
    pub import_source: SourceFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_rank: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender_rank: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_rank: Option<u32>,
    pub imported_at: chrono::DateTime<chrono::Utc>,
}

/// Rank assignment for one bib, produced by the ranking engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankAssignment {
    pub bib_number: u32,
    pub overall_rank: Option<u32>,
    pub gender_rank: Option<u32>,
    pub category_rank: Option<u32>,
}
