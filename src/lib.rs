//! # Raceday Results Backend
//!
//! Results ingestion and ranking engine for running-race events.
//!
//! This crate ingests timing-system export files (generic CSV, vendor
//! semicolon CSV, vendor XML), normalizes them into canonical result
//! records, stores them idempotently keyed by `(race_id, bib_number)` and
//! recomputes overall/gender/category rankings after each import. The
//! backend exposes a REST API via Axum for the organizer frontend.
//!
//! ## Features
//!
//! - **Format Detection**: Pick the right parser from the file name and
//!   a content sniff
//! - **Parsing**: Per-row error isolation, canonical `HH:MM:SS` times,
//!   localized status-word mapping
//! - **Import Orchestration**: Chunked idempotent upserts with an audited
//!   import-run record per upload
//! - **Ranking**: Overall, per-gender and per-category placements
//! - **HTTP API**: RESTful endpoints with async job tracking and SSE logs
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Shared DTOs for results, import runs and rankings
//! - [`parser`]: Format detection and the per-format row parsers
//! - [`db`]: Repository pattern and persistence layer
//! - [`services`]: Import orchestration, ranking, job tracking
//! - [`http`]: Axum-based HTTP server and request handlers

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;

pub mod db;
pub mod models;
pub mod parser;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
