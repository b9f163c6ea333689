//! Pure value-level logic shared across the crate.

pub mod time;

pub use time::{format_duration, parse_duration};
