//! Status-synonym lexicon for mapping vendor status text to [`ResultStatus`].
//!
//! The synonym table is injected into the parsers rather than hardcoded so
//! additional locales/vendors can be added without touching parser logic.
//! The default table covers the French exports this system receives.

use crate::api::ResultStatus;
use std::collections::HashMap;

/// Case-insensitive mapping from vendor status text to a result status.
///
/// Text not present in the table (including empty text) classifies as
/// `Finished`, the default for any row the source does not explicitly mark
/// as a non-finisher.
#[derive(Debug, Clone)]
pub struct StatusLexicon {
    synonyms: HashMap<String, ResultStatus>,
}

impl StatusLexicon {
    /// Build a lexicon from `(synonym, status)` pairs. Keys are lowercased.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, ResultStatus)>,
        S: Into<String>,
    {
        let synonyms = pairs
            .into_iter()
            .map(|(text, status)| (text.into().to_lowercase(), status))
            .collect();
        Self { synonyms }
    }

    /// Classify raw status text from a source file.
    pub fn classify(&self, raw: &str) -> ResultStatus {
        let key = raw.trim().to_lowercase();
        if key.is_empty() {
            return ResultStatus::Finished;
        }
        self.synonyms
            .get(&key)
            .copied()
            .unwrap_or(ResultStatus::Finished)
    }
}

impl Default for StatusLexicon {
    /// French-locale table matching the exports this system receives.
    fn default() -> Self {
        Self::from_pairs([
            ("dnf", ResultStatus::Dnf),
            ("abandon", ResultStatus::Dnf),
            ("dns", ResultStatus::Dns),
            ("absent", ResultStatus::Dns),
            ("dsq", ResultStatus::Dsq),
            ("disqualifié", ResultStatus::Dsq),
        ])
    }
}
