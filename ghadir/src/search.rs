//! Bilingual search over the hadith corpus.
//!
//! Queries are classified by script and routed to the matching strategy:
//! Arabic text goes through a diacritic-aware LIKE pass with a normalized
//! retry and a bounded client-side filter as the last resort; Latin text
//! goes through the full-text index with a substring fallback; bare
//! numbers match the display hadith number. All paths share one result
//! cap and return the same flattened hit shape.

use crate::error::LibraryError;
use crate::store::{HadithHit, Store};

/// Hard cap on matches returned by any path.
pub const RESULT_LIMIT: usize = 25;

/// Bound on the candidate fetch for the client-side Arabic filter pass.
pub const CANDIDATE_LIMIT: usize = 200;

/// Queries shorter than this perform no search.
const MIN_QUERY_CHARS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryScript {
    Arabic,
    Latin,
    Numeric,
    Other,
}

/// Classifies a query: Arabic wins over Latin, Latin over bare digits.
pub fn detect_script(query: &str) -> QueryScript {
    if query.chars().any(|c| ('\u{0600}'..='\u{06FF}').contains(&c)) {
        QueryScript::Arabic
    } else if query.chars().any(|c| c.is_ascii_alphabetic()) {
        QueryScript::Latin
    } else if query.chars().any(|c| c.is_ascii_digit()) {
        QueryScript::Numeric
    } else {
        QueryScript::Other
    }
}

/// Strips Arabic diacritic marks, folds hamza letter variants to their
/// base letters, and collapses whitespace. Used identically on the query
/// and on stored text, so matching stays diacritic-insensitive.
pub fn normalize_arabic(text: &str) -> String {
    let folded: String = text
        .chars()
        .filter_map(|c| match c {
            '\u{0610}'..='\u{061A}'
            | '\u{064B}'..='\u{065F}'
            | '\u{0670}'
            | '\u{06D6}'..='\u{06ED}' => None,
            'أ' | 'إ' | 'آ' | 'ٱ' => Some('ا'),
            'ؤ' => Some('و'),
            'ئ' => Some('ي'),
            _ => Some(c),
        })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub struct SearchMatcher {
    store: Store,
}

impl SearchMatcher {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn search(&self, query: &str) -> Result<Vec<HadithHit>, LibraryError> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return Ok(Vec::new());
        }
        match detect_script(query) {
            QueryScript::Arabic => self.search_arabic(query),
            QueryScript::Latin => self.search_english(query),
            QueryScript::Numeric => self.store.search_hadith_number(query, RESULT_LIMIT),
            QueryScript::Other => Ok(Vec::new()),
        }
    }

    fn search_english(&self, query: &str) -> Result<Vec<HadithHit>, LibraryError> {
        match self.store.search_english_fts(query, RESULT_LIMIT) {
            Ok(hits) => Ok(hits),
            Err(err) => {
                // FTS rejects queries with operators it cannot parse
                tracing::debug!("full-text search failed ({err}), using substring match");
                self.store.search_english_like(query, RESULT_LIMIT)
            }
        }
    }

    fn search_arabic(&self, query: &str) -> Result<Vec<HadithHit>, LibraryError> {
        let direct = self.store.search_arabic_like(query, RESULT_LIMIT)?;
        if !direct.is_empty() {
            return Ok(direct);
        }

        let normalized = normalize_arabic(query);
        if normalized.is_empty() {
            return Ok(Vec::new());
        }

        // Retry with the stripped query; finds stores whose text was
        // loaded without diacritics
        let retried = self.store.search_arabic_like(&normalized, RESULT_LIMIT)?;
        if !retried.is_empty() {
            return Ok(retried);
        }

        // The store has no diacritic-insensitive function, so compare the
        // same normalization against a bounded candidate set here
        let candidates = self.store.arabic_candidates(CANDIDATE_LIMIT)?;
        Ok(candidates
            .into_iter()
            .filter(|hit| normalize_arabic(&hit.arabic).contains(&normalized))
            .take(RESULT_LIMIT)
            .collect())
    }
}
