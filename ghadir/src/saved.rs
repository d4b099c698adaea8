//! Per-user saved hadiths.
//!
//! Every operation except `is_saved` requires a signed-in user; the
//! missing-user case is the `AuthRequired` condition the UI turns into a
//! "please sign in" prompt, not a crash. Duplicate saves are absorbed by
//! the store's uniqueness constraint and surfaced as `AlreadySaved`.

use crate::auth::AuthSession;
use crate::error::LibraryError;
use crate::store::{SavedEntry, Store};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    AlreadySaved,
}

pub struct SavedItems {
    store: Store,
    session: Arc<AuthSession>,
}

impl SavedItems {
    pub fn new(store: Store, session: Arc<AuthSession>) -> Self {
        Self { store, session }
    }

    fn require_user(&self) -> Result<String, LibraryError> {
        self.session
            .current_user()
            .map(|user| user.id)
            .ok_or(LibraryError::AuthRequired)
    }

    pub fn save(&self, hadith_id: i64) -> Result<SaveOutcome, LibraryError> {
        let user_id = self.require_user()?;
        let created_at = chrono::Utc::now().to_rfc3339();
        if self.store.insert_saved(&user_id, hadith_id, &created_at)? {
            Ok(SaveOutcome::Saved)
        } else {
            Ok(SaveOutcome::AlreadySaved)
        }
    }

    /// Removing a hadith that was never saved is not an error.
    pub fn remove(&self, hadith_id: i64) -> Result<(), LibraryError> {
        let user_id = self.require_user()?;
        self.store.delete_saved(&user_id, hadith_id)
    }

    /// False when signed out, rather than an error, so views can render
    /// unsaved badges without an auth check first.
    pub fn is_saved(&self, hadith_id: i64) -> Result<bool, LibraryError> {
        match self.session.current_user() {
            None => Ok(false),
            Some(user) => self.store.saved_exists(&user.id, hadith_id),
        }
    }

    /// All saved rows for the user, newest first, joined down to the
    /// owning book for direct navigation.
    pub fn list(&self) -> Result<Vec<SavedEntry>, LibraryError> {
        let user_id = self.require_user()?;
        self.store.saved_for_user(&user_id)
    }

    /// Case-insensitive filter over an already-listed saved set: Arabic
    /// text, English text, book title, or hadith number.
    pub fn filter<'a>(entries: &'a [SavedEntry], query: &str) -> Vec<&'a SavedEntry> {
        let query = query.trim();
        if query.is_empty() {
            return entries.iter().collect();
        }
        let needle = query.to_lowercase();
        entries
            .iter()
            .filter(|entry| {
                let hadith = &entry.hadith;
                hadith.arabic.to_lowercase().contains(&needle)
                    || hadith.english.to_lowercase().contains(&needle)
                    || hadith
                        .book_title
                        .as_deref()
                        .is_some_and(|title| title.to_lowercase().contains(&needle))
                    || hadith
                        .hadith_number
                        .as_deref()
                        .is_some_and(|number| number.contains(query))
            })
            .collect()
    }
}
