//! Application state wiring

use crate::auth::AuthSession;
use crate::cache::{ChapterCache, DEFAULT_CACHE_CAPACITY};
use crate::error::LibraryError;
use crate::navigator::BookNavigator;
use crate::saved::SavedItems;
use crate::search::SearchMatcher;
use crate::store::Store;
use std::path::PathBuf;
use std::sync::Arc;

/// Default library database path under the platform data directory.
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ghadir")
        .join("library.db")
}

/// Application state holding the store handle and shared services
pub struct AppState {
    pub store: Store,
    pub chapter_cache: Arc<ChapterCache>,
    pub auth: Arc<AuthSession>,
}

impl AppState {
    /// Initialize application state
    pub fn new(db_path: PathBuf) -> Result<Self, LibraryError> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| LibraryError::Database(err.to_string()))?;
        }
        let store = Store::open(db_path)?;
        let chapter_cache = Arc::new(ChapterCache::new(store.clone(), DEFAULT_CACHE_CAPACITY));
        let auth = Arc::new(AuthSession::new(store.clone()));
        Ok(Self {
            store,
            chapter_cache,
            auth,
        })
    }

    pub fn open_book(&self, book_id: i64) -> Result<BookNavigator, LibraryError> {
        BookNavigator::open(self.store.clone(), book_id)
    }

    pub fn search(&self) -> SearchMatcher {
        SearchMatcher::new(self.store.clone())
    }

    pub fn saved_items(&self) -> SavedItems {
        SavedItems::new(self.store.clone(), self.auth.clone())
    }
}
