//! Chapter hadith caching with LRU eviction.
//!
//! Chapter views are re-visited constantly while reading; the rows are
//! immutable from the application's side, so they are shared as `Arc`
//! slices and evicted least-recently-used.

use crate::error::LibraryError;
use crate::order;
use crate::store::{Hadith, Store};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

/// Default cache capacity (number of chapters)
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

pub struct ChapterCache {
    cache: Mutex<LruCache<i64, Arc<Vec<Hadith>>>>,
    store: Store,
}

impl ChapterCache {
    pub fn new(store: Store, capacity: usize) -> Self {
        let cache = LruCache::new(
            NonZeroUsize::new(capacity)
                .unwrap_or_else(|| NonZeroUsize::new(DEFAULT_CACHE_CAPACITY).unwrap()),
        );
        Self {
            cache: Mutex::new(cache),
            store,
        }
    }

    /// Hadiths of one chapter in display order, from cache when warm.
    pub fn get(&self, chapter_id: i64) -> Result<Arc<Vec<Hadith>>, LibraryError> {
        {
            let mut cache = self.cache.lock().unwrap();
            if let Some(hadiths) = cache.get(&chapter_id) {
                return Ok(Arc::clone(hadiths));
            }
        }

        let mut rows = self.store.hadiths_for_chapter(chapter_id)?;
        order::sort_hadiths(&mut rows);
        let rows = Arc::new(rows);
        {
            let mut cache = self.cache.lock().unwrap();
            cache.put(chapter_id, Arc::clone(&rows));
        }
        Ok(rows)
    }

    pub fn clear(&self) {
        self.cache.lock().unwrap().clear();
    }

    pub fn stats(&self) -> (usize, usize) {
        let cache = self.cache.lock().unwrap();
        (cache.len(), cache.cap().get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testutil::*;

    #[test]
    fn cached_chapters_share_one_allocation() {
        let (_dir, store) = temp_store();
        seed_book(&store, 1, "Book", None);
        seed_volume(&store, 10, 1, 1);
        seed_chapter(&store, 100, Some(10), 1, None);
        seed_hadith(&store, 1, 100, Some("2"), "نص", "b");
        seed_hadith(&store, 2, 100, Some("1"), "نص", "a");

        let cache = ChapterCache::new(store, 8);
        let first = cache.get(100).unwrap();
        let second = cache.get(100).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        // Display order, not store order
        assert_eq!(first[0].hadith_number.as_deref(), Some("1"));
        assert_eq!(cache.stats().0, 1);
    }

    #[test]
    fn clear_empties_the_cache() {
        let (_dir, store) = temp_store();
        seed_book(&store, 1, "Book", None);
        seed_volume(&store, 10, 1, 1);
        seed_chapter(&store, 100, Some(10), 1, None);

        let cache = ChapterCache::new(store, 8);
        cache.get(100).unwrap();
        cache.clear();
        assert_eq!(cache.stats().0, 0);
    }
}
