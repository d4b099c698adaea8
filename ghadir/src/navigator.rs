//! Book navigation: decides the volume/chapter shape of a book view.
//!
//! A book either has selectable volumes (volume_number > 0), a single
//! hidden volume (the volume_number = 0 sentinel), or no volume tier at
//! all. Passive catalog loads never fail a view: the query layer's errors
//! are logged and degraded to empty lists here, at the boundary that owns
//! the view state.

use crate::error::LibraryError;
use crate::page::{self, PAGE_SIZE};
use crate::store::{Book, Chapter, Store, Volume};

fn or_empty<T>(result: Result<Vec<T>, LibraryError>, what: &str) -> Vec<T> {
    match result {
        Ok(rows) => rows,
        Err(err) => {
            tracing::warn!("failed to load {what}: {err}");
            Vec::new()
        }
    }
}

/// Whole-book chapter list with the position of one chapter in it, for
/// previous/next navigation.
#[derive(Debug)]
pub struct ChapterContext {
    pub chapters: Vec<Chapter>,
    pub index: Option<usize>,
}

impl ChapterContext {
    pub fn current(&self) -> Option<&Chapter> {
        self.chapters.get(self.index?)
    }

    pub fn prev(&self) -> Option<&Chapter> {
        let index = self.index?;
        self.chapters.get(index.checked_sub(1)?)
    }

    pub fn next(&self) -> Option<&Chapter> {
        self.chapters.get(self.index? + 1)
    }
}

pub struct BookNavigator {
    store: Store,
    book: Book,
    /// Selector volumes only (volume_number > 0); empty when the selector
    /// is hidden.
    volumes: Vec<Volume>,
    selected_volume: Option<i64>,
    /// None while the book has no volume tier; Some(0) for the hidden
    /// single-volume sentinel.
    selected_volume_number: Option<i64>,
    chapters: Vec<Chapter>,
}

impl BookNavigator {
    /// Loads the book and resolves its navigation shape. A missing book is
    /// the one hard error here; everything below it soft-fails.
    pub fn open(store: Store, book_id: i64) -> Result<Self, LibraryError> {
        let book = store
            .get_book(book_id)?
            .ok_or_else(|| LibraryError::NotFound(format!("book {book_id}")))?;
        let mut navigator = Self {
            store,
            book,
            volumes: Vec::new(),
            selected_volume: None,
            selected_volume_number: None,
            chapters: Vec::new(),
        };
        navigator.resolve();
        Ok(navigator)
    }

    fn resolve(&mut self) {
        let all_volumes = or_empty(self.store.volumes_for_book(self.book.id), "volumes");

        if all_volumes.is_empty() {
            // No volume tier: chapters hang off the book directly
            self.chapters = or_empty(self.store.chapters_without_volume(), "chapters");
            self.volumes = Vec::new();
            self.selected_volume = None;
            self.selected_volume_number = None;
            return;
        }

        let valid: Vec<Volume> = all_volumes
            .iter()
            .filter(|v| v.volume_number > 0)
            .cloned()
            .collect();

        if let Some(first) = valid.first() {
            self.selected_volume = Some(first.id);
            self.selected_volume_number = Some(first.volume_number);
            self.chapters = or_empty(self.store.chapters_for_volume(first.id), "chapters");
            self.volumes = valid;
        } else {
            // Only the volume_number = 0 sentinel exists: fetch its
            // chapters but keep the selector hidden
            let only = &all_volumes[0];
            self.selected_volume = Some(only.id);
            self.selected_volume_number = Some(0);
            self.chapters = or_empty(self.store.chapters_for_volume(only.id), "chapters");
            self.volumes = Vec::new();
        }
    }

    /// Switches the selection to another volume from the selector and
    /// re-fetches its chapters.
    pub fn select_volume(&mut self, volume_id: i64) -> Result<(), LibraryError> {
        let volume = self
            .volumes
            .iter()
            .find(|v| v.id == volume_id)
            .ok_or_else(|| LibraryError::NotFound(format!("volume {volume_id}")))?;
        self.selected_volume = Some(volume.id);
        self.selected_volume_number = Some(volume.volume_number);
        self.chapters = or_empty(self.store.chapters_for_volume(volume_id), "chapters");
        Ok(())
    }

    pub fn book(&self) -> &Book {
        &self.book
    }

    pub fn volumes(&self) -> &[Volume] {
        &self.volumes
    }

    pub fn has_selector(&self) -> bool {
        !self.volumes.is_empty()
    }

    pub fn selected_volume(&self) -> Option<i64> {
        self.selected_volume
    }

    pub fn selected_volume_number(&self) -> Option<i64> {
        self.selected_volume_number
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn chapter_page_count(&self) -> usize {
        page::total_pages(self.chapters.len(), PAGE_SIZE)
    }

    pub fn chapter_page(&self, page_number: usize) -> &[Chapter] {
        page::page_slice(&self.chapters, page_number, PAGE_SIZE)
    }

    /// Chapter list of the whole book (all volumes) with the position of
    /// `chapter_id`, for previous/next links.
    pub fn chapter_context(&self, chapter_id: i64) -> ChapterContext {
        let chapters = or_empty(self.store.chapters_for_book(self.book.id), "book chapters");
        let index = chapters.iter().position(|c| c.id == chapter_id);
        ChapterContext { chapters, index }
    }
}
