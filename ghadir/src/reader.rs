//! Continuous reader over a whole volume, plus deep-link targeting.
//!
//! The reader fetches every hadith of the current selection once, flattens
//! them in (chapter, hadith) display order, and pages through the
//! flattened list. Deep links (`#hadith-<id>` or `?hadith=<id>`) resolve
//! to the owning chapter, volume, and reader page before any scrolling can
//! happen; a target in another volume switches the selection first.

use crate::error::LibraryError;
use crate::navigator::BookNavigator;
use crate::order;
use crate::page::{self, ChapterGroup, PAGE_SIZE};
use crate::store::{Chapter, Hadith, Store};
use std::collections::HashMap;

pub struct VolumeReader {
    chapters: Vec<Chapter>,
    hadiths: Vec<Hadith>,
    current_page: usize,
}

impl VolumeReader {
    /// Loads all hadiths for the given chapters in one query. A failed
    /// fetch degrades to an empty reader.
    pub fn load(store: &Store, chapters: &[Chapter]) -> Self {
        let ids: Vec<i64> = chapters.iter().map(|c| c.id).collect();
        let rows = match store.hadiths_for_chapters(&ids) {
            Ok(rows) => rows,
            Err(err) => {
                tracing::warn!("failed to load volume hadiths: {err}");
                Vec::new()
            }
        };

        let mut by_chapter: HashMap<i64, Vec<Hadith>> = HashMap::new();
        for hadith in rows {
            by_chapter.entry(hadith.chapter_id).or_default().push(hadith);
        }

        let mut flattened = Vec::new();
        for chapter in chapters {
            if let Some(mut bucket) = by_chapter.remove(&chapter.id) {
                order::sort_hadiths(&mut bucket);
                flattened.extend(bucket);
            }
        }

        Self {
            chapters: chapters.to_vec(),
            hadiths: flattened,
            current_page: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.hadiths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hadiths.is_empty()
    }

    pub fn total_pages(&self) -> usize {
        page::total_pages(self.hadiths.len(), PAGE_SIZE)
    }

    pub fn page(&self) -> usize {
        self.current_page
    }

    /// Moves to a page, clamped into range. Paging never refetches.
    pub fn set_page(&mut self, page_number: usize) {
        let total = self.total_pages();
        self.current_page = if total == 0 {
            1
        } else {
            page_number.clamp(1, total)
        };
    }

    pub fn page_items(&self) -> &[Hadith] {
        page::page_slice(&self.hadiths, self.current_page, PAGE_SIZE)
    }

    /// The current page regrouped under its chapters; chapters without a
    /// hadith on this page are absent.
    pub fn page_by_chapter(&self) -> Vec<ChapterGroup<'_>> {
        page::group_by_chapter(self.page_items(), &self.chapters)
    }

    /// 1-based page containing a hadith, from the flattened order.
    pub fn page_of_hadith(&self, hadith_id: i64) -> Option<usize> {
        let index = self.hadiths.iter().position(|h| h.id == hadith_id)?;
        Some(index / PAGE_SIZE + 1)
    }
}

/// Deep-link target from a `#hadith-<id>` fragment.
pub fn hash_target(hash: &str) -> Option<i64> {
    hash.strip_prefix("#hadith-")?.parse().ok()
}

/// Deep-link target from a `?hadith=<id>` query string.
pub fn query_target(query: &str) -> Option<i64> {
    let query = query.strip_prefix('?').unwrap_or(query);
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == "hadith").then(|| value.parse().ok())?
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HadithLocation {
    pub volume_id: Option<i64>,
    pub chapter_id: i64,
    pub page: usize,
}

/// Resolves where a deep-linked hadith lives. Switches the navigator's
/// selected volume when the target belongs to a different one, then
/// reports the reader page holding it. Unknown ids resolve to `None`.
pub fn locate_hadith(
    store: &Store,
    navigator: &mut BookNavigator,
    hadith_id: i64,
) -> Result<Option<HadithLocation>, LibraryError> {
    let Some(chapter_id) = store.hadith_chapter(hadith_id)? else {
        return Ok(None);
    };
    let Some(chapter) = store.get_chapter(chapter_id)? else {
        return Ok(None);
    };

    if let Some(volume_id) = chapter.volume_id {
        let in_selector = navigator.volumes().iter().any(|v| v.id == volume_id);
        if navigator.selected_volume() != Some(volume_id) && in_selector {
            navigator.select_volume(volume_id)?;
        }
    }

    let reader = VolumeReader::load(store, navigator.chapters());
    let page = reader.page_of_hadith(hadith_id).unwrap_or(1);

    Ok(Some(HadithLocation {
        volume_id: chapter.volume_id,
        chapter_id,
        page,
    }))
}

/// Shareable text for one hadith: Arabic, English, a reference line, and
/// the link back. Falls back to "book, Chapter N" when the hadith has no
/// stored reference.
pub fn citation(hadith: &Hadith, book_title: &str, chapter_number: Option<i64>, url: &str) -> String {
    let reference = match hadith.reference.as_deref() {
        Some(reference) if !reference.is_empty() => reference.to_string(),
        _ => match chapter_number {
            Some(number) => format!("{book_title}, Chapter {number}"),
            None => book_title.to_string(),
        },
    };
    format!("{}\n\n{}\n\n{}\n{}", hadith.arabic, hadith.english, reference, url)
}
