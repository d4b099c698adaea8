//! Client-side pagination over materialized lists.
//!
//! The full sequence for a selection is fetched once; changing pages only
//! re-slices it. Pages are 1-based.

use crate::store::{Chapter, Hadith};

/// Items shown per page across chapter lists and the reader.
pub const PAGE_SIZE: usize = 20;

pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        0
    } else {
        len.div_ceil(page_size)
    }
}

/// The window [(page-1)*size, page*size). Out-of-range pages and a zero
/// page size yield an empty slice.
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = (start + page_size).min(items.len());
    &items[start..end]
}

/// One chapter's slice of a reader page.
#[derive(Debug)]
pub struct ChapterGroup<'a> {
    pub chapter: &'a Chapter,
    pub hadiths: Vec<&'a Hadith>,
}

/// Regroups a page of flattened hadiths under their owning chapters,
/// preserving page order. Chapters with no hadith on the page do not
/// appear; hadiths whose chapter is unknown are skipped.
pub fn group_by_chapter<'a>(
    page_items: &'a [Hadith],
    chapters: &'a [Chapter],
) -> Vec<ChapterGroup<'a>> {
    let mut groups: Vec<ChapterGroup<'a>> = Vec::new();
    for hadith in page_items {
        let Some(chapter) = chapters.iter().find(|c| c.id == hadith.chapter_id) else {
            continue;
        };
        match groups.last_mut() {
            Some(group) if group.chapter.id == chapter.id => group.hadiths.push(hadith),
            _ => groups.push(ChapterGroup {
                chapter,
                hadiths: vec![hadith],
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapter(id: i64, number: i64) -> Chapter {
        Chapter {
            id,
            volume_id: Some(1),
            chapter_number: number,
            title_en: None,
            title_ar: None,
        }
    }

    fn hadith(id: i64, chapter_id: i64) -> Hadith {
        Hadith {
            id,
            chapter_id,
            hadith_number: Some(id.to_string()),
            arabic: String::new(),
            english: String::new(),
            reference: None,
        }
    }

    #[test]
    fn pages_concatenate_back_to_the_original() {
        let items: Vec<i64> = (0..53).collect();
        let mut rebuilt = Vec::new();
        for page in 1..=total_pages(items.len(), PAGE_SIZE) {
            rebuilt.extend_from_slice(page_slice(&items, page, PAGE_SIZE));
        }
        assert_eq!(rebuilt, items);
    }

    #[test]
    fn page_count_is_ceiling_division() {
        assert_eq!(total_pages(0, PAGE_SIZE), 0);
        assert_eq!(total_pages(1, PAGE_SIZE), 1);
        assert_eq!(total_pages(20, PAGE_SIZE), 1);
        assert_eq!(total_pages(21, PAGE_SIZE), 2);
        assert_eq!(total_pages(40, PAGE_SIZE), 2);
    }

    #[test]
    fn zero_page_size_has_no_pages() {
        let items = [1, 2, 3];
        assert_eq!(total_pages(items.len(), 0), 0);
        assert!(page_slice(&items, 1, 0).is_empty());
    }

    #[test]
    fn out_of_range_pages_are_empty() {
        let items: Vec<i64> = (0..5).collect();
        assert!(page_slice(&items, 0, PAGE_SIZE).is_empty());
        assert!(page_slice(&items, 2, PAGE_SIZE).is_empty());
    }

    #[test]
    fn grouping_keeps_only_chapters_present_on_the_page() {
        let chapters = vec![chapter(1, 1), chapter(2, 2), chapter(3, 3)];
        let page = vec![hadith(10, 1), hadith(11, 1), hadith(12, 3)];
        let groups = group_by_chapter(&page, &chapters);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].chapter.id, 1);
        assert_eq!(groups[0].hadiths.len(), 2);
        assert_eq!(groups[1].chapter.id, 3);
    }

    #[test]
    fn orphan_hadiths_are_skipped() {
        let chapters = vec![chapter(1, 1)];
        let page = vec![hadith(10, 1), hadith(11, 99)];
        let groups = group_by_chapter(&page, &chapters);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].hadiths.len(), 1);
    }
}
