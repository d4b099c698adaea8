//! Typed query layer over the library database.
//!
//! Every table the application reads has an explicit record type here, and
//! every row is mapped through a `row_to_*` function at this boundary.
//! Malformed text columns default to empty rather than leaking dynamic
//! shapes into the rest of the crate. All query methods return tagged
//! results; the decision to degrade a failure to an empty list belongs to
//! the callers that own view state, not to this layer.

use crate::error::LibraryError;
use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub english_title: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub image_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Volume {
    pub id: i64,
    pub book_id: i64,
    pub volume_number: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    pub id: i64,
    pub volume_id: Option<i64>,
    pub chapter_number: i64,
    pub title_en: Option<String>,
    pub title_ar: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hadith {
    pub id: i64,
    pub chapter_id: i64,
    pub hadith_number: Option<String>,
    pub arabic: String,
    pub english: String,
    pub reference: Option<String>,
}

/// A hadith flattened with the chapter/volume/book fields needed to
/// navigate straight to it. Volume and book are absent for chapters
/// outside the volume tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HadithHit {
    pub hadith_id: i64,
    pub hadith_number: Option<String>,
    pub arabic: String,
    pub english: String,
    pub reference: Option<String>,
    pub chapter_id: i64,
    pub chapter_number: i64,
    pub chapter_title_en: Option<String>,
    pub volume_id: Option<i64>,
    pub volume_number: Option<i64>,
    pub book_id: Option<i64>,
    pub book_title: Option<String>,
    pub book_english_title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub email: String,
    pub created_at: String,
}

/// One row of the per-user saved list, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedEntry {
    pub id: i64,
    pub created_at: String,
    pub hadith: HadithHit,
}

const BOOK_COLUMNS: &str = "id, title, english_title, author, category, image_path";

const CHAPTER_COLUMNS: &str = "id, volume_id, chapter_number, title_en, title_ar";

const HADITH_COLUMNS: &str = "h.id, h.chapter_id, h.hadith_number, h.arabic, h.english, r.reference";

const HIT_COLUMNS: &str = "h.id, h.hadith_number, h.arabic, h.english, r.reference, \
     c.id, c.chapter_number, c.title_en, v.id, v.volume_number, b.id, b.title, b.english_title";

const HIT_FROM: &str = "FROM hadith h \
     JOIN chapters c ON c.id = h.chapter_id \
     LEFT JOIN hadith_reference r ON r.hadith_id = h.id \
     LEFT JOIN volumes v ON v.id = c.volume_id \
     LEFT JOIN books b ON b.id = v.book_id";

fn row_to_book(row: &Row) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get(0)?,
        title: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        english_title: row.get(2)?,
        author: row.get(3)?,
        category: row.get(4)?,
        image_path: row.get(5)?,
    })
}

fn row_to_volume(row: &Row) -> rusqlite::Result<Volume> {
    Ok(Volume {
        id: row.get(0)?,
        book_id: row.get(1)?,
        volume_number: row.get::<_, Option<i64>>(2)?.unwrap_or(0),
    })
}

fn row_to_chapter(row: &Row) -> rusqlite::Result<Chapter> {
    Ok(Chapter {
        id: row.get(0)?,
        volume_id: row.get(1)?,
        chapter_number: row.get::<_, Option<i64>>(2)?.unwrap_or(0),
        title_en: row.get(3)?,
        title_ar: row.get(4)?,
    })
}

fn row_to_hadith(row: &Row) -> rusqlite::Result<Hadith> {
    Ok(Hadith {
        id: row.get(0)?,
        chapter_id: row.get(1)?,
        hadith_number: row.get(2)?,
        arabic: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        english: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        reference: row.get(5)?,
    })
}

/// Maps the HIT_COLUMNS projection starting at column `start`, so the same
/// mapping serves both search results and the saved-list join.
fn row_to_hit_at(row: &Row, start: usize) -> rusqlite::Result<HadithHit> {
    Ok(HadithHit {
        hadith_id: row.get(start)?,
        hadith_number: row.get(start + 1)?,
        arabic: row.get::<_, Option<String>>(start + 2)?.unwrap_or_default(),
        english: row.get::<_, Option<String>>(start + 3)?.unwrap_or_default(),
        reference: row.get(start + 4)?,
        chapter_id: row.get(start + 5)?,
        chapter_number: row.get::<_, Option<i64>>(start + 6)?.unwrap_or(0),
        chapter_title_en: row.get(start + 7)?,
        volume_id: row.get(start + 8)?,
        volume_number: row.get(start + 9)?,
        book_id: row.get(start + 10)?,
        book_title: row.get(start + 11)?,
        book_english_title: row.get(start + 12)?,
    })
}

fn row_to_hit(row: &Row) -> rusqlite::Result<HadithHit> {
    row_to_hit_at(row, 0)
}

/// Handle to the library database. Each operation opens its own
/// connection, so the handle is cheap to clone and share.
#[derive(Clone)]
pub struct Store {
    db_path: PathBuf,
}

impl Store {
    /// Open (and bootstrap, when missing) the library database.
    pub fn open(db_path: impl Into<PathBuf>) -> Result<Self, LibraryError> {
        let store = Self {
            db_path: db_path.into(),
        };
        store.init_schema()?;
        Ok(store)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Get a new database connection (each call creates a new connection)
    pub fn connect(&self) -> Result<Connection> {
        Connection::open(&self.db_path)
            .with_context(|| format!("Failed to open library database at {:?}", self.db_path))
    }

    fn init_schema(&self) -> Result<(), LibraryError> {
        let conn = self.connect()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS books (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                english_title TEXT,
                author TEXT,
                category TEXT,
                image_path TEXT
            );

            CREATE TABLE IF NOT EXISTS volumes (
                id INTEGER PRIMARY KEY,
                book_id INTEGER NOT NULL REFERENCES books(id),
                volume_number INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS chapters (
                id INTEGER PRIMARY KEY,
                volume_id INTEGER REFERENCES volumes(id),
                chapter_number INTEGER NOT NULL,
                title_en TEXT,
                title_ar TEXT
            );

            CREATE TABLE IF NOT EXISTS hadith (
                id INTEGER PRIMARY KEY,
                chapter_id INTEGER NOT NULL REFERENCES chapters(id),
                hadith_number TEXT,
                arabic TEXT NOT NULL,
                english TEXT
            );

            CREATE TABLE IF NOT EXISTS hadith_reference (
                hadith_id INTEGER PRIMARY KEY REFERENCES hadith(id),
                reference TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS profiles (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            -- One row per (user, hadith); duplicate saves hit the UNIQUE
            -- constraint and are reported as "already saved"
            CREATE TABLE IF NOT EXISTS saved_hadiths (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL REFERENCES profiles(id),
                hadith_id INTEGER NOT NULL REFERENCES hadith(id),
                created_at TEXT NOT NULL,
                UNIQUE(user_id, hadith_id)
            );

            CREATE INDEX IF NOT EXISTS idx_volumes_book ON volumes(book_id);
            CREATE INDEX IF NOT EXISTS idx_chapters_volume ON chapters(volume_id);
            CREATE INDEX IF NOT EXISTS idx_hadith_chapter ON hadith(chapter_id);
            CREATE INDEX IF NOT EXISTS idx_saved_hadiths_created
            ON saved_hadiths(created_at DESC);

            CREATE VIRTUAL TABLE IF NOT EXISTS hadith_fts
            USING fts5(english, content='hadith', content_rowid='id');

            CREATE TRIGGER IF NOT EXISTS hadith_fts_insert AFTER INSERT ON hadith BEGIN
                INSERT INTO hadith_fts(rowid, english) VALUES (new.id, new.english);
            END;

            CREATE TRIGGER IF NOT EXISTS hadith_fts_delete AFTER DELETE ON hadith BEGIN
                INSERT INTO hadith_fts(hadith_fts, rowid, english)
                VALUES ('delete', old.id, old.english);
            END;

            CREATE TRIGGER IF NOT EXISTS hadith_fts_update AFTER UPDATE ON hadith BEGIN
                INSERT INTO hadith_fts(hadith_fts, rowid, english)
                VALUES ('delete', old.id, old.english);
                INSERT INTO hadith_fts(rowid, english) VALUES (new.id, new.english);
            END;
            "#,
        )?;
        Ok(())
    }

    // === Catalog queries ===

    pub fn list_books(&self) -> Result<Vec<Book>, LibraryError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!("SELECT {} FROM books ORDER BY id", BOOK_COLUMNS))?;
        let books = stmt
            .query_map([], row_to_book)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(books)
    }

    pub fn get_book(&self, id: i64) -> Result<Option<Book>, LibraryError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!("SELECT {} FROM books WHERE id = ?1", BOOK_COLUMNS))?;
        let book = stmt.query_row([id], row_to_book).optional()?;
        Ok(book)
    }

    pub fn volumes_for_book(&self, book_id: i64) -> Result<Vec<Volume>, LibraryError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, book_id, volume_number FROM volumes
             WHERE book_id = ?1 ORDER BY volume_number",
        )?;
        let volumes = stmt
            .query_map([book_id], row_to_volume)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(volumes)
    }

    pub fn chapters_for_volume(&self, volume_id: i64) -> Result<Vec<Chapter>, LibraryError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM chapters WHERE volume_id = ?1 ORDER BY chapter_number",
            CHAPTER_COLUMNS
        ))?;
        let chapters = stmt
            .query_map([volume_id], row_to_chapter)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(chapters)
    }

    /// Chapters outside the volume tier. The chapters table carries no book
    /// id, so this is a global fetch, exactly like the upstream query.
    pub fn chapters_without_volume(&self) -> Result<Vec<Chapter>, LibraryError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM chapters WHERE volume_id IS NULL ORDER BY chapter_number",
            CHAPTER_COLUMNS
        ))?;
        let chapters = stmt
            .query_map([], row_to_chapter)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(chapters)
    }

    /// All chapters of a book, reached through its volumes, plus any
    /// un-volumed chapters.
    pub fn chapters_for_book(&self, book_id: i64) -> Result<Vec<Chapter>, LibraryError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT c.id, c.volume_id, c.chapter_number, c.title_en, c.title_ar
             FROM chapters c
             LEFT JOIN volumes v ON v.id = c.volume_id
             WHERE v.book_id = ?1 OR c.volume_id IS NULL
             ORDER BY c.chapter_number",
        )?;
        let chapters = stmt
            .query_map([book_id], row_to_chapter)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(chapters)
    }

    pub fn get_chapter(&self, id: i64) -> Result<Option<Chapter>, LibraryError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM chapters WHERE id = ?1",
            CHAPTER_COLUMNS
        ))?;
        let chapter = stmt.query_row([id], row_to_chapter).optional()?;
        Ok(chapter)
    }

    pub fn hadiths_for_chapter(&self, chapter_id: i64) -> Result<Vec<Hadith>, LibraryError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM hadith h
             LEFT JOIN hadith_reference r ON r.hadith_id = h.id
             WHERE h.chapter_id = ?1 ORDER BY h.id",
            HADITH_COLUMNS
        ))?;
        let hadiths = stmt
            .query_map([chapter_id], row_to_hadith)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(hadiths)
    }

    /// One query for the hadiths of many chapters, for the continuous
    /// reader. Batched to stay under the SQLite variable limit.
    pub fn hadiths_for_chapters(&self, chapter_ids: &[i64]) -> Result<Vec<Hadith>, LibraryError> {
        if chapter_ids.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.connect()?;
        let mut hadiths = Vec::new();
        for chunk in chapter_ids.chunks(500) {
            let placeholders: String = chunk.iter().map(|_| "?").collect::<Vec<_>>().join(",");
            let sql = format!(
                "SELECT {} FROM hadith h
                 LEFT JOIN hadith_reference r ON r.hadith_id = h.id
                 WHERE h.chapter_id IN ({}) ORDER BY h.chapter_id, h.id",
                HADITH_COLUMNS, placeholders
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(rusqlite::params_from_iter(chunk.iter()), row_to_hadith)?
                .collect::<Result<Vec<_>, _>>()?;
            hadiths.extend(rows);
        }
        Ok(hadiths)
    }

    /// Owning chapter of a hadith, for deep-link resolution.
    pub fn hadith_chapter(&self, hadith_id: i64) -> Result<Option<i64>, LibraryError> {
        let conn = self.connect()?;
        let chapter_id = conn
            .query_row(
                "SELECT chapter_id FROM hadith WHERE id = ?1",
                [hadith_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(chapter_id)
    }

    // === Search queries ===

    /// Full-text match over the English text. Errors on queries the FTS
    /// engine cannot parse; callers fall back to a substring match.
    pub fn search_english_fts(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<HadithHit>, LibraryError> {
        let conn = self.connect()?;
        let sql = format!(
            "SELECT {} {} WHERE h.id IN
                 (SELECT rowid FROM hadith_fts WHERE hadith_fts MATCH ?1)
             ORDER BY h.id LIMIT ?2",
            HIT_COLUMNS, HIT_FROM
        );
        let mut stmt = conn.prepare(&sql)?;
        let hits = stmt
            .query_map(rusqlite::params![query, limit as i64], row_to_hit)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(hits)
    }

    /// Case-insensitive substring match over the English text.
    pub fn search_english_like(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<HadithHit>, LibraryError> {
        let conn = self.connect()?;
        let sql = format!(
            "SELECT {} {} WHERE h.english LIKE '%' || ?1 || '%'
             ORDER BY h.id LIMIT ?2",
            HIT_COLUMNS, HIT_FROM
        );
        let mut stmt = conn.prepare(&sql)?;
        let hits = stmt
            .query_map(rusqlite::params![query, limit as i64], row_to_hit)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(hits)
    }

    /// Substring match over the Arabic text, diacritics included.
    pub fn search_arabic_like(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<HadithHit>, LibraryError> {
        let conn = self.connect()?;
        let sql = format!(
            "SELECT {} {} WHERE h.arabic LIKE '%' || ?1 || '%'
             ORDER BY h.id LIMIT ?2",
            HIT_COLUMNS, HIT_FROM
        );
        let mut stmt = conn.prepare(&sql)?;
        let hits = stmt
            .query_map(rusqlite::params![query, limit as i64], row_to_hit)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(hits)
    }

    /// Substring match over the display hadith number.
    pub fn search_hadith_number(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<HadithHit>, LibraryError> {
        let conn = self.connect()?;
        let sql = format!(
            "SELECT {} {} WHERE h.hadith_number LIKE '%' || ?1 || '%'
             ORDER BY h.id LIMIT ?2",
            HIT_COLUMNS, HIT_FROM
        );
        let mut stmt = conn.prepare(&sql)?;
        let hits = stmt
            .query_map(rusqlite::params![query, limit as i64], row_to_hit)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(hits)
    }

    /// Bounded candidate set for the client-side diacritic-insensitive
    /// filter pass.
    pub fn arabic_candidates(&self, limit: usize) -> Result<Vec<HadithHit>, LibraryError> {
        let conn = self.connect()?;
        let sql = format!(
            "SELECT {} {} ORDER BY h.id LIMIT ?1",
            HIT_COLUMNS, HIT_FROM
        );
        let mut stmt = conn.prepare(&sql)?;
        let hits = stmt
            .query_map([limit as i64], row_to_hit)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(hits)
    }

    // === Profiles ===

    pub fn get_profile(&self, id: &str) -> Result<Option<Profile>, LibraryError> {
        let conn = self.connect()?;
        let profile = conn
            .query_row(
                "SELECT id, email, created_at FROM profiles WHERE id = ?1",
                [id],
                |row| {
                    Ok(Profile {
                        id: row.get(0)?,
                        email: row.get(1)?,
                        created_at: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(profile)
    }

    pub fn insert_profile(
        &self,
        id: &str,
        email: &str,
        created_at: &str,
    ) -> Result<(), LibraryError> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT OR IGNORE INTO profiles (id, email, created_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![id, email, created_at],
        )?;
        Ok(())
    }

    // === Saved hadiths ===

    /// Returns true when a new row was inserted, false when the (user,
    /// hadith) pair already existed.
    pub fn insert_saved(
        &self,
        user_id: &str,
        hadith_id: i64,
        created_at: &str,
    ) -> Result<bool, LibraryError> {
        let conn = self.connect()?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO saved_hadiths (user_id, hadith_id, created_at)
             VALUES (?1, ?2, ?3)",
            rusqlite::params![user_id, hadith_id, created_at],
        )?;
        Ok(inserted > 0)
    }

    pub fn delete_saved(&self, user_id: &str, hadith_id: i64) -> Result<(), LibraryError> {
        let conn = self.connect()?;
        conn.execute(
            "DELETE FROM saved_hadiths WHERE user_id = ?1 AND hadith_id = ?2",
            rusqlite::params![user_id, hadith_id],
        )?;
        Ok(())
    }

    pub fn saved_exists(&self, user_id: &str, hadith_id: i64) -> Result<bool, LibraryError> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM saved_hadiths WHERE user_id = ?1 AND hadith_id = ?2",
            rusqlite::params![user_id, hadith_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn saved_for_user(&self, user_id: &str) -> Result<Vec<SavedEntry>, LibraryError> {
        let conn = self.connect()?;
        let sql = format!(
            "SELECT s.id, s.created_at, {}
             FROM saved_hadiths s
             JOIN hadith h ON h.id = s.hadith_id
             JOIN chapters c ON c.id = h.chapter_id
             LEFT JOIN hadith_reference r ON r.hadith_id = h.id
             LEFT JOIN volumes v ON v.id = c.volume_id
             LEFT JOIN books b ON b.id = v.book_id
             WHERE s.user_id = ?1
             ORDER BY s.created_at DESC, s.id DESC",
            HIT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let entries = stmt
            .query_map([user_id], |row| {
                Ok(SavedEntry {
                    id: row.get(0)?,
                    created_at: row.get(1)?,
                    hadith: row_to_hit_at(row, 2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use super::*;
    use tempfile::TempDir;

    pub(crate) fn temp_store() -> (TempDir, Store) {
        let dir = TempDir::new().expect("temp dir");
        let store = Store::open(dir.path().join("library.db")).expect("open store");
        (dir, store)
    }

    pub(crate) fn seed_book(store: &Store, id: i64, title: &str, english_title: Option<&str>) {
        let conn = store.connect().unwrap();
        conn.execute(
            "INSERT INTO books (id, title, english_title) VALUES (?1, ?2, ?3)",
            rusqlite::params![id, title, english_title],
        )
        .unwrap();
    }

    pub(crate) fn seed_volume(store: &Store, id: i64, book_id: i64, volume_number: i64) {
        let conn = store.connect().unwrap();
        conn.execute(
            "INSERT INTO volumes (id, book_id, volume_number) VALUES (?1, ?2, ?3)",
            rusqlite::params![id, book_id, volume_number],
        )
        .unwrap();
    }

    pub(crate) fn seed_chapter(
        store: &Store,
        id: i64,
        volume_id: Option<i64>,
        chapter_number: i64,
        title_en: Option<&str>,
    ) {
        let conn = store.connect().unwrap();
        conn.execute(
            "INSERT INTO chapters (id, volume_id, chapter_number, title_en) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![id, volume_id, chapter_number, title_en],
        )
        .unwrap();
    }

    pub(crate) fn seed_hadith(
        store: &Store,
        id: i64,
        chapter_id: i64,
        hadith_number: Option<&str>,
        arabic: &str,
        english: &str,
    ) {
        let conn = store.connect().unwrap();
        conn.execute(
            "INSERT INTO hadith (id, chapter_id, hadith_number, arabic, english)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![id, chapter_id, hadith_number, arabic, english],
        )
        .unwrap();
    }

    pub(crate) fn seed_reference(store: &Store, hadith_id: i64, reference: &str) {
        let conn = store.connect().unwrap();
        conn.execute(
            "INSERT INTO hadith_reference (hadith_id, reference) VALUES (?1, ?2)",
            rusqlite::params![hadith_id, reference],
        )
        .unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::testutil::*;

    #[test]
    fn open_is_idempotent() {
        let (dir, store) = temp_store();
        seed_book(&store, 1, "الكافي", Some("Al-Kafi"));
        // Re-opening the same file must not disturb existing data
        let reopened = super::Store::open(dir.path().join("library.db")).unwrap();
        let books = reopened.list_books().unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "الكافي");
    }

    #[test]
    fn missing_book_is_none() {
        let (_dir, store) = temp_store();
        assert!(store.get_book(99).unwrap().is_none());
    }

    #[test]
    fn hadith_rows_join_their_reference() {
        let (_dir, store) = temp_store();
        seed_book(&store, 1, "Book", None);
        seed_volume(&store, 10, 1, 1);
        seed_chapter(&store, 100, Some(10), 1, Some("Chapter One"));
        seed_hadith(&store, 1000, 100, Some("1"), "نص", "Text one");
        seed_hadith(&store, 1001, 100, Some("2"), "نص آخر", "Text two");
        seed_reference(&store, 1000, "Al-Kafi, v1 p3");

        let hadiths = store.hadiths_for_chapter(100).unwrap();
        assert_eq!(hadiths.len(), 2);
        assert_eq!(hadiths[0].reference.as_deref(), Some("Al-Kafi, v1 p3"));
        assert_eq!(hadiths[1].reference, None);
    }

    #[test]
    fn book_chapters_cross_the_volume_join() {
        let (_dir, store) = temp_store();
        seed_book(&store, 1, "Book", None);
        seed_volume(&store, 10, 1, 1);
        seed_volume(&store, 11, 1, 2);
        seed_chapter(&store, 100, Some(10), 2, None);
        seed_chapter(&store, 101, Some(11), 1, None);
        seed_chapter(&store, 102, None, 3, None);

        let chapters = store.chapters_for_book(1).unwrap();
        let numbers: Vec<i64> = chapters.iter().map(|c| c.chapter_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }
}
