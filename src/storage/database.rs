//! SQLite database operations for memoir-rag
//!
//! This module stores memoirs and their chapter chunks in embedded SQLite,
//! with an FTS5 virtual table kept in sync at chunk-creation time.

use crate::error::{MemoirError, Result};
use crate::storage::migrations;
use crate::storage::schema::*;
use crate::text::ChunkRecord;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;

/// A memoir row
#[derive(Debug, Clone, PartialEq)]
pub struct MemoirRecord {
    pub id: i64,
    pub title: String,
    pub author: String,
}

/// Database connection and operations
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Create a new database connection
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)
            .map_err(|e| MemoirError::Storage(format!("Failed to open database: {}", e)))?;

        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create an in-memory database (for testing)
    pub fn memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            MemoirError::Storage(format!("Failed to create in-memory database: {}", e))
        })?;

        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize database schema (idempotent)
    fn initialize(&self) -> Result<()> {
        // Enable WAL mode for better concurrency
        let _: String = self
            .conn
            .query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))
            .map_err(|e| MemoirError::Storage(format!("Failed to enable WAL mode: {}", e)))?;

        self.conn
            .execute(CREATE_MEMOIRS_TABLE, [])
            .map_err(|e| MemoirError::Storage(format!("Failed to create memoirs table: {}", e)))?;

        self.conn
            .execute(CREATE_CHUNKS_TABLE, [])
            .map_err(|e| MemoirError::Storage(format!("Failed to create chunks table: {}", e)))?;

        self.conn
            .execute(CREATE_CHUNKS_FTS_TABLE, [])
            .map_err(|e| MemoirError::Storage(format!("Failed to create FTS table: {}", e)))?;

        self.conn
            .execute(CREATE_CHUNKS_INDEXES, [])
            .map_err(|e| MemoirError::Storage(format!("Failed to create indexes: {}", e)))?;

        // Back-fill columns on databases created by older versions
        migrations::ensure_chunk_columns(&self.conn)?;

        log::info!("Database initialized with schema version {}", SCHEMA_VERSION);
        Ok(())
    }

    /// Insert a memoir and return its row id
    pub fn insert_memoir(&self, title: &str, author: &str) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO memoirs (title, author) VALUES (?, ?)",
                params![title, author],
            )
            .map_err(|e| MemoirError::Storage(format!("Failed to insert memoir: {}", e)))?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Look up a memoir by title and author
    pub fn find_memoir(&self, title: &str, author: &str) -> Result<Option<i64>> {
        self.conn
            .query_row(
                "SELECT id FROM memoirs WHERE title = ? AND author = ?",
                params![title, author],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| MemoirError::Storage(format!("Failed to query memoir: {}", e)))
    }

    /// Get a memoir row by id
    pub fn get_memoir(&self, memoir_id: i64) -> Result<Option<MemoirRecord>> {
        self.conn
            .query_row(
                "SELECT id, title, author FROM memoirs WHERE id = ?",
                params![memoir_id],
                |row| {
                    Ok(MemoirRecord {
                        id: row.get(0)?,
                        title: row.get(1)?,
                        author: row.get(2)?,
                    })
                },
            )
            .optional()
            .map_err(|e| MemoirError::Storage(format!("Failed to query memoir: {}", e)))
    }

    /// Insert a chapter chunk and its full-text index row in one transaction.
    /// Chunk creation is the only point where the index is synchronized.
    pub fn insert_chunk(&mut self, memoir_id: i64, content: &str) -> Result<i64> {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| MemoirError::Storage(format!("Failed to start transaction: {}", e)))?;

        tx.execute(
            "INSERT INTO memoir_chunks (memoir_id, content) VALUES (?, ?)",
            params![memoir_id, content],
        )
        .map_err(|e| MemoirError::Storage(format!("Failed to insert chunk: {}", e)))?;

        let chunk_id = tx.last_insert_rowid();

        tx.execute(
            "INSERT INTO memoir_chunks_fts (content, chunk_id, memoir_id) VALUES (?, ?, ?)",
            params![content, chunk_id, memoir_id],
        )
        .map_err(|e| MemoirError::Storage(format!("Failed to index chunk {}: {}", chunk_id, e)))?;

        tx.commit()
            .map_err(|e| MemoirError::Storage(format!("Failed to commit chunk: {}", e)))?;

        Ok(chunk_id)
    }

    /// Store the generated text-to-image prompt for a chunk
    pub fn set_system_prompt(&self, chunk_id: i64, prompt: &str) -> Result<()> {
        self.conn
            .execute(
                "UPDATE memoir_chunks SET system_prompt = ? WHERE id = ?",
                params![prompt, chunk_id],
            )
            .map_err(|e| {
                MemoirError::Storage(format!("Failed to set prompt for chunk {}: {}", chunk_id, e))
            })?;

        Ok(())
    }

    /// Store the local illustration path for a chunk
    pub fn set_image_path(&self, chunk_id: i64, path: &str) -> Result<()> {
        self.conn
            .execute(
                "UPDATE memoir_chunks SET image_path = ? WHERE id = ?",
                params![path, chunk_id],
            )
            .map_err(|e| {
                MemoirError::Storage(format!("Failed to set image for chunk {}: {}", chunk_id, e))
            })?;

        Ok(())
    }

    /// Get a chunk by id
    pub fn get_chunk(&self, chunk_id: i64) -> Result<Option<ChunkRecord>> {
        self.conn
            .query_row(
                "SELECT id, memoir_id, content, system_prompt, image_path
                 FROM memoir_chunks WHERE id = ?",
                params![chunk_id],
                row_to_chunk,
            )
            .optional()
            .map_err(|e| MemoirError::Storage(format!("Failed to query chunk: {}", e)))
    }

    /// Ranked full-text search over one memoir's chunks, best match first.
    /// FTS5 rank is bm25: smaller values are better matches.
    pub fn search_chunks(
        &self,
        memoir_id: i64,
        match_query: &str,
        limit: usize,
    ) -> Result<Vec<(f64, String)>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT rank, content FROM memoir_chunks_fts
                 WHERE memoir_id = ? AND content MATCH ?
                 ORDER BY rank LIMIT ?",
            )
            .map_err(|e| MemoirError::Search(format!("Failed to prepare search: {}", e)))?;

        let rows = stmt
            .query_map(params![memoir_id, match_query, limit as i64], |row| {
                Ok((row.get::<_, f64>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(|e| MemoirError::Search(format!("Failed to run MATCH query: {}", e)))?;

        let mut results = Vec::new();
        for row in rows {
            results
                .push(row.map_err(|e| MemoirError::Search(format!("Failed to read row: {}", e)))?);
        }

        Ok(results)
    }

    /// Entire memoir text, all chunks joined. Fallback context when the
    /// full-text search comes up empty.
    pub fn memoir_content(&self, memoir_id: i64) -> Result<String> {
        let mut stmt = self
            .conn
            .prepare("SELECT content FROM memoir_chunks WHERE memoir_id = ? ORDER BY id")
            .map_err(|e| MemoirError::Storage(format!("Failed to prepare query: {}", e)))?;

        let rows = stmt
            .query_map(params![memoir_id], |row| row.get::<_, String>(0))
            .map_err(|e| MemoirError::Storage(format!("Failed to query chunks: {}", e)))?;

        let mut parts = Vec::new();
        for row in rows {
            parts
                .push(row.map_err(|e| MemoirError::Storage(format!("Failed to read row: {}", e)))?);
        }

        Ok(parts.join(" "))
    }

    /// Number of chunks stored for a memoir
    pub fn chunk_count(&self, memoir_id: i64) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM memoir_chunks WHERE memoir_id = ?",
                params![memoir_id],
                |row| row.get(0),
            )
            .map_err(|e| MemoirError::Storage(format!("Failed to count chunks: {}", e)))?;

        Ok(count as usize)
    }

    /// Number of chunks with a stored illustration
    pub fn illustrated_count(&self, memoir_id: i64) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM memoir_chunks WHERE memoir_id = ? AND image_path IS NOT NULL",
                params![memoir_id],
                |row| row.get(0),
            )
            .map_err(|e| MemoirError::Storage(format!("Failed to count illustrations: {}", e)))?;

        Ok(count as usize)
    }

    /// Get database statistics
    pub fn get_stats(&self) -> Result<DatabaseStats> {
        let memoir_count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM memoirs", [], |row| row.get(0))
            .map_err(|e| MemoirError::Storage(format!("Failed to count memoirs: {}", e)))?;

        let chunk_count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM memoir_chunks", [], |row| row.get(0))
            .map_err(|e| MemoirError::Storage(format!("Failed to count chunks: {}", e)))?;

        let file_size: i64 = self
            .conn
            .query_row(
                "SELECT page_count * page_size FROM pragma_page_count(), pragma_page_size()",
                [],
                |row| row.get(0),
            )
            .map_err(|e| MemoirError::Storage(format!("Failed to get database size: {}", e)))?;

        Ok(DatabaseStats {
            memoir_count: memoir_count as usize,
            chunk_count: chunk_count as usize,
            file_size_bytes: file_size as usize,
        })
    }
}

/// Helper function to convert a database row to a ChunkRecord
fn row_to_chunk(row: &Row) -> rusqlite::Result<ChunkRecord> {
    Ok(ChunkRecord {
        id: row.get(0)?,
        memoir_id: row.get(1)?,
        content: row.get(2)?,
        system_prompt: row.get(3)?,
        image_path: row.get(4)?,
    })
}

/// Database statistics
#[derive(Debug, Clone)]
pub struct DatabaseStats {
    pub memoir_count: usize,
    pub chunk_count: usize,
    pub file_size_bytes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_db() -> (Database, i64) {
        let mut db = Database::memory().unwrap();
        let memoir_id = db.insert_memoir("Tides", "Alan").unwrap();
        db.insert_chunk(
            memoir_id,
            "Chapter 1 - The Old House\nWe moved in during the summer of 1962.",
        )
        .unwrap();
        db.insert_chunk(
            memoir_id,
            "Chapter 2 - Jones Beach Undertow\nThe undertow at Jones Beach nearly took me.",
        )
        .unwrap();
        (db, memoir_id)
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let db = Database::memory().unwrap();
        // A second initialize over the same schema must not fail
        db.initialize().unwrap();
    }

    #[test]
    fn test_find_memoir() {
        let (db, memoir_id) = seeded_db();
        assert_eq!(db.find_memoir("Tides", "Alan").unwrap(), Some(memoir_id));
        assert_eq!(db.find_memoir("Tides", "Nobody").unwrap(), None);

        let record = db.get_memoir(memoir_id).unwrap().unwrap();
        assert_eq!(record.author, "Alan");
    }

    #[test]
    fn test_ranked_search_scoped_to_memoir() {
        let (mut db, memoir_id) = seeded_db();

        // A second memoir mentioning the same beach must not leak into results
        let other = db.insert_memoir("Other", "Someone Else").unwrap();
        db.insert_chunk(other, "Jones Beach from another life entirely.")
            .unwrap();

        let results = db
            .search_chunks(memoir_id, "\"jones beach\"", 10)
            .unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].1.contains("undertow at Jones Beach"));
    }

    #[test]
    fn test_search_best_match_first() {
        let (mut db, memoir_id) = seeded_db();
        db.insert_chunk(
            memoir_id,
            "Chapter 3 - Beach Again\nbeach beach beach, every weekend at the beach.",
        )
        .unwrap();

        let results = db.search_chunks(memoir_id, "beach", 10).unwrap();
        assert!(results.len() >= 2);
        // bm25 rank is ascending: the term-dense chapter should come first
        assert!(results[0].1.contains("every weekend"));
        assert!(results[0].0 <= results[1].0);
    }

    #[test]
    fn test_search_no_match_is_empty() {
        let (db, memoir_id) = seeded_db();
        let results = db.search_chunks(memoir_id, "\"submarine\"", 10).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_prompt_and_image_updates() {
        let (mut db, memoir_id) = seeded_db();
        let chunk_id = db.insert_chunk(memoir_id, "Chapter 9 - Coda\nQuiet.").unwrap();

        db.set_system_prompt(chunk_id, "a quiet room at dusk").unwrap();
        let chunk = db.get_chunk(chunk_id).unwrap().unwrap();
        assert_eq!(chunk.system_prompt.as_deref(), Some("a quiet room at dusk"));
        assert_eq!(chunk.image_path, None);

        db.set_image_path(chunk_id, "gen_image/123.png").unwrap();
        let chunk = db.get_chunk(chunk_id).unwrap().unwrap();
        assert_eq!(chunk.image_path.as_deref(), Some("gen_image/123.png"));
    }

    #[test]
    fn test_memoir_content_joins_chunks() {
        let (db, memoir_id) = seeded_db();
        let content = db.memoir_content(memoir_id).unwrap();
        assert!(content.contains("summer of 1962"));
        assert!(content.contains("nearly took me"));
        assert!(content.find("summer of 1962").unwrap() < content.find("nearly took me").unwrap());
    }

    #[test]
    fn test_counts_and_stats() {
        let (mut db, memoir_id) = seeded_db();
        assert_eq!(db.chunk_count(memoir_id).unwrap(), 2);
        assert_eq!(db.illustrated_count(memoir_id).unwrap(), 0);

        let chunk_id = db.insert_chunk(memoir_id, "Chapter 3 - More\nMore.").unwrap();
        db.set_image_path(chunk_id, "gen_image/x.png").unwrap();
        assert_eq!(db.illustrated_count(memoir_id).unwrap(), 1);

        let stats = db.get_stats().unwrap();
        assert_eq!(stats.memoir_count, 1);
        assert_eq!(stats.chunk_count, 3);
        assert!(stats.file_size_bytes > 0);
    }
}
