//! Database schema definitions

/// Database schema version
pub const SCHEMA_VERSION: u32 = 2;

/// SQL for creating the memoirs table
pub const CREATE_MEMOIRS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS memoirs (
    id INTEGER PRIMARY KEY,
    title TEXT,
    author TEXT
);
"#;

/// SQL for creating the memoir chunks table
pub const CREATE_CHUNKS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS memoir_chunks (
    id INTEGER PRIMARY KEY,
    memoir_id INTEGER,
    content TEXT,
    system_prompt TEXT,
    image_path TEXT,
    FOREIGN KEY (memoir_id) REFERENCES memoirs (id)
);
"#;

/// SQL for creating the full-text index over chunk content
pub const CREATE_CHUNKS_FTS_TABLE: &str = r#"
CREATE VIRTUAL TABLE IF NOT EXISTS memoir_chunks_fts
USING fts5(content, chunk_id UNINDEXED, memoir_id UNINDEXED);
"#;

/// SQL for creating the chunk lookup index
pub const CREATE_CHUNKS_INDEXES: &str = r#"
CREATE INDEX IF NOT EXISTS idx_memoir_chunks_memoir ON memoir_chunks(memoir_id);
"#;
