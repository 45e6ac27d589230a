//! Database migrations and compatibility
//!
//! Databases created before chapter illustration existed lack the
//! `system_prompt` and `image_path` columns on `memoir_chunks`; they are
//! back-filled here. Safe to run on every startup.

use crate::error::{MemoirError, Result};
use rusqlite::Connection;

/// Ensure the generated-metadata columns exist on `memoir_chunks`
pub fn ensure_chunk_columns(conn: &Connection) -> Result<()> {
    for column in ["system_prompt", "image_path"] {
        if !column_exists(conn, "memoir_chunks", column)? {
            log::info!("Migrating schema: adding memoir_chunks.{}", column);
            conn.execute(
                &format!("ALTER TABLE memoir_chunks ADD COLUMN {} TEXT", column),
                [],
            )
            .map_err(|e| {
                MemoirError::Storage(format!("Failed to add column {}: {}", column, e))
            })?;
        }
    }

    Ok(())
}

/// Check `PRAGMA table_info` for a named column
fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({})", table))
        .map_err(|e| MemoirError::Storage(format!("Failed to inspect {}: {}", table, e)))?;

    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .map_err(|e| MemoirError::Storage(format!("Failed to read table info: {}", e)))?;

    for name in names {
        let name =
            name.map_err(|e| MemoirError::Storage(format!("Failed to read column name: {}", e)))?;
        if name == column {
            return Ok(true);
        }
    }

    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn old_shape_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute(
            "CREATE TABLE memoir_chunks (id INTEGER PRIMARY KEY, memoir_id INTEGER, content TEXT)",
            [],
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_columns_added_to_old_schema() {
        let conn = old_shape_db();
        assert!(!column_exists(&conn, "memoir_chunks", "system_prompt").unwrap());

        ensure_chunk_columns(&conn).unwrap();

        assert!(column_exists(&conn, "memoir_chunks", "system_prompt").unwrap());
        assert!(column_exists(&conn, "memoir_chunks", "image_path").unwrap());
    }

    #[test]
    fn test_migration_is_idempotent() {
        let conn = old_shape_db();
        ensure_chunk_columns(&conn).unwrap();
        ensure_chunk_columns(&conn).unwrap();

        conn.execute(
            "INSERT INTO memoir_chunks (memoir_id, content, system_prompt, image_path)
             VALUES (1, 'text', 'prompt', 'img.png')",
            [],
        )
        .unwrap();
    }
}
