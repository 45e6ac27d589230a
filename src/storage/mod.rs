//! Storage functionality for memoir-rag
//!
//! This module provides database operations using embedded SQLite.

pub mod database;
pub mod migrations;
pub mod schema;

// Re-export main types
pub use database::{Database, DatabaseStats, MemoirRecord};

/// Ingestion statistics
#[derive(Debug, Clone)]
pub struct IngestStats {
    /// Row id of the saved memoir
    pub memoir_id: i64,

    /// Total number of chapter chunks stored
    pub total_chunks: usize,

    /// Chunks that received a generated illustration
    pub illustrated_chunks: usize,

    /// Total processing time in seconds
    pub processing_time: f64,
}
