//! Text processing for memoir-rag
//!
//! This module provides chapter-based chunking of memoir text and query
//! sanitization for the full-text index.

pub mod chunking;

// Re-export main types and functions
pub use chunking::{ChapterSplitter, ChunkRecord, sanitize_match_query};
