//! API layer for memoir-rag
//!
//! This module provides the main public interfaces for saving memoirs and
//! answering questions about them.

pub mod chat;
pub mod ingest;
pub mod retriever;

// Re-export main API types
pub use chat::chat_with_memoir;
pub use ingest::MemoirIngestor;
pub use retriever::{MemoirRetriever, MemoirStats};
