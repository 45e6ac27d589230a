//! # memoir-rag
//!
//! Retrieval-augmented question answering over a personal memoir. Memoirs are
//! chunked by chapter into embedded SQLite with an FTS5 full-text index; a
//! hosted LLM generates per-chapter image prompts and answers, and a hosted
//! text-to-image service illustrates chapters.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use memoir_rag::{MemoirIngestor, MemoirRetriever};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Save a memoir (chunks it by chapter, generates prompts and images)
//!     let mut ingestor = MemoirIngestor::new(None)?;
//!     let text = std::fs::read_to_string("memoir.txt")?;
//!     let stats = ingestor.save_memoir("Tides", "Alan", &text).await?;
//!     println!("Saved {} chapters", stats.total_chunks);
//!
//!     // Ask a question about it
//!     if let Some(retriever) = MemoirRetriever::open(None, "Tides", "Alan")? {
//!         let answer = retriever.answer("What happened at Jones Beach?").await?;
//!         println!("{}", answer);
//!     }
//!
//!     Ok(())
//! }
//! ```

// Core modules
pub mod api;
pub mod config;
pub mod error;
pub mod image;
pub mod llm;
pub mod storage;
pub mod text;
pub mod utils;

// Re-export main API types
pub use api::{MemoirIngestor, MemoirRetriever, MemoirStats, chat_with_memoir};
pub use config::Config;
pub use error::{MemoirError, Result};

// Re-export commonly used types
pub use storage::IngestStats;
pub use text::{ChapterSplitter, ChunkRecord};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_imports() {
        // Ensure all major types can be imported
        let _config = Config::default();
    }
}
