//! Chapter chunking and search-query sanitization
//!
//! Memoirs are chunked along their chapter headings ("Chapter N - Title"),
//! one chunk per chapter, heading included.

use crate::error::{MemoirError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A stored memoir chunk with its generated metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChunkRecord {
    /// Row id in the chunks table
    pub id: i64,

    /// Owning memoir row id
    pub memoir_id: i64,

    /// Chapter text, heading included
    pub content: String,

    /// LLM-generated text-to-image prompt (populated after creation)
    pub system_prompt: Option<String>,

    /// Local path of the generated illustration (populated after creation)
    pub image_path: Option<String>,
}

/// Splits memoir text into chapters along "Chapter N - Title" headings
pub struct ChapterSplitter {
    heading_regex: Regex,
}

impl ChapterSplitter {
    /// Create a splitter with the standard chapter-heading pattern
    pub fn new() -> Result<Self> {
        let heading_regex = Regex::new(r"(?m)^Chapter \d+ - .+$").map_err(|e| {
            MemoirError::TextProcessing(format!("Failed to compile chapter regex: {}", e))
        })?;

        Ok(Self { heading_regex })
    }

    /// Split text into chapters. Each chapter spans from its heading to the
    /// next heading (or end of text). Text without headings yields no chapters.
    pub fn split(&self, text: &str) -> Vec<String> {
        let starts: Vec<usize> = self
            .heading_regex
            .find_iter(text)
            .map(|m| m.start())
            .collect();

        let mut chapters = Vec::with_capacity(starts.len());
        for (i, &start) in starts.iter().enumerate() {
            let end = starts.get(i + 1).copied().unwrap_or(text.len());
            let chapter = text[start..end].trim_end();
            if !chapter.is_empty() {
                chapters.push(chapter.to_string());
            }
        }

        chapters
    }
}

/// Sanitize LLM-extracted keywords for an FTS5 MATCH query.
///
/// Strips everything but word characters and whitespace, collapses runs of
/// whitespace, and quotes the result as a single phrase. Returns `None` when
/// nothing usable survives.
pub fn sanitize_match_query(keywords: &str) -> Option<String> {
    let cleaned: String = keywords
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    let normalized = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    if normalized.is_empty() {
        None
    } else {
        Some(format!("\"{}\"", normalized))
    }
}
