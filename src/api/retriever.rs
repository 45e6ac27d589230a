//! MemoirRetriever - the question path
//!
//! Each question runs through safety classification, LLM keyword extraction,
//! a ranked full-text search scoped to the memoir, and answer composition
//! grounded in the best-matching chunk. When the search yields nothing (or
//! fails), the whole memoir becomes the context.

use crate::config::Config;
use crate::error::Result;
use crate::llm::{LlmClient, SafetyVerdict, classify_question, prompts};
use crate::storage::{Database, MemoirRecord};
use crate::text::sanitize_match_query;

/// How many ranked matches to pull from the index; only the best one feeds
/// the answer, the rest serve the raw `search` command.
const DEFAULT_TOP_K: usize = 5;

/// Retrieval statistics for one memoir
#[derive(Debug, Clone)]
pub struct MemoirStats {
    pub total_chunks: usize,
    pub illustrated_chunks: usize,
    pub database_size_bytes: usize,
}

/// Main retriever for answering questions about a stored memoir
pub struct MemoirRetriever {
    db: Database,
    llm: LlmClient,
    memoir: MemoirRecord,
}

impl MemoirRetriever {
    /// Open a retriever for a stored memoir. Returns `Ok(None)` when no
    /// memoir with this title and author exists.
    pub fn open(config: Option<Config>, title: &str, author: &str) -> Result<Option<Self>> {
        let config = config.unwrap_or_default();

        let db = Database::new(&config.storage.database_path)?;

        let Some(memoir_id) = db.find_memoir(title, author)? else {
            return Ok(None);
        };
        let Some(memoir) = db.get_memoir(memoir_id)? else {
            return Ok(None);
        };

        let llm = LlmClient::new(&config.llm)?;

        log::info!(
            "MemoirRetriever initialized for '{}' by {}",
            memoir.title,
            memoir.author
        );

        Ok(Some(Self { db, llm, memoir }))
    }

    /// The memoir this retriever answers about
    pub fn memoir(&self) -> &MemoirRecord {
        &self.memoir
    }

    /// Answer a question grounded in the memoir
    pub async fn answer(&self, question: &str) -> Result<String> {
        // Classify the question before touching the index
        if let SafetyVerdict::Flagged(details) = classify_question(&self.llm, question).await? {
            return Ok(format!(
                "Your question has been flagged as unsafe. Details: {}",
                details
            ));
        }

        // Derive search terms from the question
        let keywords = self
            .llm
            .complete(prompts::KEYWORD_EXTRACTION_SYSTEM, question)
            .await?;
        let keywords = keywords.trim();
        if keywords.is_empty() {
            return Ok("I couldn't understand your query. Please try rephrasing.".to_string());
        }

        let Some(match_query) = sanitize_match_query(keywords) else {
            return Ok("No valid keywords found. Please refine your question.".to_string());
        };

        // A failed index query degrades to the whole-memoir fallback
        let results = match self
            .db
            .search_chunks(self.memoir.id, &match_query, DEFAULT_TOP_K)
        {
            Ok(results) => results,
            Err(e) => {
                log::error!("Full-text search failed for {}: {}", match_query, e);
                Vec::new()
            }
        };

        let context = match results.first() {
            Some((rank, best)) => {
                log::info!("Best match for {} at rank {:.3}", match_query, rank);
                best.clone()
            }
            None => {
                log::info!(
                    "No matches for {}; using the whole memoir as context",
                    match_query
                );
                self.db.memoir_content(self.memoir.id)?
            }
        };

        let system = prompts::answer_system(&self.memoir.author);
        let user = prompts::answer_user(&context, question);
        self.llm.complete(&system, &user).await
    }

    /// Raw ranked search over the memoir's chunks (no LLM involved).
    /// The query goes through the same MATCH sanitization as the answer path.
    pub fn search(&self, query: &str, top_k: usize) -> Result<Vec<(f64, String)>> {
        let Some(match_query) = sanitize_match_query(query) else {
            return Ok(Vec::new());
        };

        self.db.search_chunks(self.memoir.id, &match_query, top_k)
    }

    /// Statistics for the loaded memoir
    pub fn get_stats(&self) -> Result<MemoirStats> {
        let total_chunks = self.db.chunk_count(self.memoir.id)?;
        let illustrated_chunks = self.db.illustrated_count(self.memoir.id)?;
        let database_size_bytes = self.db.get_stats()?.file_size_bytes;

        Ok(MemoirStats {
            total_chunks,
            illustrated_chunks,
            database_size_bytes,
        })
    }
}
