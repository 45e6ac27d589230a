//! MemoirIngestor - the save pipeline
//!
//! Splits a memoir into chapter chunks, stores them with their full-text
//! index rows, then enriches each chapter with an LLM-generated image prompt
//! and, when the image service is configured, a generated illustration.

use crate::config::Config;
use crate::error::{MemoirError, Result};
use crate::image::ImageGenerator;
use crate::llm::{LlmClient, prompts};
use crate::storage::{Database, IngestStats};
use crate::text::ChapterSplitter;
use indicatif::{ProgressBar, ProgressStyle};

/// Main ingestor for saving memoirs into the database
pub struct MemoirIngestor {
    db: Database,
    llm: LlmClient,
    image_gen: Option<ImageGenerator>,
    splitter: ChapterSplitter,
}

impl MemoirIngestor {
    /// Create a new ingestor with optional configuration
    pub fn new(config: Option<Config>) -> Result<Self> {
        let config = config.unwrap_or_default();

        let db = Database::new(&config.storage.database_path)?;
        let llm = LlmClient::new(&config.llm)?;
        let splitter = ChapterSplitter::new()?;

        // Illustrations are optional: without the image API key the memoir is
        // saved with prompts only.
        let image_gen = match ImageGenerator::new(config.image.clone()) {
            Ok(generator) => Some(generator),
            Err(e) => {
                log::warn!("Image generation disabled: {}", e);
                None
            }
        };

        Ok(Self {
            db,
            llm,
            image_gen,
            splitter,
        })
    }

    /// Save a memoir: insert its metadata, chunk it by chapter, index every
    /// chunk, and populate the generated prompt and illustration per chapter.
    pub async fn save_memoir(
        &mut self,
        title: &str,
        author: &str,
        content: &str,
    ) -> Result<IngestStats> {
        let start_time = std::time::Instant::now();

        let chapters = self.splitter.split(content);
        if chapters.is_empty() {
            return Err(MemoirError::TextProcessing(
                "No chapter headings found; expected 'Chapter N - Title' sections".to_string(),
            ));
        }

        let memoir_id = self.db.insert_memoir(title, author)?;
        log::info!(
            "Saving memoir '{}' by {} ({} chapters)",
            title,
            author,
            chapters.len()
        );

        let bar = ProgressBar::new(chapters.len() as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} chapters {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );

        let mut illustrated_chunks = 0;
        for chapter in &chapters {
            let chunk_id = self.db.insert_chunk(memoir_id, chapter)?;

            let image_prompt = self
                .llm
                .complete(prompts::IMAGE_PROMPT_SYSTEM, chapter)
                .await?;
            self.db.set_system_prompt(chunk_id, &image_prompt)?;

            if let Some(ref generator) = self.image_gen {
                bar.set_message("illustrating");
                if let Some(path) = generator.generate(&image_prompt).await {
                    self.db.set_image_path(chunk_id, &path)?;
                    illustrated_chunks += 1;
                }
            }

            bar.inc(1);
        }
        bar.finish_with_message("done");

        let processing_time = start_time.elapsed().as_secs_f64();
        log::info!(
            "Memoir '{}' saved: {} chunks, {} illustrated, {:.2}s",
            title,
            chapters.len(),
            illustrated_chunks,
            processing_time
        );

        Ok(IngestStats {
            memoir_id,
            total_chunks: chapters.len(),
            illustrated_chunks,
            processing_time,
        })
    }
}
