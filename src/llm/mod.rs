//! Chat-completion API layer for memoir-rag
//!
//! This module wraps the hosted OpenAI-compatible endpoint used for safety
//! classification, keyword extraction, image-prompt generation and answer
//! composition.

pub mod client;
pub mod guard;
pub mod prompts;

// Re-export main types
pub use client::LlmClient;
pub use guard::{SafetyVerdict, classify_question};
