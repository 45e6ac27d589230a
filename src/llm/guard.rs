//! Input safety classification
//!
//! User questions are run through the guard model before any retrieval or
//! answer generation. The guard replies "safe" or "unsafe" with an offending
//! category list; the category details are surfaced back to the user.

use crate::error::Result;
use crate::llm::LlmClient;

/// Outcome of classifying a user question
#[derive(Debug, Clone, PartialEq)]
pub enum SafetyVerdict {
    /// Question may proceed to retrieval
    Safe,

    /// Question was flagged; contains the guard's response with category details
    Flagged(String),
}

/// Parse a guard-model response into a verdict
pub fn verdict_from_response(response: &str) -> SafetyVerdict {
    if response.to_lowercase().contains("unsafe") {
        SafetyVerdict::Flagged(response.trim().to_string())
    } else {
        SafetyVerdict::Safe
    }
}

/// Classify a user question with the guard model
pub async fn classify_question(client: &LlmClient, question: &str) -> Result<SafetyVerdict> {
    let response = client.classify(question).await?;
    Ok(verdict_from_response(&response))
}
