//! Configuration types for memoir-rag
//!
//! All knobs for the chat-completion API, the text-to-image API, and local
//! storage live here, with sensible defaults for the hosted Groq and Monster
//! endpoints.

use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Chat-completion API settings
    pub llm: LlmConfig,

    /// Text-to-image API settings
    pub image: ImageConfig,

    /// Local storage settings
    pub storage: StorageConfig,
}

/// Chat-completion API configuration (OpenAI-compatible wire format)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the OpenAI-compatible endpoint
    pub api_base: String,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Model used for keyword extraction, prompt generation and answers
    pub model: String,

    /// Model used for input safety classification
    pub guard_model: String,

    /// Optional fixed seed for reproducible completions
    pub seed: Option<i64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.groq.com/openai/v1".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            model: "llama3-8b-8192".to_string(),
            guard_model: "llama-guard-3-8b".to_string(),
            seed: None,
        }
    }
}

/// Text-to-image API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Base URL of the image-generation service
    pub api_base: String,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Negative prompt applied to every generation
    pub negative_prompt: String,

    /// Number of samples per request
    pub samples: u32,

    /// Diffusion steps
    pub steps: u32,

    /// Output aspect ratio
    pub aspect_ratio: String,

    /// Classifier-free guidance scale
    pub guidance_scale: f32,

    /// Generation seed
    pub seed: u64,

    /// Directory where downloaded images are stored
    pub output_dir: String,

    /// Seconds between result polls
    pub poll_interval_secs: u64,

    /// Give up polling after this many seconds
    pub poll_timeout_secs: u64,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.monsterapi.ai/v1".to_string(),
            api_key_env: "MONSTER_API_KEY".to_string(),
            negative_prompt: "deformed, bad anatomy, disfigured, poorly drawn face".to_string(),
            samples: 1,
            steps: 50,
            aspect_ratio: "square".to_string(),
            guidance_scale: 7.5,
            seed: 2414,
            output_dir: "gen_image".to_string(),
            poll_interval_secs: 2,
            poll_timeout_secs: 120,
        }
    }
}

/// Local storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: "memoirs.db".to_string(),
        }
    }
}

impl LlmConfig {
    /// Resolve the API key from the configured environment variable
    pub fn api_key(&self) -> crate::error::Result<String> {
        std::env::var(&self.api_key_env).map_err(|_| {
            crate::error::MemoirError::Config(format!(
                "Missing API key: set the {} environment variable",
                self.api_key_env
            ))
        })
    }
}

impl ImageConfig {
    /// Resolve the API key from the configured environment variable
    pub fn api_key(&self) -> crate::error::Result<String> {
        std::env::var(&self.api_key_env).map_err(|_| {
            crate::error::MemoirError::Config(format!(
                "Missing API key: set the {} environment variable",
                self.api_key_env
            ))
        })
    }
}
