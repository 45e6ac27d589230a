//! Text-to-image API layer for memoir-rag
//!
//! Generates one illustration per chapter through the hosted text-to-image
//! service and stores the result locally.

pub mod generator;

// Re-export main types
pub use generator::ImageGenerator;
