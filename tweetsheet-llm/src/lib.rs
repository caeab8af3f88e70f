//! Generative text clients for the tweetsheet pipeline.
//!
//! The [`traits::LlmClient`] trait is the seam the pipeline composes
//! against; [`gemini::GeminiClient`] is the production implementation.

pub mod gemini;
pub mod traits;

pub use gemini::GeminiClient;
pub use traits::{LlmClient, LlmResponse};
