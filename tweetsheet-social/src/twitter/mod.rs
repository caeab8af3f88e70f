//! Twitter/X API integration surface exposed to the pipeline.
//!
//! Submodules provide the HTTP client wrapper, the OAuth 1.0a user-context
//! request signer, and strongly typed response models.

pub mod client;
pub mod oauth;
pub mod types;

pub use client::{TwitterApi, TwitterCredentials};
