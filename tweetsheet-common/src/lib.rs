//! Common types and utilities shared across tweetsheet crates.
//!
//! This crate defines the shared error type and the observability helpers
//! used throughout the tweetsheet workspace. It is intentionally lightweight
//! and dependency-minimal so that all crates can depend on it without
//! introducing heavy transitive costs.
//!
//! # Overview
//!
//! - [`TweetsheetError`] and [`Result`]: Shared error handling
//! - [`observability`]: Centralised tracing/logging initialisation

pub mod observability;

/// Error types used across the tweetsheet pipeline.
///
/// Two tiers of handling apply: `Generation` and `Publish` failures are
/// caught per row by the pipeline and turn into skips, while `Config` and
/// `Sheet` failures abort the whole request.
#[derive(thiserror::Error, Debug)]
pub enum TweetsheetError {
    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The spreadsheet could not be fetched or parsed.
    #[error("Sheet error: {0}")]
    Sheet(String),

    /// The generative text service failed to produce post text.
    #[error("Generation error: {0}")]
    Generation(String),

    /// The social platform rejected or failed the publish call.
    #[error("Publish error: {0}")]
    Publish(String),
}

/// Convenient alias for results that use [`TweetsheetError`].
pub type Result<T> = std::result::Result<T, TweetsheetError>;
