//! Social platform integration for the tweetsheet pipeline.

pub mod twitter;

pub use twitter::{TwitterApi, TwitterCredentials};
