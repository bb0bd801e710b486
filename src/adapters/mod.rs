//! External service adapters
//!
//! This module contains adapters for the external services a digest run
//! talks to, and the traits the driver sees them through:
//! - arXiv: paper search ([`PaperSource`])
//! - Chat completion: one-sentence summaries ([`Summarizer`])
//! - Notion: record persistence ([`RecordStore`])

pub mod arxiv;
pub mod chat_completion;
pub mod notion;

use crate::error::Result;
use crate::models::{Paper, Record, SummarizationResult};
use async_trait::async_trait;

// Re-export commonly used types
pub use arxiv::ArxivClient;
pub use chat_completion::ChatCompletionClient;
pub use notion::NotionClient;

/// Finds the newest papers for a search keyword.
#[async_trait]
pub trait PaperSource: Send + Sync {
    /// At most `max_results` papers, newest submission first.
    async fn fetch(&self, query: &str, max_results: u32) -> Result<Vec<Paper>>;
}

/// Produces a short summary of a paper. Never fails the caller.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, title: &str, r#abstract: &str) -> SummarizationResult;
}

/// Persists records. Each call creates a new row.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn create(&self, record: &Record) -> Result<()>;
}
