//! paper-digest: fetch the newest arXiv papers for a set of topics, summarize
//! each in one sentence, and file them as rows in a Notion database.

pub mod adapters;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod utils;

pub use config::AppConfig;
pub use error::{DigestError, Result};
pub use services::{DigestRunner, RunSummary};

use adapters::{ArxivClient, ChatCompletionClient, NotionClient};
use tracing::info;

/// Wire the real service clients into a runner.
pub fn build_runner(config: &AppConfig) -> Result<DigestRunner> {
    let source = ArxivClient::new()?;
    let summarizer = ChatCompletionClient::new(config.llm_api_key.clone())?
        .with_base_url(&config.llm_base_url)
        .with_model(&config.llm_model);
    let store = NotionClient::new(&config.notion_token, &config.notion_database_id)?;

    Ok(DigestRunner::new(
        config.topics.clone(),
        config.max_results,
        Box::new(source),
        Box::new(summarizer),
        Box::new(store),
    ))
}

/// One full pass over the configured topics.
pub async fn run() -> Result<RunSummary> {
    let config = AppConfig::from_env()?;
    config.log_summary();

    let runner = build_runner(&config)?;
    info!("Starting digest over {} topics", runner.topics().len());
    let summary = runner.run().await?;

    info!(
        "Digest complete: {} records from {} topics ({} summarized, {} placeholders, {} failed)",
        summary.records_created,
        summary.topics,
        summary.summaries_generated,
        summary.summaries_unavailable,
        summary.summaries_failed
    );

    Ok(summary)
}
