//! Runtime configuration
//!
//! Credentials and endpoints come from environment variables; the topic
//! mapping comes from a JSON file. Everything is read once at startup into an
//! [`AppConfig`] that is passed to whoever needs it.

use crate::adapters::{arxiv, chat_completion};
use crate::error::{DigestError, Result};
use crate::models::TopicMapping;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const NOTION_TOKEN_VAR: &str = "NOTION_TOKEN";
pub const NOTION_DATABASE_ID_VAR: &str = "NOTION_DATABASE_ID";
pub const LLM_API_KEY_VAR: &str = "LLM_API_KEY";
pub const LLM_BASE_URL_VAR: &str = "LLM_BASE_URL";
pub const LLM_MODEL_VAR: &str = "LLM_MODEL";
pub const MAX_RESULTS_VAR: &str = "ARXIV_MAX_RESULTS";
pub const TOPICS_PATH_VAR: &str = "PAPER_DIGEST_TOPICS";
pub const LOG_DIR_VAR: &str = "PAPER_DIGEST_LOG_DIR";

const TOPICS_FILE_NAME: &str = "topics.json";

/// Everything a run needs, resolved up front
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub notion_token: String,
    pub notion_database_id: String,
    pub llm_api_key: Option<String>,
    pub llm_base_url: String,
    pub llm_model: String,
    pub max_results: u32,
    pub topics: TopicMapping,
    /// Where the topic mapping was read from; `None` for the built-in default
    pub topics_path: Option<PathBuf>,
}

impl AppConfig {
    /// Load from the process environment and the default topic file locations
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` for variables instead of the process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::build(lookup, &default_topic_locations())
    }

    fn build<F>(lookup: F, topic_locations: &[PathBuf]) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let max_results = match non_empty(MAX_RESULTS_VAR) {
            Some(raw) => parse_max_results(&raw)?,
            None => arxiv::DEFAULT_MAX_RESULTS,
        };

        let (topics, topics_path) = match non_empty(TOPICS_PATH_VAR) {
            Some(path) => {
                let path = PathBuf::from(path);
                (load_topics(&path)?, Some(path))
            }
            None => match topic_locations.iter().find(|p| p.is_file()) {
                Some(path) => (load_topics(path)?, Some(path.clone())),
                None => (TopicMapping::default(), None),
            },
        };

        Ok(Self {
            notion_token: non_empty(NOTION_TOKEN_VAR).unwrap_or_default(),
            notion_database_id: non_empty(NOTION_DATABASE_ID_VAR).unwrap_or_default(),
            // Only an empty key means "no key"; a blank one is still sent.
            llm_api_key: lookup(LLM_API_KEY_VAR).filter(|v| !v.is_empty()),
            llm_base_url: non_empty(LLM_BASE_URL_VAR)
                .unwrap_or_else(|| chat_completion::DEFAULT_BASE_URL.to_string()),
            llm_model: non_empty(LLM_MODEL_VAR)
                .unwrap_or_else(|| chat_completion::DEFAULT_MODEL.to_string()),
            max_results,
            topics,
            topics_path,
        })
    }

    /// Log what was resolved and flag missing credentials.
    ///
    /// Missing Notion settings are not fatal here; the store rejects the
    /// first write instead.
    pub fn log_summary(&self) {
        match &self.topics_path {
            Some(path) => info!("Loaded {} topics from {}", self.topics.len(), path.display()),
            None => info!("Using {} built-in topics", self.topics.len()),
        }

        if self.notion_token.is_empty() {
            warn!("{} is not set; writes to Notion will be rejected", NOTION_TOKEN_VAR);
        }
        if self.notion_database_id.is_empty() {
            warn!("{} is not set; writes to Notion will be rejected", NOTION_DATABASE_ID_VAR);
        }
        if self.llm_api_key.is_none() {
            warn!("{} is not set; summaries will be placeholders", LLM_API_KEY_VAR);
        }
    }
}

/// `./topics.json`, then `{config_dir}/paper-digest/topics.json`
fn default_topic_locations() -> Vec<PathBuf> {
    let mut locations = vec![PathBuf::from(TOPICS_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join("paper-digest").join(TOPICS_FILE_NAME));
    }
    locations
}

fn parse_max_results(raw: &str) -> Result<u32> {
    match raw.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(DigestError::config(format!(
            "{} must be a positive integer, got {:?}",
            MAX_RESULTS_VAR, raw
        ))),
    }
}

/// Read and validate a topic mapping file
pub fn load_topics(path: &Path) -> Result<TopicMapping> {
    let content = fs::read_to_string(path).map_err(|e| DigestError::io(path, e))?;

    let topics: TopicMapping = serde_json::from_str(&content).map_err(|e| DigestError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;

    if topics.is_empty() {
        return Err(DigestError::config(format!(
            "{} contains no topics",
            path.display()
        )));
    }

    for (i, entry) in topics.iter().enumerate() {
        if entry.query.trim().is_empty() || entry.topic.trim().is_empty() {
            return Err(DigestError::config(format!(
                "{}: topic {} needs both a query and a topic label",
                path.display(),
                i + 1
            )));
        }
    }

    Ok(topics)
}
