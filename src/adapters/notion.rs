//! Notion API client
//!
//! Files each record as a new page in a Notion database.
//! See: https://developers.notion.com/reference/post-page

use crate::adapters::RecordStore;
use crate::error::{DigestError, Result};
use crate::models::Record;
use crate::utils::http::{build_client, success_body};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.notion.com/v1";

/// API version header sent with every request
pub const NOTION_VERSION: &str = "2022-06-28";

const SERVICE: &str = "notion";

/// Client for creating pages in one Notion database
pub struct NotionClient {
    client: Client,
    token: String,
    database_id: String,
    base_url: String,
}

impl NotionClient {
    /// Create a new Notion client
    ///
    /// # Arguments
    /// * `token` - Integration token
    /// * `database_id` - Database that receives the pages
    pub fn new(token: impl Into<String>, database_id: impl Into<String>) -> Result<Self> {
        Ok(Self::with_client(build_client()?, token, database_id))
    }

    /// Create a new client with an existing reqwest client
    pub fn with_client(
        client: Client,
        token: impl Into<String>,
        database_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            token: token.into(),
            database_id: database_id.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Request body for a `pages.create` call.
    ///
    /// Column types: Name is the title, URL a url, Summary rich text,
    /// Topic and Source single selects, Date a date without time.
    pub fn page_body(&self, record: &Record) -> Value {
        json!({
            "parent": { "database_id": self.database_id },
            "properties": {
                "Name": { "title": [{ "text": { "content": record.name } }] },
                "URL": { "url": record.url },
                "Summary": { "rich_text": [{ "text": { "content": record.summary } }] },
                "Topic": { "select": { "name": record.topic } },
                "Source": { "select": { "name": record.source } },
                "Date": { "date": { "start": record.date_str() } }
            }
        })
    }
}

#[async_trait]
impl RecordStore for NotionClient {
    async fn create(&self, record: &Record) -> Result<()> {
        let url = format!("{}/pages", self.base_url);
        debug!("Creating Notion page for {}", record.url);

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(&self.page_body(record))
            .send()
            .await
            .map_err(|e| DigestError::request(SERVICE, e))?;

        success_body(SERVICE, resp).await?;
        Ok(())
    }
}
