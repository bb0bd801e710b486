use chrono::{Local, NaiveDate};

/// Source label stamped on every stored record.
pub const SOURCE_LABEL: &str = "Arxiv";

/// One row in the target table. Created once per paper per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub name: String,
    pub url: String,
    pub summary: String,
    pub topic: String,
    pub source: String,
    pub date: NaiveDate,
}

impl Record {
    /// Build a record dated today (local time).
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        summary: impl Into<String>,
        topic: impl Into<String>,
    ) -> Self {
        Self::with_date(name, url, summary, topic, Local::now().date_naive())
    }

    pub fn with_date(
        name: impl Into<String>,
        url: impl Into<String>,
        summary: impl Into<String>,
        topic: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            summary: summary.into(),
            topic: topic.into(),
            source: SOURCE_LABEL.to_string(),
            date,
        }
    }

    /// Calendar date as `YYYY-MM-DD`.
    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}
