use once_cell::sync::Lazy;
use regex::Regex;

// New format: YYMM.NNNNN (e.g., 2301.12345), old format: category/YYMMNNN
static NEW_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4}\.\d{4,5}(?:v\d+)?)").expect("valid arXiv id pattern"));
static OLD_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([a-z-]+(?:\.[A-Z]{2})?/\d{7}(?:v\d+)?)").expect("valid arXiv id pattern")
});

/// A paper as returned by the search feed. Lives for one driver iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paper {
    pub title: String,
    /// Canonical identifier from the feed, stored verbatim as the record URL.
    pub url: String,
    pub r#abstract: String,
}

impl Paper {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        r#abstract: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            r#abstract: r#abstract.into(),
        }
    }

    /// Short arXiv identifier for log output
    ///
    /// Handles formats like:
    /// - http://arxiv.org/abs/2301.12345v1
    /// - https://arxiv.org/abs/hep-th/9901001
    pub fn arxiv_id(&self) -> Option<&str> {
        NEW_ID
            .captures(&self.url)
            .or_else(|| OLD_ID.captures(&self.url))
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str())
    }
}
