use serde::{Deserialize, Serialize};

/// One search keyword and the label its papers are filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicEntry {
    pub query: String,
    pub topic: String,
}

impl TopicEntry {
    pub fn new(query: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            topic: topic.into(),
        }
    }
}

/// Ordered keyword → label mapping, read-only once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicMapping {
    entries: Vec<TopicEntry>,
}

impl TopicMapping {
    pub fn new(entries: Vec<TopicEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[TopicEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TopicEntry> {
        self.entries.iter()
    }
}

impl Default for TopicMapping {
    fn default() -> Self {
        Self::new(vec![
            TopicEntry::new("Recommendation System", "推荐系统"),
            TopicEntry::new("Search Engine Retrieval", "搜索系统"),
        ])
    }
}
