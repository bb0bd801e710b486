//! Digest runner
//!
//! Walks the topic mapping in order and, for every paper found, summarizes
//! it and files the record before moving on to the next paper.

use crate::adapters::{PaperSource, RecordStore, Summarizer};
use crate::error::Result;
use crate::models::{Record, SummarizationResult, TopicMapping};
use tracing::info;

/// Counts for one completed run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub topics: usize,
    pub papers_fetched: usize,
    pub records_created: usize,
    pub summaries_generated: usize,
    pub summaries_unavailable: usize,
    pub summaries_failed: usize,
}

/// Sequential fetch → summarize → store pipeline
pub struct DigestRunner {
    topics: TopicMapping,
    max_results: u32,
    source: Box<dyn PaperSource>,
    summarizer: Box<dyn Summarizer>,
    store: Box<dyn RecordStore>,
}

impl DigestRunner {
    pub fn new(
        topics: TopicMapping,
        max_results: u32,
        source: Box<dyn PaperSource>,
        summarizer: Box<dyn Summarizer>,
        store: Box<dyn RecordStore>,
    ) -> Self {
        Self {
            topics,
            max_results,
            source,
            summarizer,
            store,
        }
    }

    pub fn topics(&self) -> &TopicMapping {
        &self.topics
    }

    /// Run one full pass over the topic mapping.
    ///
    /// The first fetch or store error ends the run; topics and papers after
    /// it are not attempted. Records already created stay created.
    pub async fn run(&self) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for entry in self.topics.iter() {
            info!("Fetching latest papers for {}...", entry.topic);

            let papers = self.source.fetch(&entry.query, self.max_results).await?;
            summary.topics += 1;
            summary.papers_fetched += papers.len();

            info!(
                "Fetched {} papers for {} ({:?})",
                papers.len(),
                entry.topic,
                entry.query
            );

            for paper in papers {
                let result = self
                    .summarizer
                    .summarize(&paper.title, &paper.r#abstract)
                    .await;

                match &result {
                    SummarizationResult::Summarized { .. } => summary.summaries_generated += 1,
                    SummarizationResult::Unavailable => summary.summaries_unavailable += 1,
                    SummarizationResult::Failed { .. } => summary.summaries_failed += 1,
                }

                let text = result.into_text();
                let record = Record::new(&paper.title, &paper.url, text, &entry.topic);
                self.store.create(&record).await?;
                summary.records_created += 1;

                info!(
                    "Stored [{}] {}",
                    paper.arxiv_id().unwrap_or(paper.url.as_str()),
                    paper.title
                );
            }
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DigestError;
    use crate::models::{Paper, TopicEntry};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Shared log of calls made to the fakes, in order
    type CallLog = Arc<Mutex<Vec<String>>>;

    struct FakeSource {
        papers: HashMap<String, Vec<Paper>>,
        failing: Vec<String>,
        log: CallLog,
    }

    #[async_trait]
    impl PaperSource for FakeSource {
        async fn fetch(&self, query: &str, max_results: u32) -> Result<Vec<Paper>> {
            self.log.lock().unwrap().push(format!("fetch {} {}", query, max_results));
            if self.failing.iter().any(|q| q == query) {
                return Err(DigestError::feed("service unreachable"));
            }
            Ok(self.papers.get(query).cloned().unwrap_or_default())
        }
    }

    struct FakeSummarizer {
        result: SummarizationResult,
        log: CallLog,
    }

    #[async_trait]
    impl Summarizer for FakeSummarizer {
        async fn summarize(&self, title: &str, _abstract: &str) -> SummarizationResult {
            self.log.lock().unwrap().push(format!("summarize {}", title));
            self.result.clone()
        }
    }

    #[derive(Clone, Default)]
    struct FakeStore {
        records: Arc<Mutex<Vec<Record>>>,
        fail_on_title: Option<String>,
        log: CallLog,
    }

    #[async_trait]
    impl RecordStore for FakeStore {
        async fn create(&self, record: &Record) -> Result<()> {
            self.log.lock().unwrap().push(format!("create {}", record.name));
            if self.fail_on_title.as_deref() == Some(record.name.as_str()) {
                return Err(DigestError::Status {
                    service: "notion",
                    status: 400,
                    body: "validation_error".to_string(),
                });
            }
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    fn papers(prefix: &str, n: usize) -> Vec<Paper> {
        (1..=n)
            .map(|i| {
                Paper::new(
                    format!("{} {}", prefix, i),
                    format!("http://arxiv.org/abs/2401.0000{}v1", i),
                    format!("abstract {}", i),
                )
            })
            .collect()
    }

    fn two_topics() -> TopicMapping {
        TopicMapping::new(vec![
            TopicEntry::new("Recommendation System", "推荐系统"),
            TopicEntry::new("Search Engine Retrieval", "搜索系统"),
        ])
    }

    struct Harness {
        runner: DigestRunner,
        store: FakeStore,
        log: CallLog,
    }

    fn harness(
        topics: TopicMapping,
        available: Vec<(&str, Vec<Paper>)>,
        failing: Vec<&str>,
        summary: SummarizationResult,
        fail_on_title: Option<&str>,
    ) -> Harness {
        let log: CallLog = Arc::default();
        let source = FakeSource {
            papers: available
                .into_iter()
                .map(|(q, p)| (q.to_string(), p))
                .collect(),
            failing: failing.into_iter().map(str::to_string).collect(),
            log: log.clone(),
        };
        let summarizer = FakeSummarizer {
            result: summary,
            log: log.clone(),
        };
        let store = FakeStore {
            fail_on_title: fail_on_title.map(str::to_string),
            log: log.clone(),
            ..Default::default()
        };

        Harness {
            runner: DigestRunner::new(
                topics,
                3,
                Box::new(source),
                Box::new(summarizer),
                Box::new(store.clone()),
            ),
            store,
            log,
        }
    }

    #[tokio::test]
    async fn test_no_credential_stores_placeholder_for_every_paper() {
        let h = harness(
            TopicMapping::new(vec![TopicEntry::new("Recommendation System", "推荐系统")]),
            vec![("Recommendation System", papers("Rec", 3))],
            vec![],
            SummarizationResult::Unavailable,
            None,
        );

        let summary = h.runner.run().await.unwrap();
        assert_eq!(summary.records_created, 3);
        assert_eq!(summary.summaries_unavailable, 3);

        let records = h.store.records.lock().unwrap();
        assert_eq!(records.len(), 3);
        for record in records.iter() {
            assert_eq!(record.summary, "请手动查阅摘要");
            assert_eq!(record.topic, "推荐系统");
            assert_eq!(record.source, "Arxiv");
        }
    }

    #[tokio::test]
    async fn test_each_paper_is_summarized_then_stored_in_order() {
        let h = harness(
            two_topics(),
            vec![
                ("Recommendation System", papers("Rec", 2)),
                ("Search Engine Retrieval", papers("Search", 1)),
            ],
            vec![],
            SummarizationResult::Summarized {
                text: "一句话".to_string(),
            },
            None,
        );

        let summary = h.runner.run().await.unwrap();
        assert_eq!(
            summary,
            RunSummary {
                topics: 2,
                papers_fetched: 3,
                records_created: 3,
                summaries_generated: 3,
                summaries_unavailable: 0,
                summaries_failed: 0,
            }
        );

        let log = h.log.lock().unwrap();
        assert_eq!(
            *log,
            [
                "fetch Recommendation System 3",
                "summarize Rec 1",
                "create Rec 1",
                "summarize Rec 2",
                "create Rec 2",
                "fetch Search Engine Retrieval 3",
                "summarize Search 1",
                "create Search 1",
            ]
        );

        let records = h.store.records.lock().unwrap();
        assert_eq!(records[2].topic, "搜索系统");
        assert_eq!(records[0].summary, "一句话");
    }

    #[tokio::test]
    async fn test_summarization_failure_does_not_abort() {
        let h = harness(
            two_topics(),
            vec![
                ("Recommendation System", papers("Rec", 1)),
                ("Search Engine Retrieval", papers("Search", 1)),
            ],
            vec![],
            SummarizationResult::Failed {
                reason: "request failed".to_string(),
            },
            None,
        );

        let summary = h.runner.run().await.unwrap();
        assert_eq!(summary.summaries_failed, 2);
        assert_eq!(summary.records_created, 2);

        let records = h.store.records.lock().unwrap();
        assert!(records.iter().all(|r| r.summary == "AI 总结失败，请查看链接"));
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_before_any_record() {
        let h = harness(
            two_topics(),
            vec![("Search Engine Retrieval", papers("Search", 2))],
            vec!["Recommendation System"],
            SummarizationResult::Unavailable,
            None,
        );

        let err = h.runner.run().await.unwrap_err();
        assert!(err.to_string().contains("service unreachable"));
        assert!(h.store.records.lock().unwrap().is_empty());

        // The later topic was never fetched
        let log = h.log.lock().unwrap();
        assert_eq!(*log, ["fetch Recommendation System 3"]);
    }

    #[tokio::test]
    async fn test_fetch_failure_on_later_topic_keeps_earlier_records() {
        let h = harness(
            two_topics(),
            vec![("Recommendation System", papers("Rec", 2))],
            vec!["Search Engine Retrieval"],
            SummarizationResult::Unavailable,
            None,
        );

        assert!(h.runner.run().await.is_err());
        assert_eq!(h.store.records.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_store_failure_abandons_remaining_work() {
        let h = harness(
            two_topics(),
            vec![
                ("Recommendation System", papers("Rec", 3)),
                ("Search Engine Retrieval", papers("Search", 1)),
            ],
            vec![],
            SummarizationResult::Unavailable,
            Some("Rec 2"),
        );

        match h.runner.run().await {
            Err(DigestError::Status { status, .. }) => assert_eq!(status, 400),
            other => panic!("Expected status error, got {:?}", other),
        }

        let records = h.store.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Rec 1");

        let log = h.log.lock().unwrap();
        assert_eq!(log.last().map(String::as_str), Some("create Rec 2"));
        assert!(!log.iter().any(|l| l.contains("Search")));
    }

    #[tokio::test]
    async fn test_rerun_creates_duplicates() {
        let h = harness(
            TopicMapping::new(vec![TopicEntry::new("Recommendation System", "推荐系统")]),
            vec![("Recommendation System", papers("Rec", 2))],
            vec![],
            SummarizationResult::Unavailable,
            None,
        );

        h.runner.run().await.unwrap();
        h.runner.run().await.unwrap();

        let records = h.store.records.lock().unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].url, records[2].url);
    }

    #[tokio::test]
    async fn test_topic_with_no_papers() {
        let h = harness(
            two_topics(),
            vec![("Search Engine Retrieval", papers("Search", 1))],
            vec![],
            SummarizationResult::Unavailable,
            None,
        );

        let summary = h.runner.run().await.unwrap();
        assert_eq!(summary.topics, 2);
        assert_eq!(summary.records_created, 1);
    }
}
