/// Text stored when no language-model credential is configured.
pub const UNAVAILABLE_PLACEHOLDER: &str = "请手动查阅摘要";

/// Text stored when the summarization call fails for any reason.
pub const FAILED_PLACEHOLDER: &str = "AI 总结失败，请查看链接";

/// Outcome of one summarization attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummarizationResult {
    /// The model produced a summary
    Summarized { text: String },
    /// No credential configured; no request was made
    Unavailable,
    /// The request or response handling failed
    Failed { reason: String },
}

impl SummarizationResult {
    pub fn is_summarized(&self) -> bool {
        matches!(self, Self::Summarized { .. })
    }

    /// Text to store, substituting the placeholders for non-success outcomes.
    pub fn into_text(self) -> String {
        match self {
            Self::Summarized { text } => text,
            Self::Unavailable => UNAVAILABLE_PLACEHOLDER.to_string(),
            Self::Failed { .. } => FAILED_PLACEHOLDER.to_string(),
        }
    }
}
