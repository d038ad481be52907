//! Topic classification of articles.
//!
//! Every classifier implements [`TopicClassifier`]; callers (and the schema
//! subsetter downstream) only ever see the resulting ranked topic list, never
//! which variant produced it.
//!
//! - [`KeywordClassifier`]: regex keyword counting, fast, offline.
//! - [`LlmClassifier`]: asks a language model through a [`CompletionBackend`].
//! - [`HybridClassifier`]: keyword filter first, model refinement second.

pub mod hybrid;
pub mod keyword;
pub mod llm;
pub mod text;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use hybrid::HybridClassifier;
pub use keyword::{KeywordClassifier, TopicKeywords};
pub use llm::{CompletionBackend, LlmClassifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMethod {
    Keyword,
    Llm,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicClassification {
    /// Topics above the classifier's threshold, most confident first.
    pub topics: Vec<String>,
    pub confidence: BTreeMap<String, f64>,
    pub method: ClassificationMethod,
    pub article_id: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error("invalid keyword pattern for topic `{topic}`: {source}")]
    Pattern {
        topic: String,
        source: regex::Error,
    },
    #[error("invalid keyword table: {0}")]
    Table(#[from] serde_json::Error),
    #[error("completion backend failed: {0}")]
    Backend(String),
    #[error("unusable model response: {0}")]
    Response(String),
}

pub trait TopicClassifier {
    fn classify(
        &self,
        text: &str,
        article_id: Option<&str>,
    ) -> Result<TopicClassification, ClassifyError>;
}

impl<T: TopicClassifier + ?Sized> TopicClassifier for Box<T> {
    fn classify(
        &self,
        text: &str,
        article_id: Option<&str>,
    ) -> Result<TopicClassification, ClassifyError> {
        (**self).classify(text, article_id)
    }
}

/// Topics whose confidence reaches `threshold`, by descending confidence then
/// name.
pub(crate) fn ranked_topics(confidence: &BTreeMap<String, f64>, threshold: f64) -> Vec<String> {
    let mut ranked: Vec<(&String, f64)> = confidence
        .iter()
        .filter(|(_, &score)| score >= threshold)
        .map(|(topic, &score)| (topic, score))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.into_iter().map(|(topic, _)| topic.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranking_breaks_ties_by_name() {
        let confidence: BTreeMap<String, f64> = [
            ("geo", 0.5),
            ("events", 0.9),
            ("agreements", 0.5),
            ("time", 0.01),
        ]
        .into_iter()
            .map(|(t, s)| (t.to_string(), s))
            .collect();
        assert_eq!(
            ranked_topics(&confidence, 0.1),
            vec!["events", "agreements", "geo"]
        );
    }
}
