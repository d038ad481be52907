//! Keyword filter followed by model refinement.

use crate::{ClassifyError, TopicClassification, TopicClassifier};

/// Keyword-stage threshold when the keyword classifier only gates refinement.
pub const DEFAULT_HYBRID_KEYWORD_THRESHOLD: f64 = 0.05;

/// Two-stage classifier: a cheap filter decides whether the article is worth
/// refining at all, then the refiner's answer wins unless it fails.
#[derive(Debug, Clone)]
pub struct HybridClassifier<K, R> {
    filter: K,
    refiner: R,
}

impl<K: TopicClassifier, R: TopicClassifier> HybridClassifier<K, R> {
    pub fn new(filter: K, refiner: R) -> Self {
        Self { filter, refiner }
    }
}

impl<K: TopicClassifier, R: TopicClassifier> TopicClassifier for HybridClassifier<K, R> {
    fn classify(
        &self,
        text: &str,
        article_id: Option<&str>,
    ) -> Result<TopicClassification, ClassifyError> {
        let filtered = self.filter.classify(text, article_id)?;
        if filtered.topics.is_empty() {
            return Ok(filtered);
        }
        match self.refiner.classify(text, article_id) {
            Ok(refined) => Ok(refined),
            Err(err) => {
                tracing::warn!(
                    article_id = article_id.unwrap_or("-"),
                    error = %err,
                    "refinement failed, using keyword topics"
                );
                Ok(filtered)
            }
        }
    }
}
