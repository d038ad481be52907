//! Language-model topic classifier.
//!
//! The model provider is abstracted behind [`CompletionBackend`]; this crate
//! only builds the prompt and interprets the reply.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::text::{prepare_for_llm, DEFAULT_LLM_MAX_WORDS};
use crate::{ClassificationMethod, ClassifyError, TopicClassification, TopicClassifier};

pub const DEFAULT_LLM_THRESHOLD: f64 = 0.5;

/// One-line description of each topic, in prompt order.
pub const TOPIC_DESCRIPTIONS: &[(&str, &str)] = &[
    ("organizations", "Companies, agencies, teams, governments"),
    ("events", "Launches, discoveries, missions, occurrences"),
    ("time", "Dates, durations, temporal references"),
    ("geo", "Locations, places, regions (planets, moons, etc.)"),
    ("quantities", "Measurements, numbers with units"),
    ("content", "Images, data, papers, communications"),
    ("artifacts", "Spacecraft, instruments, equipment"),
    ("categories", "Classifications, types (asteroid types, star classes)"),
    ("collections", "Catalogs, databases, sets"),
    ("agreements", "Contracts, partnerships, collaborations"),
    ("intentions", "Plans, goals, requirements, specifications"),
];

/// Sends a prompt to a language model and returns its raw text reply.
pub trait CompletionBackend {
    fn complete(&self, prompt: &str) -> Result<String, ClassifyError>;
}

impl<F> CompletionBackend for F
where
    F: Fn(&str) -> Result<String, ClassifyError>,
{
    fn complete(&self, prompt: &str) -> Result<String, ClassifyError> {
        self(prompt)
    }
}

impl CompletionBackend for Box<dyn CompletionBackend + '_> {
    fn complete(&self, prompt: &str) -> Result<String, ClassifyError> {
        (**self).complete(prompt)
    }
}

#[derive(Debug, Deserialize)]
struct ModelReply {
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    confidence: BTreeMap<String, f64>,
}

#[derive(Debug, Clone)]
pub struct LlmClassifier<B> {
    backend: B,
    min_confidence: f64,
    max_words: usize,
}

impl<B: CompletionBackend> LlmClassifier<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            min_confidence: DEFAULT_LLM_THRESHOLD,
            max_words: DEFAULT_LLM_MAX_WORDS,
        }
    }

    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    pub fn with_max_words(mut self, max_words: usize) -> Self {
        self.max_words = max_words;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn build_prompt(&self, text: &str) -> String {
        let names: Vec<&str> = TOPIC_DESCRIPTIONS.iter().map(|(name, _)| *name).collect();
        let mut prompt = format!(
            "Classify this article by identifying which of these topics are relevant:\n{}\n\n\
             For each relevant topic, provide a confidence score from 0.0 to 1.0.\n\nTopics:\n",
            names.join(", ")
        );
        for (name, description) in TOPIC_DESCRIPTIONS {
            prompt.push_str(&format!("- {name}: {description}\n"));
        }
        prompt.push_str(
            "\nReturn ONLY a JSON object with this format:\n\
             {\n  \"topics\": [\"topic1\", \"topic2\"],\n  \
             \"confidence\": {\"topic1\": 0.9, \"topic2\": 0.7}\n}\n\nArticle:\n",
        );
        prompt.push_str(&prepare_for_llm(text, self.max_words));
        prompt
    }

    /// Interpret a model reply. The JSON object may be wrapped in prose or
    /// a code fence; the span from the first `{` to the last `}` is parsed.
    pub fn parse_response(
        &self,
        response: &str,
        article_id: Option<&str>,
    ) -> Result<TopicClassification, ClassifyError> {
        let json = match (response.find('{'), response.rfind('}')) {
            (Some(start), Some(end)) if start < end => &response[start..=end],
            _ => {
                return Err(ClassifyError::Response(format!(
                    "no JSON object in reply: {response}"
                )))
            }
        };
        let reply: ModelReply =
            serde_json::from_str(json).map_err(|e| ClassifyError::Response(e.to_string()))?;

        let topics = reply
            .topics
            .into_iter()
            .filter(|topic| {
                reply
                    .confidence
                    .get(topic)
                    .is_some_and(|&score| score >= self.min_confidence)
            })
            .collect();
        Ok(TopicClassification {
            topics,
            confidence: reply.confidence,
            method: ClassificationMethod::Llm,
            article_id: article_id.map(str::to_string),
        })
    }
}

impl<B: CompletionBackend> TopicClassifier for LlmClassifier<B> {
    fn classify(
        &self,
        text: &str,
        article_id: Option<&str>,
    ) -> Result<TopicClassification, ClassifyError> {
        let prompt = self.build_prompt(text);
        let response = self.backend.complete(&prompt)?;
        let result = self.parse_response(&response, article_id)?;
        tracing::debug!(
            article_id = article_id.unwrap_or("-"),
            topics = result.topics.len(),
            "model classification"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canned(reply: &'static str) -> impl Fn(&str) -> Result<String, ClassifyError> {
        move |_prompt: &str| Ok(reply.to_string())
    }

    #[test]
    fn prompt_lists_topics_and_article() {
        let classifier = LlmClassifier::new(canned("{}"));
        let prompt = classifier.build_prompt("<h1>Lander</h1><article>Deployed.</article>");
        assert!(prompt.starts_with("Classify this article"));
        assert!(prompt.contains("- geo: Locations, places, regions"));
        assert!(prompt.contains("\"topics\": [\"topic1\", \"topic2\"]"));
        assert!(prompt.ends_with("Article:\nLander Deployed."));
    }

    #[test]
    fn reply_in_code_fence_is_parsed_and_filtered() {
        let reply = "Sure.\n```json\n{\"topics\": [\"geo\", \"events\", \"time\"], \
                     \"confidence\": {\"geo\": 0.9, \"events\": 0.6, \"time\": 0.2}}\n```";
        let classifier = LlmClassifier::new(canned(reply));
        let result = classifier.classify("Rover on Mars", Some("x")).unwrap();
        assert_eq!(result.method, ClassificationMethod::Llm);
        assert_eq!(result.topics, vec!["geo", "events"]);
        assert_eq!(result.confidence.len(), 3);
        assert_eq!(result.article_id.as_deref(), Some("x"));
    }

    #[test]
    fn topic_without_confidence_is_dropped() {
        let classifier = LlmClassifier::new(canned(r#"{"topics": ["geo"]}"#));
        let result = classifier.classify("text", None).unwrap();
        assert!(result.topics.is_empty());
    }

    #[test]
    fn reply_without_json_is_an_error() {
        let classifier = LlmClassifier::new(canned("I cannot help with that."));
        let err = classifier.classify("text", None).unwrap_err();
        assert!(matches!(err, ClassifyError::Response(_)));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let classifier = LlmClassifier::new(canned("{\"topics\": [geo]}"));
        let err = classifier.classify("text", None).unwrap_err();
        assert!(matches!(err, ClassifyError::Response(_)));
    }

    #[test]
    fn backend_errors_propagate() {
        let classifier = LlmClassifier::new(|_: &str| -> Result<String, ClassifyError> {
            Err(ClassifyError::Backend("offline".into()))
        });
        let err = classifier.classify("text", None).unwrap_err();
        assert!(matches!(err, ClassifyError::Backend(_)));
    }
}
