//! Regex keyword counting classifier.

use std::collections::BTreeMap;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::text::clean_text;
use crate::{
    ranked_topics, ClassificationMethod, ClassifyError, TopicClassification, TopicClassifier,
};

pub const DEFAULT_KEYWORD_THRESHOLD: f64 = 0.1;

/// Keyword patterns per topic; a topic matches if any of its patterns does.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicKeywords(pub BTreeMap<String, Vec<String>>);

impl TopicKeywords {
    pub fn from_json_str(text: &str) -> Result<Self, ClassifyError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Keyword table tuned for space/science news articles.
    pub fn default_table() -> Self {
        let table = DEFAULT_KEYWORDS
            .iter()
            .map(|(topic, patterns)| {
                (
                    topic.to_string(),
                    patterns.iter().map(|p| p.to_string()).collect(),
                )
            })
            .collect();
        Self(table)
    }
}

const DEFAULT_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "organizations",
        &[r"\b(NASA|ESA|SpaceX|Boeing|Lockheed|agency|organization|company|corporation|government|institution|team|mission control|consortium|collaboration|partnership)\b"],
    ),
    (
        "events",
        &[r"\b(launch|landed|mission|discovery|collision|impact|eclipse|transit|event|occurred|happened|detected|observed|exploded|crashed|docked|deployed|experiment|test)\b"],
    ),
    (
        "time",
        &[r"\b(\d{4}|january|february|march|april|may|june|july|august|september|october|november|december|monday|tuesday|wednesday|thursday|friday|saturday|sunday|yesterday|today|tomorrow|years? ago|in \d+ years?|century|decade|millennium|billion years|million years)\b"],
    ),
    (
        "geo",
        &[r"\b(Earth|Mars|Venus|Jupiter|Saturn|Uranus|Neptune|Mercury|Pluto|Moon|location|latitude|longitude|crater|mountain|valley|plain|region|area|zone|site|landing site|hemisphere|pole|equator)\b"],
    ),
    (
        "quantities",
        &[r"\b(\d+[.,]?\d*\s*(km|meter|mile|kg|ton|gram|lightyear|AU|parsec|degree|kelvin|celsius|mph|kph|m/s|percent|%|kilometers|meters|miles|kilograms|grams|light-years))\b"],
    ),
    (
        "content",
        &[r"\b(image|photo|video|data|signal|message|communication|transmission|paper|study|research|report|publication|article|document|recording)\b"],
    ),
    (
        "artifacts",
        &[r"\b(spacecraft|satellite|rover|lander|probe|telescope|instrument|camera|sensor|detector|antenna|rocket|vehicle|equipment|device|tool|module)\b"],
    ),
    (
        "categories",
        &[r"\b(asteroid|comet|planet|star|galaxy|nebula|exoplanet|type|class|category|kind|species|genus)\b"],
    ),
    (
        "collections",
        &[r"\b(catalog|database|survey|collection|archive|set of|series of|group of|array|network|constellation)\b"],
    ),
    (
        "agreements",
        &[r"\b(agreement|contract|treaty|accord|partnership|collaboration|memorandum|commitment|obligation)\b"],
    ),
    (
        "intentions",
        &[r"\b(plan|intend|goal|objective|purpose|aim|target|requirement|specification|design|intended)\b"],
    ),
    (
        "people",
        &[
            r"\b(?:Dr\.|Prof\.|Professor)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)",
            r"\b([A-Z][a-z]+(?:\s+[A-Z][a-z]+)+)\s+(?:said|told|explained|noted|added|stated)",
            r"\baccording to\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)+)",
            r"\b(?:led|directed|headed)\s+by\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)+)",
            r"\b(?:researcher|scientist|astronomer|physicist|astronaut)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)",
        ],
    ),
];

/// Scores each topic by keyword matches per hundred words, capped at 1.0.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    patterns: Vec<(String, Regex)>,
    min_confidence: f64,
}

impl KeywordClassifier {
    pub fn new(keywords: &TopicKeywords, min_confidence: f64) -> Result<Self, ClassifyError> {
        let mut patterns = Vec::with_capacity(keywords.0.len());
        for (topic, alternatives) in &keywords.0 {
            let joined = alternatives.join("|");
            let regex = RegexBuilder::new(&joined)
                .case_insensitive(true)
                .build()
                .map_err(|source| ClassifyError::Pattern {
                    topic: topic.clone(),
                    source,
                })?;
            patterns.push((topic.clone(), regex));
        }
        Ok(Self {
            patterns,
            min_confidence,
        })
    }

    pub fn with_default_table(min_confidence: f64) -> Result<Self, ClassifyError> {
        Self::new(&TopicKeywords::default_table(), min_confidence)
    }

    pub fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    /// Confidence per topic with at least one match.
    pub fn scores(&self, text: &str) -> BTreeMap<String, f64> {
        let text = clean_text(text);
        let words = text.split_whitespace().count();
        let mut scores = BTreeMap::new();
        if words == 0 {
            return scores;
        }
        for (topic, regex) in &self.patterns {
            let matches = regex.find_iter(&text).count();
            if matches > 0 {
                let per_hundred_words = matches as f64 / words as f64 * 100.0;
                scores.insert(topic.clone(), per_hundred_words.min(1.0));
            }
        }
        scores
    }
}

impl TopicClassifier for KeywordClassifier {
    fn classify(
        &self,
        text: &str,
        article_id: Option<&str>,
    ) -> Result<TopicClassification, ClassifyError> {
        let confidence = self.scores(text);
        let topics = ranked_topics(&confidence, self.min_confidence);
        tracing::debug!(
            article_id = article_id.unwrap_or("-"),
            topics = topics.len(),
            "keyword classification"
        );
        Ok(TopicClassification {
            topics,
            confidence,
            method: ClassificationMethod::Keyword,
            article_id: article_id.map(str::to_string),
        })
    }
}
