//! Which slice of a loaded document counts as "the ontology".

use serde::{Deserialize, Serialize};

pub const GIST_NAMESPACE: &str = "https://w3id.org/semanticarts/ns/ontology/gist/";
pub const GIST_PREFIX: &str = "gist";

/// Namespace filter and display prefix for one loaded ontology.
///
/// Only entities whose IRI starts with `namespace` become classes or
/// properties; everything else (upper ontologies, imports) stays out of the
/// model. `prefix` is used for every identifier in rendered output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OntologyConfig {
    pub namespace: String,
    pub prefix: String,
}

impl Default for OntologyConfig {
    fn default() -> Self {
        Self {
            namespace: GIST_NAMESPACE.to_string(),
            prefix: GIST_PREFIX.to_string(),
        }
    }
}

impl OntologyConfig {
    pub fn new(namespace: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            prefix: prefix.into(),
        }
    }

    pub fn contains(&self, iri: &str) -> bool {
        iri.starts_with(&self.namespace)
    }
}
