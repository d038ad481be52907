//! In-memory triple graph with a `(subject, predicate)` index.

use std::collections::{HashMap, HashSet};

use crate::vocab::RDF_TYPE;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Node {
    Iri(String),
    Blank(String),
}

impl Node {
    pub fn iri(&self) -> Option<&str> {
        match self {
            Node::Iri(iri) => Some(iri),
            Node::Blank(_) => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Node::Blank(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    pub lexical: String,
    pub datatype: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    Node(Node),
    Literal(Literal),
}

impl Term {
    /// The IRI of a named node object, `None` for blank nodes and literals.
    pub fn iri(&self) -> Option<&str> {
        match self {
            Term::Node(node) => node.iri(),
            Term::Literal(_) => None,
        }
    }

    pub fn literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            Term::Node(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triple {
    /// Position in the source document.
    pub index: usize,
    pub subject: Node,
    pub predicate: String,
    pub object: Term,
}

/// Triples of one parsed document, in document order.
#[derive(Debug, Clone, Default)]
pub struct TripleGraph {
    triples: Vec<Triple>,
    by_subject_predicate: HashMap<(Node, String), Vec<usize>>,
}

impl TripleGraph {
    pub fn new(triples: Vec<Triple>) -> Self {
        let mut by_subject_predicate: HashMap<(Node, String), Vec<usize>> = HashMap::new();
        for (i, t) in triples.iter().enumerate() {
            by_subject_predicate
                .entry((t.subject.clone(), t.predicate.clone()))
                .or_default()
                .push(i);
        }
        Self {
            triples,
            by_subject_predicate,
        }
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn triples(&self) -> &[Triple] {
        &self.triples
    }

    /// Subjects with an `rdf:type <type_iri>` triple, deduplicated, in the
    /// order their first typing triple appears.
    pub fn subjects_of_type(&self, type_iri: &str) -> Vec<&Node> {
        let mut seen: HashSet<&Node> = HashSet::new();
        self.triples
            .iter()
            .filter(|t| t.predicate == RDF_TYPE && t.object.iri() == Some(type_iri))
            .map(|t| &t.subject)
            .filter(|s| seen.insert(*s))
            .collect()
    }

    /// Objects of `(subject, predicate, ?)` in document order.
    pub fn objects<'g>(
        &'g self,
        subject: &Node,
        predicate: &str,
    ) -> impl Iterator<Item = &'g Term> + 'g {
        self.by_subject_predicate
            .get(&(subject.clone(), predicate.to_string()))
            .into_iter()
            .flatten()
            .map(move |&i| &self.triples[i].object)
    }

    pub fn has(&self, subject: &Node, predicate: &str) -> bool {
        self.by_subject_predicate
            .contains_key(&(subject.clone(), predicate.to_string()))
    }
}
