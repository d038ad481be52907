//! RDF/OWL loading for ontoslice.
//!
//! This crate is the ontology loader: it turns a serialized ontology document
//! into a [`TripleGraph`] and nothing more. Interpreting the triples as a
//! class/property schema happens in `ontoslice-schema`.
//!
//! Parsing is done with **Sophia**:
//! - N-Triples (`.nt`)
//! - Turtle (`.ttl`)
//! - N-Quads (`.nq`, graph names are dropped)
//! - TriG (`.trig`, graph names are dropped)
//! - RDF/XML (`.rdf`, `.owl`, `.xml`)

pub mod graph;
pub mod vocab;

pub use graph::{Literal, Node, Term, Triple, TripleGraph};
pub use vocab::local_name;

use sophia::api::prelude::*;
use sophia::api::triple::Triple as _;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfFormat {
    NTriples,
    Turtle,
    NQuads,
    TriG,
    RdfXml,
}

impl RdfFormat {
    pub fn from_extension(ext: &str) -> Result<Self, LoadError> {
        match ext.to_lowercase().as_str() {
            "nt" | "ntriples" => Ok(RdfFormat::NTriples),
            "ttl" | "turtle" => Ok(RdfFormat::Turtle),
            "nq" | "nquads" => Ok(RdfFormat::NQuads),
            "trig" => Ok(RdfFormat::TriG),
            "rdf" | "owl" | "xml" => Ok(RdfFormat::RdfXml),
            other => Err(LoadError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
        Self::from_extension(ext)
    }

    pub fn name(self) -> &'static str {
        match self {
            RdfFormat::NTriples => "N-Triples",
            RdfFormat::Turtle => "Turtle",
            RdfFormat::NQuads => "N-Quads",
            RdfFormat::TriG => "TriG",
            RdfFormat::RdfXml => "RDF/XML",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read ontology document: {0}")]
    Io(#[from] std::io::Error),
    #[error("unsupported RDF format: .{0}")]
    UnsupportedFormat(String),
    #[error("failed to parse {format}: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },
}

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
struct TermError {
    message: String,
}

impl TermError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Load an ontology document, picking the parser from the file extension.
pub fn load_file(path: &Path) -> Result<TripleGraph, LoadError> {
    let format = RdfFormat::from_path(path)?;
    let bytes = std::fs::read(path)?;
    let graph = load_bytes(&bytes, format)?;
    tracing::info!(
        path = %path.display(),
        format = format.name(),
        triples = graph.len(),
        "loaded ontology document"
    );
    Ok(graph)
}

pub fn load_str(text: &str, format: RdfFormat) -> Result<TripleGraph, LoadError> {
    load_bytes(text.as_bytes(), format)
}

/// Parse a whole document. Any syntax error fails the load; no partial graph
/// is returned.
pub fn load_bytes(bytes: &[u8], format: RdfFormat) -> Result<TripleGraph, LoadError> {
    let reader = std::io::BufReader::new(std::io::Cursor::new(bytes));
    let mut out: Vec<Triple> = Vec::new();

    let result = match format {
        RdfFormat::NTriples => sophia::turtle::parser::nt::parse_bufread(reader)
            .try_for_each_triple(|t| {
                push_triple(&mut out, &t.s().to_string(), &t.p().to_string(), &t.o().to_string())
            })
            .map_err(|e| e.to_string()),
        RdfFormat::Turtle => sophia::turtle::parser::turtle::parse_bufread(reader)
            .try_for_each_triple(|t| {
                push_triple(&mut out, &t.s().to_string(), &t.p().to_string(), &t.o().to_string())
            })
            .map_err(|e| e.to_string()),
        RdfFormat::NQuads => sophia::turtle::parser::nq::parse_bufread(reader)
            .try_for_each_quad(|q| {
                push_triple(&mut out, &q.s().to_string(), &q.p().to_string(), &q.o().to_string())
            })
            .map_err(|e| e.to_string()),
        RdfFormat::TriG => sophia::turtle::parser::trig::parse_bufread(reader)
            .try_for_each_quad(|q| {
                push_triple(&mut out, &q.s().to_string(), &q.p().to_string(), &q.o().to_string())
            })
            .map_err(|e| e.to_string()),
        RdfFormat::RdfXml => sophia::xml::parser::parse_bufread(reader)
            .try_for_each_triple(|t| {
                push_triple(&mut out, &t.s().to_string(), &t.p().to_string(), &t.o().to_string())
            })
            .map_err(|e| e.to_string()),
    };

    result.map_err(|message| LoadError::Parse {
        format: format.name(),
        message,
    })?;
    Ok(TripleGraph::new(out))
}

fn push_triple(
    out: &mut Vec<Triple>,
    subject: &str,
    predicate: &str,
    object: &str,
) -> Result<(), TermError> {
    let subject = decode_node(subject)?;
    // Generalized RDF may put a blank node in predicate position; such
    // statements carry nothing the schema builder can use.
    let Node::Iri(predicate) = decode_node(predicate)? else {
        return Ok(());
    };
    let object = decode_term(object)?;
    let index = out.len();
    out.push(Triple {
        index,
        subject,
        predicate,
        object,
    });
    Ok(())
}

/// Decode a term from the N-Triples form Sophia displays it in.
fn decode_term(display: &str) -> Result<Term, TermError> {
    let s = display.trim();
    match s.strip_prefix('"') {
        Some(body) => decode_literal(body).map(Term::Literal),
        None => decode_node(s).map(Term::Node),
    }
}

fn decode_node(display: &str) -> Result<Node, TermError> {
    let s = display.trim();
    if let Some(iri) = s.strip_prefix('<').and_then(|r| r.strip_suffix('>')) {
        Ok(Node::Iri(iri.to_string()))
    } else if let Some(label) = s.strip_prefix("_:") {
        Ok(Node::Blank(label.to_string()))
    } else {
        Err(TermError::new(format!(
            "expected an IRI or blank node, found `{s}`"
        )))
    }
}

/// `body` is the literal text after its opening quote: the escaped lexical
/// form, the closing quote, then an optional `@lang` or `^^<datatype>`.
fn decode_literal(body: &str) -> Result<Literal, TermError> {
    let mut lexical = String::with_capacity(body.len());
    let mut chars = body.char_indices();
    let suffix = loop {
        match chars.next() {
            Some((i, '"')) => break &body[i + 1..],
            Some((_, '\\')) => lexical.push(decode_escape(&mut chars)?),
            Some((_, c)) => lexical.push(c),
            None => return Err(TermError::new(format!("unterminated literal: \"{body}"))),
        }
    };

    let mut literal = Literal {
        lexical,
        datatype: None,
        language: None,
    };
    if let Some(tag) = suffix.strip_prefix('@') {
        literal.language = Some(tag.to_string());
    } else if let Some(datatype) = suffix.strip_prefix("^^") {
        literal.datatype = decode_node(datatype)?.iri().map(str::to_string);
    }
    Ok(literal)
}

fn decode_escape(chars: &mut std::str::CharIndices<'_>) -> Result<char, TermError> {
    let decoded = match chars.next().map(|(_, c)| c) {
        Some('n') => '\n',
        Some('r') => '\r',
        Some('t') => '\t',
        Some('b') => '\u{8}',
        Some('f') => '\u{c}',
        Some(c @ ('"' | '\'' | '\\')) => c,
        Some(u @ ('u' | 'U')) => {
            let width = if u == 'u' { 4 } else { 8 };
            let hex: String = chars.by_ref().take(width).map(|(_, c)| c).collect();
            u32::from_str_radix(&hex, 16)
                .ok()
                .and_then(char::from_u32)
                .ok_or_else(|| TermError::new(format!("invalid \\{u} escape `{hex}`")))?
        }
        Some(other) => return Err(TermError::new(format!("invalid escape `\\{other}`"))),
        None => return Err(TermError::new("literal ends inside an escape")),
    };
    Ok(decoded)
}
