//! Prompt-ready text rendering of a [`SchemaSubset`].
//!
//! The layout is consumed verbatim by extraction prompts, so it is fully
//! deterministic: roots, subclasses and properties are always visited in name
//! order, and identical subsets render byte-identical text.
//!
//! All three section headers are always printed, even when a section is
//! empty; an empty subset renders the preamble and three bare headers.
//!
//! ```text
//! # gist Schema (subset)
//! Prefix: gist
//! Namespace: https://w3id.org/semanticarts/ns/ontology/gist/
//!
//! ## Classes
//!
//! gist:Event
//!   Something that occurs over a period of time...
//!   gist:PhysicalEvent [defined]
//!
//! ## Object Properties
//!
//! gist:occursIn
//!   [Domain: gist:Event; Range: gist:Place]
//!
//! ## Datatype Properties
//!
//! gist:startDateTime
//!   [Domain: gist:Event; Range: xsd:dateTime]
//! ```

use std::collections::BTreeSet;

use crate::model::{Property, PropertyKind, SchemaModel};
use crate::subset::SchemaSubset;

pub const DEFAULT_MAX_DEFINITION_LEN: usize = 120;
pub const TRUNCATION_MARKER: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Definitions longer than this many characters are cut and marked.
    pub max_definition_len: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_definition_len: DEFAULT_MAX_DEFINITION_LEN,
        }
    }
}

pub fn render(subset: &SchemaSubset<'_>, options: &RenderOptions) -> String {
    let model = subset.model();
    let prefix = model.prefix();
    let mut out = String::new();

    out.push_str(&format!("# {prefix} Schema (subset)\n"));
    out.push_str(&format!("Prefix: {prefix}\n"));
    out.push_str(&format!("Namespace: {}\n", model.namespace()));
    out.push_str("\n## Classes\n\n");

    let mut visited: BTreeSet<&str> = BTreeSet::new();
    for root in roots(subset) {
        if visited.contains(root) {
            continue;
        }
        render_class_tree(subset, root, options, &mut visited, &mut out);
        out.push('\n');
    }
    // Classes on a superclass cycle have a parent in the subset and so are
    // never roots; start a tree at the first unvisited one.
    for name in subset.classes() {
        if !visited.contains(name.as_str()) && model.has_class(name) {
            render_class_tree(subset, name, options, &mut visited, &mut out);
            out.push('\n');
        }
    }

    for (kind, title) in [
        (PropertyKind::Object, "Object Properties"),
        (PropertyKind::Datatype, "Datatype Properties"),
    ] {
        out.push_str(&format!("## {title}\n\n"));
        for name in subset.property_names(kind) {
            if let Some(property) = model.property(kind, name) {
                render_property(model, property, options, &mut out);
            }
        }
    }

    out
}

/// Subset classes with no superclass inside the subset, in name order.
fn roots<'s>(subset: &'s SchemaSubset<'_>) -> Vec<&'s str> {
    let model = subset.model();
    subset
        .classes()
        .iter()
        .filter(|name| match model.class(name) {
            Some(class) => !class
                .superclasses
                .iter()
                .any(|s| subset.contains_class(s)),
            None => false,
        })
        .map(String::as_str)
        .collect()
}

/// Depth-first walk with an explicit stack; a class reachable from several
/// parents is printed once, under the first parent visited.
fn render_class_tree<'s>(
    subset: &'s SchemaSubset<'_>,
    root: &'s str,
    options: &RenderOptions,
    visited: &mut BTreeSet<&'s str>,
    out: &mut String,
) {
    let model = subset.model();
    let prefix = model.prefix();
    let mut stack: Vec<(&'s str, usize)> = vec![(root, 0)];

    while let Some((name, depth)) = stack.pop() {
        if !visited.insert(name) {
            continue;
        }
        let Some(class) = model.class(name) else {
            continue;
        };
        let indent = "  ".repeat(depth);
        let marker = if class.defined { " [defined]" } else { "" };
        out.push_str(&format!("{indent}{prefix}:{name}{marker}\n"));
        if let Some(definition) = &class.definition {
            out.push_str(&format!(
                "{indent}  {}\n",
                truncate(definition, options.max_definition_len)
            ));
        }

        let children: BTreeSet<&'s str> = class
            .subclasses
            .iter()
            .filter_map(|sub| subset.classes().get(sub))
            .map(String::as_str)
            .collect();
        // Reverse so the stack pops children in name order.
        for child in children.into_iter().rev() {
            if !visited.contains(child) {
                stack.push((child, depth + 1));
            }
        }
    }
}

fn render_property(
    model: &SchemaModel,
    property: &Property,
    options: &RenderOptions,
    out: &mut String,
) {
    let prefix = model.prefix();
    out.push_str(&format!("{prefix}:{}\n", property.name));

    if let Some(text) = property.definition.as_ref().or(property.label.as_ref()) {
        out.push_str(&format!("  {}\n", truncate(text, options.max_definition_len)));
    }

    let mut constraints = Vec::new();
    if !property.domains.is_empty() {
        constraints.push(format!(
            "Domain: {}",
            qualify_all(prefix, &property.domains)
        ));
    }
    if !property.ranges.is_empty() {
        constraints.push(format!("Range: {}", qualify_all(prefix, &property.ranges)));
    }
    if !constraints.is_empty() {
        out.push_str(&format!("  [{}]\n", constraints.join("; ")));
    }
    out.push('\n');
}

/// `Event` -> `gist:Event`; names that already carry a prefix (`xsd:string`)
/// are kept as-is.
fn qualify_all(prefix: &str, names: &[String]) -> String {
    names
        .iter()
        .map(|n| {
            if n.contains(':') {
                n.clone()
            } else {
                format!("{prefix}:{n}")
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{TRUNCATION_MARKER}", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OntologyConfig;
    use crate::subset::{SubsetOptions, Subsetter};
    use crate::topics::TopicSeeds;
    use ontoslice_ingest_rdfowl::{load_str, RdfFormat};

    const TTL: &str = r#"
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix skos: <http://www.w3.org/2004/02/skos/core#> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
@prefix ex: <http://example.org/onto/> .

ex:Thing a owl:Class .
ex:Event a owl:Class ;
    rdfs:subClassOf ex:Thing ;
    skos:definition "Something that happens." .
ex:Agent a owl:Class ; rdfs:subClassOf ex:Thing .
ex:Meeting a owl:Class ;
    rdfs:subClassOf ex:Event , ex:Agent ;
    owl:equivalentClass [ a owl:Class ] ;
    skos:definition "A gathering of two or more people that has been convened for the purpose of achieving a common goal through verbal interaction." .

ex:hasAttendee a owl:ObjectProperty ;
    skos:prefLabel "has attendee" ;
    rdfs:domain ex:Meeting ;
    rdfs:range ex:Agent .
ex:startDate a owl:DatatypeProperty ;
    skos:definition "When it starts." ;
    rdfs:domain ex:Event ;
    rdfs:range xsd:date .
"#;

    fn model() -> SchemaModel {
        let graph = load_str(TTL, RdfFormat::Turtle).expect("parse");
        SchemaModel::build(&graph, &OntologyConfig::new("http://example.org/onto/", "ex"))
    }

    #[test]
    fn renders_tree_and_property_sections() {
        let m = model();
        let seeds = TopicSeeds::new();
        let subset = Subsetter::new(&m, &seeds).subset_by_classes(&["Meeting"]);
        let text = render(&subset, &RenderOptions { max_definition_len: 20 });

        let expected = "\
# ex Schema (subset)
Prefix: ex
Namespace: http://example.org/onto/

## Classes

ex:Thing
  ex:Agent
    ex:Meeting [defined]
      A gathering of two o...
  ex:Event
    Something that happe...

## Object Properties

ex:hasAttendee
  has attendee
  [Domain: ex:Meeting; Range: ex:Agent]

## Datatype Properties

ex:startDate
  When it starts.
  [Domain: ex:Event; Range: xsd:date]

";
        assert_eq!(text, expected);
    }

    #[test]
    fn multiple_inheritance_renders_class_once() {
        let m = model();
        let seeds = TopicSeeds::new();
        let subset = Subsetter::new(&m, &seeds).subset_by_classes(&["Meeting"]);
        let text = subset.render(&RenderOptions::default());
        assert_eq!(text.matches("ex:Meeting [defined]").count(), 1);
    }

    #[test]
    fn empty_subset_renders_only_headers() {
        let m = model();
        let seeds = TopicSeeds::new();
        let subset =
            Subsetter::new(&m, &seeds).subset_by_topics::<&str>(&[], SubsetOptions::default());
        let text = subset.render(&RenderOptions::default());
        assert_eq!(
            text,
            "# ex Schema (subset)\nPrefix: ex\nNamespace: http://example.org/onto/\n\n\
             ## Classes\n\n## Object Properties\n\n## Datatype Properties\n\n"
        );
    }

    #[test]
    fn rendering_is_idempotent_and_fingerprinted() {
        let m = model();
        let seeds = TopicSeeds::new();
        let subset = Subsetter::new(&m, &seeds).subset_by_classes(&["Meeting", "Event"]);
        let options = RenderOptions::default();
        assert_eq!(subset.render(&options), subset.render(&options));
        assert_eq!(subset.fingerprint(&options), subset.fingerprint(&options));
        assert!(subset.fingerprint(&options).starts_with("fnv1a64:"));
    }

    #[test]
    fn truncation_counts_characters() {
        assert_eq!(truncate("héllo", 2), "hé...");
        assert_eq!(truncate("héllo", 5), "héllo");
        assert_eq!(truncate("", 0), "");
    }
}
