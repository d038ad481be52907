//! Ancestor / descendant / property-ancestor closures over a [`SchemaModel`].
//!
//! Every traversal is iterative and carries a visited set, so malformed
//! cyclic hierarchies terminate.

use std::collections::BTreeSet;

use crate::model::{PropertyKind, SchemaModel};

/// Descendant expansion depth used for topic seeds.
pub const DEFAULT_DESCENDANT_DEPTH: usize = 2;

/// Every class reachable from `class` over superclass edges.
pub fn ancestors(model: &SchemaModel, class: &str) -> BTreeSet<String> {
    upward_closure(class, |name| {
        model.class(name).map(|c| c.superclasses.as_slice())
    })
}

/// Every property of the same kind reachable from `property` over
/// superproperty edges.
pub fn property_ancestors(
    model: &SchemaModel,
    kind: PropertyKind,
    property: &str,
) -> BTreeSet<String> {
    upward_closure(property, |name| {
        model
            .property(kind, name)
            .map(|p| p.superproperties.as_slice())
    })
}

/// Subclasses of `class` at most `max_depth` levels below it.
pub fn descendants(model: &SchemaModel, class: &str, max_depth: usize) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    let Some(start) = model.class(class) else {
        return found;
    };

    let mut level: Vec<&str> = start.subclasses.iter().map(String::as_str).collect();
    for _ in 0..max_depth {
        let mut next = Vec::new();
        for name in level {
            let Some(c) = model.class(name) else {
                continue;
            };
            if found.insert(name.to_string()) {
                next.extend(c.subclasses.iter().map(String::as_str));
            }
        }
        if next.is_empty() {
            break;
        }
        level = next;
    }
    found
}

fn upward_closure<'m, F>(start: &str, parents: F) -> BTreeSet<String>
where
    F: Fn(&str) -> Option<&'m [String]>,
{
    let mut found = BTreeSet::new();
    let mut stack: Vec<&'m str> = match parents(start) {
        Some(edges) => edges.iter().map(String::as_str).collect(),
        None => return found,
    };
    while let Some(name) = stack.pop() {
        if found.contains(name) {
            continue;
        }
        let Some(edges) = parents(name) else {
            continue;
        };
        found.insert(name.to_string());
        stack.extend(edges.iter().map(String::as_str));
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OntologyConfig;
    use ontoslice_ingest_rdfowl::{load_str, RdfFormat};

    fn model(body: &str) -> SchemaModel {
        let ttl = format!(
            "@prefix owl: <http://www.w3.org/2002/07/owl#> .\n\
             @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .\n\
             @prefix ex: <http://example.org/onto/> .\n{body}"
        );
        let graph = load_str(&ttl, RdfFormat::Turtle).expect("parse");
        SchemaModel::build(&graph, &OntologyConfig::new("http://example.org/onto/", "ex"))
    }

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    const CHAIN: &str = "
ex:Thing a owl:Class .
ex:PhysicalEvent a owl:Class ; rdfs:subClassOf ex:Thing .
ex:Event a owl:Class ; rdfs:subClassOf ex:PhysicalEvent .
ex:SpecialEvent a owl:Class ; rdfs:subClassOf ex:Event .
ex:VerySpecialEvent a owl:Class ; rdfs:subClassOf ex:SpecialEvent .
ex:Occurrence a owl:Class ; rdfs:subClassOf ex:Thing .
";

    #[test]
    fn ancestors_are_transitive_and_exclude_self() {
        let m = model(CHAIN);
        assert_eq!(ancestors(&m, "Event"), set(&["PhysicalEvent", "Thing"]));
        assert!(ancestors(&m, "Thing").is_empty());
        assert!(ancestors(&m, "Nope").is_empty());
    }

    #[test]
    fn descendants_respect_depth() {
        let m = model(CHAIN);
        assert_eq!(
            descendants(&m, "Thing", 1),
            set(&["Occurrence", "PhysicalEvent"])
        );
        assert_eq!(
            descendants(&m, "Thing", 2),
            set(&["Event", "Occurrence", "PhysicalEvent"])
        );
        assert_eq!(
            descendants(&m, "Event", DEFAULT_DESCENDANT_DEPTH),
            set(&["SpecialEvent", "VerySpecialEvent"])
        );
        assert!(descendants(&m, "Thing", 0).is_empty());
    }

    #[test]
    fn cyclic_hierarchy_terminates() {
        let m = model(
            "
ex:A a owl:Class ; rdfs:subClassOf ex:C .
ex:B a owl:Class ; rdfs:subClassOf ex:A .
ex:C a owl:Class ; rdfs:subClassOf ex:B .
",
        );
        assert_eq!(ancestors(&m, "A"), set(&["A", "B", "C"]));
        assert_eq!(descendants(&m, "A", 50), set(&["A", "B", "C"]));
    }

    #[test]
    fn property_ancestors_stay_within_kind() {
        let m = model(
            "
ex:relatesTo a owl:ObjectProperty .
ex:hasPart a owl:ObjectProperty ; rdfs:subPropertyOf ex:relatesTo .
ex:hasDirectPart a owl:ObjectProperty ; rdfs:subPropertyOf ex:hasPart .
ex:hasDirectPart a owl:DatatypeProperty .
",
        );
        assert_eq!(
            property_ancestors(&m, PropertyKind::Object, "hasDirectPart"),
            set(&["hasPart", "relatesTo"])
        );
        assert!(property_ancestors(&m, PropertyKind::Datatype, "hasDirectPart").is_empty());
    }
}
