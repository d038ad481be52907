//! Typed class/property registries built from a triple graph.
//!
//! Entities are stored by local name; hierarchy edges are names, never
//! references, so cyclic input data cannot produce cyclic ownership.

use std::collections::{BTreeMap, HashSet};

use ontoslice_ingest_rdfowl::vocab;
use ontoslice_ingest_rdfowl::{local_name, Node, Term, TripleGraph};
use serde::{Deserialize, Serialize};

use crate::config::OntologyConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    pub uri: String,
    pub name: String,
    pub label: Option<String>,
    pub definition: Option<String>,
    pub superclasses: Vec<String>,
    pub subclasses: Vec<String>,
    /// Has an `owl:equivalentClass` axiom (necessary and sufficient condition).
    pub defined: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PropertyKind {
    Object,
    Datatype,
}

impl PropertyKind {
    pub const ALL: [PropertyKind; 2] = [PropertyKind::Object, PropertyKind::Datatype];

    fn type_iri(self) -> &'static str {
        match self {
            PropertyKind::Object => vocab::OWL_OBJECT_PROPERTY,
            PropertyKind::Datatype => vocab::OWL_DATATYPE_PROPERTY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub uri: String,
    pub name: String,
    pub kind: PropertyKind,
    pub label: Option<String>,
    pub definition: Option<String>,
    pub domains: Vec<String>,
    /// Class names for object properties. For datatype properties, primitive
    /// types carry a prefix (`xsd:string`, `rdfs:Literal`).
    pub ranges: Vec<String>,
    pub superproperties: Vec<String>,
    pub subproperties: Vec<String>,
}

impl Property {
    pub fn is_object(&self) -> bool {
        self.kind == PropertyKind::Object
    }
}

/// All classes and properties of one loaded ontology. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct SchemaModel {
    config: OntologyConfig,
    classes: BTreeMap<String, Class>,
    object_properties: BTreeMap<String, Property>,
    datatype_properties: BTreeMap<String, Property>,
}

impl SchemaModel {
    pub fn build(graph: &TripleGraph, config: &OntologyConfig) -> Self {
        let builder = Builder { graph, config };
        let mut classes = builder.collect_classes();
        let mut object_properties = builder.collect_properties(PropertyKind::Object);
        let mut datatype_properties = builder.collect_properties(PropertyKind::Datatype);

        link_classes(&mut classes);
        link_properties(&mut object_properties);
        link_properties(&mut datatype_properties);

        tracing::info!(
            namespace = %config.namespace,
            classes = classes.len(),
            object_properties = object_properties.len(),
            datatype_properties = datatype_properties.len(),
            "built schema model"
        );

        Self {
            config: config.clone(),
            classes,
            object_properties,
            datatype_properties,
        }
    }

    pub fn config(&self) -> &OntologyConfig {
        &self.config
    }

    pub fn namespace(&self) -> &str {
        &self.config.namespace
    }

    pub fn prefix(&self) -> &str {
        &self.config.prefix
    }

    pub fn class(&self, name: &str) -> Option<&Class> {
        self.classes.get(name)
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Classes in name order.
    pub fn classes(&self) -> impl Iterator<Item = &Class> {
        self.classes.values()
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    fn registry(&self, kind: PropertyKind) -> &BTreeMap<String, Property> {
        match kind {
            PropertyKind::Object => &self.object_properties,
            PropertyKind::Datatype => &self.datatype_properties,
        }
    }

    pub fn property(&self, kind: PropertyKind, name: &str) -> Option<&Property> {
        self.registry(kind).get(name)
    }

    /// Every property carrying `name`, object property first.
    pub fn properties_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Property> + 'a {
        PropertyKind::ALL
            .into_iter()
            .filter_map(move |kind| self.property(kind, name))
    }

    /// Properties of one kind in name order.
    pub fn properties_of(&self, kind: PropertyKind) -> impl Iterator<Item = &Property> {
        self.registry(kind).values()
    }

    /// Object properties, then datatype properties, each in name order.
    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.object_properties
            .values()
            .chain(self.datatype_properties.values())
    }

    pub fn property_count(&self, kind: PropertyKind) -> usize {
        self.registry(kind).len()
    }
}

struct Builder<'g> {
    graph: &'g TripleGraph,
    config: &'g OntologyConfig,
}

impl<'g> Builder<'g> {
    /// Named, in-namespace subjects typed `type_iri`. Blank nodes (restriction
    /// expressions and other anonymous scaffolding) never qualify.
    fn declared(&self, type_iri: &str) -> Vec<(&'g Node, &'g str)> {
        self.graph
            .subjects_of_type(type_iri)
            .into_iter()
            .filter_map(|node| node.iri().map(|iri| (node, iri)))
            .filter(|(_, iri)| self.config.contains(iri))
            .collect()
    }

    fn collect_classes(&self) -> BTreeMap<String, Class> {
        let mut classes: BTreeMap<String, Class> = BTreeMap::new();
        for (node, iri) in self.declared(vocab::OWL_CLASS) {
            let name = local_name(iri).to_string();
            if let Some(existing) = classes.get(&name) {
                warn_collision("class", &name, &existing.uri, iri);
                continue;
            }
            let class = Class {
                uri: iri.to_string(),
                name: name.clone(),
                label: self.annotation(node, &[vocab::SKOS_PREF_LABEL, vocab::RDFS_LABEL]),
                definition: self
                    .annotation(node, &[vocab::SKOS_DEFINITION, vocab::RDFS_COMMENT]),
                superclasses: self.named_in_namespace(node, vocab::RDFS_SUBCLASS_OF),
                subclasses: Vec::new(),
                defined: self.graph.has(node, vocab::OWL_EQUIVALENT_CLASS),
            };
            classes.insert(name, class);
        }
        classes
    }

    fn collect_properties(&self, kind: PropertyKind) -> BTreeMap<String, Property> {
        let mut properties: BTreeMap<String, Property> = BTreeMap::new();
        for (node, iri) in self.declared(kind.type_iri()) {
            let name = local_name(iri).to_string();
            if let Some(existing) = properties.get(&name) {
                warn_collision("property", &name, &existing.uri, iri);
                continue;
            }
            let ranges = match kind {
                PropertyKind::Object => self.named_in_namespace(node, vocab::RDFS_RANGE),
                PropertyKind::Datatype => self.datatype_ranges(node),
            };
            let property = Property {
                uri: iri.to_string(),
                name: name.clone(),
                kind,
                label: self.annotation(node, &[vocab::SKOS_PREF_LABEL, vocab::RDFS_LABEL]),
                definition: self
                    .annotation(node, &[vocab::SKOS_DEFINITION, vocab::RDFS_COMMENT]),
                domains: self.named_in_namespace(node, vocab::RDFS_DOMAIN),
                ranges,
                superproperties: self.named_in_namespace(node, vocab::RDFS_SUBPROPERTY_OF),
                subproperties: Vec::new(),
            };
            properties.insert(name, property);
        }
        properties
    }

    /// First literal of the first predicate that has one.
    fn annotation(&self, node: &Node, predicates: &[&str]) -> Option<String> {
        predicates.iter().find_map(|p| {
            self.graph
                .objects(node, p)
                .find_map(Term::literal)
                .map(|lit| normalize_text(&lit.lexical))
                .filter(|text| !text.is_empty())
        })
    }

    /// Local names of named, in-namespace objects, deduplicated in document
    /// order.
    fn named_in_namespace(&self, node: &Node, predicate: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        self.graph
            .objects(node, predicate)
            .filter_map(Term::iri)
            .filter(|iri| self.config.contains(iri))
            .map(|iri| local_name(iri).to_string())
            .filter(|name| seen.insert(name.clone()))
            .collect()
    }

    fn datatype_ranges(&self, node: &Node) -> Vec<String> {
        let mut seen = HashSet::new();
        self.graph
            .objects(node, vocab::RDFS_RANGE)
            .filter_map(Term::iri)
            .map(primitive_or_local)
            .filter(|name| seen.insert(name.clone()))
            .collect()
    }
}

fn warn_collision(kind: &str, name: &str, kept: &str, dropped: &str) {
    tracing::warn!(
        kind,
        name,
        kept,
        dropped,
        "local name collision; keeping the first declaration"
    );
}

/// Primitive types keep a vocabulary prefix so they stay distinguishable from
/// ontology classes.
fn primitive_or_local(iri: &str) -> String {
    for (ns, prefix) in [
        (vocab::XSD_NS, "xsd"),
        (vocab::RDFS_NS, "rdfs"),
        (vocab::RDF_NS, "rdf"),
    ] {
        if let Some(local) = iri.strip_prefix(ns) {
            return format!("{prefix}:{local}");
        }
    }
    local_name(iri).to_string()
}

fn normalize_text(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ").trim().to_string()
}

/// Keep only superclass edges whose target is a loaded class, then mirror
/// each into the target's subclass list.
fn link_classes(classes: &mut BTreeMap<String, Class>) {
    let names: HashSet<String> = classes.keys().cloned().collect();
    let mut inverse: Vec<(String, String)> = Vec::new();
    for (name, class) in classes.iter_mut() {
        class.superclasses.retain(|s| names.contains(s));
        for sup in &class.superclasses {
            inverse.push((sup.clone(), name.clone()));
        }
    }
    for (sup, sub) in inverse {
        if let Some(parent) = classes.get_mut(&sup) {
            parent.subclasses.push(sub);
        }
    }
}

fn link_properties(properties: &mut BTreeMap<String, Property>) {
    let names: HashSet<String> = properties.keys().cloned().collect();
    let mut inverse: Vec<(String, String)> = Vec::new();
    for (name, property) in properties.iter_mut() {
        property.superproperties.retain(|s| names.contains(s));
        for sup in &property.superproperties {
            inverse.push((sup.clone(), name.clone()));
        }
    }
    for (sup, sub) in inverse {
        if let Some(parent) = properties.get_mut(&sup) {
            parent.subproperties.push(sub);
        }
    }
}
