//! Topic- and class-driven subsetting of a [`SchemaModel`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::closure::{self, DEFAULT_DESCENDANT_DEPTH};
use crate::digest::fnv1a64_digest;
use crate::model::{PropertyKind, SchemaModel};
use crate::render::{self, RenderOptions};
use crate::topics::TopicSeeds;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubsetOptions {
    /// Expand each topic seed with its subclasses.
    pub include_descendants: bool,
    pub max_depth: usize,
}

impl Default for SubsetOptions {
    fn default() -> Self {
        Self {
            include_descendants: true,
            max_depth: DEFAULT_DESCENDANT_DEPTH,
        }
    }
}

/// A property selected into a subset; names are unique per kind only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PropertyRef {
    pub kind: PropertyKind,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsetStats {
    pub classes: usize,
    pub object_properties: usize,
    pub datatype_properties: usize,
}

/// Read-only view of a model restricted to selected classes and properties.
#[derive(Debug, Clone)]
pub struct SchemaSubset<'m> {
    model: &'m SchemaModel,
    classes: BTreeSet<String>,
    properties: BTreeSet<PropertyRef>,
}

impl<'m> SchemaSubset<'m> {
    pub fn model(&self) -> &'m SchemaModel {
        self.model
    }

    pub fn classes(&self) -> &BTreeSet<String> {
        &self.classes
    }

    pub fn properties(&self) -> &BTreeSet<PropertyRef> {
        &self.properties
    }

    pub fn contains_class(&self, name: &str) -> bool {
        self.classes.contains(name)
    }

    pub fn contains_property(&self, kind: PropertyKind, name: &str) -> bool {
        self.properties.contains(&PropertyRef {
            kind,
            name: name.to_string(),
        })
    }

    /// Selected property names of one kind, sorted.
    pub fn property_names(&self, kind: PropertyKind) -> impl Iterator<Item = &str> {
        self.properties
            .iter()
            .filter(move |p| p.kind == kind)
            .map(|p| p.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.properties.is_empty()
    }

    pub fn stats(&self) -> SubsetStats {
        SubsetStats {
            classes: self.classes.len(),
            object_properties: self.property_names(PropertyKind::Object).count(),
            datatype_properties: self.property_names(PropertyKind::Datatype).count(),
        }
    }

    pub fn render(&self, options: &RenderOptions) -> String {
        render::render(self, options)
    }

    /// Stable digest of the rendered text, usable as a prompt cache key.
    pub fn fingerprint(&self, options: &RenderOptions) -> String {
        fnv1a64_digest(self.render(options).as_bytes())
    }
}

/// Builds subsets of one model using one seed table.
#[derive(Debug, Clone, Copy)]
pub struct Subsetter<'m> {
    model: &'m SchemaModel,
    seeds: &'m TopicSeeds,
}

impl<'m> Subsetter<'m> {
    pub fn new(model: &'m SchemaModel, seeds: &'m TopicSeeds) -> Self {
        Self { model, seeds }
    }

    pub fn model(&self) -> &'m SchemaModel {
        self.model
    }

    pub fn seeds(&self) -> &'m TopicSeeds {
        self.seeds
    }

    pub fn subset_by_topics<S: AsRef<str>>(
        &self,
        topics: &[S],
        options: SubsetOptions,
    ) -> SchemaSubset<'m> {
        let mut seed_classes: BTreeSet<String> = BTreeSet::new();
        let mut seed_properties: BTreeSet<PropertyRef> = BTreeSet::new();

        for topic in topics {
            let topic = topic.as_ref();
            if !self.seeds.contains(topic) {
                tracing::debug!(topic, "unknown topic skipped");
                continue;
            }
            for class in self.seeds.seed_classes(topic) {
                if self.model.has_class(class) {
                    seed_classes.insert(class.clone());
                } else {
                    tracing::debug!(topic, class = %class, "seed class not in ontology");
                }
            }
            for name in self.seeds.seed_properties(topic) {
                let mut found = false;
                for p in self.model.properties_named(name) {
                    found = true;
                    seed_properties.insert(PropertyRef {
                        kind: p.kind,
                        name: p.name.clone(),
                    });
                }
                if !found {
                    tracing::debug!(topic, property = %name, "seed property not in ontology");
                }
            }
        }

        let mut classes = self.with_ancestors(&seed_classes);
        if options.include_descendants {
            for seed in &seed_classes {
                classes.extend(closure::descendants(self.model, seed, options.max_depth));
            }
        }

        self.finish(classes, seed_properties)
    }

    /// Subset around explicit class names: ancestors and relevant properties,
    /// no descendant expansion. Unknown names are skipped.
    pub fn subset_by_classes<S: AsRef<str>>(&self, class_names: &[S]) -> SchemaSubset<'m> {
        let seeds: BTreeSet<String> = class_names
            .iter()
            .map(|name| name.as_ref())
            .filter(|name| {
                let known = self.model.has_class(name);
                if !known {
                    tracing::debug!(class = %name, "requested class not in ontology");
                }
                known
            })
            .map(str::to_string)
            .collect();
        let classes = self.with_ancestors(&seeds);
        self.finish(classes, BTreeSet::new())
    }

    fn with_ancestors(&self, seeds: &BTreeSet<String>) -> BTreeSet<String> {
        let mut classes = seeds.clone();
        for seed in seeds {
            classes.extend(closure::ancestors(self.model, seed));
        }
        classes
    }

    /// Relevance pass plus property-hierarchy context.
    fn finish(
        &self,
        classes: BTreeSet<String>,
        mut properties: BTreeSet<PropertyRef>,
    ) -> SchemaSubset<'m> {
        for property in self.model.properties() {
            let by_domain = property.domains.iter().any(|d| classes.contains(d));
            // Datatype ranges are primitive types and never make a property relevant.
            let by_range =
                property.is_object() && property.ranges.iter().any(|r| classes.contains(r));
            if by_domain || by_range {
                properties.insert(PropertyRef {
                    kind: property.kind,
                    name: property.name.clone(),
                });
            }
        }

        let mut expanded = properties.clone();
        for p in &properties {
            expanded.extend(
                closure::property_ancestors(self.model, p.kind, &p.name)
                    .into_iter()
                    .map(|name| PropertyRef { kind: p.kind, name }),
            );
        }

        let subset = SchemaSubset {
            model: self.model,
            classes,
            properties: expanded,
        };
        let stats = subset.stats();
        tracing::debug!(
            classes = stats.classes,
            object_properties = stats.object_properties,
            datatype_properties = stats.datatype_properties,
            "computed schema subset"
        );
        subset
    }
}
