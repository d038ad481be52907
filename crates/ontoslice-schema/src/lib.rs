//! Ontology subsetting engine.
//!
//! Pipeline:
//!
//! 1. [`SchemaModel::build`] walks a loaded triple graph once and materializes
//!    the class and property registries (namespace-filtered, blank nodes
//!    skipped, hierarchy edges mirrored).
//! 2. [`closure`] computes ancestor, bounded descendant and property-ancestor
//!    sets over those registries.
//! 3. [`Subsetter`] turns topic names (via injected [`TopicSeeds`]) or class
//!    names into a [`SchemaSubset`], a read-only view over the shared model.
//! 4. [`render`] prints a subset as deterministic, prompt-ready text.
//!
//! A built model is never mutated, so any number of subsets (and threads) may
//! share one `&SchemaModel`.

pub mod closure;
pub mod config;
pub mod digest;
pub mod model;
pub mod render;
pub mod subset;
pub mod topics;

use std::path::Path;

pub use config::OntologyConfig;
pub use model::{Class, Property, PropertyKind, SchemaModel};
pub use ontoslice_ingest_rdfowl::LoadError;
pub use render::RenderOptions;
pub use subset::{PropertyRef, SchemaSubset, SubsetOptions, SubsetStats, Subsetter};
pub use topics::{SeedsError, TopicSeeds};

/// Load an ontology document and build its schema model.
pub fn load_model(path: &Path, config: &OntologyConfig) -> Result<SchemaModel, LoadError> {
    let graph = ontoslice_ingest_rdfowl::load_file(path)?;
    Ok(SchemaModel::build(&graph, config))
}

/// Prompt text for `topics` over the gist ontology at `path`, with default
/// subsetting and rendering options.
pub fn schema_text_for_topics<S: AsRef<str>>(
    path: &Path,
    topics: &[S],
) -> Result<String, LoadError> {
    let model = load_model(path, &OntologyConfig::default())?;
    let seeds = TopicSeeds::gist();
    let subset = Subsetter::new(&model, &seeds).subset_by_topics(topics, SubsetOptions::default());
    Ok(subset.render(&RenderOptions::default()))
}
