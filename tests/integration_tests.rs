//! Integration tests for the complete ontoslice pipeline
//!
//! These tests verify end-to-end functionality across crates:
//! - RDF document → triple graph → schema model
//! - Topic seeds → subset → prompt text
//! - Article → topic classification → subset
//!
//! Run with: cargo test --test integration_tests

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use ontoslice_classify::keyword::DEFAULT_KEYWORD_THRESHOLD;
use ontoslice_classify::{KeywordClassifier, TopicClassifier};
use ontoslice_ingest_rdfowl::LoadError;
use ontoslice_schema::{
    load_model, schema_text_for_topics, OntologyConfig, PropertyKind, RenderOptions, SchemaModel,
    SubsetOptions, Subsetter, TopicSeeds,
};
use tempfile::tempdir;

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/mini_gist.ttl")
}

fn gist_model() -> SchemaModel {
    load_model(&fixture(), &OntologyConfig::default()).expect("fixture loads")
}

fn names<'a>(iter: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    iter.collect()
}

// ============================================================================
// Loading and model building
// ============================================================================

#[test]
fn test_fixture_model_is_namespace_filtered() {
    let model = gist_model();
    assert_eq!(model.class_count(), 9);
    assert!(!model.has_class("Entity"));
    assert!(model.property(PropertyKind::Object, "externalProp").is_none());
    assert_eq!(model.property_count(PropertyKind::Object), 6);
    assert_eq!(model.property_count(PropertyKind::Datatype), 3);

    // Superclass edges to classes outside the model are dropped.
    assert!(model.class("Thing").unwrap().superclasses.is_empty());
    assert!(model.class("ScheduledEvent").unwrap().defined);
    assert!(!model.class("Event").unwrap().defined);
}

#[test]
fn test_other_namespace_selects_other_entities() {
    let config = OntologyConfig::new("http://upper.example.org/", "upper");
    let model = load_model(&fixture(), &config).unwrap();
    assert_eq!(names(model.classes().map(|c| c.name.as_str())), vec!["Entity"]);
    let external = model
        .property(PropertyKind::Object, "externalProp")
        .expect("external property");
    // Its domain lives in another namespace and is not a loaded class.
    assert!(external.domains.is_empty());
}

#[test]
fn test_rdf_xml_document_loads_by_extension() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tiny.owl");
    std::fs::write(
        &path,
        r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#"
         xmlns:owl="http://www.w3.org/2002/07/owl#">
  <owl:Class rdf:about="http://example.org/onto/Thing"/>
  <owl:Class rdf:about="http://example.org/onto/Event">
    <rdfs:subClassOf rdf:resource="http://example.org/onto/Thing"/>
    <rdfs:comment>Something that happens.</rdfs:comment>
  </owl:Class>
</rdf:RDF>
"#,
    )
    .unwrap();

    let model = load_model(&path, &OntologyConfig::new("http://example.org/onto/", "ex")).unwrap();
    let event = model.class("Event").expect("Event");
    assert_eq!(event.superclasses, vec!["Thing".to_string()]);
    assert_eq!(event.definition.as_deref(), Some("Something that happens."));
    assert_eq!(
        model.class("Thing").unwrap().subclasses,
        vec!["Event".to_string()]
    );
}

#[test]
fn test_load_errors_are_typed() {
    let dir = tempdir().unwrap();

    let broken = dir.path().join("broken.ttl");
    std::fs::write(&broken, "@prefix ex: <http://example.org/> .\nex:a ex:b").unwrap();
    let err = load_model(&broken, &OntologyConfig::default()).unwrap_err();
    assert!(matches!(err, LoadError::Parse { .. }), "got {err:?}");

    let missing = dir.path().join("missing.ttl");
    let err = load_model(&missing, &OntologyConfig::default()).unwrap_err();
    assert!(matches!(err, LoadError::Io(_)), "got {err:?}");

    let unknown = dir.path().join("schema.json");
    std::fs::write(&unknown, "{}").unwrap();
    let err = load_model(&unknown, &OntologyConfig::default()).unwrap_err();
    assert!(matches!(err, LoadError::UnsupportedFormat(_)), "got {err:?}");
}

// ============================================================================
// Subsetting with the built-in gist seed table
// ============================================================================

#[test]
fn test_events_topic_expands_seeds_and_relevant_properties() {
    let model = gist_model();
    let seeds = TopicSeeds::gist();
    let subset = Subsetter::new(&model, &seeds).subset_by_topics(&["events"], SubsetOptions::default());

    assert_eq!(
        names(subset.classes().iter().map(String::as_str)),
        vec!["Event", "PhysicalEvent", "ScheduledEvent", "SpecialEvent", "Thing"]
    );
    assert_eq!(names(subset.property_names(PropertyKind::Object)), vec!["occursIn"]);
    assert_eq!(
        names(subset.property_names(PropertyKind::Datatype)),
        vec!["startDateTime"]
    );
    // Place is only a range of a selected property; it is not pulled in.
    assert!(!subset.contains_class("Place"));
}

#[test]
fn test_every_existing_seed_is_selected() {
    let model = gist_model();
    let seeds = TopicSeeds::gist();
    let subsetter = Subsetter::new(&model, &seeds);
    for topic in seeds.topics() {
        let subset = subsetter.subset_by_topics(&[topic], SubsetOptions::default());
        for seed in seeds.seed_classes(topic) {
            if model.has_class(seed) {
                assert!(subset.contains_class(seed), "{topic}: {seed} missing");
            }
        }
    }
}

#[test]
fn test_property_only_topic_pulls_property_ancestors() {
    let model = gist_model();
    let seeds = TopicSeeds::gist();
    let subsetter = Subsetter::new(&model, &seeds);

    let time = subsetter.subset_by_topics(&["time"], SubsetOptions::default());
    assert!(time.classes().is_empty());
    assert_eq!(
        names(time.property_names(PropertyKind::Datatype)),
        vec!["plannedStartDateTime", "startDateTime"]
    );

    let organizations = subsetter.subset_by_topics(&["organizations"], SubsetOptions::default());
    assert_eq!(
        names(organizations.classes().iter().map(String::as_str)),
        vec!["GovernmentOrganization", "Organization", "Thing"]
    );
    assert_eq!(
        names(organizations.property_names(PropertyKind::Object)),
        vec!["hasDirectPart", "hasMember", "hasPart"]
    );
}

#[test]
fn test_unknown_topics_are_skipped_alongside_known_ones() {
    let model = gist_model();
    let seeds = TopicSeeds::gist();
    let subsetter = Subsetter::new(&model, &seeds);
    let with_unknown =
        subsetter.subset_by_topics(&["no-such-topic", "quantities"], SubsetOptions::default());
    let known = subsetter.subset_by_topics(&["quantities"], SubsetOptions::default());
    assert_eq!(with_unknown.classes(), known.classes());
    assert_eq!(with_unknown.properties(), known.properties());
    assert!(known.contains_class("UnitOfMeasure"));
    assert!(known.contains_property(PropertyKind::Object, "hasUnitOfMeasure"));
    assert!(known.contains_property(PropertyKind::Datatype, "unitSymbol"));
}

#[test]
fn test_custom_seed_table_replaces_gist_topics() {
    let model = gist_model();
    let seeds = TopicSeeds::from_json_str(
        r#"{"classes": {"venues": ["Place"]}, "properties": {"venues": ["isGeoContainedIn"]}}"#,
    )
    .unwrap();
    let subsetter = Subsetter::new(&model, &seeds);
    assert!(subsetter
        .subset_by_topics(&["events"], SubsetOptions::default())
        .is_empty());

    let venues = subsetter.subset_by_topics(&["venues"], SubsetOptions::default());
    assert_eq!(
        names(venues.classes().iter().map(String::as_str)),
        vec!["Place", "Thing"]
    );
    // occursIn ranges over Place, which makes it relevant.
    assert_eq!(
        names(venues.property_names(PropertyKind::Object)),
        vec!["isGeoContainedIn", "occursIn"]
    );
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_class_subset_renders_prompt_text() {
    let model = gist_model();
    let seeds = TopicSeeds::gist();
    let subset = Subsetter::new(&model, &seeds).subset_by_classes(&["Event"]);
    let text = subset.render(&RenderOptions::default());

    let expected = "\
# gist Schema (subset)
Prefix: gist
Namespace: https://w3id.org/semanticarts/ns/ontology/gist/

## Classes

gist:Thing
  gist:PhysicalEvent
    Something that happens in the physical world.
    gist:Event
      Something that occurs over a period of time, often characterized as an activity being carried out by some person, organi...

## Object Properties

gist:occursIn
  The place where something happens.
  [Domain: gist:Event; Range: gist:Place]

## Datatype Properties

gist:startDateTime
  The moment something starts.
  [Domain: gist:Event; Range: xsd:dateTime]

";
    assert_eq!(text, expected);
}

#[test]
fn test_schema_text_for_topics_matches_manual_pipeline() {
    let text = schema_text_for_topics(&fixture(), &["events"]).unwrap();

    let model = gist_model();
    let seeds = TopicSeeds::gist();
    let manual = Subsetter::new(&model, &seeds)
        .subset_by_topics(&["events"], SubsetOptions::default())
        .render(&RenderOptions::default());
    assert_eq!(text, manual);
    assert!(text.contains("      gist:SpecialEvent\n"));
    assert!(text.contains("      gist:ScheduledEvent [defined]\n"));
}

#[test]
fn test_empty_request_renders_only_headers() {
    let text = schema_text_for_topics::<&str>(&fixture(), &[]).unwrap();
    assert_eq!(
        text,
        "# gist Schema (subset)\nPrefix: gist\n\
         Namespace: https://w3id.org/semanticarts/ns/ontology/gist/\n\n\
         ## Classes\n\n## Object Properties\n\n## Datatype Properties\n\n"
    );
}

// ============================================================================
// Article → topics → schema
// ============================================================================

#[test]
fn test_classified_article_drives_subset() -> anyhow::Result<()> {
    let article = "<html><body><nav>Home</nav><h1>Launch window opens</h1>\
        <article><p>The agency will launch the mission next spring.</p></article>\
        </body></html>";
    let classifier = KeywordClassifier::with_default_table(DEFAULT_KEYWORD_THRESHOLD)?;
    let result = classifier.classify(article, Some("launch"))?;
    assert!(result.topics.contains(&"events".to_string()));
    assert!(result.topics.contains(&"organizations".to_string()));

    let model = gist_model();
    let seeds = TopicSeeds::gist();
    let subset =
        Subsetter::new(&model, &seeds).subset_by_topics(&result.topics, SubsetOptions::default());
    let expected: BTreeSet<&str> = ["Event", "Organization", "GovernmentOrganization", "Thing"]
        .into_iter()
        .collect();
    let selected: BTreeSet<&str> = subset.classes().iter().map(String::as_str).collect();
    assert!(expected.is_subset(&selected), "selected {selected:?}");

    let json = serde_json::to_value(&result)?;
    assert_eq!(json["method"], "keyword");
    assert_eq!(json["article_id"], "launch");
    Ok(())
}
