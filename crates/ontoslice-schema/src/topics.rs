//! Topic seed tables: what a topic means in schema terms.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum SeedsError {
    #[error("failed to read topic seeds `{path}`: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid topic seeds JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Seed classes and directly associated properties per topic.
///
/// Seed names are hints: names missing from a loaded ontology are skipped
/// when subsetting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicSeeds {
    pub classes: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub properties: BTreeMap<String, Vec<String>>,
}

impl TopicSeeds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_topic<C, P>(mut self, topic: &str, classes: C, properties: P) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        self.classes
            .insert(topic.to_string(), classes.into_iter().map(Into::into).collect());
        self.properties.insert(
            topic.to_string(),
            properties.into_iter().map(Into::into).collect(),
        );
        self
    }

    pub fn from_json_str(text: &str) -> Result<Self, SeedsError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, SeedsError> {
        let text = std::fs::read_to_string(path).map_err(|source| SeedsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Sorted union of topic names across both tables.
    pub fn topics(&self) -> Vec<&str> {
        let names: BTreeSet<&str> = self
            .classes
            .keys()
            .chain(self.properties.keys())
            .map(String::as_str)
            .collect();
        names.into_iter().collect()
    }

    pub fn contains(&self, topic: &str) -> bool {
        self.classes.contains_key(topic) || self.properties.contains_key(topic)
    }

    pub fn seed_classes(&self, topic: &str) -> &[String] {
        self.classes.get(topic).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn seed_properties(&self, topic: &str) -> &[String] {
        self.properties.get(topic).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Built-in table for the gist upper ontology.
    pub fn gist() -> Self {
        let mut seeds = Self::new();
        for (topic, classes, properties) in GIST_TOPICS {
            seeds = seeds.with_topic(topic, classes.iter().copied(), properties.iter().copied());
        }
        seeds
    }
}

type TopicRow = (&'static str, &'static [&'static str], &'static [&'static str]);

const GIST_TOPICS: &[TopicRow] = &[
    (
        "organizations",
        &[
            "Organization",
            "GovernmentOrganization",
            "CountryGovernment",
            "SubCountryGovernment",
            "IntergovernmentalOrganization",
            "Person",
        ],
        &[
            "hasMember",
            "isMemberOf",
            "isGovernedBy",
            "hasJurisdictionOver",
            "isUnderJurisdictionOf",
            "owns",
            "isOwnedBy",
        ],
    ),
    (
        "events",
        &[
            "Event",
            "HistoricalEvent",
            "ContemporaryEvent",
            "PhysicalEvent",
            "ScheduledEvent",
            "Determination",
            "Transaction",
            "Task",
            "Project",
        ],
        &[
            "isParticipantIn",
            "hasParticipant",
            "isAffectedBy",
            "affects",
            "isTriggeredBy",
            "produces",
            "isProducedBy",
            "occursIn",
        ],
    ),
    (
        "time",
        &["TimeInterval", "TemporalRelation"],
        &[
            "atDateTime",
            "startDateTime",
            "endDateTime",
            "actualStartDateTime",
            "actualEndDateTime",
            "actualStartDate",
            "actualEndDate",
            "plannedStartDateTime",
            "plannedEndDateTime",
            "plannedStartDate",
            "plannedEndDate",
            "birthDate",
            "deathDate",
            "hasStart",
            "hasEnd",
            "hasGiver",
            "hasRecipient",
        ],
    ),
    (
        "geo",
        &[
            "GeoLocation",
            "GeoPoint",
            "GeoRegion",
            "GeoVolume",
            "GeoRoute",
            "GovernedGeoRegion",
            "CountryGeoRegion",
            "Landmark",
            "Building",
            "PhysicalAddress",
        ],
        &[
            "hasPhysicalLocation",
            "isGeoContainedIn",
            "latitude",
            "longitude",
            "refersTo",
            "hasAddress",
        ],
    ),
    (
        "agreements",
        &[
            "Agreement",
            "Contract",
            "Commitment",
            "ContingentObligation",
            "Offer",
            "Account",
            "ContractTerm",
        ],
        &[
            "hasParty",
            "hasGiver",
            "hasRecipient",
            "offersToProvide",
            "offersToReceive",
            "isUnderJurisdictionOf",
            "conformsTo",
        ],
    ),
    (
        "quantities",
        &[
            "Magnitude",
            "Aspect",
            "UnitOfMeasure",
            "ReferenceValue",
            "SimpleUnitOfMeasure",
            "CoherentProductUnitOfMeasure",
            "StandardUnitOfMeasure",
            "ProductUnitOfMeasure",
            "RatioUnitOfMeasure",
            "UnitGroup",
        ],
        &[
            "hasMagnitude",
            "hasAspect",
            "hasUnitOfMeasure",
            "numericValue",
            "conversionFactor",
            "conversionOffset",
            "hasBaseUnit",
        ],
    ),
    (
        "content",
        &[
            "Content",
            "ContentExpression",
            "FormattedContent",
            "Message",
            "IntellectualProperty",
            "KnowledgeConcept",
            "ID",
            "Address",
            "ElectronicAddress",
        ],
        &[
            "isExpressedIn",
            "isRenderedOn",
            "isAbout",
            "uniqueText",
            "containedText",
            "name",
            "description",
            "comesFromAgent",
            "goesToAgent",
        ],
    ),
    (
        "collections",
        &[
            "Collection",
            "OrderedCollection",
            "OrderedMember",
            "ControlledVocabulary",
            "Network",
            "NetworkNode",
            "NetworkLink",
        ],
        &[
            "isMemberOf",
            "hasMember",
            "isDirectPartOf",
            "hasDirectPart",
            "precedesDirectly",
            "precedes",
            "sequence",
            "providesOrderFor",
            "isFirstMemberOf",
            "links",
        ],
    ),
    (
        "categories",
        &[
            "Category",
            "Tag",
            "Behavior",
            "ProductCategory",
            "EquipmentType",
            "MediaType",
            "GeneralMediaType",
            "Discipline",
        ],
        &["isCategorizedBy", "isAllocatedBy"],
    ),
    (
        "artifacts",
        &[
            "PhysicalIdentifiableItem",
            "Equipment",
            "Landmark",
            "Building",
            "PhysicalSubstance",
            "LivingThing",
        ],
        &["isMadeUpOf", "hasBiologicalParent"],
    ),
    (
        "intentions",
        &[
            "Intention",
            "Requirement",
            "Restriction",
            "Permission",
            "Function",
            "Specification",
            "CatalogItem",
            "EventSpecification",
        ],
        &["allows", "prevents", "requires", "conformsTo"],
    ),
];
