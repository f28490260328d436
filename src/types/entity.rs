//! Entity kinds and entity values for configuration documents.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use super::attr_value::AttrValue;

/// Every tag kind the locator and ACL vocabularies know about.
///
/// The display form is the canonical tag spelling (`EventProcessors`
/// renders as `event_processors`); documents are matched against it
/// ASCII case-insensitively. Which kinds a given document may contain,
/// and how they nest, is declared per dialect.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EntityKind {
    Roles,
    Role,
    User,
    Databases,
    Db,
    Allow,
    EventProcessors,
    Ep,
    Locations,
    Location,
    TickServers,
    ServerLocation,
    Includes,
    Include,
}

/// An entity to be written into a document, typically as the payload of an
/// add action: a kind plus its attributes in the order they should appear.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entity {
    kind: EntityKind,
    attrs: Vec<(String, AttrValue)>,
}

impl Entity {
    /// Create a new entity of `kind` with no attributes.
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            attrs: Vec::new(),
        }
    }

    /// Add an attribute to the entity, returning the updated value.
    /// Attributes render in insertion order.
    pub fn with_attr(mut self, k: impl Into<String>, v: impl Into<AttrValue>) -> Self {
        self.attrs.push((k.into(), v.into()));
        self
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn attrs(&self) -> &[(String, AttrValue)] {
        &self.attrs
    }
}
