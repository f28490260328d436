//! Dialect registries: which entity kinds a document may contain, how
//! their tags are spelled, and how they nest.
//!
//! The locator and ACL formats share a tag grammar but use different
//! vocabularies. Each dialect is a static registry of [`EntitySpec`]
//! entries; the engine consults it to resolve tag names to kinds and to
//! decide where added entities may be inserted. Tags the registry does
//! not list are passed through untouched.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::types::EntityKind;

/// The registry entry for one entity kind within a dialect.
#[derive(Debug, Clone)]
pub struct EntitySpec {
    pub kind: EntityKind,
    /// Accepted tag spellings, compared ASCII case-insensitively. The
    /// first spelling is canonical and used when synthesizing tags.
    pub tag_names: &'static [&'static str],
    /// Attributes that identify an entity of this kind. An added entity
    /// must carry all of them.
    pub key_fields: &'static [&'static str],
    /// Whether the kind is written as an open/close pair (true) or as a
    /// single self-closing tag (false).
    pub has_body: bool,
    /// Whether modify may append attributes the tag does not already
    /// carry. Section wrappers refuse free-form attributes.
    pub allows_attributes: bool,
    /// Whether open tags of this kind count toward path depth. Section
    /// wrappers are tracked for structural pairing but never addressed
    /// by a where-clause.
    pub addressable: bool,
    /// Kinds whose close tag anchors an add of this kind. Empty for
    /// top-level sections, which cannot be added.
    pub parents: &'static [EntityKind],
}

/// A complete tag vocabulary for one document format.
#[derive(Debug)]
pub struct Dialect {
    name: &'static str,
    specs: Vec<EntitySpec>,
    by_tag: HashMap<String, usize>,
}

impl Dialect {
    fn new(name: &'static str, specs: Vec<EntitySpec>) -> Self {
        let mut by_tag = HashMap::new();
        for (idx, spec) in specs.iter().enumerate() {
            for tag in spec.tag_names {
                by_tag.insert(tag.to_ascii_lowercase(), idx);
            }
        }
        Self {
            name,
            specs,
            by_tag,
        }
    }

    /// The ACL vocabulary: roles with their users, databases and event
    /// processors with their allow entries.
    pub fn acl() -> &'static Dialect {
        &ACL
    }

    /// The locator vocabulary: databases with their locations, tick
    /// server locations and include directives.
    pub fn locator() -> &'static Dialect {
        &LOCATOR
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Resolves a tag name from a document to its registry entry,
    /// ignoring ASCII case. Unknown tags resolve to `None`.
    pub fn resolve(&self, tag_name: &str) -> Option<&EntitySpec> {
        self.by_tag
            .get(&tag_name.to_ascii_lowercase())
            .map(|&idx| &self.specs[idx])
    }

    /// Looks up the registry entry for a kind, if the dialect has one.
    pub fn spec(&self, kind: EntityKind) -> Option<&EntitySpec> {
        self.specs.iter().find(|s| s.kind == kind)
    }

    /// The canonical tag spelling for a kind.
    pub fn canonical_tag(&self, kind: EntityKind) -> Option<&'static str> {
        self.spec(kind).map(|s| s.tag_names[0])
    }
}

static ACL: Lazy<Dialect> = Lazy::new(|| {
    use EntityKind::*;
    Dialect::new(
        "acl",
        vec![
            EntitySpec {
                kind: Roles,
                tag_names: &["roles"],
                key_fields: &[],
                has_body: true,
                allows_attributes: false,
                addressable: false,
                parents: &[],
            },
            EntitySpec {
                kind: Role,
                tag_names: &["role"],
                key_fields: &["name"],
                has_body: true,
                allows_attributes: true,
                addressable: true,
                parents: &[Roles],
            },
            EntitySpec {
                kind: User,
                tag_names: &["user"],
                key_fields: &["name"],
                has_body: false,
                allows_attributes: true,
                addressable: true,
                parents: &[Role],
            },
            EntitySpec {
                kind: Databases,
                tag_names: &["databases"],
                key_fields: &[],
                has_body: true,
                allows_attributes: false,
                addressable: false,
                parents: &[],
            },
            EntitySpec {
                kind: Db,
                tag_names: &["db"],
                key_fields: &["id"],
                has_body: true,
                allows_attributes: true,
                addressable: true,
                parents: &[Databases],
            },
            EntitySpec {
                kind: Allow,
                tag_names: &["allow"],
                key_fields: &["role"],
                has_body: false,
                allows_attributes: true,
                addressable: true,
                parents: &[Db, Ep],
            },
            EntitySpec {
                kind: EventProcessors,
                tag_names: &["event_processors"],
                key_fields: &[],
                has_body: true,
                allows_attributes: false,
                addressable: false,
                parents: &[],
            },
            EntitySpec {
                kind: Ep,
                tag_names: &["ep"],
                key_fields: &["id"],
                has_body: true,
                allows_attributes: true,
                addressable: true,
                parents: &[EventProcessors],
            },
        ],
    )
});

static LOCATOR: Lazy<Dialect> = Lazy::new(|| {
    use EntityKind::*;
    Dialect::new(
        "locator",
        vec![
            EntitySpec {
                kind: Databases,
                tag_names: &["databases"],
                key_fields: &[],
                has_body: true,
                allows_attributes: false,
                addressable: false,
                parents: &[],
            },
            EntitySpec {
                kind: Db,
                tag_names: &["db"],
                key_fields: &["id"],
                has_body: true,
                allows_attributes: true,
                addressable: true,
                parents: &[Databases],
            },
            EntitySpec {
                kind: Locations,
                tag_names: &["locations"],
                key_fields: &[],
                has_body: true,
                allows_attributes: false,
                addressable: false,
                parents: &[Db],
            },
            EntitySpec {
                kind: Location,
                tag_names: &["location"],
                key_fields: &["location"],
                has_body: false,
                allows_attributes: true,
                addressable: true,
                parents: &[Locations],
            },
            EntitySpec {
                kind: TickServers,
                tag_names: &["tick_servers"],
                key_fields: &[],
                has_body: true,
                allows_attributes: false,
                addressable: false,
                parents: &[],
            },
            EntitySpec {
                kind: ServerLocation,
                tag_names: &["server_location"],
                key_fields: &["location"],
                has_body: false,
                allows_attributes: true,
                addressable: true,
                parents: &[TickServers],
            },
            EntitySpec {
                kind: Includes,
                tag_names: &["includes"],
                key_fields: &[],
                has_body: true,
                allows_attributes: false,
                addressable: false,
                parents: &[],
            },
            EntitySpec {
                kind: Include,
                tag_names: &["include"],
                key_fields: &["path"],
                has_body: false,
                // an include is nothing but a file reference
                allows_attributes: false,
                addressable: true,
                parents: &[Includes],
            },
        ],
    )
});

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[parameterized(
        lowercase = { "role" },
        uppercase = { "ROLE" },
        mixed = { "Role" },
    )]
    fn test_resolve_ignores_case(tag: &str) {
        let spec = Dialect::acl().resolve(tag).unwrap();
        assert_eq!(spec.kind, EntityKind::Role);
    }

    #[test]
    fn test_resolve_unknown_tag() {
        assert!(Dialect::acl().resolve("version_info").is_none());
        assert!(Dialect::acl().resolve("").is_none());
    }

    #[test]
    fn test_vocabularies_are_dialect_specific() {
        assert!(Dialect::acl().resolve("role").is_some());
        assert!(Dialect::locator().resolve("role").is_none());
        assert!(Dialect::locator().resolve("tick_servers").is_some());
        assert!(Dialect::acl().resolve("tick_servers").is_none());
        // both formats have database sections
        assert!(Dialect::acl().resolve("db").is_some());
        assert!(Dialect::locator().resolve("db").is_some());
    }

    #[test]
    fn test_section_wrappers_are_not_addressable() {
        for dialect in [Dialect::acl(), Dialect::locator()] {
            for tag in ["roles", "databases", "event_processors", "locations"] {
                if let Some(spec) = dialect.resolve(tag) {
                    assert!(!spec.addressable, "{tag} should not be addressable");
                    assert!(!spec.allows_attributes);
                }
            }
        }
    }

    #[test]
    fn test_allow_nests_under_db_and_ep() {
        let spec = Dialect::acl().spec(EntityKind::Allow).unwrap();
        assert_eq!(spec.parents, &[EntityKind::Db, EntityKind::Ep]);
        assert!(!spec.has_body);
    }

    #[test]
    fn test_locator_locations_nest_inside_db() {
        let locations = Dialect::locator().spec(EntityKind::Locations).unwrap();
        assert_eq!(locations.parents, &[EntityKind::Db]);
        let location = Dialect::locator().spec(EntityKind::Location).unwrap();
        assert_eq!(location.parents, &[EntityKind::Locations]);
    }

    #[test]
    fn test_canonical_tag_spelling() {
        assert_eq!(
            Dialect::acl().canonical_tag(EntityKind::EventProcessors),
            Some("event_processors")
        );
        assert_eq!(Dialect::acl().canonical_tag(EntityKind::Include), None);
    }

    #[test]
    fn test_top_level_sections_have_no_parents() {
        for (dialect, tag) in [
            (Dialect::acl(), "roles"),
            (Dialect::acl(), "databases"),
            (Dialect::locator(), "databases"),
            (Dialect::locator(), "includes"),
        ] {
            let spec = dialect.resolve(tag).unwrap();
            assert!(spec.parents.is_empty());
        }
    }
}
