//! Where-clauses and the paths actions use to address entities.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

use super::entity::EntityKind;

/// One step of a path: an entity kind plus attribute constraints the open
/// tag at that depth must satisfy.
///
/// Constraint names are matched ASCII case-insensitively; constraint values
/// must match the document exactly, byte for byte.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Where {
    kind: EntityKind,
    constraints: Vec<(String, String)>,
}

impl Where {
    /// Create a where-clause matching any entity of `kind`.
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            constraints: Vec::new(),
        }
    }

    /// Require an attribute to hold the given value, returning the updated
    /// clause.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<super::AttrValue>) -> Self {
        self.constraints
            .push((name.into().to_ascii_lowercase(), value.into().to_string()));
        self
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn constraints(&self) -> &[(String, String)] {
        &self.constraints
    }
}

impl Display for Where {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.kind)?;
        if !self.constraints.is_empty() {
            let constraints = self
                .constraints
                .iter()
                .map(|(k, v)| format!("{k}=\"{v}\""))
                .collect::<Vec<_>>()
                .join(", ");
            write!(f, "[{constraints}]")?;
        }
        Ok(())
    }
}

/// An ordered list of where-clauses, outermost first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Path {
    segments: Vec<Where>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, clause: Where) {
        self.segments.push(clause);
    }

    pub fn segments(&self) -> &[Where] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if self.segments.is_empty() {
            return write!(f, "top level");
        }
        let rendered = self
            .segments
            .iter()
            .map(Where::to_string)
            .collect::<Vec<_>>()
            .join("/");
        write!(f, "{rendered}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_where_display_without_constraints() {
        assert_eq!(Where::new(EntityKind::Db).to_string(), "db");
    }

    #[test]
    fn test_where_display_with_constraints() {
        let clause = Where::new(EntityKind::Db)
            .with_attr("id", "S_DB_1")
            .with_attr("read_access", true);
        assert_eq!(
            clause.to_string(),
            r#"db[id="S_DB_1", read_access="true"]"#
        );
    }

    #[test]
    fn test_where_lowercases_constraint_names() {
        let clause = Where::new(EntityKind::Role).with_attr("NAME", "Admin");
        assert_eq!(clause.constraints(), &[("name".to_string(), "Admin".to_string())]);
    }

    #[test]
    fn test_path_display() {
        let mut path = Path::new();
        path.push(Where::new(EntityKind::Role).with_attr("name", "Admin"));
        path.push(Where::new(EntityKind::User));
        assert_eq!(path.to_string(), r#"role[name="Admin"]/user"#);
    }

    #[test]
    fn test_empty_path_display() {
        assert_eq!(Path::new().to_string(), "top level");
    }
}
