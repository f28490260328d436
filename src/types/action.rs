//! Actions: the edits and queries a patch pass carries.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

use super::attr_value::AttrValue;
use super::attrs::AttrList;
use super::entity::Entity;
use super::path::{Path, Where};

/// Attribute updates for a modify action: values to set (appending the
/// attribute when it is missing) and names to clear. Clearing a name that
/// is already absent is a no-op.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Updates {
    entries: Vec<(String, Option<AttrValue>)>,
}

impl Updates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute to a value, returning the updated set.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.entries.push((name.into(), Some(value.into())));
        self
    }

    /// Remove an attribute, returning the updated set.
    pub fn unset(mut self, name: impl Into<String>) -> Self {
        self.entries.push((name.into(), None));
        self
    }

    pub fn entries(&self) -> &[(String, Option<AttrValue>)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// What an action does once its path matches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Op {
    /// Insert a new child entity before the close tag of the addressed
    /// container.
    Add(Entity),
    /// Drop the matched entity and everything nested inside it.
    Delete,
    /// Rewrite attributes on the matched open tag.
    Modify(Updates),
    /// Capture the attributes of the first match.
    Get,
    /// Capture the attributes of every match.
    GetAll,
}

/// One edit or query, addressed by a path of where-clauses.
///
/// Actions record their outcome during a pass: `executed` flips once the
/// action has applied, and get actions accumulate `captures`. Every action
/// except [`Op::GetAll`] fires at most once per pass.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Action {
    op: Op,
    path: Path,
    executed: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    captures: Vec<AttrList>,
}

impl Action {
    fn with_op(op: Op) -> Self {
        Self {
            op,
            path: Path::new(),
            executed: false,
            captures: Vec::new(),
        }
    }

    pub fn add(entity: Entity) -> Self {
        Self::with_op(Op::Add(entity))
    }

    pub fn delete() -> Self {
        Self::with_op(Op::Delete)
    }

    pub fn modify(updates: Updates) -> Self {
        Self::with_op(Op::Modify(updates))
    }

    pub fn get() -> Self {
        Self::with_op(Op::Get)
    }

    pub fn get_all() -> Self {
        Self::with_op(Op::GetAll)
    }

    /// Append a where-clause to the action's path, returning the updated
    /// action. Clauses are given outermost first.
    pub fn add_where(mut self, clause: Where) -> Self {
        self.path.push(clause);
        self
    }

    pub fn op(&self) -> &Op {
        &self.op
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the action applied at least once during the last pass.
    pub fn executed(&self) -> bool {
        self.executed
    }

    /// The first capture, for get actions.
    pub fn capture(&self) -> Option<&AttrList> {
        self.captures.first()
    }

    /// All captures, in document order, for get-all actions.
    pub fn captures(&self) -> &[AttrList] {
        &self.captures
    }

    pub(crate) fn mark_executed(&mut self) {
        self.executed = true;
    }

    pub(crate) fn push_capture(&mut self, attrs: AttrList) {
        self.captures.push(attrs);
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.op {
            Op::Add(entity) => write!(f, "add {} under {}", entity.kind(), self.path),
            Op::Delete => write!(f, "delete {}", self.path),
            Op::Modify(_) => write!(f, "modify {}", self.path),
            Op::Get => write!(f, "get {}", self.path),
            Op::GetAll => write!(f, "get_all {}", self.path),
        }
    }
}
