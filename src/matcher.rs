use crate::error::PatchError;
use crate::types::{AttrList, EntityKind, Path, TagLine};

/// One open tag on the structural stack. Attributes are the ones parsed
/// from the source line; a later modify does not rewrite history.
#[derive(Debug, Clone)]
pub(crate) struct Frame {
    pub(crate) kind: EntityKind,
    pub(crate) addressable: bool,
    pub(crate) attrs: AttrList,
}

/// The stack of currently open tags, outermost first.
///
/// Every resolved tag is tracked so close tags can be paired, but only
/// addressable frames count toward path depth; section wrappers such as
/// `<roles>` sit on the stack without deepening any path.
#[derive(Debug, Default)]
pub(crate) struct TagStack {
    frames: Vec<Frame>,
}

impl TagStack {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, kind: EntityKind, addressable: bool, tag: &TagLine) {
        self.frames.push(Frame {
            kind,
            addressable,
            attrs: tag.attrs().clone(),
        });
    }

    /// Pops the innermost frame, checking that the close tag pairs with it.
    pub(crate) fn pop(
        &mut self,
        kind: EntityKind,
        tag_name: &str,
        line_no: usize,
    ) -> Result<Frame, PatchError> {
        match self.frames.pop() {
            Some(frame) if frame.kind == kind => Ok(frame),
            Some(frame) => Err(PatchError::StructuralMismatch(format!(
                "line {line_no}: close tag </{tag_name}> does not pair with open <{}>",
                frame.kind
            ))),
            None => Err(PatchError::StructuralMismatch(format!(
                "line {line_no}: close tag </{tag_name}> without a matching open tag"
            ))),
        }
    }

    /// Drops the innermost frame without pairing checks. Used to unwind
    /// the frame a self-closing tag briefly occupies.
    pub(crate) fn discard_top(&mut self) {
        self.frames.pop();
    }

    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }

    /// True when the addressable frames, outermost first, satisfy the path
    /// at exactly its depth: same kind at every step and every constraint
    /// present with a byte-identical value.
    pub(crate) fn matches(&self, path: &Path) -> bool {
        let addressable: Vec<&Frame> = self.frames.iter().filter(|f| f.addressable).collect();
        if addressable.len() != path.len() {
            return false;
        }
        addressable
            .iter()
            .zip(path.segments())
            .all(|(frame, clause)| {
                frame.kind == clause.kind()
                    && clause
                        .constraints()
                        .iter()
                        .all(|(name, value)| frame.attrs.get(name) == Some(value.as_str()))
            })
    }
}
