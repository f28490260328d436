use tracing::{debug, info, warn};

use crate::dialect::{Dialect, EntitySpec};
use crate::error::PatchError;
use crate::matcher::TagStack;
use crate::traits::{LineRead, LineWrite};
use crate::types::{Action, CloseTag, Entity, EntityKind, LineToken, Op, TagLine, Updates};

/// The main engine handle. Holds nothing but the dialect, so it is
/// freely copyable; all per-pass state lives on the stack of
/// [`PatchEngine::apply_actions`].
#[derive(Debug, Clone, Copy)]
pub struct PatchEngine {
    dialect: &'static Dialect,
}

/// An armed delete: everything is dropped until the structural stack
/// shrinks back past `depth`.
struct Suppression {
    depth: usize,
    actions: Vec<usize>,
}

struct OpenOutcome {
    rewritten: bool,
    delete: Vec<usize>,
}

impl PatchEngine {
    pub fn new(dialect: &'static Dialect) -> Self {
        Self { dialect }
    }

    /// An engine over the ACL vocabulary.
    pub fn acl() -> Self {
        Self::new(Dialect::acl())
    }

    /// An engine over the locator vocabulary.
    pub fn locator() -> Self {
        Self::new(Dialect::locator())
    }

    pub fn dialect(&self) -> &'static Dialect {
        self.dialect
    }

    /// Runs one pass: reads the document line by line, applies every
    /// matching action, and forwards everything else unchanged.
    ///
    /// Returns `Ok(true)` when every action executed at least once, and
    /// `Ok(false)` when some action never found a match; the output is
    /// flushed in both cases. One caveat on `Ok(false)`: a delete whose
    /// entity is still open when the input ends has already dropped the
    /// suppressed tail and is reported unmatched, so `Ok(false)` output is
    /// not fit to replace the source. An `Err` means the pass was aborted
    /// and the output must be discarded.
    pub fn apply_actions<R: LineRead, W: LineWrite>(
        &self,
        reader: &mut R,
        writer: &mut W,
        actions: &mut [Action],
    ) -> Result<bool, PatchError> {
        // 1. Refuse actions the dialect cannot express before reading any input.
        self.validate_actions(actions)?;

        debug!(
            event = "Patch",
            phase = "Start",
            dialect = self.dialect.name(),
            actions = actions.len()
        );

        #[cfg(feature = "observability")]
        let started = std::time::Instant::now();

        let mut stack = TagStack::new();
        let mut suppression: Option<Suppression> = None;
        let mut line_no = 0usize;
        let mut lines_written = 0usize;

        // 2. Walk the document one line at a time, holding only the open-tag
        //    stack between lines.
        while let Some(line) = reader.next_line()? {
            line_no += 1;
            match LineToken::scan(&line) {
                LineToken::Open(mut tag) => {
                    let Some(spec) = self.dialect.resolve(tag.name()) else {
                        // Unknown tags are none of our business.
                        if suppression.is_none() {
                            writer.write_line(&line)?;
                            lines_written += 1;
                        }
                        continue;
                    };
                    let self_closing = tag.self_closing();
                    stack.push(spec.kind, spec.addressable, &tag);
                    if suppression.is_none() {
                        let outcome =
                            self.evaluate_open(&mut tag, &stack, actions, spec, line_no)?;
                        if outcome.delete.is_empty() {
                            let out = if outcome.rewritten {
                                tag.render()
                            } else {
                                tag.raw().to_string()
                            };
                            writer.write_line(&out)?;
                            lines_written += 1;
                        } else if self_closing {
                            for idx in outcome.delete {
                                actions[idx].mark_executed();
                            }
                            debug!(
                                event = "Patch",
                                phase = "Delete",
                                tag = tag.name(),
                                line = line_no
                            );
                        } else {
                            suppression = Some(Suppression {
                                depth: stack.depth(),
                                actions: outcome.delete,
                            });
                        }
                    }
                    if self_closing {
                        stack.discard_top();
                    }
                }
                LineToken::Close(close) => {
                    let Some(spec) = self.dialect.resolve(close.name()) else {
                        if suppression.is_none() {
                            writer.write_line(&line)?;
                            lines_written += 1;
                        }
                        continue;
                    };
                    let kind = spec.kind;
                    if suppression.is_some() {
                        let ends = suppression.as_ref().map(|s| s.depth) == Some(stack.depth());
                        stack.pop(kind, close.name(), line_no)?;
                        if ends {
                            if let Some(sup) = suppression.take() {
                                for idx in sup.actions {
                                    actions[idx].mark_executed();
                                }
                                debug!(
                                    event = "Patch",
                                    phase = "Delete",
                                    tag = close.name(),
                                    line = line_no
                                );
                            }
                        }
                    } else {
                        // 3. Adds anchor on close tags: a new child lands just
                        //    before its container closes.
                        let adds = self.synthesize_adds(&close, kind, &stack, actions);
                        stack.pop(kind, close.name(), line_no)?;
                        for (idx, add_lines) in adds {
                            for add_line in &add_lines {
                                writer.write_line(add_line)?;
                                lines_written += 1;
                            }
                            actions[idx].mark_executed();
                            debug!(
                                event = "Patch",
                                phase = "Add",
                                action = actions[idx].to_string(),
                                line = line_no
                            );
                        }
                        writer.write_line(close.raw())?;
                        lines_written += 1;
                    }
                }
                LineToken::Other(raw) => {
                    if suppression.is_none() {
                        writer.write_line(&raw)?;
                        lines_written += 1;
                    }
                }
            }
        }

        // 4. Settle the pass: everything buffered goes out, unmatched
        //    actions are reported.
        writer.flush()?;

        let applied = actions.iter().filter(|a| a.executed()).count();
        for action in actions.iter().filter(|a| !a.executed()) {
            warn!(
                event = "Patch",
                phase = "Unmatched",
                action = action.to_string()
            );
        }
        info!(
            event = "Patch",
            phase = "Done",
            dialect = self.dialect.name(),
            lines_read = line_no,
            lines_written = lines_written,
            applied = applied,
            total = actions.len()
        );

        #[cfg(feature = "observability")]
        crate::metrics::record_pass(crate::metrics::PassStats {
            dialect: self.dialect.name(),
            duration: started.elapsed(),
            lines_read: line_no,
            lines_written,
            actions_total: actions.len(),
            actions_applied: applied,
        });

        Ok(applied == actions.len())
    }

    /// Evaluates every action against a freshly opened tag. Modifies are
    /// applied to the tag in place, gets capture the attributes as parsed
    /// from the source line, deletes are collected for the caller to arm.
    /// Only addressable kinds are evaluated; a wrapper's open never
    /// completes a match.
    fn evaluate_open(
        &self,
        tag: &mut TagLine,
        stack: &TagStack,
        actions: &mut [Action],
        spec: &EntitySpec,
        line_no: usize,
    ) -> Result<OpenOutcome, PatchError> {
        let mut outcome = OpenOutcome {
            rewritten: false,
            delete: Vec::new(),
        };
        // A wrapper's open leaves the addressable stack unchanged: any path
        // matching here already matched at the enclosing entity's open tag.
        if !spec.addressable {
            return Ok(outcome);
        }
        let source_attrs = tag.attrs().clone();
        for (idx, action) in actions.iter_mut().enumerate() {
            if action.executed() && !matches!(action.op(), Op::GetAll) {
                continue;
            }
            if !stack.matches(action.path()) {
                continue;
            }
            let op = action.op().clone();
            match op {
                Op::Modify(updates) => {
                    self.apply_updates(spec, tag, &updates, line_no)?;
                    outcome.rewritten = true;
                    action.mark_executed();
                    debug!(
                        event = "Patch",
                        phase = "Modify",
                        tag = tag.name(),
                        line = line_no
                    );
                }
                Op::Delete => {
                    outcome.delete.push(idx);
                }
                Op::Get | Op::GetAll => {
                    action.push_capture(source_attrs.clone());
                    action.mark_executed();
                    debug!(
                        event = "Patch",
                        phase = "Capture",
                        tag = tag.name(),
                        line = line_no
                    );
                }
                Op::Add(_) => {}
            }
        }
        Ok(outcome)
    }

    fn apply_updates(
        &self,
        spec: &EntitySpec,
        tag: &mut TagLine,
        updates: &Updates,
        line_no: usize,
    ) -> Result<(), PatchError> {
        for (name, value) in updates.entries() {
            match value {
                Some(value) => {
                    let rendered = value.to_string();
                    if !tag.attrs_mut().set(name, &rendered) {
                        if !spec.allows_attributes {
                            return Err(PatchError::UnsupportedMutation(format!(
                                "line {line_no}: <{}> does not accept new attributes, cannot add {name}",
                                tag.name()
                            )));
                        }
                        tag.attrs_mut().append(name, &rendered);
                    }
                }
                None => {
                    tag.attrs_mut().remove(name);
                }
            }
        }
        Ok(())
    }

    /// Collects the add actions anchored on this close tag: the closing
    /// kind must be a declared parent of the added entity and the stack,
    /// still including the closing frame, must satisfy the action's path.
    fn synthesize_adds(
        &self,
        close: &CloseTag,
        closing_kind: EntityKind,
        stack: &TagStack,
        actions: &[Action],
    ) -> Vec<(usize, Vec<String>)> {
        let mut adds = Vec::new();
        for (idx, action) in actions.iter().enumerate() {
            if action.executed() {
                continue;
            }
            let Op::Add(entity) = action.op() else {
                continue;
            };
            let Some(spec) = self.dialect.spec(entity.kind()) else {
                continue;
            };
            if !spec.parents.contains(&closing_kind) {
                continue;
            }
            if !stack.matches(action.path()) {
                continue;
            }
            adds.push((idx, self.render_entity(entity, spec, close.leading())));
        }
        adds
    }

    /// Renders a new entity in canonical spelling, indented like the close
    /// tag it lands next to: one self-closing line for bodyless kinds, an
    /// empty open/close pair otherwise.
    fn render_entity(&self, entity: &Entity, spec: &EntitySpec, leading: &str) -> Vec<String> {
        let tag = spec.tag_names[0];
        let attrs: String = entity
            .attrs()
            .iter()
            .map(|(k, v)| format!(" {}=\"{}\"", k.to_ascii_lowercase(), v))
            .collect();
        if spec.has_body {
            vec![
                format!("{leading}<{tag}{attrs}>"),
                format!("{leading}</{tag}>"),
            ]
        } else {
            vec![format!("{leading}<{tag}{attrs} />")]
        }
    }

    /// Every kind an action names must exist in the dialect and be usable
    /// for what the action does with it.
    fn validate_actions(&self, actions: &[Action]) -> Result<(), PatchError> {
        for action in actions.iter() {
            for clause in action.path().segments() {
                let spec = self.dialect.spec(clause.kind()).ok_or_else(|| {
                    PatchError::UnsupportedEntity(format!(
                        "{} is not part of the {} vocabulary",
                        clause.kind(),
                        self.dialect.name()
                    ))
                })?;
                if !spec.addressable {
                    return Err(PatchError::UnsupportedEntity(format!(
                        "{} is a section wrapper and cannot be addressed by a where-clause",
                        clause.kind()
                    )));
                }
            }
            if let Op::Add(entity) = action.op() {
                let spec = self.dialect.spec(entity.kind()).ok_or_else(|| {
                    PatchError::UnsupportedEntity(format!(
                        "{} is not part of the {} vocabulary",
                        entity.kind(),
                        self.dialect.name()
                    ))
                })?;
                if spec.parents.is_empty() {
                    return Err(PatchError::UnsupportedEntity(format!(
                        "{} is a top-level section and cannot be added",
                        entity.kind()
                    )));
                }
                for key in spec.key_fields {
                    if !entity
                        .attrs()
                        .iter()
                        .any(|(k, _)| k.eq_ignore_ascii_case(key))
                    {
                        return Err(PatchError::UnsupportedEntity(format!(
                            "added {} must carry a {key} attribute",
                            entity.kind()
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}
