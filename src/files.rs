//! Whole-file patching with atomic replacement.

use std::fs;
use std::io::Write;
use std::path::Path;

use itertools::Itertools;
use tempfile::NamedTempFile;
use tracing::info;

use crate::dialect::Dialect;
use crate::engine::PatchEngine;
use crate::error::PatchError;
use crate::io::{LinesReader, PrintWriter};
use crate::types::Action;

/// Reads a document into lines, without terminators.
pub fn read_document(path: impl AsRef<Path>) -> Result<Vec<String>, PatchError> {
    let text = fs::read_to_string(path)?;
    Ok(text.lines().map(str::to_string).collect())
}

/// Applies actions to the file at `path`, replacing it atomically.
///
/// The pass runs entirely in memory first. The file is replaced only when
/// every action found a match; otherwise [`PatchError::NotApplied`] names
/// the actions that never matched and the file is left exactly as it was.
/// Captures on get actions survive either way.
pub fn patch_file(
    path: impl AsRef<Path>,
    dialect: &'static Dialect,
    actions: &mut [Action],
) -> Result<(), PatchError> {
    let path = path.as_ref();
    let mut reader = LinesReader::from(read_document(path)?);
    let mut writer = PrintWriter::new();
    let engine = PatchEngine::new(dialect);
    let all = engine.apply_actions(&mut reader, &mut writer, actions)?;

    if !all {
        let unmatched = actions
            .iter()
            .filter(|a| !a.executed())
            .map(|a| a.to_string())
            .sorted()
            .join(", ");
        return Err(PatchError::NotApplied(format!("no match for: {unmatched}")));
    }

    // The temp file must land on the same filesystem for persist to be a
    // rename.
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(writer.text().as_bytes())?;
    tmp.persist(path)?;

    info!(
        event = "PatchFile",
        phase = "Committed",
        file = path.display().to_string(),
        dialect = dialect.name(),
        actions = actions.len()
    );
    Ok(())
}
