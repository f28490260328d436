// src/lib.rs
pub use dialect::{Dialect, EntitySpec};
pub use engine::PatchEngine;
pub use error::PatchError;
pub use files::{patch_file, read_document};
pub use io::{FileReader, FileWriter, LinesReader, PrintWriter};
pub use traits::{LineRead, LineWrite};
pub use types::{
    Action, AttrList, AttrValue, CloseTag, Entity, EntityKind, LineToken, Op, Path, TagLine,
    Updates, Where,
};

mod dialect;
mod engine;
mod error;
mod files;
mod io;
mod matcher;
#[cfg(feature = "observability")]
pub mod metrics;
mod traits;
mod types;

#[cfg(test)]
mod tests;
