//! Data model types for documents and patch actions.
//!
//! A document line parses into a [`LineToken`]; open tags carry an ordered
//! [`AttrList`]. Actions address entities through a [`Path`] of
//! [`Where`]-clauses and either edit the document ([`Op::Add`],
//! [`Op::Delete`], [`Op::Modify`]) or query it ([`Op::Get`], [`Op::GetAll`]).
//!
//! Case rules: tag and attribute names are matched ASCII
//! case-insensitively, attribute values byte for byte.

mod action;
mod attr_value;
mod attrs;
mod entity;
mod path;
mod tag;

pub use action::{Action, Op, Updates};
pub use attr_value::AttrValue;
pub use attrs::AttrList;
pub use entity::{Entity, EntityKind};
pub use path::{Path, Where};
pub use tag::{CloseTag, LineToken, TagLine};
