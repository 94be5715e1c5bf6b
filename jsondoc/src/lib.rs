//! An in-memory JSON document library: parse JSON text into a structure-of-arrays [`Document`],
//! mutate it programmatically, and serialize it back out.
//!
//! Layered on top of `doc_engine`, which owns the arena/string-table substrate and knows nothing
//! about JSON syntax; this crate owns the parser, the serializer, and the `Document` API that
//! ties a JSON document's syntax to that substrate.

#![forbid(unused_must_use)]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod document;
mod error;
mod flags;
mod parser;
mod serializer;
mod value;

pub use document::Document;
pub use doc_engine::{Array, MemoryStats, Object};
pub use error::{ParseError, ParseErrorKind, SerializeError};
pub use flags::PrintFlags;
pub use parser::source::{ByteSource, FnSource};
pub use value::{Value, ValueKind};
