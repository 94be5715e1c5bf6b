//! Low-level in-memory substrate for JSON-like documents.
//!
//! This crate owns the structure-of-arrays memory layout used by `jsondoc`: a set of growable
//! arenas (`nums`, `ints`, `objs`, `arrays`), an interned [`StringTable`], and the 32-bit tagged
//! [`RawValue`] handle that ties them together. Nothing in this crate knows anything about JSON
//! text; it is a reusable document substrate, the same way the `msf` crate knows nothing about
//! the record formats stored inside a PDB file.
//!
//! Most callers should use the `jsondoc` crate, which builds `Document`, `Parser`, and
//! `Serializer` on top of the pieces exposed here. This crate is the building block.

#![forbid(unused_must_use)]
#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::collapsible_if)]
#![allow(clippy::needless_range_loop)]

mod arena;
mod array;
mod compare;
mod growth;
mod memory;
mod murmur;
mod object;
mod seed;
mod string_table;
mod value;

#[cfg(test)]
mod tests;

pub use arena::Arena;
pub use array::{Array, ArrayArena, ArrayHeader};
pub use compare::{compare_bytes, compare_f64, compare_i64, Ordering3};
pub use growth::grow_capacity;
pub use memory::{ArenaMemory, MemoryStats};
pub use murmur::murmur3_32;
pub use object::{KeySlot, KeyValue, Object, ObjectArena, ObjectHeader};
pub use seed::random_seed;
pub use string_table::{StringHandle, StringTable};
pub use value::{RawValue, Tag, INLINE_INT_MAX, INLINE_INT_MIN};

static_assertions::assert_eq_size!(RawValue, u32);
