//! The public value handle and its decoded view.

use doc_engine::{Array, Object, RawValue};

/// A non-owning reference to a value stored in some [`crate::Document`].
///
/// A `Value` is a bare 32-bit tagged index, exactly mirroring the source's raw `type`+`index`
/// encoding (see `doc_engine::RawValue`): it carries no borrow of the document it came from, so
/// nothing at the type level stops a `Value` from one document being passed to another. Doing so
/// is a logic error, not memory-unsafety — [`crate::Document`]'s accessors reject indices that are
/// out of range for their target arena rather than reading past it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct Value(pub(crate) RawValue);

impl Value {
    /// The handle for JSON `null`.
    pub const NIL: Value = Value(RawValue::NIL);

    pub(crate) fn from_raw(raw: RawValue) -> Value {
        Value(raw)
    }

    pub(crate) fn raw(self) -> RawValue {
        self.0
    }

    /// True if this handle refers to `null`.
    pub fn is_nil(self) -> bool {
        self.0 == RawValue::NIL
    }
}

/// A decoded, borrowed view of a [`Value`]'s contents, produced by [`crate::Document::kind`].
///
/// Composite variants carry an [`Object`]/[`Array`] handle rather than the contents themselves;
/// callers use the corresponding `Document` methods to walk them.
#[derive(Debug, Copy, Clone)]
#[non_exhaustive]
pub enum ValueKind<'a> {
    /// `null`.
    Nil,
    /// A JSON boolean.
    Bool(bool),
    /// An integer, whether stored inline (`ShortInt`) or in the `ints` arena (`Int`).
    Int(i64),
    /// A floating-point number.
    Num(f64),
    /// A string's raw UTF-8 bytes.
    Str(&'a [u8]),
    /// A JSON array.
    Array(Array),
    /// A JSON object.
    Object(Object),
}

static_assertions::assert_eq_size!(Value, u32);
