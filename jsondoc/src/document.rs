//! The document: owns every arena, the string table, and the root value.

use crate::error::{ParseError, ParseErrorKind, SerializeError};
use crate::flags::PrintFlags;
use crate::parser;
use crate::parser::source::FnSource;
use crate::serializer;
use crate::value::{Value, ValueKind};
use doc_engine::{
    Array, ArrayArena, ArrayHeader, MemoryStats, Object, ObjectArena, ObjectHeader, Ordering3,
    RawValue, StringTable, Tag,
};
use std::cmp::Ordering;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

/// An in-memory JSON document: a structure-of-arrays store of numbers, strings, objects, and
/// arrays, plus a single root [`Value`].
///
/// Created empty (root is `null`); grows only by appending, never by removing individual entries.
/// All handles returned by a `Document`'s methods (`Value`, [`Object`], [`Array`]) are bare
/// `Copy` indices that stay valid for the life of the document, per the data model's lifecycle
/// rules.
#[derive(Debug)]
pub struct Document {
    pub(crate) nums: doc_engine::Arena<f64>,
    pub(crate) ints: doc_engine::Arena<i64>,
    pub(crate) objs: ObjectArena,
    pub(crate) arrays: ArrayArena,
    pub(crate) strings: StringTable,
    pub(crate) root: RawValue,
}

impl Default for Document {
    fn default() -> Document {
        Document::new()
    }
}

impl Document {
    /// Creates an empty document with no backing allocations.
    pub fn new() -> Document {
        Document {
            nums: doc_engine::Arena::new(),
            ints: doc_engine::Arena::new(),
            objs: ObjectArena::new(),
            arrays: ArrayArena::new(),
            strings: StringTable::new(),
            root: RawValue::NIL,
        }
    }

    /// Resets the document to empty, releasing every arena's backing allocation.
    pub fn clear(&mut self) {
        *self = Document::new();
    }

    /// Parses `bytes` as a complete JSON document.
    pub fn parse(bytes: &[u8]) -> Result<Document, ParseError> {
        parser::parse_document(bytes, "<buffer>".to_string())
    }

    /// Parses a complete JSON document from `reader`.
    pub fn parse_reader<R: Read>(reader: R) -> Result<Document, ParseError> {
        parser::parse_document(reader, "<reader>".to_string())
    }

    /// Parses a complete JSON document from the file at `path`.
    pub fn parse_path<P: AsRef<Path>>(path: P) -> Result<Document, ParseError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ParseError {
            source: path.display().to_string(),
            message: format!("failed to open file: {e}"),
            kind: ParseErrorKind::Io,
            line: 0,
            column: 0,
            prev_line: 0,
            prev_column: 0,
            offset: 0,
        })?;
        parser::parse_document(file, path.display().to_string())
    }

    /// Parses a complete JSON document read from a user-supplied callback, matching
    /// `std::io::Read::read`'s contract: return the number of bytes written into `buf`, `Ok(0)`
    /// for end of input.
    pub fn parse_with<F>(source: F) -> Result<Document, ParseError>
    where
        F: FnMut(&mut [u8]) -> io::Result<usize>,
    {
        parser::parse_document(FnSource(source), "<callback>".to_string())
    }

    /// Serializes the document to `writer`, returning the number of bytes written.
    pub fn write<W: Write>(&self, flags: PrintFlags, writer: W) -> Result<u64, SerializeError> {
        serializer::write(self, flags, writer)
    }

    /// Serializes the document to the file at `path`, creating or truncating it.
    pub fn write_path<P: AsRef<Path>>(&self, flags: PrintFlags, path: P) -> Result<u64, SerializeError> {
        let file = File::create(path)?;
        self.write(flags, file)
    }

    /// Serializes the document to a `String`. Infallible: the sink is an in-memory buffer that
    /// cannot short-write.
    pub fn to_string(&self, flags: PrintFlags) -> String {
        let mut buf = Vec::new();
        self.write(flags, &mut buf).expect("writing to a Vec<u8> cannot fail");
        debug_assert!(std::str::from_utf8(&buf).is_ok(), "serializer must emit valid UTF-8");
        String::from_utf8(buf).expect("serializer must emit valid UTF-8")
    }

    /// The document's root value.
    pub fn root(&self) -> Value {
        Value::from_raw(self.root)
    }

    /// Returns the root as an object, initializing it as an empty object if the root is currently
    /// `null`. Panics if the root is already a non-object value.
    pub fn root_obj(&mut self) -> Object {
        if self.root == RawValue::NIL {
            let index = self.objs.push(ObjectHeader::new());
            self.root = RawValue::indexed(Tag::Object, index);
            Object { index }
        } else {
            assert_eq!(self.root.tag(), Tag::Object, "document root is not an object");
            Object { index: self.root.index() }
        }
    }

    /// Returns the root as an array, initializing it as an empty array if the root is currently
    /// `null`. Panics if the root is already a non-array value.
    pub fn root_array(&mut self) -> Array {
        if self.root == RawValue::NIL {
            let index = self.arrays.push(ArrayHeader::new());
            self.root = RawValue::indexed(Tag::Array, index);
            Array { index }
        } else {
            assert_eq!(self.root.tag(), Tag::Array, "document root is not an array");
            Array { index: self.root.index() }
        }
    }

    /// Deep structural comparison against another document's contents, per §4.7: type tags first,
    /// then type-specific comparison, arrays by length then element-wise, objects by length then
    /// entry-wise value (keys are not compared).
    pub fn compare(&self, other: &Document) -> Ordering {
        compare_value(self, self.root, other, other.root).into()
    }

    /// Decodes `value`'s string contents, if it is a `Str`.
    pub fn get_str(&self, value: Value) -> Option<&[u8]> {
        let raw = value.raw();
        if raw.tag() == Tag::Str {
            self.strings.get(raw.index())
        } else {
            None
        }
    }

    /// Decodes `value` as an `f64`, if it is a `Num` (integers are not implicitly widened; use
    /// [`Document::get_int`] for those).
    pub fn get_num(&self, value: Value) -> Option<f64> {
        let raw = value.raw();
        if raw.tag() == Tag::Num {
            self.nums.get(raw.index()).copied()
        } else {
            None
        }
    }

    /// Decodes `value` as an `i64`, accepting both `ShortInt` and `Int`.
    pub fn get_int(&self, value: Value) -> Option<i64> {
        let raw = value.raw();
        match raw.tag() {
            Tag::ShortInt => raw.as_short_int(),
            Tag::Int => self.ints.get(raw.index()).copied(),
            _ => None,
        }
    }

    /// Decodes `value` as a `bool`, if it is a `Bool`.
    pub fn get_bool(&self, value: Value) -> Option<bool> {
        value.raw().as_bool()
    }

    /// Decodes `value` as an [`Object`] handle, if it is an `Object`.
    pub fn get_obj(&self, value: Value) -> Option<Object> {
        let raw = value.raw();
        (raw.tag() == Tag::Object).then_some(Object { index: raw.index() })
    }

    /// Decodes `value` as an [`Array`] handle, if it is an `Array`.
    pub fn get_array(&self, value: Value) -> Option<Array> {
        let raw = value.raw();
        (raw.tag() == Tag::Array).then_some(Array { index: raw.index() })
    }

    /// Decodes `value` into a fully-matchable [`ValueKind`].
    pub fn kind(&self, value: Value) -> ValueKind<'_> {
        let raw = value.raw();
        match raw.tag() {
            Tag::Nil => ValueKind::Nil,
            Tag::Bool => ValueKind::Bool(raw.as_bool().unwrap()),
            Tag::ShortInt => ValueKind::Int(raw.as_short_int().unwrap()),
            Tag::Int => ValueKind::Int(*self.ints.get(raw.index()).expect("dangling Int index")),
            Tag::Num => ValueKind::Num(*self.nums.get(raw.index()).expect("dangling Num index")),
            Tag::Str => ValueKind::Str(self.strings.get(raw.index()).expect("dangling Str index")),
            Tag::Array => ValueKind::Array(Array { index: raw.index() }),
            Tag::Object => ValueKind::Object(Object { index: raw.index() }),
        }
    }

    /// A breakdown of bytes used and reserved across every arena and the string table.
    pub fn memory_stats(&self) -> MemoryStats {
        let spilled = |used: usize, reserved: usize| doc_engine::ArenaMemory { used, reserved };

        let mut objs = self.objs.memory();
        for header in self.objs.iter() {
            objs = objs + spilled(header.heap_bytes_used(), header.heap_bytes());
        }

        let mut arrays = self.arrays.memory();
        for header in self.arrays.iter() {
            arrays = arrays + spilled(header.heap_bytes_used(), header.heap_bytes());
        }

        MemoryStats {
            nums: self.nums.memory(),
            ints: self.ints.memory(),
            objs,
            arrays,
            strings: self.strings.memory(),
        }
    }

    // --- value construction, used by both the parser and programmatic construction ---

    pub(crate) fn make_int(&mut self, n: i64) -> RawValue {
        match RawValue::try_short_int(n) {
            Some(v) => v,
            None => RawValue::indexed(Tag::Int, self.ints.push(n)),
        }
    }

    pub(crate) fn make_num(&mut self, n: f64) -> RawValue {
        RawValue::indexed(Tag::Num, self.nums.push(n))
    }

    pub(crate) fn make_str(&mut self, bytes: &[u8]) -> RawValue {
        RawValue::indexed(Tag::Str, self.strings.intern(bytes))
    }

    pub(crate) fn new_object_raw(&mut self) -> (Object, RawValue) {
        let index = self.objs.push(ObjectHeader::new());
        (Object { index }, RawValue::indexed(Tag::Object, index))
    }

    pub(crate) fn new_array_raw(&mut self) -> (Array, RawValue) {
        let index = self.arrays.push(ArrayHeader::new());
        (Array { index }, RawValue::indexed(Tag::Array, index))
    }

    fn object_header(&self, obj: Object) -> &ObjectHeader {
        self.objs.get(obj.index).expect("Object handle from a different document")
    }

    fn object_header_mut(&mut self, obj: Object) -> &mut ObjectHeader {
        self.objs.get_mut(obj.index).expect("Object handle from a different document")
    }

    fn array_header(&self, arr: Array) -> &ArrayHeader {
        self.arrays.get(arr.index).expect("Array handle from a different document")
    }

    fn array_header_mut(&mut self, arr: Array) -> &mut ArrayHeader {
        self.arrays.get_mut(arr.index).expect("Array handle from a different document")
    }

    // --- object operations (§4.4) ---

    /// Number of entries in `obj`.
    pub fn object_len(&self, obj: Object) -> usize {
        self.object_header(obj).len()
    }

    /// True if `obj` has no entries.
    pub fn object_is_empty(&self, obj: Object) -> bool {
        self.object_header(obj).is_empty()
    }

    /// Pre-sizes `obj`'s backing store for at least `additional` more entries.
    pub fn object_reserve(&mut self, obj: Object, additional: usize) {
        self.object_header_mut(obj).reserve(additional);
    }

    /// Finds the index of the first entry in `obj` with key `key`.
    pub fn object_find(&self, obj: Object, key: &[u8]) -> Option<usize> {
        self.object_header(obj).find(&self.strings, key)
    }

    /// Finds the index of the next entry in `obj` with key `key`, scanning from `start`. Used to
    /// walk duplicate keys past the first match.
    pub fn object_find_from(&self, obj: Object, key: &[u8], start: usize) -> Option<usize> {
        self.object_header(obj).find_from(&self.strings, key, start)
    }

    /// The value of the first entry in `obj` with key `key`.
    pub fn object_get(&self, obj: Object, key: &[u8]) -> Option<Value> {
        let index = self.object_find(obj, key)?;
        self.object_get_index(obj, index)
    }

    /// The key bytes of the entry at position `index` in `obj`.
    pub fn object_get_key(&self, obj: Object, index: usize) -> Option<&[u8]> {
        self.object_header(obj).entries().get(index).map(|kv| kv.key_bytes(&self.strings))
    }

    /// The value of the entry at position `index` in `obj`.
    pub fn object_get_index(&self, obj: Object, index: usize) -> Option<Value> {
        self.object_header(obj).entries().get(index).map(|kv| Value::from_raw(kv.value()))
    }

    /// Iterates over `obj`'s `(key_bytes, value)` pairs in insertion order.
    pub fn object_iter(&self, obj: Object) -> impl Iterator<Item = (&[u8], Value)> {
        self.object_header(obj).iter(&self.strings).map(|(k, v)| (k, Value::from_raw(v)))
    }

    fn object_insert_raw(&mut self, obj: Object, key: &[u8], value: RawValue) -> usize {
        // Split borrows across `self.objs` and `self.strings` directly rather than going through
        // `object_header_mut`, whose `&mut self` receiver would erase the field-level disjointness
        // the borrow checker needs to hold both mutable references at once.
        let header = self.objs.get_mut(obj.index).expect("Object handle from a different document");
        let index = header.add_key(&mut self.strings, key);
        self.objs
            .get_mut(obj.index)
            .expect("Object handle from a different document")
            .set_value(index, value);
        index
    }

    /// Appends a new entry with key `key` and value `value`.
    pub fn object_insert(&mut self, obj: Object, key: &[u8], value: Value) -> usize {
        self.object_insert_raw(obj, key, value.raw())
    }

    /// Appends a new entry holding a boolean.
    pub fn object_insert_bool(&mut self, obj: Object, key: &[u8], b: bool) -> usize {
        self.object_insert_raw(obj, key, RawValue::bool(b))
    }

    /// Appends a new entry holding an integer (`ShortInt` when it fits, `Int` otherwise).
    pub fn object_insert_int(&mut self, obj: Object, key: &[u8], n: i64) -> usize {
        let raw = self.make_int(n);
        self.object_insert_raw(obj, key, raw)
    }

    /// Appends a new entry holding a float.
    pub fn object_insert_num(&mut self, obj: Object, key: &[u8], n: f64) -> usize {
        let raw = self.make_num(n);
        self.object_insert_raw(obj, key, raw)
    }

    /// Appends a new entry holding a string, interning `s` into the document's string table.
    pub fn object_insert_str(&mut self, obj: Object, key: &[u8], s: &[u8]) -> usize {
        let raw = self.make_str(s);
        self.object_insert_raw(obj, key, raw)
    }

    /// Appends a new entry holding `null`.
    pub fn object_insert_null(&mut self, obj: Object, key: &[u8]) -> usize {
        self.object_insert_raw(obj, key, RawValue::NIL)
    }

    /// Appends a new entry holding a freshly created empty array, returning its handle.
    pub fn object_insert_array(&mut self, obj: Object, key: &[u8]) -> Array {
        let (arr, raw) = self.new_array_raw();
        self.object_insert_raw(obj, key, raw);
        arr
    }

    /// Appends a new entry holding a freshly created empty object, returning its handle.
    pub fn object_insert_object(&mut self, obj: Object, key: &[u8]) -> Object {
        let (child, raw) = self.new_object_raw();
        self.object_insert_raw(obj, key, raw);
        child
    }

    // --- array operations (§4.4) ---

    /// Number of elements in `arr`.
    pub fn array_len(&self, arr: Array) -> usize {
        self.array_header(arr).len()
    }

    /// True if `arr` has no elements.
    pub fn array_is_empty(&self, arr: Array) -> bool {
        self.array_header(arr).is_empty()
    }

    /// Pre-sizes `arr`'s backing store for at least `additional` more elements.
    pub fn array_reserve(&mut self, arr: Array, additional: usize) {
        self.array_header_mut(arr).reserve(additional);
    }

    /// The element at `index` in `arr`.
    pub fn array_get(&self, arr: Array, index: usize) -> Option<Value> {
        self.array_header(arr).get(index).map(Value::from_raw)
    }

    /// Iterates over `arr`'s elements in insertion order.
    pub fn array_iter(&self, arr: Array) -> impl Iterator<Item = Value> + '_ {
        self.array_header(arr).entries().iter().copied().map(Value::from_raw)
    }

    /// Appends `value` to `arr`.
    pub fn array_push(&mut self, arr: Array, value: Value) {
        self.array_header_mut(arr).push(value.raw());
    }

    /// Appends a boolean to `arr`.
    pub fn array_push_bool(&mut self, arr: Array, b: bool) {
        self.array_header_mut(arr).push(RawValue::bool(b));
    }

    /// Appends an integer to `arr` (`ShortInt` when it fits, `Int` otherwise).
    pub fn array_push_int(&mut self, arr: Array, n: i64) {
        let raw = self.make_int(n);
        self.array_header_mut(arr).push(raw);
    }

    /// Appends a float to `arr`.
    pub fn array_push_num(&mut self, arr: Array, n: f64) {
        let raw = self.make_num(n);
        self.array_header_mut(arr).push(raw);
    }

    /// Appends a string to `arr`, interning `s` into the document's string table.
    pub fn array_push_str(&mut self, arr: Array, s: &[u8]) {
        let raw = self.make_str(s);
        self.array_header_mut(arr).push(raw);
    }

    /// Appends `null` to `arr`.
    pub fn array_push_null(&mut self, arr: Array) {
        self.array_header_mut(arr).push(RawValue::NIL);
    }

    /// Appends a freshly created empty array to `arr`, returning its handle.
    pub fn array_push_array(&mut self, arr: Array) -> Array {
        let (child, raw) = self.new_array_raw();
        self.array_header_mut(arr).push(raw);
        child
    }

    /// Appends a freshly created empty object to `arr`, returning its handle.
    pub fn array_push_object(&mut self, arr: Array) -> Object {
        let (child, raw) = self.new_object_raw();
        self.array_header_mut(arr).push(raw);
        child
    }
}

/// Deep structural 3-way compare of two values, possibly from different documents.
fn compare_value(a_doc: &Document, a: RawValue, b_doc: &Document, b: RawValue) -> Ordering3 {
    if a.tag() != b.tag() {
        return doc_engine::compare_i64(a.tag() as i64, b.tag() as i64);
    }

    match a.tag() {
        Tag::Nil => Ordering3::Equal,
        Tag::Bool => doc_engine::compare_i64(a.as_bool().unwrap() as i64, b.as_bool().unwrap() as i64),
        Tag::ShortInt | Tag::Int => {
            let av = Value::from_raw(a);
            let bv = Value::from_raw(b);
            doc_engine::compare_i64(a_doc.get_int(av).unwrap(), b_doc.get_int(bv).unwrap())
        }
        Tag::Num => doc_engine::compare_f64(
            *a_doc.nums.get(a.index()).unwrap(),
            *b_doc.nums.get(b.index()).unwrap(),
        ),
        Tag::Str => doc_engine::compare_bytes(
            a_doc.strings.get(a.index()).unwrap(),
            b_doc.strings.get(b.index()).unwrap(),
        ),
        Tag::Array => {
            let a_hdr = a_doc.arrays.get(a.index()).unwrap();
            let b_hdr = b_doc.arrays.get(b.index()).unwrap();
            let len_cmp = doc_engine::compare_i64(a_hdr.len() as i64, b_hdr.len() as i64);
            if len_cmp != Ordering3::Equal {
                return len_cmp;
            }
            for (av, bv) in a_hdr.entries().iter().zip(b_hdr.entries().iter()) {
                let c = compare_value(a_doc, *av, b_doc, *bv);
                if c != Ordering3::Equal {
                    return c;
                }
            }
            Ordering3::Equal
        }
        Tag::Object => {
            let a_hdr = a_doc.objs.get(a.index()).unwrap();
            let b_hdr = b_doc.objs.get(b.index()).unwrap();
            let len_cmp = doc_engine::compare_i64(a_hdr.len() as i64, b_hdr.len() as i64);
            if len_cmp != Ordering3::Equal {
                return len_cmp;
            }
            for (a_kv, b_kv) in a_hdr.entries().iter().zip(b_hdr.entries().iter()) {
                let c = compare_value(a_doc, a_kv.value(), b_doc, b_kv.value());
                if c != Ordering3::Equal {
                    return c;
                }
            }
            Ordering3::Equal
        }
    }
}
