//! Cross-module integration tests, in the style of `msf/src/tests.rs`: scenarios that exercise
//! several pieces of the engine together rather than one function in isolation.

use super::*;

#[test]
fn ten_thousand_distinct_keys_stay_unique_and_prime_bucketed() {
    let mut table = StringTable::new();
    for i in 0..10_000u32 {
        let key = format!("{i:016}");
        table.intern(key.as_bytes());
    }
    assert_eq!(table.len(), 10_000);
    assert!(table.load_factor() <= 0.8);

    for i in 0..10_000u32 {
        let key = format!("{i:016}");
        assert_eq!(table.lookup(key.as_bytes()), Some(i));
    }
}

#[test]
fn object_values_round_trip_through_short_ints() {
    let mut table = StringTable::new();
    let mut obj = ObjectHeader::new();
    let idx = obj.add_key(&mut table, b"answer");
    obj.set_value(idx, RawValue::try_short_int(42).unwrap());

    let found = obj.find(&table, b"answer").unwrap();
    assert_eq!(obj.entries()[found].value().as_short_int(), Some(42));
}

#[test]
fn nested_arrays_share_one_arena() {
    let mut arrays: ArrayArena = Arena::new();

    let mut inner = ArrayHeader::new();
    inner.push(RawValue::try_short_int(1).unwrap());
    inner.push(RawValue::try_short_int(2).unwrap());
    let inner_index = arrays.push(inner);

    let mut outer = ArrayHeader::new();
    outer.push(RawValue::indexed(Tag::Array, inner_index));
    let outer_index = arrays.push(outer);

    let outer_header = arrays.get(outer_index).unwrap();
    let inner_handle = outer_header.get(0).unwrap();
    assert_eq!(inner_handle.tag(), Tag::Array);
    let inner_header = arrays.get(inner_handle.index()).unwrap();
    assert_eq!(inner_header.len(), 2);
}

#[test]
fn memory_stats_total_reflects_every_arena() {
    let mut nums: Arena<f64> = Arena::new();
    let mut ints: Arena<i64> = Arena::new();
    let mut objs: ObjectArena = Arena::new();
    let mut arrays: ArrayArena = Arena::new();
    let mut strings = StringTable::new();

    nums.push(1.5);
    ints.push(7);
    strings.intern(b"hello");
    objs.push(ObjectHeader::new());
    arrays.push(ArrayHeader::new());

    let stats = MemoryStats {
        nums: nums.memory(),
        ints: ints.memory(),
        objs: objs.memory(),
        arrays: arrays.memory(),
        strings: strings.memory(),
    };

    let total = stats.total();
    assert!(total.used > 0);
    assert!(total.reserved >= total.used);
}
