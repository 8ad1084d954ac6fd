//! Partial-match predicate used by every store query.
//!
//! A pattern matches a record when every field named in the pattern is
//! present in the record with a matching value. Fields the pattern does not
//! mention are ignored. Containers match partially, recursively:
//!
//! - an object pattern matches when each of its fields matches;
//! - an array pattern matches when each of its elements matches some
//!   element of the actual array (order is not significant).
//!
//! Numbers compare by numeric value, so `22` and `22.0` are equal. Every
//! other scalar compares by type and value.

use serde_json::{Map, Number, Value};

use crate::record::Record;

/// Check whether `record` satisfies every field of `pattern`.
pub fn is_match(record: &Record, pattern: &Record) -> bool {
    object_matches(record, pattern)
}

/// Check whether a single value satisfies a pattern value.
pub fn value_matches(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Object(actual), Value::Object(expected)) => object_matches(actual, expected),
        (Value::Array(actual), Value::Array(expected)) => array_matches(actual, expected),
        (Value::Number(actual), Value::Number(expected)) => numbers_equal(actual, expected),
        _ => actual == expected,
    }
}

fn object_matches(actual: &Map<String, Value>, pattern: &Map<String, Value>) -> bool {
    pattern.iter().all(|(field, expected)| match actual.get(field) {
        Some(value) => value_matches(value, expected),
        None => false,
    })
}

fn array_matches(actual: &[Value], pattern: &[Value]) -> bool {
    pattern.len() <= actual.len()
        && pattern
            .iter()
            .all(|expected| actual.iter().any(|value| value_matches(value, expected)))
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
        return a == b;
    }
    if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
        return a == b;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
