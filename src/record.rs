//! Record - the schema-free unit of data held by a [`Store`](crate::Store).
//!
//! A record is an open JSON object. Stored values never carry an `id`
//! field; the id lives in the engine key and is injected into every copy
//! handed back to a caller.

use serde_json::{Map, Value};

/// An open-ended mapping from field name to value.
pub type Record = Map<String, Value>;

/// Identifier assigned by a store on insert. Always >= 1.
pub type RecordId = u64;

/// Name of the field that carries the record id on read.
pub const ID_FIELD: &str = "id";

/// Return a copy of `record` with the `id` field removed.
pub fn without_id(record: &Record) -> Record {
    let mut stored = record.clone();
    stored.remove(ID_FIELD);
    stored
}

/// Return a copy of `record` with `id` injected.
pub fn with_id(id: RecordId, record: &Record) -> Record {
    let mut out = record.clone();
    out.insert(ID_FIELD.to_string(), Value::from(id));
    out
}

/// Read the id of a record, if it carries a positive integer one.
pub fn id_of(record: &Record) -> Option<RecordId> {
    record
        .get(ID_FIELD)
        .and_then(id_from_value)
        .filter(|id| *id > 0)
}

/// Interpret a JSON value as a record id.
///
/// Accepts non-negative integers and whole-number floats (`3.0`), since a
/// JSON number carries no integer/float distinction for the caller.
pub fn id_from_value(value: &Value) -> Option<RecordId> {
    if let Some(id) = value.as_u64() {
        return Some(id);
    }
    let float = value.as_f64()?;
    if float.fract() == 0.0 && float >= 0.0 && float < RecordId::MAX as f64 {
        Some(float as RecordId)
    } else {
        None
    }
}
