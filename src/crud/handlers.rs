//! Handler bodies for each CRUD operation.
//!
//! Each takes the bound store and the request, decodes params, and turns
//! the store result into JSON.

use serde::Deserialize;
use serde_json::Value;

use super::Request;
use crate::record::{id_from_value, id_of, Record, ID_FIELD};
use crate::service::HandlerError;
use crate::store::SharedStore;

/// Params of `updateOne` / `updateMany`.
#[derive(Debug, Default, Deserialize)]
struct UpdateParams {
    #[serde(default)]
    query: Option<Record>,
    #[serde(default)]
    update: Option<Record>,
}

pub(super) fn create(store: &SharedStore, request: Request) -> Result<Value, HandlerError> {
    match request.params {
        Value::Array(items) => {
            // decode the whole batch first so a bad element inserts nothing
            let records = items
                .into_iter()
                .map(into_record)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(list(store.insert_many(records)?))
        }
        params => Ok(Value::Object(store.insert(into_record(params)?)?)),
    }
}

pub(super) fn find_by_id(store: &SharedStore, request: Request) -> Result<Value, HandlerError> {
    let id = id_from_value(&request.params).ok_or_else(|| {
        HandlerError::DecodeFailed(format!(
            "expected a non-negative integer id, got {}",
            kind(&request.params)
        ))
    })?;
    Ok(optional(store.get(id)?))
}

pub(super) fn find_one(store: &SharedStore, request: Request) -> Result<Value, HandlerError> {
    let pattern = into_pattern(request.params)?;
    Ok(optional(store.find_one(&pattern)?))
}

pub(super) fn find_many(store: &SharedStore, request: Request) -> Result<Value, HandlerError> {
    let pattern = into_pattern(request.params)?;
    Ok(list(store.find_many(&pattern)?))
}

pub(super) fn replace_one(store: &SharedStore, request: Request) -> Result<Value, HandlerError> {
    let data = into_record(request.params)?;

    if !data.get(ID_FIELD).is_some_and(is_truthy) {
        tracing::warn!("replaceOne without id");
        return Err(HandlerError::Validation("The id is required!".to_string()));
    }
    let id = id_of(&data).ok_or_else(|| {
        HandlerError::DecodeFailed("id must be a positive integer".to_string())
    })?;

    Ok(Value::Object(store.replace(id, &data)?))
}

pub(super) fn update_one(store: &SharedStore, request: Request) -> Result<Value, HandlerError> {
    let params = into_update(request.params)?;
    let updated = store.update_one(
        &params.query.unwrap_or_default(),
        &params.update.unwrap_or_default(),
    )?;
    Ok(optional(updated))
}

pub(super) fn update_many(store: &SharedStore, request: Request) -> Result<Value, HandlerError> {
    let params = into_update(request.params)?;
    let updated = store.update_many(
        &params.query.unwrap_or_default(),
        &params.update.unwrap_or_default(),
    )?;
    Ok(list(updated))
}

pub(super) fn remove_one(store: &SharedStore, request: Request) -> Result<Value, HandlerError> {
    let pattern = into_pattern(request.params)?;
    Ok(optional(store.remove_one(&pattern)?))
}

/// Falsy params clear the whole store and report `true`.
pub(super) fn remove_many(store: &SharedStore, request: Request) -> Result<Value, HandlerError> {
    if !is_truthy(&request.params) {
        store.clear()?;
        return Ok(Value::Bool(true));
    }

    let pattern = into_pattern(request.params)?;
    Ok(list(store.remove_many(&pattern)?))
}

fn into_record(value: Value) -> Result<Record, HandlerError> {
    match value {
        Value::Object(record) => Ok(record),
        other => Err(HandlerError::DecodeFailed(format!(
            "expected a record object, got {}",
            kind(&other)
        ))),
    }
}

/// A missing match means "match everything".
fn into_pattern(value: Value) -> Result<Record, HandlerError> {
    match value {
        Value::Null => Ok(Record::new()),
        other => into_record(other),
    }
}

fn into_update(value: Value) -> Result<UpdateParams, HandlerError> {
    match value {
        Value::Null => Ok(UpdateParams::default()),
        other => Ok(serde_json::from_value(other)?),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn optional(record: Option<Record>) -> Value {
    record.map_or(Value::Null, Value::Object)
}

fn list(records: Vec<Record>) -> Value {
    Value::Array(records.into_iter().map(Value::Object).collect())
}
