//! `before` hooks acting as middleware over CRUD commands.

use chrono::{DateTime, Utc};
use crud_store::HandlerError;
use regex::Regex;
use serde_json::{json, Value};

use crate::support::{cmd, user_service};

/// Stamp `createdAt` on new records and `updatedAt` on replaced ones.
fn timestamps(_command: &str, mut params: Value) -> Result<Value, HandlerError> {
    let now = json!(Utc::now().to_rfc3339());
    let record = params
        .as_object_mut()
        .ok_or_else(|| HandlerError::Validation("expected a record".into()))?;

    if record.contains_key("id") {
        record.insert("updatedAt".into(), now);
    } else {
        record.insert("createdAt".into(), now);
    }
    Ok(params)
}

fn parse_timestamp(value: &Value) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value.as_str().unwrap())
        .unwrap()
        .with_timezone(&Utc)
}

#[test]
fn adds_timestamps() {
    let service = user_service().before(
        Regex::new(r"^entity\.User\.(create|replaceOne)$").unwrap(),
        timestamps,
    );

    let user = service
        .dispatch(&cmd("create"), json!({ "firstName": "John", "lastName": "Doe" }))
        .unwrap();
    let created_at = parse_timestamp(&user["createdAt"]);
    assert!(user.get("updatedAt").is_none());

    let mut replacement = user.clone();
    replacement["lastName"] = json!("Donovan");
    let replaced = service.dispatch(&cmd("replaceOne"), replacement).unwrap();

    let updated_at = parse_timestamp(&replaced["updatedAt"]);
    assert!(updated_at >= created_at);
    assert_eq!(replaced["lastName"], "Donovan");
}

#[test]
fn hooks_skip_unmatched_commands() {
    let service = user_service().before(
        Regex::new(r"^entity\.User\.create$").unwrap(),
        timestamps,
    );

    service.dispatch(&cmd("create"), json!({ "firstName": "John" })).unwrap();
    let updated = service
        .dispatch(
            &cmd("updateOne"),
            json!({ "query": { "firstName": "John" }, "update": { "age": 30 } }),
        )
        .unwrap();
    assert!(updated.get("createdAt").is_some());
    assert!(updated.get("updatedAt").is_none());
}

#[test]
fn failing_hook_leaves_store_untouched() {
    let service = user_service().before(
        Regex::new(r"\.create$").unwrap(),
        timestamps,
    );

    let err = service.dispatch(&cmd("create"), json!("not a record")).unwrap_err();
    assert!(matches!(err, HandlerError::Validation(_)));
    assert!(service.repo().is_empty().unwrap());
}
