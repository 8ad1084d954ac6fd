//! Dispatch-level CRUD flows.

use crud_store::HandlerError;
use serde_json::{json, Value};

use crate::support::{cmd, user_service, users};

#[test]
fn create_a_record() {
    let service = user_service();
    let result = service
        .dispatch(&cmd("create"), json!({ "firstName": "Victor" }))
        .unwrap();
    assert_eq!(result, json!({ "firstName": "Victor", "id": 1 }));
}

#[test]
fn create_multiple_records() {
    let service = user_service();
    let result = service
        .dispatch(
            &cmd("create"),
            json!([{ "firstName": "John1" }, { "firstName": "John2" }, { "firstName": "John3" }]),
        )
        .unwrap();
    let created = result.as_array().unwrap();
    assert_eq!(created.len(), 3);
    let ids: Vec<Value> = created.iter().map(|u| u["id"].clone()).collect();
    assert_eq!(ids, vec![json!(1), json!(2), json!(3)]);
}

#[test]
fn find_a_record_by_id() {
    let service = user_service();
    let created = service
        .dispatch(&cmd("create"), json!({ "firstName": "Victor" }))
        .unwrap();
    let user = service.dispatch(&cmd("findById"), created["id"].clone()).unwrap();
    assert_eq!(user["firstName"], "Victor");

    let missing = service.dispatch(&cmd("findById"), json!(404)).unwrap();
    assert_eq!(missing, Value::Null);
}

#[test]
fn find_many_by_filters() {
    let service = user_service();
    service.dispatch(&cmd("create"), users()).unwrap();

    let found = service
        .dispatch(&cmd("findMany"), json!({ "lastName": "Doe", "role": "admin" }))
        .unwrap();
    let found = found.as_array().unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(found[0]["age"], 22);
    assert_eq!(found[1]["firstName"], "John3");
}

#[test]
fn find_one_by_filters() {
    let service = user_service();
    service
        .dispatch(
            &cmd("create"),
            json!([
                { "firstName": "John1", "age": 21 },
                { "firstName": "John2", "age": 22 },
                { "firstName": "John3", "age": 23 }
            ]),
        )
        .unwrap();

    let user = service.dispatch(&cmd("findOne"), json!({ "age": 22 })).unwrap();
    assert_eq!(user["firstName"], "John2");

    let none = service.dispatch(&cmd("findOne"), json!({ "age": 99 })).unwrap();
    assert_eq!(none, Value::Null);
}

#[test]
fn replace_a_record() {
    let service = user_service();
    let mut created = service
        .dispatch(&cmd("create"), json!({ "firstName": "Victor", "lastName": "Hugo" }))
        .unwrap();
    created["firstName"] = json!("John");
    created.as_object_mut().unwrap().remove("lastName");

    let user = service.dispatch(&cmd("replaceOne"), created).unwrap();
    assert_eq!(user, json!({ "id": 1, "firstName": "John" }));
}

#[test]
fn replace_without_id_is_rejected() {
    let service = user_service();
    let err = service
        .dispatch(&cmd("replaceOne"), json!({ "firstName": "John" }))
        .unwrap_err();
    assert!(matches!(err, HandlerError::Validation(_)));
    assert_eq!(err.to_string(), "The id is required!");
}

#[test]
fn replace_unknown_id_is_not_found() {
    let service = user_service();
    let err = service
        .dispatch(&cmd("replaceOne"), json!({ "id": 7, "firstName": "John" }))
        .unwrap_err();
    assert_eq!(err.to_string(), "Couldn't find item with id 7.");
    assert_eq!(err.status_code(), 404);
}

#[test]
fn update_one_record() {
    let service = user_service();
    let created = service
        .dispatch(&cmd("create"), json!({ "firstName": "John", "lastName": "Doe" }))
        .unwrap();

    service
        .dispatch(
            &cmd("updateOne"),
            json!({ "query": { "firstName": "John" }, "update": { "lastName": "Donovan" } }),
        )
        .unwrap();

    let found = service.dispatch(&cmd("findById"), created["id"].clone()).unwrap();
    assert_eq!(found["firstName"], "John");
    assert_eq!(found["lastName"], "Donovan");
}

#[test]
fn update_many_records_merges_fields() {
    let service = user_service();
    service.dispatch(&cmd("create"), users()).unwrap();

    let updated = service
        .dispatch(
            &cmd("updateMany"),
            json!({ "query": { "role": "admin" }, "update": { "role": "owner" } }),
        )
        .unwrap();
    assert_eq!(updated.as_array().unwrap().len(), 2);

    let owners = service.dispatch(&cmd("findMany"), json!({ "role": "owner" })).unwrap();
    assert_eq!(owners.as_array().unwrap().len(), 2);
    assert!(owners[0].get("update").is_none());
}

#[test]
fn remove_one_record() {
    let service = user_service();
    service.dispatch(&cmd("create"), users()).unwrap();

    let removed = service
        .dispatch(&cmd("removeOne"), json!({ "firstName": "John2" }))
        .unwrap();
    assert_eq!(removed["id"], 2);

    let again = service
        .dispatch(&cmd("findOne"), json!({ "firstName": "John2" }))
        .unwrap();
    assert_eq!(again, Value::Null);
}

#[test]
fn remove_many_records() {
    let service = user_service();
    service.dispatch(&cmd("create"), users()).unwrap();

    let removed = service
        .dispatch(&cmd("removeMany"), json!({ "lastName": "Doe" }))
        .unwrap();
    assert_eq!(removed.as_array().unwrap().len(), 2);
    assert_eq!(service.repo().len().unwrap(), 1);
}

#[test]
fn remove_many_without_params_clears_store() {
    let service = user_service();
    service.dispatch(&cmd("create"), users()).unwrap();

    let result = service.dispatch(&cmd("removeMany"), Value::Null).unwrap();
    assert_eq!(result, json!(true));
    assert!(service.repo().is_empty().unwrap());

    let next = service.dispatch(&cmd("create"), json!({})).unwrap();
    assert_eq!(next["id"], 4);
}

#[test]
fn unknown_operation_is_rejected() {
    let service = user_service();
    let err = service.dispatch(&cmd("upsert"), json!({})).unwrap_err();
    assert!(matches!(err, HandlerError::UnknownCommand(ref c) if c == "entity.User.upsert"));
}

#[test]
fn find_by_whole_float_id() {
    let service = user_service();
    service.dispatch(&cmd("create"), users()).unwrap();

    let user = service.dispatch(&cmd("findById"), json!(2.0)).unwrap();
    assert_eq!(user["firstName"], "John2");

    let adults = service.dispatch(&cmd("findMany"), json!({ "age": 22.0 })).unwrap();
    assert_eq!(adults.as_array().unwrap().len(), 2);
}

#[test]
fn two_namespaces_keep_separate_stores() {
    let service = crud_store::Service::new(())
        .mount("entity.User", crud_store::CrudServiceMap::default())
        .mount("entity.Post", crud_store::CrudServiceMap::default());

    service.dispatch("entity.User.create", json!({ "name": "u" })).unwrap();
    let post = service.dispatch("entity.Post.create", json!({ "title": "p" })).unwrap();
    assert_eq!(post["id"], 1);

    let users = service.store("entity.User").unwrap();
    let posts = service.store("entity.Post").unwrap();
    assert_eq!(users.find_many(&Default::default()).unwrap().len(), 1);
    assert_eq!(posts.get(1).unwrap().unwrap()["title"], "p");
    let title = json!({ "title": "p" }).as_object().cloned().unwrap();
    assert!(users.find_one(&title).unwrap().is_none());
}
