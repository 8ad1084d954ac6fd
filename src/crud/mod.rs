//! CRUD service map - request/response handlers over a [`SharedStore`].
//!
//! [`generate_crud_services`] builds one handler per [`Operation`], each a
//! closure over the same store handle. A handler takes a [`Request`]
//! (`{ "params": ... }`) and returns the store's result as JSON: a record,
//! `null`, an array of records, or `true` for a full clear.
//!
//! ## Example
//!
//! ```ignore
//! use crud_store::crud::{generate_crud_services, Operation, Request};
//! use crud_store::SharedStore;
//! use serde_json::json;
//!
//! let services = generate_crud_services(SharedStore::new());
//! let user = services.call(Operation::Create, Request::new(json!({ "firstName": "Victor" })))?;
//! let found = services.call(Operation::FindById, Request::new(user["id"].clone()))?;
//! ```

mod handlers;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::service::HandlerError;
use crate::store::SharedStore;

/// A CRUD handler bound to its store.
pub type CrudHandler = Box<dyn Fn(Request) -> Result<Value, HandlerError> + Send + Sync>;

/// The request envelope every CRUD handler receives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub params: Value,
}

impl Request {
    pub fn new(params: Value) -> Self {
        Self { params }
    }
}

/// The request/response operations of a CRUD service map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
    Create,
    FindById,
    FindOne,
    FindMany,
    ReplaceOne,
    UpdateOne,
    UpdateMany,
    RemoveOne,
    RemoveMany,
}

impl Operation {
    pub const ALL: [Operation; 9] = [
        Operation::Create,
        Operation::FindById,
        Operation::FindOne,
        Operation::FindMany,
        Operation::ReplaceOne,
        Operation::UpdateOne,
        Operation::UpdateMany,
        Operation::RemoveOne,
        Operation::RemoveMany,
    ];

    /// Wire name of the operation.
    pub fn name(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::FindById => "findById",
            Operation::FindOne => "findOne",
            Operation::FindMany => "findMany",
            Operation::ReplaceOne => "replaceOne",
            Operation::UpdateOne => "updateOne",
            Operation::UpdateMany => "updateMany",
            Operation::RemoveOne => "removeOne",
            Operation::RemoveMany => "removeMany",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = HandlerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| HandlerError::UnknownCommand(s.to_string()))
    }
}

/// Mapping from operation to handler, all bound to one store for life.
pub struct CrudServiceMap {
    store: SharedStore,
    handlers: BTreeMap<Operation, CrudHandler>,
}

/// Build the CRUD service map over `store`.
pub fn generate_crud_services(store: SharedStore) -> CrudServiceMap {
    let mut map: BTreeMap<Operation, CrudHandler> = BTreeMap::new();
    map.insert(Operation::Create, bind(&store, handlers::create));
    map.insert(Operation::FindById, bind(&store, handlers::find_by_id));
    map.insert(Operation::FindOne, bind(&store, handlers::find_one));
    map.insert(Operation::FindMany, bind(&store, handlers::find_many));
    map.insert(Operation::ReplaceOne, bind(&store, handlers::replace_one));
    map.insert(Operation::UpdateOne, bind(&store, handlers::update_one));
    map.insert(Operation::UpdateMany, bind(&store, handlers::update_many));
    map.insert(Operation::RemoveOne, bind(&store, handlers::remove_one));
    map.insert(Operation::RemoveMany, bind(&store, handlers::remove_many));

    CrudServiceMap {
        store,
        handlers: map,
    }
}

fn bind<F>(store: &SharedStore, handler: F) -> CrudHandler
where
    F: Fn(&SharedStore, Request) -> Result<Value, HandlerError> + Send + Sync + 'static,
{
    let store = store.clone();
    Box::new(move |request| handler(&store, request))
}

impl Default for CrudServiceMap {
    fn default() -> Self {
        generate_crud_services(SharedStore::new())
    }
}

impl CrudServiceMap {
    /// The store every handler operates on (`getStore`).
    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Run one operation.
    pub fn call(&self, operation: Operation, request: Request) -> Result<Value, HandlerError> {
        match self.handlers.get(&operation) {
            Some(handler) => handler(request),
            None => Err(HandlerError::UnknownCommand(operation.name().to_string())),
        }
    }

    /// Run an operation by its wire name.
    pub fn call_named(&self, name: &str, request: Request) -> Result<Value, HandlerError> {
        self.call(name.parse()?, request)
    }

    /// Registered operations, in declaration order.
    pub fn operations(&self) -> impl Iterator<Item = Operation> + '_ {
        self.handlers.keys().copied()
    }

    /// Consume the map, yielding each operation with its bound handler.
    pub fn into_handlers(self) -> impl Iterator<Item = (Operation, CrudHandler)> {
        self.handlers.into_iter()
    }
}

impl fmt::Debug for CrudServiceMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrudServiceMap")
            .field("store", &self.store)
            .field("operations", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}
