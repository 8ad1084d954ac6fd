//! crud_store - in-memory record store with a named-command CRUD layer.
//!
//! - [`Store`] keeps schema-free JSON records under counter-assigned ids
//!   and answers partial-match queries with a linear scan.
//! - [`crud::generate_crud_services`] adapts a store to request/response
//!   handlers (`create`, `findById`, `findMany`, `updateOne`, ...).
//! - [`service::Service`] dispatches named commands, mounts CRUD maps under
//!   a namespace, and runs `before` hooks.

pub mod crud;
pub mod matcher;
mod record;
pub mod service;
mod store;

pub use crud::{generate_crud_services, CrudServiceMap, Operation, Request};
pub use record::{id_from_value, id_of, with_id, without_id, Record, RecordId, ID_FIELD};
pub use service::{HandlerError, Service};
pub use store::{SharedStore, Store, StoreError};
