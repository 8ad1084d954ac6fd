//! Store - in-memory record container with partial-match queries.
//!
//! [`Store`] owns an id-keyed engine and a monotonically increasing id
//! counter. It is single-owner: mutations take `&mut self`. Services and
//! other shared callers go through [`SharedStore`], a cloneable handle that
//! serializes access behind a lock.
//!
//! ## Example
//!
//! ```ignore
//! use crud_store::{Record, Store};
//! use serde_json::json;
//!
//! let mut store = Store::new();
//! let victor = store.insert(json!({ "firstName": "Victor" }).as_object().unwrap().clone())?;
//! assert_eq!(victor["id"], 1);
//!
//! let found = store.find_one(&json!({ "firstName": "Victor" }).as_object().unwrap().clone());
//! assert!(found.is_some());
//! ```

mod in_memory;
mod shared;

use crate::record::RecordId;

/// Error type for store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// `replace` targeted an id that is not in the store.
    #[error("Couldn't find item with id {0}.")]
    NotFound(RecordId),
    /// Every id up to `RecordId::MAX` has been handed out.
    #[error("no record ids left to assign")]
    IdsExhausted,
    /// The lock around a shared store was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,
}

pub use in_memory::Store;
pub use shared::SharedStore;
