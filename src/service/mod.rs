//! service - Named-command dispatch over a repository.
//!
//! Build a service by registering command handlers, or by mounting a CRUD
//! service map under a namespace. Each handler receives a `Context<R>` with
//! access to the params payload and the repository. `before` hooks can
//! rewrite params for every command whose name matches a pattern.
//!
//! ## Quick Start
//!
//! ```ignore
//! use crud_store::service;
//! use regex::Regex;
//! use serde_json::json;
//!
//! let service = service::in_memory()
//!     .crud("entity.User")
//!     .before(Regex::new(r"^entity\.User\.create$")?, |_, mut params| {
//!         params["source"] = json!("import");
//!         Ok(params)
//!     });
//!
//! // Direct dispatch
//! let user = service.dispatch("entity.User.create", json!({ "firstName": "Victor" }))?;
//!
//! // HTTP transport (requires "http" feature)
//! // service::serve(Arc::new(service), "0.0.0.0:3000").await?;
//! ```

mod context;
mod error;
mod service;

pub use context::Context;
pub use error::HandlerError;
pub use service::{in_memory, CommandRequest, CommandResponse, Service};

// HTTP transport (requires "http" feature)
#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::{router, serve};
