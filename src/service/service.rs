//! Service - command handler registry and dispatch.
//!
//! `Service<R>` holds a repository, a set of named command handlers, and an
//! ordered list of `before` hooks. Each handler receives a `Context<R>` and
//! returns `Result<Value, HandlerError>`. Mounted CRUD maps keep their store
//! reachable through [`Service::store`].
//!
//! ## Example
//!
//! ```ignore
//! use crud_store::service;
//! use serde_json::json;
//!
//! let service = service::in_memory().crud("entity.User");
//!
//! let user = service.dispatch("entity.User.create", json!({ "firstName": "Victor" }))?;
//! assert_eq!(user["id"], 1);
//! ```

use std::collections::HashMap;

use regex::Regex;
use serde_json::Value;

use super::context::Context;
use super::error::HandlerError;
use crate::crud::{generate_crud_services, CrudServiceMap, Request};
use crate::store::SharedStore;

type HandleFn<R> = Box<dyn Fn(&Context<R>) -> Result<Value, HandlerError> + Send + Sync>;
type HookFn = Box<dyn Fn(&str, Value) -> Result<Value, HandlerError> + Send + Sync>;

/// Middleware run before every handler whose command name matches `pattern`.
struct Hook {
    pattern: Regex,
    run: HookFn,
}

/// A service that routes named commands to handler functions.
///
/// Generic over `R`, the repository type. Handlers receive a `Context<R>`
/// and can access the repo via `ctx.repo()`.
pub struct Service<R> {
    repo: R,
    handlers: HashMap<String, HandleFn<R>>,
    hooks: Vec<Hook>,
    stores: HashMap<String, SharedStore>,
}

/// A service backed by a fresh shared record store.
pub fn in_memory() -> Service<SharedStore> {
    Service::new(SharedStore::new())
}

impl<R: Send + Sync + 'static> Service<R> {
    /// Create a new service with the given repository.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            handlers: HashMap::new(),
            hooks: Vec::new(),
            stores: HashMap::new(),
        }
    }

    /// Register a command handler.
    ///
    /// Uses builder pattern, returns `self` for chaining.
    pub fn command<F>(mut self, name: &str, handler: F) -> Self
    where
        F: Fn(&Context<R>) -> Result<Value, HandlerError> + Send + Sync + 'static,
    {
        self.handlers.insert(name.to_string(), Box::new(handler));
        self
    }

    /// Register a hook that rewrites params for every command matching
    /// `pattern`. Hooks run in registration order; an `Err` aborts dispatch
    /// before the handler runs.
    pub fn before<H>(mut self, pattern: Regex, hook: H) -> Self
    where
        H: Fn(&str, Value) -> Result<Value, HandlerError> + Send + Sync + 'static,
    {
        self.hooks.push(Hook {
            pattern,
            run: Box::new(hook),
        });
        self
    }

    /// Register every operation of a CRUD service map as
    /// `"{namespace}.{operation}"`. An empty namespace registers bare names.
    ///
    /// The map's store stays reachable through [`Service::store`]. Mounting
    /// a second map under the same namespace replaces the first.
    pub fn mount(mut self, namespace: &str, services: CrudServiceMap) -> Self {
        self.stores.insert(namespace.to_string(), services.store().clone());
        for (operation, handler) in services.into_handlers() {
            let name = qualified(namespace, operation.name());
            self = self.command(&name, move |ctx| handler(Request::new(ctx.params().clone())));
        }
        tracing::debug!(namespace, "crud services mounted");
        self
    }

    /// Dispatch a command by name.
    ///
    /// Looks up the handler, runs matching hooks over the params, builds a
    /// `Context`, then calls the handler.
    pub fn dispatch(&self, command: &str, params: Value) -> Result<Value, HandlerError> {
        let handler = self.handlers.get(command).ok_or_else(|| {
            tracing::warn!(command, "unknown command");
            HandlerError::UnknownCommand(command.to_string())
        })?;

        let params = self.run_hooks(command, params)?;
        let ctx = Context::new(params, &self.repo);

        tracing::debug!(command, "dispatching command");
        handler(&ctx)
    }

    /// Dispatch a `CommandRequest`, returning a `CommandResponse`.
    ///
    /// Errors become `{ "error": message }` with the error's status code.
    pub fn dispatch_request(&self, request: &CommandRequest) -> CommandResponse {
        match self.dispatch(&request.command, request.params.clone()) {
            Ok(value) => CommandResponse {
                status: 200,
                body: value,
            },
            Err(e) => CommandResponse {
                status: e.status_code(),
                body: serde_json::json!({ "error": e.to_string() }),
            },
        }
    }

    /// List registered command names.
    pub fn commands(&self) -> Vec<&str> {
        self.handlers.keys().map(|s| s.as_str()).collect()
    }

    /// Get a reference to the repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// The store behind the CRUD services mounted under `namespace`.
    pub fn store(&self, namespace: &str) -> Option<&SharedStore> {
        self.stores.get(namespace)
    }

    fn run_hooks(&self, command: &str, params: Value) -> Result<Value, HandlerError> {
        self.hooks
            .iter()
            .filter(|hook| hook.pattern.is_match(command))
            .try_fold(params, |params, hook| (hook.run)(command, params))
    }
}

impl Service<SharedStore> {
    /// Mount CRUD services over this service's own store.
    pub fn crud(self, namespace: &str) -> Self {
        let services = generate_crud_services(self.repo.clone());
        self.mount(namespace, services)
    }
}

fn qualified(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", namespace, name)
    }
}

// =============================================================================
// Request / Response types
// =============================================================================

/// An inbound command request.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CommandRequest {
    /// Command name (e.g. `entity.User.create`).
    pub command: String,
    /// JSON params payload.
    #[serde(default)]
    pub params: Value,
}

/// Response from dispatching a command.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CommandResponse {
    /// HTTP-style status code.
    pub status: u16,
    /// Response body (handler result or error).
    pub body: Value,
}
