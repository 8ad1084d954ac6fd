//! Context passed to command handlers.
//!
//! Carries the params payload (after `before` hooks have run) and a
//! reference to the service's repository.

use serde_json::Value;

/// The context passed to every command handler.
///
/// Generic over `R` (the repository type) so handlers can reach whatever
/// the service was built with.
pub struct Context<'a, R> {
    params: Value,
    repo: &'a R,
}

impl<'a, R> Context<'a, R> {
    pub(crate) fn new(params: Value, repo: &'a R) -> Self {
        Self { params, repo }
    }

    /// Get the raw params payload.
    pub fn params(&self) -> &Value {
        &self.params
    }

    /// Get a reference to the repository.
    pub fn repo(&self) -> &R {
        self.repo
    }
}
