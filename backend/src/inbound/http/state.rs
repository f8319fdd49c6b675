//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` and depend only on
//! the service ports, so they can be tested with mocks instead of storage.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::ports::{AdminService, UserService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UserService>,
    pub admins: Arc<dyn AdminService>,
    /// Upper bound on how long a handler may spend in a service call.
    pub request_timeout: Duration,
}

impl HttpState {
    pub fn new(users: Arc<dyn UserService>, admins: Arc<dyn AdminService>) -> Self {
        Self {
            users,
            admins,
            request_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
