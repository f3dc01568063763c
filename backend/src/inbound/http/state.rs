//! Shared dependencies injected into HTTP handlers.

use std::sync::Arc;

use crate::domain::Dispatcher;
use crate::domain::ports::LoginService;

/// Port handles available to every handler via `web::Data`.
#[derive(Clone)]
pub struct HttpState {
    /// Credential check for the login endpoint.
    pub login: Arc<dyn LoginService>,
    /// Routes profile requests to their handlers.
    pub dispatcher: Arc<Dispatcher>,
}

impl HttpState {
    /// Bundle the handler dependencies.
    pub fn new(login: Arc<dyn LoginService>, dispatcher: Arc<Dispatcher>) -> Self {
        Self { login, dispatcher }
    }
}
