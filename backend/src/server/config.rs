//! Resolved inputs for [`super::create_server`].

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::cookie::{Key, SameSite};
use activities_backend::domain::ports::ProfileStore;
use activities_backend::inbound::http::session_config::SessionSettings;

/// Everything `create_server` needs, resolved up front.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) profile_store: Arc<dyn ProfileStore>,
}

impl ServerConfig {
    /// Combine session settings with the listener and store.
    #[must_use]
    pub fn new(
        session: SessionSettings,
        bind_addr: SocketAddr,
        profile_store: Arc<dyn ProfileStore>,
    ) -> Self {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
        } = session;
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            profile_store,
        }
    }
}
