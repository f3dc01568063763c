//! Driving port for authentication.
//!
//! The HTTP login endpoint calls this port and stores the returned username
//! in the session; it never sees how credentials are checked.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Username, demo_profiles};

/// Password shared by the seeded demo accounts.
pub const DEMO_PASSWORD: &str = "Pa$$w0rd";

/// Credential check used by the login endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Check credentials and return the authenticated username.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Username, Error>;
}

/// Accepts the seeded demo users with [`DEMO_PASSWORD`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Username, Error> {
        let known = demo_profiles()
            .into_iter()
            .any(|profile| profile.username() == credentials.username());
        if known && credentials.password() == DEMO_PASSWORD {
            Ok(credentials.username().clone())
        } else {
            Err(Error::unauthorized("invalid credentials"))
        }
    }
}
