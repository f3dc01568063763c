//! Resolution of the calling user's identity.
//!
//! Identity comes from the authenticated transport context, never from a
//! request payload.

use super::{Fault, Username};

/// Source of the current caller's username.
#[cfg_attr(test, mockall::automock)]
pub trait IdentityResolver: Send + Sync {
    /// The authenticated username, or [`Fault::Unauthenticated`] when the
    /// context carries none.
    fn current_username(&self) -> Result<Username, Fault>;
}

/// Identity established by the transport's authentication check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(Username);

impl AuthenticatedUser {
    /// Resolver that always answers `username`.
    pub fn new(username: Username) -> Self {
        Self(username)
    }
}

impl IdentityResolver for AuthenticatedUser {
    fn current_username(&self) -> Result<Username, Fault> {
        Ok(self.0.clone())
    }
}

/// Context without a caller. Resolving identity from it is a fault.
#[derive(Debug, Default, Clone, Copy)]
pub struct Anonymous;

impl IdentityResolver for Anonymous {
    fn current_username(&self) -> Result<Username, Fault> {
        Err(Fault::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;

    #[test]
    fn authenticated_user_resolves_username() {
        let username = Username::new("jane").expect("valid username");
        let resolver = AuthenticatedUser::new(username.clone());
        assert_eq!(resolver.current_username().ok(), Some(username));
    }

    #[test]
    fn anonymous_faults() {
        assert!(matches!(
            Anonymous.current_username(),
            Err(Fault::Unauthenticated)
        ));
    }
}
