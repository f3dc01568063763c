//! Persistence gateway for user profiles.
//!
//! Handlers never hold a store-wide context. Each operation asks the
//! [`ProfileStore`] for a fresh [`ProfileUnitOfWork`], reads through it,
//! marks changed profiles, and commits once. Dropping a unit of work without
//! committing discards everything it staged.

use async_trait::async_trait;

use crate::domain::{UserProfile, Username};

use super::define_port_error;

define_port_error! {
    /// Failures raised by profile store adapters.
    pub enum ProfileStoreError {
        /// The backing store could not be reached.
        Connection { message: String } => "profile store connection failed: {message}" [unavailable],
        /// A read or write failed while executing.
        Query { message: String } => "profile store query failed: {message}",
    }
}

/// Selection criteria for [`ProfileUnitOfWork::find_profile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfilePredicate {
    /// Exact username match.
    Username(Username),
}

impl ProfilePredicate {
    /// Whether `profile` satisfies this predicate.
    pub fn matches(&self, profile: &UserProfile) -> bool {
        match self {
            Self::Username(username) => profile.username() == username,
        }
    }
}

/// Factory for per-operation units of work.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Open a unit of work. Adapters may acquire a pooled connection here.
    async fn begin(&self) -> Result<Box<dyn ProfileUnitOfWork>, ProfileStoreError>;
}

/// Scoped view of the store for one dispatched operation.
#[async_trait]
pub trait ProfileUnitOfWork: Send {
    /// Fetch the first profile matching `predicate`.
    async fn find_profile(
        &mut self,
        predicate: &ProfilePredicate,
    ) -> Result<Option<UserProfile>, ProfileStoreError>;

    /// Stage `profile` for writing on commit, whether or not any field changed.
    fn mark_modified(&mut self, profile: UserProfile);

    /// Write every staged profile in one all-or-nothing step and return the
    /// number of rows the store reports as changed.
    async fn commit(&mut self) -> Result<usize, ProfileStoreError>;
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;
    use rstest::rstest;

    fn profile(username: &str) -> UserProfile {
        let username = Username::new(username).expect("valid username");
        UserProfile::new(username, "Someone", None)
    }

    #[rstest]
    #[case("bob", true)]
    #[case("tom", false)]
    fn username_predicate_matches_exactly(#[case] candidate: &str, #[case] expected: bool) {
        let predicate = ProfilePredicate::Username(Username::new("bob").expect("valid username"));
        assert_eq!(predicate.matches(&profile(candidate)), expected);
    }

    #[rstest]
    fn connection_errors_are_unavailable() {
        assert!(ProfileStoreError::connection("refused").is_unavailable());
        assert!(!ProfileStoreError::query("syntax").is_unavailable());
    }
}
