//! Domain ports: the traits adapters implement at the hexagon's edge.

mod macros;
pub(crate) use macros::define_port_error;

mod login_service;
mod profile_store;

#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{DEMO_PASSWORD, FixtureLoginService, LoginService};
#[cfg(test)]
pub use profile_store::MockProfileStore;
pub use profile_store::{ProfilePredicate, ProfileStore, ProfileStoreError, ProfileUnitOfWork};
