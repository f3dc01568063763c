//! HTTP adapter: login, profile endpoints, and health probes.

pub mod error;
pub mod health;
pub mod profiles;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use error::ApiResult;
