//! Request dispatch backend for user profiles.
//!
//! Typed requests flow from the HTTP adapter through the [`domain::Dispatcher`],
//! which validates them and routes them to handlers backed by a
//! [`domain::ports::ProfileStore`].

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
