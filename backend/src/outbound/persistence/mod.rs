//! PostgreSQL persistence via Diesel, `diesel-async`, and a `bb8` pool.
//!
//! Row structs and the schema stay private to this module; adapters hand
//! domain types across the port boundary and map every database failure to
//! [`ProfileStoreError`](crate::domain::ports::ProfileStoreError).

mod bootstrap;
mod diesel_profile_store;
mod models;
mod pool;
mod schema;

pub use bootstrap::{MigrationError, run_migrations, seed_profiles};
pub use diesel_profile_store::DieselProfileStore;
pub use pool::{DbPool, OwnedConnection, PoolConfig, PoolError};
