//! Startup housekeeping: apply embedded migrations and seed demo profiles.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use crate::domain::UserProfile;
use crate::domain::ports::ProfileStoreError;

use super::diesel_profile_store::{map_diesel_error, map_pool_error};
use super::models::NewProfileRow;
use super::pool::DbPool;
use super::schema::user_profiles;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Failure while applying embedded migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// The migration connection failed.
    #[error("failed to connect for migrations: {0}")]
    Connect(#[from] diesel::ConnectionError),
    /// A migration did not apply.
    #[error("failed to apply migrations: {message}")]
    Apply { message: String },
    /// The blocking migration task panicked or was cancelled.
    #[error("migration task aborted: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Apply pending migrations on a dedicated blocking connection.
///
/// Returns the names of the migrations that ran.
pub async fn run_migrations(database_url: &str) -> Result<Vec<String>, MigrationError> {
    let database_url = database_url.to_owned();
    tokio::task::spawn_blocking(move || -> Result<Vec<String>, MigrationError> {
        let mut conn = PgConnection::establish(&database_url)?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| MigrationError::Apply {
                message: err.to_string(),
            })?;
        Ok(applied.iter().map(ToString::to_string).collect())
    })
    .await?
}

/// Insert `profiles` that do not exist yet, returning how many were added.
pub async fn seed_profiles(
    pool: &DbPool,
    profiles: &[UserProfile],
) -> Result<usize, ProfileStoreError> {
    let rows: Vec<NewProfileRow<'_>> = profiles
        .iter()
        .map(|profile| NewProfileRow {
            username: profile.username().as_str(),
            display_name: profile.display_name(),
            bio: profile.bio(),
        })
        .collect();
    if rows.is_empty() {
        return Ok(0);
    }

    let mut conn = pool.get().await.map_err(map_pool_error)?;
    let inserted = diesel::insert_into(user_profiles::table)
        .values(&rows)
        .on_conflict(user_profiles::username)
        .do_nothing()
        .execute(&mut *conn)
        .await
        .map_err(map_diesel_error)?;
    info!(inserted, offered = rows.len(), "seeded profiles");
    Ok(inserted)
}
