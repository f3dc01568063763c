//! PostgreSQL-backed [`ProfileStore`].
//!
//! Each unit of work owns one pooled connection. Reads run outside a
//! transaction; commit writes every staged profile inside a single
//! transaction and reports the summed row counts.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{
    ProfilePredicate, ProfileStore, ProfileStoreError, ProfileUnitOfWork,
};
use crate::domain::{UserProfile, Username};

use super::models::{ProfileRow, ProfileUpdate};
use super::pool::{DbPool, OwnedConnection, PoolError};
use super::schema::user_profiles;

/// Diesel implementation of the profile gateway.
#[derive(Clone)]
pub struct DieselProfileStore {
    pool: DbPool,
}

impl DieselProfileStore {
    /// Store drawing connections from `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn map_pool_error(error: PoolError) -> ProfileStoreError {
    ProfileStoreError::connection(error.message())
}

pub(crate) fn map_diesel_error(error: diesel::result::Error) -> ProfileStoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "profile query failed");
        }
        other => debug!(error = %other, "profile query failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ProfileStoreError::connection("database connection closed")
        }
        DieselError::DatabaseError(DatabaseErrorKind::SerializationFailure, _) => {
            ProfileStoreError::query("concurrent update conflict")
        }
        DieselError::NotFound => ProfileStoreError::query("record not found"),
        DieselError::QueryBuilderError(_) => ProfileStoreError::query("invalid profile query"),
        _ => ProfileStoreError::query("database error"),
    }
}

fn row_to_profile(row: ProfileRow) -> Result<UserProfile, ProfileStoreError> {
    let ProfileRow {
        username,
        display_name,
        bio,
    } = row;
    let username = Username::new(username)
        .map_err(|err| ProfileStoreError::query(format!("stored username rejected: {err}")))?;
    Ok(UserProfile::new(username, display_name, bio))
}

#[async_trait]
impl ProfileStore for DieselProfileStore {
    async fn begin(&self) -> Result<Box<dyn ProfileUnitOfWork>, ProfileStoreError> {
        let conn = self.pool.get_owned().await.map_err(map_pool_error)?;
        Ok(Box::new(DieselUnitOfWork {
            conn,
            pending: Vec::new(),
        }))
    }
}

struct DieselUnitOfWork {
    conn: OwnedConnection,
    pending: Vec<UserProfile>,
}

impl DieselUnitOfWork {
    fn connection(&mut self) -> &mut AsyncPgConnection {
        &mut self.conn
    }
}

#[async_trait]
impl ProfileUnitOfWork for DieselUnitOfWork {
    async fn find_profile(
        &mut self,
        predicate: &ProfilePredicate,
    ) -> Result<Option<UserProfile>, ProfileStoreError> {
        let query = match predicate {
            ProfilePredicate::Username(username) => user_profiles::table
                .filter(user_profiles::username.eq(username.as_str().to_owned())),
        };
        let row = query
            .select(ProfileRow::as_select())
            .first(self.connection())
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_profile).transpose()
    }

    fn mark_modified(&mut self, profile: UserProfile) {
        self.pending
            .retain(|staged| staged.username() != profile.username());
        self.pending.push(profile);
    }

    async fn commit(&mut self) -> Result<usize, ProfileStoreError> {
        let pending = std::mem::take(&mut self.pending);
        if pending.is_empty() {
            return Ok(0);
        }
        self.connection()
            .transaction::<_, diesel::result::Error, _>(move |conn| {
                async move {
                    let mut changed = 0;
                    for profile in &pending {
                        let update = ProfileUpdate {
                            display_name: profile.display_name(),
                            bio: profile.bio(),
                        };
                        changed += diesel::update(user_profiles::table)
                            .filter(user_profiles::username.eq(profile.username().as_str()))
                            .set(&update)
                            .execute(conn)
                            .await?;
                    }
                    Ok(changed)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)
    }
}
