//! bb8 pool of async Diesel PostgreSQL connections.
//!
//! Units of work check out an owned connection so it can live inside a boxed
//! trait object for the whole operation and return to the pool on drop.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

/// Connection checked out for the lifetime of one unit of work.
pub type OwnedConnection = PooledConnection<'static, AsyncPgConnection>;

/// Connection pool failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// No connection could be checked out.
    #[error("failed to get connection from pool: {message}")]
    Checkout { message: String },
    /// The pool could not be created.
    #[error("failed to build connection pool: {message}")]
    Build { message: String },
}

impl PoolError {
    fn checkout(err: impl ToString) -> Self {
        Self::Checkout {
            message: err.to_string(),
        }
    }

    fn build(err: impl ToString) -> Self {
        Self::Build {
            message: err.to_string(),
        }
    }

    /// Underlying driver message.
    pub fn message(&self) -> &str {
        match self {
            Self::Checkout { message } | Self::Build { message } => message,
        }
    }
}

/// Pool sizing and checkout limits.
///
/// # Examples
/// ```
/// use activities_backend::outbound::persistence::PoolConfig;
/// use std::time::Duration;
///
/// let config = PoolConfig::new("postgres://localhost/activities")
///     .with_max_size(4)
///     .with_connection_timeout(Duration::from_secs(5));
/// assert_eq!(config.max_size(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    min_idle: Option<u32>,
    connection_timeout: Duration,
}

impl PoolConfig {
    /// Defaults: ten connections, two kept idle, thirty second checkout
    /// timeout.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: 10,
            min_idle: Some(2),
            connection_timeout: Duration::from_secs(30),
        }
    }

    /// Cap on open connections.
    #[must_use]
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size.max(1);
        self.min_idle = self.min_idle.map(|idle| idle.min(self.max_size));
        self
    }

    /// Connections kept warm; `None` lets the pool decide.
    #[must_use]
    pub fn with_min_idle(mut self, min_idle: Option<u32>) -> Self {
        self.min_idle = min_idle.map(|idle| idle.min(self.max_size));
        self
    }

    /// How long a checkout may wait.
    #[must_use]
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// PostgreSQL connection string.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Configured connection cap.
    pub fn max_size(&self) -> u32 {
        self.max_size
    }
}

/// Cloneable handle to the shared pool.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Build the pool, opening `min_idle` connections up front.
    ///
    /// # Errors
    /// [`PoolError::Build`] when the URL is invalid or the initial
    /// connections cannot be opened.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(config.database_url);
        let inner = Pool::builder()
            .max_size(config.max_size)
            .min_idle(config.min_idle)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .await
            .map_err(PoolError::build)?;
        Ok(Self { inner })
    }

    /// Borrow a connection for a short operation.
    ///
    /// # Errors
    /// [`PoolError::Checkout`] when no connection frees up within the timeout.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner.get().await.map_err(PoolError::checkout)
    }

    /// Check out a connection that is not tied to the pool handle's lifetime.
    ///
    /// # Errors
    /// [`PoolError::Checkout`] when no connection frees up within the timeout.
    pub async fn get_owned(&self) -> Result<OwnedConnection, PoolError> {
        self.inner.get_owned().await.map_err(PoolError::checkout)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults() {
        let config = PoolConfig::new("postgres://localhost/test");
        assert_eq!(config.database_url(), "postgres://localhost/test");
        assert_eq!(config.max_size(), 10);
        assert_eq!(config.min_idle, Some(2));
        assert_eq!(config.connection_timeout, Duration::from_secs(30));
    }

    #[rstest]
    #[case(0, Some(2), 1, Some(1))]
    #[case(1, Some(2), 1, Some(1))]
    #[case(8, Some(2), 8, Some(2))]
    #[case(8, None, 8, None)]
    fn idle_never_exceeds_size(
        #[case] max_size: u32,
        #[case] min_idle: Option<u32>,
        #[case] expected_size: u32,
        #[case] expected_idle: Option<u32>,
    ) {
        let config = PoolConfig::new("postgres://localhost/test")
            .with_min_idle(min_idle)
            .with_max_size(max_size);
        assert_eq!(config.max_size(), expected_size);
        assert_eq!(config.min_idle, expected_idle);
    }

    #[rstest]
    fn error_message_is_exposed() {
        let err = PoolError::checkout("timed out");
        assert_eq!(err.message(), "timed out");
        assert_eq!(err.to_string(), "failed to get connection from pool: timed out");
    }
}
