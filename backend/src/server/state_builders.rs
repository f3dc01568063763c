//! Port wiring: pick the profile store and build the dispatcher around it.

use std::sync::Arc;

use tracing::{error, info, warn};

use activities_backend::domain::ports::{FixtureLoginService, ProfileStore};
use activities_backend::domain::{
    Dispatcher, EditProfile, EditProfileHandler, ProfileDetails, ProfileDetailsHandler,
    demo_profiles,
};
use activities_backend::inbound::http::state::HttpState;
use activities_backend::outbound::InMemoryProfileStore;
use activities_backend::outbound::persistence::{
    DbPool, DieselProfileStore, PoolConfig, run_migrations, seed_profiles,
};

use super::settings::ServerSettings;

/// Connect to PostgreSQL when configured, otherwise keep profiles in memory.
///
/// Migration and seeding failures are logged and startup continues; pool
/// construction failure is fatal.
pub async fn build_profile_store(settings: &ServerSettings) -> std::io::Result<Arc<dyn ProfileStore>> {
    let Some(url) = settings.database_url() else {
        warn!("no database configured; profiles are kept in memory");
        return Ok(Arc::new(InMemoryProfileStore::with_profiles(demo_profiles())));
    };

    if settings.run_migrations() {
        match run_migrations(url).await {
            Ok(applied) => info!(count = applied.len(), migrations = ?applied, "migrations applied"),
            Err(err) => error!(error = %err, "migrations failed; continuing"),
        }
    }

    let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.pool_max_size()))
        .await
        .map_err(|err| std::io::Error::other(format!("database pool: {err}")))?;

    if settings.seed_demo_profiles() {
        if let Err(err) = seed_profiles(&pool, &demo_profiles()).await {
            error!(error = %err, "seeding demo profiles failed; continuing");
        }
    }

    Ok(Arc::new(DieselProfileStore::new(pool)))
}

/// Register every profile handler against `store`.
pub fn build_dispatcher(store: Arc<dyn ProfileStore>) -> Dispatcher {
    Dispatcher::builder()
        .register::<EditProfile, _>(EditProfileHandler::new(Arc::clone(&store)))
        .register::<ProfileDetails, _>(ProfileDetailsHandler::new(store))
        .build()
}

/// HTTP state with the fixture login service.
pub fn build_http_state(store: Arc<dyn ProfileStore>) -> HttpState {
    HttpState::new(Arc::new(FixtureLoginService), Arc::new(build_dispatcher(store)))
}
