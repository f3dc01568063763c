//! Process settings loaded via OrthoConfig.
//!
//! Every field can be set from the command line, a config file, or an
//! `ACTIVITIES_`-prefixed environment variable.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Process-level settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ACTIVITIES")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string. Without it profiles live in memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Apply embedded migrations before serving. Defaults to on.
    pub run_migrations: Option<bool>,
    /// Insert the demo profiles when they are missing. Defaults to on.
    pub seed_demo_profiles: Option<bool>,
}

/// The configured listen address does not parse.
#[derive(Debug, thiserror::Error)]
#[error("invalid bind address '{value}': {source}")]
pub struct BindAddrError {
    value: String,
    #[source]
    source: std::net::AddrParseError,
}

impl ServerSettings {
    /// Parsed listen address, falling back to the built-in default.
    pub fn bind_addr(&self) -> Result<SocketAddr, BindAddrError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| BindAddrError {
            value: value.to_owned(),
            source,
        })
    }

    /// Database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Pool size, falling back to the built-in default.
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    /// Whether startup applies pending migrations.
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }

    /// Whether startup inserts the demo profiles.
    pub fn seed_demo_profiles(&self) -> bool {
        self.seed_demo_profiles.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 5] = [
        "ACTIVITIES_BIND_ADDR",
        "ACTIVITIES_DATABASE_URL",
        "ACTIVITIES_POOL_MAX_SIZE",
        "ACTIVITIES_RUN_MIGRATIONS",
        "ACTIVITIES_SEED_DEMO_PROFILES",
    ];

    fn load() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("activities-backend")])
            .expect("settings should load")
    }

    #[rstest]
    fn defaults_apply_without_configuration() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load();

        assert_eq!(
            settings.bind_addr().expect("default address"),
            DEFAULT_BIND_ADDR.parse::<SocketAddr>().expect("valid default")
        );
        assert!(settings.database_url().is_none());
        assert_eq!(settings.pool_max_size(), DEFAULT_POOL_MAX_SIZE);
        assert!(settings.run_migrations());
        assert!(settings.seed_demo_profiles());
    }

    #[rstest]
    fn environment_overrides_defaults() {
        let _guard = lock_env([
            ("ACTIVITIES_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "ACTIVITIES_DATABASE_URL",
                Some("postgres://localhost/activities".to_owned()),
            ),
            ("ACTIVITIES_POOL_MAX_SIZE", Some("3".to_owned())),
            ("ACTIVITIES_RUN_MIGRATIONS", Some("false".to_owned())),
            ("ACTIVITIES_SEED_DEMO_PROFILES", Some("false".to_owned())),
        ]);

        let settings = load();

        assert_eq!(
            settings.bind_addr().expect("address"),
            "127.0.0.1:9000".parse::<SocketAddr>().expect("valid address")
        );
        assert_eq!(settings.database_url(), Some("postgres://localhost/activities"));
        assert_eq!(settings.pool_max_size(), 3);
        assert!(!settings.run_migrations());
        assert!(!settings.seed_demo_profiles());
    }

    #[rstest]
    fn blank_database_url_means_in_memory() {
        let mut vars = VARS.map(|name| (name, None::<String>));
        vars[1].1 = Some("   ".to_owned());
        let _guard = lock_env(vars);

        assert!(load().database_url().is_none());
    }

    #[rstest]
    fn malformed_bind_address_is_reported() {
        let mut vars = VARS.map(|name| (name, None::<String>));
        vars[0].1 = Some("localhost".to_owned());
        let _guard = lock_env(vars);

        let err = load().bind_addr().expect_err("invalid address");
        assert!(err.to_string().contains("localhost"));
    }
}
