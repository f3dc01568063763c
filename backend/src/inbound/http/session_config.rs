//! Cookie session settings read from the environment.
//!
//! Debug builds fall back to defaults with a warning; release builds reject
//! missing or malformed values so a deployment cannot silently run with an
//! insecure cookie or a throwaway signing key.

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use mockable::{DefaultEnv, Env};
use tracing::warn;
use zeroize::Zeroize;

/// Path of the session signing key.
pub const KEY_FILE_ENV: &str = "ACTIVITIES_SESSION_KEY_FILE";
/// Whether the cookie carries the `Secure` flag.
pub const COOKIE_SECURE_ENV: &str = "ACTIVITIES_SESSION_COOKIE_SECURE";
/// Cookie `SameSite` policy.
pub const SAMESITE_ENV: &str = "ACTIVITIES_SESSION_SAMESITE";
/// Permit a generated key when the key file is missing (debug only).
pub const ALLOW_EPHEMERAL_ENV: &str = "ACTIVITIES_SESSION_ALLOW_EPHEMERAL";

const KEY_FILE_DEFAULT: &str = "/var/run/secrets/activities_session_key";
const KEY_MIN_LEN: usize = 64;
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Strictness applied to session configuration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Lenient: fall back to defaults with a warning.
    Debug,
    /// Strict: every variable must be present and valid.
    Release,
}

impl BuildMode {
    /// Mode of the running binary.
    ///
    /// ```
    /// use activities_backend::inbound::http::session_config::BuildMode;
    ///
    /// let expected = if cfg!(debug_assertions) { BuildMode::Debug } else { BuildMode::Release };
    /// assert_eq!(BuildMode::current(), expected);
    /// ```
    #[must_use]
    pub fn current() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        self == Self::Debug
    }
}

/// Validated inputs for the cookie session middleware.
pub struct SessionSettings {
    /// Signing and encryption key.
    pub key: Key,
    /// Send the cookie over HTTPS only.
    pub cookie_secure: bool,
    /// Cookie `SameSite` policy.
    pub same_site: SameSite,
}

/// Why session settings could not be resolved.
#[derive(Debug, thiserror::Error)]
pub enum SessionConfigError {
    /// A release build needs a variable that is unset.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is set to something unparseable.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// The key file could not be read.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The key file holds too few bytes.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// `SameSite=None` without `Secure` in a release build.
    #[error("ACTIVITIES_SESSION_SAMESITE=None requires ACTIVITIES_SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    /// Ephemeral keys requested in a release build.
    #[error("ACTIVITIES_SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Read session settings from `env`.
///
/// # Errors
/// Release builds fail on any missing or invalid toggle, an unreadable or
/// short key file, `SameSite=None` without `Secure`, or an ephemeral key.
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = read_toggle(env, mode, COOKIE_SECURE_ENV, BOOL_EXPECTED, true, parse_bool)?;
    let same_site = read_same_site(env, mode, cookie_secure)?;
    let allow_ephemeral =
        read_toggle(env, mode, ALLOW_EPHEMERAL_ENV, BOOL_EXPECTED, false, parse_bool)?;
    if allow_ephemeral && !mode.is_debug() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let key = read_key(env, mode, allow_ephemeral)?;
    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

/// Read session settings from the process environment.
pub fn session_settings_from_process(
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    session_settings_from_env(&DefaultEnv::new(), mode)
}

/// Parse `name`, falling back to `default` in debug builds when the value is
/// missing or unparseable.
fn read_toggle<E, T, P>(
    env: &E,
    mode: BuildMode,
    name: &'static str,
    expected: &'static str,
    default: T,
    parse: P,
) -> Result<T, SessionConfigError>
where
    E: Env,
    T: std::fmt::Debug,
    P: Fn(&str) -> Option<T>,
{
    let Some(value) = env.string(name) else {
        if mode.is_debug() {
            warn!(variable = name, ?default, "not set; using default");
            return Ok(default);
        }
        return Err(SessionConfigError::MissingEnv { name });
    };
    match parse(&value) {
        Some(parsed) => Ok(parsed),
        None if mode.is_debug() => {
            warn!(variable = name, %value, ?default, "invalid value; using default");
            Ok(default)
        }
        None => Err(SessionConfigError::InvalidEnv {
            name,
            value,
            expected,
        }),
    }
}

fn read_same_site<E: Env>(
    env: &E,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let default = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };
    let same_site = read_toggle(env, mode, SAMESITE_ENV, SAMESITE_EXPECTED, default, parse_same_site)?;
    if same_site == SameSite::None && !cookie_secure {
        if !mode.is_debug() {
            return Err(SessionConfigError::InsecureSameSiteNone);
        }
        warn!("SameSite=None without Secure; browsers may drop the cookie");
    }
    Ok(same_site)
}

fn read_key<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| KEY_FILE_DEFAULT.to_owned()),
    );
    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            let result = if !mode.is_debug() && length < KEY_MIN_LEN {
                Err(SessionConfigError::KeyTooShort {
                    path,
                    length,
                    min_len: KEY_MIN_LEN,
                })
            } else {
                Ok(Key::derive_from(&bytes))
            };
            bytes.zeroize();
            result
        }
        Err(source) if mode.is_debug() || allow_ephemeral => {
            warn!(path = %path.display(), error = %source, "using ephemeral session key");
            Ok(Key::generate())
        }
        Err(source) => Err(SessionConfigError::KeyRead { path, source }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

fn parse_same_site(value: &str) -> Option<SameSite> {
    match value.trim().to_ascii_lowercase().as_str() {
        "lax" => Some(SameSite::Lax),
        "strict" => Some(SameSite::Strict),
        "none" => Some(SameSite::None),
        _ => None,
    }
}
