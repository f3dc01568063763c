//! Login credentials accepted by the authentication port.

use zeroize::Zeroizing;

use super::{Username, UsernameValidationError};

/// Reasons a login payload is rejected before reaching the login service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// The username failed validation.
    #[error("username is invalid: {0}")]
    Username(#[from] UsernameValidationError),
    /// No password supplied.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials.
///
/// The username is trimmed before validation; the password is kept verbatim
/// and wiped from memory on drop.
///
/// # Examples
/// ```
/// use activities_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" bob ", "Pa$$w0rd").unwrap();
/// assert_eq!(creds.username().as_str(), "bob");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: Username,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Validate raw login input.
    ///
    /// # Errors
    /// Returns a [`LoginValidationError`] naming the first offending field.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let username = Username::new(username.trim())?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username to authenticate.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Password as submitted.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
