//! User profile aggregate and the username that identifies it.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Validation errors returned by [`Username::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsernameValidationError {
    /// Blank after trimming.
    #[error("username must not be empty")]
    Empty,
    /// Leading or trailing whitespace.
    #[error("username must not contain surrounding whitespace")]
    SurroundingWhitespace,
}

/// Stable identifier of a user, as resolved from the authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    ///
    /// # Examples
    /// ```
    /// use activities_backend::domain::Username;
    ///
    /// assert!(Username::new("bob").is_ok());
    /// assert!(Username::new(" bob").is_err());
    /// ```
    pub fn new(value: impl Into<String>) -> Result<Self, UsernameValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(UsernameValidationError::Empty);
        }
        if value.trim() != value {
            return Err(UsernameValidationError::SurroundingWhitespace);
        }
        Ok(Self(value))
    }

    /// Borrow the validated username.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UsernameValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Public profile of a user.
///
/// Loaded fresh for every unit of work; handlers mutate a copy and hand it
/// back to the store rather than caching it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[schema(value_type = String, example = "bob")]
    username: Username,
    #[schema(example = "Bob")]
    display_name: String,
    #[schema(example = "Climber and amateur chef")]
    bio: Option<String>,
}

impl UserProfile {
    /// Assemble a profile from already validated parts.
    pub fn new(username: Username, display_name: impl Into<String>, bio: Option<String>) -> Self {
        Self {
            username,
            display_name: display_name.into(),
            bio,
        }
    }

    /// Stable identifier of the owner.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Name shown to other users.
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Free-text bio, if set.
    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref()
    }

    /// Overwrite the display name.
    pub fn set_display_name(&mut self, display_name: impl Into<String>) {
        self.display_name = display_name.into();
    }

    /// Overwrite the bio.
    pub fn set_bio(&mut self, bio: impl Into<String>) {
        self.bio = Some(bio.into());
    }
}

/// Profiles seeded into fresh stores so the service is usable out of the box.
pub fn demo_profiles() -> Vec<UserProfile> {
    [("bob", "Bob"), ("tom", "Tom"), ("jane", "Jane")]
        .into_iter()
        .filter_map(|(username, display_name)| {
            Username::new(username)
                .ok()
                .map(|username| UserProfile::new(username, display_name, None))
        })
        .collect()
}
