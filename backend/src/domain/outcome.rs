//! Uniform result of every dispatched operation.
//!
//! [`Outcome`] carries expected business results only. Faults that the
//! caller cannot act on (a lost connection, a cancelled request) travel on
//! the `Err` side of the dispatcher's `Result` instead, so the two never mix.

use serde::Serialize;

use super::ValidationViolation;

/// Reason attached to outcomes produced by failed validation.
pub const VALIDATION_FAILED: &str = "One or more validation errors occurred";

/// Business failure: a user-facing reason plus optional field violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Failure {
    reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    violations: Option<Vec<ValidationViolation>>,
}

impl Failure {
    /// User-facing explanation.
    pub fn reason(&self) -> &str {
        self.reason.as_str()
    }

    /// Field violations, present only for validation failures.
    pub fn violations(&self) -> Option<&[ValidationViolation]> {
        self.violations.as_deref()
    }
}

/// Success or business failure of one operation.
///
/// Outcomes are never converted implicitly; construction always names the
/// variant.
///
/// # Examples
/// ```
/// use activities_backend::domain::Outcome;
///
/// let ok: Outcome<u8> = Outcome::success(1);
/// assert_eq!(ok.into_success(), Some(1));
///
/// let failed: Outcome<u8> = Outcome::failure("Problem editing the profile");
/// assert_eq!(
///     failed.as_failure().map(|f| f.reason()),
///     Some("Problem editing the profile")
/// );
/// ```
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The handler produced a value.
    Success(T),
    /// An expected business failure.
    Failure(Failure),
}

impl<T> Outcome<T> {
    /// Wrap a successful result.
    pub fn success(value: T) -> Self {
        Self::Success(value)
    }

    /// Expected failure without field violations.
    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure(Failure {
            reason: reason.into(),
            violations: None,
        })
    }

    /// Failure produced by validation, carrying every violation found.
    pub fn invalid(violations: Vec<ValidationViolation>) -> Self {
        Self::Failure(Failure {
            reason: VALIDATION_FAILED.to_owned(),
            violations: Some(violations),
        })
    }

    /// Whether this is a success.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Whether this is a failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// The success payload, or `None` for a failure.
    pub fn into_success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    /// The failure, or `None` on success.
    pub fn as_failure(&self) -> Option<&Failure> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }

    /// Transform the success payload, leaving failures untouched.
    pub fn map<U, F>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Success(value) => Outcome::Success(f(value)),
            Self::Failure(failure) => Outcome::Failure(failure),
        }
    }

    /// Success payload as `Ok`, failure as `Err`.
    pub fn into_result(self) -> Result<T, Failure> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(failure) => Err(failure),
        }
    }
}
