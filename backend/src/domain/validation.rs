//! Declarative per-field validation.
//!
//! Each request type builds a [`RuleSet`] once; running it evaluates every
//! rule and reports all violations together so callers can fix a payload in
//! one round trip.

use std::fmt;

use serde::Serialize;
use utoipa::ToSchema;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationViolation {
    #[schema(example = "displayName")]
    field: String,
    #[schema(example = "'Display Name' must not be empty.")]
    message: String,
}

impl ValidationViolation {
    /// Violation of `field` described by `message`.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Wire name of the offending field.
    pub fn field(&self) -> &str {
        self.field.as_str()
    }

    /// Explanation shown to the client.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

type Check<R> = Box<dyn Fn(&R) -> bool + Send + Sync>;

struct Rule<R> {
    field: &'static str,
    message: String,
    check: Check<R>,
}

/// Ordered table of field predicates for requests of type `R`.
///
/// # Examples
/// ```
/// use activities_backend::domain::RuleSet;
///
/// struct Rename { name: Option<String> }
///
/// let rules = RuleSet::<Rename>::new()
///     .not_empty("name", "'Name' must not be empty.", |r| r.name.as_deref())
///     .max_chars("name", 10, |r| r.name.as_deref());
///
/// assert!(rules.validate(&Rename { name: None }).is_empty());
/// assert_eq!(rules.validate(&Rename { name: Some(String::new()) }).len(), 1);
/// ```
pub struct RuleSet<R> {
    rules: Vec<Rule<R>>,
}

impl<R> Default for RuleSet<R> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<R> fmt::Debug for RuleSet<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|rule| rule.field))
            .finish()
    }
}

impl<R> RuleSet<R> {
    /// Empty rule set; every request passes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule that passes when `check` returns `true`.
    #[must_use]
    pub fn rule<F>(mut self, field: &'static str, message: impl Into<String>, check: F) -> Self
    where
        F: Fn(&R) -> bool + Send + Sync + 'static,
    {
        self.rules.push(Rule {
            field,
            message: message.into(),
            check: Box::new(check),
        });
        self
    }

    /// A present value must contain a non-whitespace character. Absent values
    /// pass, so optional fields can be left out of partial updates.
    #[must_use]
    pub fn not_empty<F>(self, field: &'static str, message: impl Into<String>, get: F) -> Self
    where
        F: Fn(&R) -> Option<&str> + Send + Sync + 'static,
    {
        self.rule(field, message, move |request| {
            get(request).is_none_or(|value| !value.trim().is_empty())
        })
    }

    /// The value must be present and contain a non-whitespace character.
    #[must_use]
    pub fn required<F>(self, field: &'static str, message: impl Into<String>, get: F) -> Self
    where
        F: Fn(&R) -> Option<&str> + Send + Sync + 'static,
    {
        self.rule(field, message, move |request| {
            get(request).is_some_and(|value| !value.trim().is_empty())
        })
    }

    /// A present value must not exceed `max` characters.
    #[must_use]
    pub fn max_chars<F>(self, field: &'static str, max: usize, get: F) -> Self
    where
        F: Fn(&R) -> Option<&str> + Send + Sync + 'static,
    {
        let message = format!("must be {max} characters or fewer");
        self.rule(field, message, move |request| {
            get(request).is_none_or(|value| value.chars().count() <= max)
        })
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the set has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluate every rule, returning violations in rule order.
    pub fn validate(&self, request: &R) -> Vec<ValidationViolation> {
        self.rules
            .iter()
            .filter(|rule| !(rule.check)(request))
            .map(|rule| ValidationViolation::new(rule.field, rule.message.clone()))
            .collect()
    }
}

/// Request types that describe their own validation rules.
pub trait Validate: Sized {
    fn rules() -> RuleSet<Self>;
}
