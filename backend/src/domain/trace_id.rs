//! Correlation identifier carried through a request in task-local storage.
//!
//! Task-locals do not follow `tokio::spawn` or `spawn_blocking`; wrap such
//! work in [`TraceId::scope`] to keep the identifier visible.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

/// Header echoing the trace identifier on every response.
pub const TRACE_ID_HEADER: &str = "trace-id";

task_local! {
    static CURRENT: TraceId;
}

/// Per-request trace identifier.
///
/// # Examples
/// ```
/// use activities_backend::TraceId;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let id: TraceId = "6f1c1e36-2a47-4b7e-9d53-3f5d8f0f3b7a".parse().unwrap();
/// let seen = TraceId::scope(id, async { TraceId::current() }).await;
/// assert_eq!(seen, Some(id));
/// # });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Random v4 identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Adopt an identifier supplied by an upstream caller.
    ///
    /// Returns `None` unless the value is a well-formed, non-nil UUID.
    #[must_use]
    pub fn from_header_value(value: &str) -> Option<Self> {
        Uuid::parse_str(value.trim())
            .ok()
            .filter(|uuid| !uuid.is_nil())
            .map(Self)
    }

    /// The identifier in scope for the running task, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Run `fut` with `trace_id` in scope.
    pub async fn scope<Fut>(trace_id: Self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        CURRENT.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;
    use rstest::rstest;

    #[tokio::test]
    async fn scope_exposes_identifier() {
        let id = TraceId::generate();
        let seen = TraceId::scope(id, async { TraceId::current() }).await;
        assert_eq!(seen, Some(id));
    }

    #[tokio::test]
    async fn nested_scope_shadows_outer() {
        let outer = TraceId::generate();
        let inner = TraceId::generate();
        let seen = TraceId::scope(outer, async move {
            TraceId::scope(inner, async { TraceId::current() }).await
        })
        .await;
        assert_eq!(seen, Some(inner));
    }

    #[test]
    fn current_is_none_outside_scope() {
        assert!(TraceId::current().is_none());
    }

    #[rstest]
    #[case("not-a-uuid")]
    #[case("")]
    #[case("00000000-0000-0000-0000-000000000000")]
    fn header_values_rejected(#[case] raw: &str) {
        assert!(TraceId::from_header_value(raw).is_none());
    }

    #[test]
    fn header_value_accepted_with_padding() {
        let uuid = Uuid::new_v4();
        let parsed = TraceId::from_header_value(&format!(" {uuid} ")).expect("valid header");
        assert_eq!(parsed.as_uuid(), &uuid);
    }
}
