//! Typed request dispatch.
//!
//! Every operation is a [`Request`] type with one registered [`Handler`].
//! The [`Dispatcher`] resolves that handler by the request's static type,
//! enforces authentication, runs the request's validation rules, and only
//! then hands the request over. Validation failures short-circuit into an
//! [`Outcome::Failure`]; faults travel on the `Err` side untouched.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, warn};

use super::{
    Anonymous, AuthenticatedUser, CancellationSignal, Fault, IdentityResolver, Outcome, RuleSet,
    Username, Validate,
};

/// An operation that can be dispatched.
pub trait Request: Validate + Send + 'static {
    /// Payload of a successful outcome.
    type Output: Send + 'static;
    /// Name used in logs and fault messages.
    const NAME: &'static str;
    /// Whether dispatch requires a resolvable caller identity.
    const REQUIRES_AUTHENTICATION: bool = true;
}

/// Executes one request type.
#[async_trait]
pub trait Handler<R: Request>: Send + Sync {
    /// Execute `request` for the caller described by `context`.
    async fn handle(
        &self,
        request: R,
        context: &RequestContext,
    ) -> Result<Outcome<R::Output>, Fault>;
}

/// Per-request ambient state handed to handlers.
#[derive(Clone)]
pub struct RequestContext {
    identity: Arc<dyn IdentityResolver>,
    cancellation: CancellationSignal,
}

impl RequestContext {
    /// Context resolving identity through `identity`.
    pub fn new(identity: Arc<dyn IdentityResolver>, cancellation: CancellationSignal) -> Self {
        Self {
            identity,
            cancellation,
        }
    }

    /// Context for `username` with a fresh cancellation signal.
    pub fn authenticated(username: Username) -> Self {
        Self::new(
            Arc::new(AuthenticatedUser::new(username)),
            CancellationSignal::new(),
        )
    }

    /// Context without a caller.
    pub fn anonymous() -> Self {
        Self::new(Arc::new(Anonymous), CancellationSignal::new())
    }

    /// Replace the cancellation signal.
    #[must_use]
    pub fn with_cancellation(mut self, cancellation: CancellationSignal) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Resolver for the calling user.
    pub fn identity(&self) -> &dyn IdentityResolver {
        self.identity.as_ref()
    }

    /// Signal tripped when the caller goes away.
    pub fn cancellation(&self) -> &CancellationSignal {
        &self.cancellation
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("cancelled", &self.cancellation.is_cancelled())
            .finish_non_exhaustive()
    }
}

struct Registration<R: Request> {
    rules: RuleSet<R>,
    handler: Arc<dyn Handler<R>>,
}

/// Collects handler registrations before the dispatcher is frozen.
///
/// # Examples
/// ```
/// use activities_backend::domain::{Dispatcher, EditProfile, EditProfileHandler};
/// use activities_backend::outbound::InMemoryProfileStore;
/// use std::sync::Arc;
///
/// let store = Arc::new(InMemoryProfileStore::default());
/// let dispatcher = Dispatcher::builder()
///     .register::<EditProfile, _>(EditProfileHandler::new(store))
///     .build();
/// assert!(dispatcher.handles::<EditProfile>());
/// ```
#[derive(Default)]
pub struct DispatcherBuilder {
    registrations: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    names: Vec<&'static str>,
}

impl DispatcherBuilder {
    /// Register `handler` for `R`, building `R`'s rule set now. A second
    /// registration for the same type replaces the first.
    #[must_use]
    pub fn register<R, H>(mut self, handler: H) -> Self
    where
        R: Request,
        H: Handler<R> + 'static,
    {
        let registration = Registration::<R> {
            rules: R::rules(),
            handler: Arc::new(handler),
        };
        if self
            .registrations
            .insert(TypeId::of::<R>(), Box::new(registration))
            .is_some()
        {
            warn!(request = R::NAME, "replacing existing handler registration");
        } else {
            self.names.push(R::NAME);
        }
        self
    }

    /// Freeze the registrations.
    pub fn build(self) -> Dispatcher {
        debug!(requests = ?self.names, "dispatcher built");
        Dispatcher {
            registrations: self.registrations,
            names: self.names,
        }
    }
}

/// Immutable routing table from request type to handler.
pub struct Dispatcher {
    registrations: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    names: Vec<&'static str>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("requests", &self.names)
            .finish()
    }
}

impl Dispatcher {
    /// Start an empty registration table.
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::default()
    }

    /// Whether a handler is registered for `R`.
    pub fn handles<R: Request>(&self) -> bool {
        self.registration::<R>().is_some()
    }

    fn registration<R: Request>(&self) -> Option<&Registration<R>> {
        self.registrations
            .get(&TypeId::of::<R>())
            .and_then(|entry| entry.downcast_ref::<Registration<R>>())
    }

    /// Run `request` through authentication, validation and its handler.
    ///
    /// # Errors
    /// Returns a [`Fault`] when no handler is registered, the context has no
    /// identity for a request that needs one, the request was cancelled, or
    /// the handler itself faults.
    pub async fn dispatch<R: Request>(
        &self,
        request: R,
        context: &RequestContext,
    ) -> Result<Outcome<R::Output>, Fault> {
        debug!(request = R::NAME, "dispatching");
        let result = self.run(request, context).await;
        match &result {
            Err(fault @ Fault::Cancelled) => {
                warn!(request = R::NAME, error = %fault, "dispatch abandoned");
            }
            Err(fault) => error!(request = R::NAME, error = %fault, "dispatch faulted"),
            Ok(_) => {}
        }
        result
    }

    async fn run<R: Request>(
        &self,
        request: R,
        context: &RequestContext,
    ) -> Result<Outcome<R::Output>, Fault> {
        let registration = self
            .registration::<R>()
            .ok_or(Fault::Unregistered { request: R::NAME })?;

        if R::REQUIRES_AUTHENTICATION {
            context.identity().current_username()?;
        }

        let violations = registration.rules.validate(&request);
        if !violations.is_empty() {
            debug!(
                request = R::NAME,
                violations = violations.len(),
                "request failed validation"
            );
            return Ok(Outcome::invalid(violations));
        }

        context.cancellation().ensure_active()?;
        registration.handler.handle(request, context).await
    }
}
