//! Domain primitives, ports, and the request dispatch pipeline.
//!
//! Purpose: keep business rules free of transport and storage concerns.
//! Inbound adapters build a [`RequestContext`], hand a typed request to the
//! [`Dispatcher`], and translate the resulting [`Outcome`] or [`Fault`].
//!
//! Public surface:
//! - [`Outcome`] and [`Failure`]: expected business results.
//! - [`Fault`]: unexpected failures; converts into [`Error`].
//! - [`RuleSet`] and [`Validate`]: declarative request validation.
//! - [`Dispatcher`], [`Request`], [`Handler`]: typed routing.
//! - [`UserProfile`], [`Username`]: the profile aggregate.

pub mod auth;
pub mod cancellation;
pub mod dispatch;
pub mod error;
pub mod fault;
pub mod identity;
pub mod outcome;
pub mod ports;
pub mod profile;
pub mod profiles;
pub mod trace_id;
pub mod validation;

pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::cancellation::{CancelOnDrop, CancellationSignal};
pub use self::dispatch::{Dispatcher, DispatcherBuilder, Handler, Request, RequestContext};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::fault::Fault;
#[cfg(test)]
pub use self::identity::MockIdentityResolver;
pub use self::identity::{Anonymous, AuthenticatedUser, IdentityResolver};
pub use self::outcome::{Failure, Outcome, VALIDATION_FAILED};
pub use self::profile::{UserProfile, Username, UsernameValidationError, demo_profiles};
pub use self::profiles::{
    DISPLAY_NAME_MAX_CHARS, EDIT_FAILED, EditProfile, EditProfileHandler, ProfileDetails,
    ProfileDetailsHandler,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::validation::{RuleSet, Validate, ValidationViolation};
