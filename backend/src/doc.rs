//! OpenAPI document for the REST API.
//!
//! Served through Swagger UI in debug builds and printed by the
//! `openapi-dump` binary.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{EditProfile, Error, ErrorCode, UserProfile, ValidationViolation};
use crate::inbound::http::users::LoginRequest;

struct SessionCookieScheme;

impl Modify for SessionCookieScheme {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default)
            .add_security_scheme(
                "SessionCookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    "session",
                    "Session cookie issued by POST /api/v1/login.",
                ))),
            );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SessionCookieScheme),
    info(
        title = "Activities backend API",
        description = "Session-authenticated profile management and health probes."
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::profiles::edit_profile,
        crate::inbound::http::profiles::get_profile,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        EditProfile,
        LoginRequest,
        UserProfile,
        ValidationViolation
    )),
    tags(
        (name = "users", description = "Authentication"),
        (name = "profiles", description = "User profiles"),
        (name = "health", description = "Orchestration probes")
    )
)]
/// OpenAPI document for the public HTTP surface.
pub struct ApiDoc;
