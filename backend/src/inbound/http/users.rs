//! Login endpoint.
//!
//! ```text
//! POST /api/v1/login {"username":"bob","password":"Pa$$w0rd"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::domain::{Error, LoginCredentials, LoginValidationError, UsernameValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Account name.
    pub username: String,
    /// Plain-text password; never logged.
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

/// Authenticate and establish a session cookie.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let username = state.login.authenticate(&credentials).await?;
    session.persist_user(&username)?;
    info!(%username, "user logged in");
    Ok(HttpResponse::Ok().finish())
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    let (field, code) = match &err {
        LoginValidationError::Username(UsernameValidationError::Empty) => {
            ("username", "empty_username")
        }
        LoginValidationError::Username(UsernameValidationError::SurroundingWhitespace) => {
            ("username", "invalid_username")
        }
        LoginValidationError::EmptyPassword => ("password", "empty_password"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;
    use crate::domain::ports::{DEMO_PASSWORD, MockLoginService};
    use crate::inbound::http::test_utils::{http_state, test_session_middleware};
    use crate::outbound::InMemoryProfileStore;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::Value;
    use std::sync::Arc;

    fn request(username: &str, password: &str) -> actix_http::Request {
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(&LoginRequest {
                username: username.into(),
                password: password.into(),
            })
            .to_request()
    }

    fn fixture_state() -> HttpState {
        http_state(Arc::new(InMemoryProfileStore::default()))
    }

    #[rstest]
    #[case("   ", "secret", "username", "empty_username")]
    #[case("bob", "", "password", "empty_password")]
    #[actix_web::test]
    async fn login_rejects_malformed_credentials(
        #[case] username: &str,
        #[case] password: &str,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(fixture_state()))
                .wrap(test_session_middleware())
                .service(web::scope("/api/v1").service(login)),
        )
        .await;

        let res = actix_test::call_service(&app, request(username, password)).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let value: Value =
            serde_json::from_slice(&actix_test::read_body(res).await).expect("error payload");
        assert_eq!(value["code"], "invalid_request");
        assert_eq!(value["details"]["field"], field);
        assert_eq!(value["details"]["code"], code);
    }

    #[rstest]
    #[case("bob", "wrong")]
    #[case("mallory", DEMO_PASSWORD)]
    #[actix_web::test]
    async fn login_rejects_unknown_credentials(#[case] username: &str, #[case] password: &str) {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(fixture_state()))
                .wrap(test_session_middleware())
                .service(web::scope("/api/v1").service(login)),
        )
        .await;

        let res = actix_test::call_service(&app, request(username, password)).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert!(res.response().cookies().next().is_none());
    }

    #[actix_web::test]
    async fn login_sets_session_cookie() {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(fixture_state()))
                .wrap(test_session_middleware())
                .service(web::scope("/api/v1").service(login)),
        )
        .await;

        let res = actix_test::call_service(&app, request("bob", DEMO_PASSWORD)).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.response().cookies().any(|c| c.name() == "session"));
    }

    #[actix_web::test]
    async fn login_delegates_to_login_port() {
        let mut service = MockLoginService::new();
        service
            .expect_authenticate()
            .withf(|creds| creds.username().as_str() == "carol" && creds.password() == "hunter2")
            .times(1)
            .returning(|creds| Ok(creds.username().clone()));
        let mut state = fixture_state();
        state.login = Arc::new(service);
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .wrap(test_session_middleware())
                .service(web::scope("/api/v1").service(login)),
        )
        .await;

        let res = actix_test::call_service(&app, request(" carol ", "hunter2")).await;

        assert_eq!(res.status(), StatusCode::OK);
    }
}
