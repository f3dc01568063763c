//! Profile endpoints.
//!
//! ```text
//! PUT /api/v1/profiles {"displayName":"Bobby","bio":"Trail runner"}
//! GET /api/v1/profiles/{username}
//! ```
//!
//! Each request gets its own [`CancellationSignal`]. Actix drops the handler
//! future when the client disconnects; the drop guard then cancels the
//! signal so in-flight store work stops before commit.

use actix_web::{HttpResponse, get, put, web};

use crate::domain::{
    CancellationSignal, EditProfile, Error, Outcome, ProfileDetails, Request, UserProfile,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::failure_to_error;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

async fn dispatch<R: Request>(
    state: &HttpState,
    session: &SessionContext,
    request: R,
) -> ApiResult<Outcome<R::Output>> {
    dispatch_until_dropped(state, session, request, CancellationSignal::new()).await
}

/// Dispatch `request`, cancelling `cancellation` if this future is dropped
/// before the dispatcher answers.
async fn dispatch_until_dropped<R: Request>(
    state: &HttpState,
    session: &SessionContext,
    request: R,
    cancellation: CancellationSignal,
) -> ApiResult<Outcome<R::Output>> {
    let guard = cancellation.cancel_on_drop();
    let context = session.request_context(cancellation)?;

    let result = state.dispatcher.dispatch(request, &context).await;
    guard.disarm();
    result.map_err(Error::from)
}

fn settle<T>(outcome: Outcome<T>) -> ApiResult<T> {
    outcome
        .into_result()
        .map_err(|failure| failure_to_error(&failure))
}

/// Update the caller's display name and bio. Absent fields are unchanged.
#[utoipa::path(
    put,
    path = "/api/v1/profiles",
    request_body = EditProfile,
    responses(
        (status = 200, description = "Profile updated"),
        (status = 400, description = "Validation failed or nothing was written", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "Store unavailable or request abandoned", body = Error)
    ),
    tags = ["profiles"],
    operation_id = "editProfile"
)]
#[put("/profiles")]
pub async fn edit_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<EditProfile>,
) -> ApiResult<HttpResponse> {
    settle(dispatch(&state, &session, payload.into_inner()).await?)?;
    Ok(HttpResponse::Ok().finish())
}

/// Fetch a user's public profile.
#[utoipa::path(
    get,
    path = "/api/v1/profiles/{username}",
    params(("username" = String, Path, description = "Profile owner")),
    responses(
        (status = 200, description = "Profile", body = UserProfile),
        (status = 400, description = "Invalid username", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "No such profile", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["profiles"],
    operation_id = "getProfile"
)]
#[get("/profiles/{username}")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserProfile>> {
    let username = path.into_inner();
    let outcome = dispatch(&state, &session, ProfileDetails { username }).await?;
    settle(outcome.map(|found| found.map(web::Json)))?
        .ok_or_else(|| Error::not_found("profile not found"))
}
