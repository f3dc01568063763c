//! Cookie session access for handlers.
//!
//! Handlers never touch `actix_session::Session` directly; they persist or
//! require a [`Username`] through [`SessionContext`] and turn it into a
//! dispatch [`RequestContext`].

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{CancellationSignal, Error, RequestContext, Username};

pub(crate) const USERNAME_KEY: &str = "username";

/// Typed view over the cookie session.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Wrap an extracted session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store the authenticated username, rotating the session identifier.
    pub fn persist_user(&self, username: &Username) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USERNAME_KEY, username.as_str())
            .map_err(|err| Error::internal(format!("failed to persist session: {err}")))
    }

    /// Username stored in the cookie. Tampered values read as absent.
    pub fn username(&self) -> Result<Option<Username>, Error> {
        let raw = self
            .0
            .get::<String>(USERNAME_KEY)
            .map_err(|err| Error::internal(format!("failed to read session: {err}")))?;
        Ok(raw.and_then(|value| {
            Username::new(value)
                .inspect_err(|err| warn!(error = %err, "invalid username in session cookie"))
                .ok()
        }))
    }

    /// The session username, or `401 Unauthorized`.
    pub fn require_username(&self) -> Result<Username, Error> {
        self.username()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Dispatch context for the authenticated caller.
    pub fn request_context(&self, cancellation: CancellationSignal) -> Result<RequestContext, Error> {
        let username = self.require_username()?;
        Ok(RequestContext::authenticated(username).with_cancellation(cancellation))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let session = Session::from_request(req, payload);
        Box::pin(async move { session.await.map(Self::new) })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;
    use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    async fn whoami(session: SessionContext) -> Result<HttpResponse, Error> {
        let context = session.request_context(CancellationSignal::new())?;
        let username = context
            .identity()
            .current_username()
            .map_err(Error::from)?;
        Ok(HttpResponse::Ok().body(username.to_string()))
    }

    #[actix_web::test]
    async fn persisted_username_builds_request_context() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/login",
                    web::get().to(|session: SessionContext| async move {
                        let username = Username::new("jane").expect("valid username");
                        session.persist_user(&username)?;
                        Ok::<_, Error>(HttpResponse::Ok().finish())
                    }),
                )
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let login = test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;
        let cookie = session_cookie(&login);
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/whoami").cookie(cookie).to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(test::read_body(res).await, "jane");
    }

    #[actix_web::test]
    async fn missing_session_is_unauthorised() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route("/whoami", web::get().to(whoami)),
        )
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/whoami").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn tampered_username_is_unauthorised() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/plant",
                    web::get().to(|session: Session| async move {
                        session
                            .insert(USERNAME_KEY, "  ")
                            .expect("insert raw value");
                        HttpResponse::Ok().finish()
                    }),
                )
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let plant = test::call_service(&app, test::TestRequest::get().uri("/plant").to_request()).await;
        let cookie = session_cookie(&plant);
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/whoami").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
