//! Shared helpers for HTTP adapter tests.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;

use crate::domain::ports::{FixtureLoginService, ProfileStore};
use crate::domain::{
    Dispatcher, EditProfile, EditProfileHandler, ProfileDetails, ProfileDetailsHandler,
};
use crate::inbound::http::state::HttpState;

/// Cookie session middleware with a throwaway key and `Secure` disabled so
/// plain-HTTP test requests keep the cookie.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The session cookie set by `response`.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// HTTP state wired to `store` with the fixture login service.
pub fn http_state(store: Arc<dyn ProfileStore>) -> HttpState {
    let dispatcher = Dispatcher::builder()
        .register::<EditProfile, _>(EditProfileHandler::new(Arc::clone(&store)))
        .register::<ProfileDetails, _>(ProfileDetailsHandler::new(store))
        .build();
    HttpState::new(Arc::new(FixtureLoginService), Arc::new(dispatcher))
}
