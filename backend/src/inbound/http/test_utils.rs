//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::HttpResponse;
use actix_web::dev::ServiceResponse;

use crate::domain::{Error, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;

/// Session middleware with a fresh key, cookie name `session` and no
/// `Secure` flag so plain-HTTP test requests keep the cookie.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The `session` cookie set by `response`, if any.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}

/// `Location` header of a redirect response.
pub fn location<B>(response: &ServiceResponse<B>) -> Option<String> {
    response
        .headers()
        .get(actix_web::http::header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

/// Test-only route storing the path's user id in the session.
#[actix_web::post("/test/session/{id}")]
pub async fn sign_in_as(
    session: SessionContext,
    path: actix_web::web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = UserId::new(path.as_str()).map_err(|err| Error::invalid_request(err.to_string()))?;
    session.persist_user(&id)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Session cookie for `user_id`, minted through [`sign_in_as`].
///
/// # Panics
/// Panics when the app does not mount [`sign_in_as`].
pub async fn cookie_for(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = ServiceResponse,
        Error = actix_web::Error,
    >,
    user_id: &str,
) -> Cookie<'static> {
    let response = actix_web::test::call_service(
        app,
        actix_web::test::TestRequest::post()
            .uri(&format!("/test/session/{user_id}"))
            .to_request(),
    )
    .await;
    session_cookie(&response).expect("session cookie")
}
