//! Sign-in API: portal detection, password login and logout.
//!
//! ```text
//! POST /api/auth/detect {"email":"ops@fastlease.ae","next":"/ops/cars"}
//! POST /api/auth/login  {"email":"ops@fastlease.ae","password":"password"}
//! POST /api/auth/logout
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{
    Error, FieldErrors, LoginCredentials, LoginValidationError, Portal, PortalDetection,
    sanitize_next_path,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Body of `POST /api/auth/detect`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DetectPortalRequest {
    pub email: String,
    #[serde(default)]
    pub next: Option<String>,
}

/// Body of `POST /api/auth/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
}

/// Where the client should navigate next.
#[derive(Debug, Deserialize, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PortalRedirect {
    pub portal: Portal,
    pub redirect_to: String,
}

impl PortalRedirect {
    fn from_detection(detection: &PortalDetection, next: Option<&str>) -> Self {
        Self {
            portal: detection.portal,
            redirect_to: detection.redirect_path(sanitize_next_path(next)),
        }
    }
}

fn validation_error(error: LoginValidationError) -> Error {
    Error::validation(&FieldErrors::from(error))
}

/// Suggest the portal an e-mail address belongs to.
#[utoipa::path(
    post,
    path = "/api/auth/detect",
    request_body = DetectPortalRequest,
    responses(
        (status = 200, description = "Detected portal", body = PortalRedirect),
        (status = 400, description = "Blank e-mail", body = Error),
        (status = 503, description = "User directory unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "detectPortal",
    security([])
)]
#[post("/auth/detect")]
pub async fn detect_portal(
    state: web::Data<HttpState>,
    payload: web::Json<DetectPortalRequest>,
) -> ApiResult<web::Json<PortalRedirect>> {
    let email = payload.email.trim().to_lowercase();
    if email.is_empty() {
        return Err(validation_error(LoginValidationError::EmptyEmail));
    }
    let detection = state.portal_detector.detect(&email).await?;
    Ok(web::Json(PortalRedirect::from_detection(
        &detection,
        payload.next.as_deref(),
    )))
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = PortalRedirect,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Blank e-mail or password", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 503, description = "Auth service unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<PortalRedirect>> {
    let credentials = LoginCredentials::try_from_parts(&payload.email, &payload.password)
        .map_err(validation_error)?;
    let user = state.login.authenticate(&credentials).await?;
    session.persist_user(&user.id)?;

    let detection = PortalDetection::from_roles(user.roles, &user.email);
    info!(user_id = %user.id, portal = %detection.portal, "user signed in");
    Ok(web::Json(PortalRedirect::from_detection(
        &detection,
        payload.next.as_deref(),
    )))
}

/// Drop the session cookie.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 204, description = "Signed out")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::state::HttpStatePorts;
    use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use rstest_bdd_macros::{given, then, when};
    use serde_json::{Value, json};

    fn test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(HttpState::new(HttpStatePorts::fixtures())))
            .wrap(test_session_middleware())
            .service(
                web::scope("/api")
                    .service(detect_portal)
                    .service(login)
                    .service(logout),
            )
    }

    async fn post_json(uri: &str, body: Value) -> (StatusCode, Value, bool) {
        let app = actix_test::init_service(test_app()).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post().uri(uri).set_json(&body).to_request(),
        )
        .await;
        let status = response.status();
        let has_cookie = session_cookie(&response).is_some();
        let bytes = actix_test::read_body(response).await;
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value, has_cookie)
    }

    #[rstest]
    #[case("ops@fastlease.ae", None, "ops", "/ops/dashboard")]
    #[case("someone@fastlease.ae", None, "ops", "/ops/dashboard")]
    #[case("driver@example.com", Some("/client/deals"), "client", "/client/deals")]
    #[case("driver@example.com", Some("//evil.example"), "client", "/client/dashboard")]
    #[actix_web::test]
    async fn detect_returns_portal_and_redirect(
        #[case] email: &str,
        #[case] next: Option<&str>,
        #[case] portal: &str,
        #[case] redirect: &str,
    ) {
        let (status, body, _) =
            post_json("/api/auth/detect", json!({ "email": email, "next": next })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "portal": portal, "redirectTo": redirect }));
    }

    #[rstest]
    #[actix_web::test]
    async fn blank_email_is_a_field_error() {
        let (status, body, _) =
            post_json("/api/auth/login", json!({ "email": "  ", "password": "x" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body.pointer("/details/fieldErrors/email/0").and_then(Value::as_str),
            Some("email must not be empty")
        );
    }

    #[given("the admin fixture credentials")]
    fn the_admin_fixture_credentials() -> Value {
        json!({ "email": "admin@fastlease.ae", "password": "password" })
    }

    #[when("the password is entered with a return path")]
    fn the_password_is_entered_with_a_return_path(mut body: Value) -> Value {
        if let Some(fields) = body.as_object_mut() {
            fields.insert("next".to_owned(), json!("  "));
        }
        body
    }

    #[then("a session cookie is issued with the admin home path")]
    fn a_session_cookie_is_issued(result: (StatusCode, Value, bool)) {
        let (status, body, has_cookie) = result;
        assert_eq!(status, StatusCode::OK);
        assert!(has_cookie);
        assert_eq!(body, json!({ "portal": "admin", "redirectTo": "/admin/bpm" }));
    }

    #[rstest]
    #[actix_web::test]
    async fn admin_sign_in_sets_session() {
        let body = the_password_is_entered_with_a_return_path(the_admin_fixture_credentials());
        let result = post_json("/api/auth/login", body).await;
        a_session_cookie_is_issued(result);
    }

    #[rstest]
    #[actix_web::test]
    async fn wrong_password_is_unauthorised() {
        let (status, _, has_cookie) = post_json(
            "/api/auth/login",
            json!({ "email": "admin@fastlease.ae", "password": "nope" }),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(!has_cookie);
    }
}
