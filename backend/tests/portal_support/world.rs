//! In-process portal application shared by the behaviour suites.
//!
//! The world owns a single-threaded Tokio runtime plus a `LocalSet` so actix
//! test services can be driven from synchronous step functions.

use std::cell::RefCell;

use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::http::header;
use actix_web::{test, web, App};
use portal_backend::inbound::http::state::{HttpState, HttpStatePorts};
use portal_backend::inbound::http::{admin, auth, operations, pages};
use portal_backend::Trace;
use serde_json::Value;
use tokio::runtime::Runtime;
use tokio::task::LocalSet;

/// Last response observed by a step.
#[derive(Debug, Default)]
pub(crate) struct Recorded {
    pub(crate) status: u16,
    pub(crate) location: Option<String>,
    pub(crate) body: String,
}

impl Recorded {
    pub(crate) fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("response body is JSON")
    }
}

pub(crate) struct PortalWorld {
    runtime: Runtime,
    local: LocalSet,
    state: web::Data<HttpState>,
    key: Key,
    cookie: RefCell<Option<Cookie<'static>>>,
    last: RefCell<Option<Recorded>>,
}

impl PortalWorld {
    pub(crate) fn new(ports: HttpStatePorts) -> Self {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime builds");
        Self {
            runtime,
            local: LocalSet::new(),
            state: web::Data::new(HttpState::new(ports)),
            key: Key::generate(),
            cookie: RefCell::new(None),
            last: RefCell::new(None),
        }
    }

    /// Send `request`, carrying the current session cookie when present.
    pub(crate) fn send(&self, request: test::TestRequest) {
        let request = match self.cookie.borrow().clone() {
            Some(cookie) => request.cookie(cookie),
            None => request,
        };
        let state = self.state.clone();
        let key = self.key.clone();
        let (recorded, cookie) = self.local.block_on(&self.runtime, async move {
            let app = test::init_service(portal_app(state, key)).await;
            let response = test::call_service(&app, request.to_request()).await;
            let cookie = response
                .response()
                .cookies()
                .find(|cookie| cookie.name() == "session")
                .map(Cookie::into_owned);
            let status = response.status().as_u16();
            let location = response
                .headers()
                .get(header::LOCATION)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);
            let bytes = test::read_body(response).await;
            let body = String::from_utf8_lossy(&bytes).into_owned();
            (
                Recorded {
                    status,
                    location,
                    body,
                },
                cookie,
            )
        });
        if let Some(cookie) = cookie {
            self.cookie.replace(Some(cookie));
        }
        self.last.replace(Some(recorded));
    }

    pub(crate) fn sign_in(&self, email: &str) {
        self.send(
            test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(serde_json::json!({ "email": email, "password": "password" })),
        );
        assert_eq!(self.last().status, 200, "sign-in for {email}");
        assert!(self.cookie.borrow().is_some(), "session cookie issued");
    }

    pub(crate) fn last(&self) -> std::cell::Ref<'_, Recorded> {
        std::cell::Ref::map(self.last.borrow(), |last| {
            last.as_ref().expect("a request was sent")
        })
    }
}

fn session_middleware(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(false)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(SameSite::Lax)
        .session_lifecycle(PersistentSession::default().session_ttl(Duration::minutes(30)))
        .build()
}

fn portal_app(
    state: web::Data<HttpState>,
    key: Key,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .wrap(session_middleware(key))
        .wrap(Trace)
        .service(
            web::scope("/api")
                .service(auth::detect_portal)
                .service(auth::login)
                .service(auth::logout)
                .service(operations::list_cars)
                .service(operations::list_clients)
                .service(operations::list_sellers)
                .service(operations::list_brokers)
                .service(admin::create_user)
                .service(admin::get_permissions)
                .service(admin::update_permissions),
        )
        .configure(pages::configure)
}
