//! HTML page scaffolds.
//!
//! Protected pages run the same guard: resolve the session, then, for
//! portal pages, apply the section access policy. Failures of either step
//! answer `303 See Other` instead of rendering.

use actix_web::http::header::LOCATION;
use actix_web::{HttpRequest, HttpResponse, get, web};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::domain::{
    AccessDecision, Collation, Error, Portal, SessionResult, SessionUser, client_document_options,
    resolve_home_path, role_access_matrix, sanitize_next_path,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::render::Page;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((LOCATION, location.to_owned()))
        .finish()
}

fn requested_path(req: &HttpRequest) -> String {
    req.uri()
        .path_and_query()
        .map_or_else(|| req.path().to_owned(), |pq| pq.as_str().to_owned())
}

fn parse_portal(raw: &str) -> ApiResult<Portal> {
    raw.parse()
        .map_err(|_| Error::not_found(format!("unknown portal: {raw}")))
}

/// Resolve the user for a protected page or produce the redirect.
///
/// `portal = None` is the redirecting form: any signed-in user passes,
/// roles or not, and the generic login page is used.
async fn guard(
    state: &HttpState,
    session: &SessionContext,
    req: &HttpRequest,
    portal: Option<Portal>,
) -> ApiResult<Result<SessionUser, HttpResponse>> {
    let raw = session.raw_user_id();
    let return_path = requested_path(req);
    let result = match portal {
        Some(portal) => {
            state
                .gate
                .require_portal_session(raw.as_deref(), portal, Some(&return_path))
                .await?
        }
        None => state.gate.require_session(raw.as_deref(), &return_path).await?,
    };
    let user = match result {
        SessionResult::Authenticated(user) => user,
        SessionResult::Unauthenticated { login_path } => {
            debug!(path = req.path(), login = %login_path, "page requires sign-in");
            return Ok(Err(see_other(&login_path)));
        }
    };
    if portal.is_none() {
        return Ok(Ok(user));
    }
    match state.access.check(req.path(), user.roles()).await {
        AccessDecision::Allowed => Ok(Ok(user)),
        AccessDecision::Denied { redirect_to } => {
            debug!(path = req.path(), user_id = %user.id(), "section denied");
            Ok(Err(see_other(&redirect_to)))
        }
    }
}

/// Unwrap a guard outcome, returning early with the redirect.
macro_rules! guarded {
    ($outcome:expr) => {
        match $outcome {
            Ok(user) => user,
            Err(redirect) => return Ok(redirect),
        }
    };
}

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    next: Option<String>,
}

/// Public landing page.
#[get("/")]
pub async fn landing() -> HttpResponse {
    let logins: Vec<(String, String)> = Portal::ALL
        .into_iter()
        .map(|portal| (portal.label().to_owned(), portal.login_path()))
        .collect();
    Page::new("Fast Lease")
        .paragraph("Car leasing for drivers, partners and investors in the UAE.")
        .links([("Apply for a lease", "/apply"), ("Sign in", "/login")])
        .heading("Portals")
        .links(logins.iter().map(|(label, href)| (label.as_str(), href.as_str())))
        .into_response()
}

/// Lease application; any signed-in user may apply.
#[get("/apply")]
pub async fn apply(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let user = guarded!(guard(&state, &session, &req, None).await?);
    let documents = client_document_options(Collation::default());
    Ok(Page::new("Lease application")
        .paragraph(&format!("Applicant: {}", user.display_name()))
        .heading("Documents")
        .list(documents.iter().map(|option| option.label.as_str()))
        .into_response())
}

fn login_page(portal: Option<Portal>, next: Option<&str>) -> HttpResponse {
    let title = portal.map_or_else(
        || "Sign in".to_owned(),
        |portal| format!("Sign in: {}", portal.label()),
    );
    let mut page = Page::new(title).paragraph("POST /api/auth/login with email and password.");
    if let Some(next) = next {
        page = page.details([("Continue to", next)]);
    }
    page.into_response()
}

/// Generic sign-in page; signed-in users holding a role go to their home
/// path and `next` is dropped.
#[get("/login")]
pub async fn login_page_generic(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<LoginQuery>,
) -> ApiResult<HttpResponse> {
    let next = sanitize_next_path(query.next.as_deref());
    let raw = session.raw_user_id();
    let signed_in = state.gate.current_user(raw.as_deref()).await?;
    if let Some(user) = signed_in.filter(|user| !user.roles().is_empty()) {
        return Ok(see_other(resolve_home_path(user.roles(), "/")));
    }
    Ok(login_page(None, next))
}

/// Portal sign-in page.
#[get("/login/{portal}")]
pub async fn login_page_for_portal(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<LoginQuery>,
) -> ApiResult<HttpResponse> {
    let portal = parse_portal(&path)?;
    let next = sanitize_next_path(query.next.as_deref());
    let raw = session.raw_user_id();
    let signed_in = state.gate.current_user(raw.as_deref()).await?;
    if signed_in.is_some_and(|user| user.can_enter(portal)) {
        let home = portal.home_path();
        return Ok(see_other(next.unwrap_or(&home)));
    }
    Ok(login_page(Some(portal), next))
}

/// Portal dashboard.
#[get("/{portal}/dashboard")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let portal = parse_portal(&path)?;
    let user = guarded!(guard(&state, &session, &req, Some(portal)).await?);
    let portals: Vec<(&str, String)> = user
        .portals()
        .iter()
        .map(|portal| (portal.label(), portal.home_path()))
        .collect();
    Ok(Page::new(format!("{} dashboard", portal.label()))
        .paragraph(&format!("Signed in as {}", user.display_name()))
        .heading("Your portals")
        .links(portals.iter().map(|(label, href)| (*label, href.as_str())))
        .into_response())
}

/// Profile card of the signed-in user.
#[get("/{portal}/profile")]
pub async fn profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let portal = parse_portal(&path)?;
    let user = guarded!(guard(&state, &session, &req, Some(portal)).await?);
    let data = state.profiles.profile_page_data(&user).await?;
    Ok(Page::new("Profile")
        .details([
            ("Full name", data.full_name.as_str()),
            ("E-mail", data.email.as_str()),
            ("Phone", data.phone.as_str()),
            ("Timezone", data.timezone.as_str()),
        ])
        .into_response())
}

fn listing_page(title: &str, records: &[Value]) -> HttpResponse {
    Page::new(title)
        .paragraph(&format!("{} records", records.len()))
        .into_response()
}

macro_rules! ops_listing_page {
    ($name:ident, $route:literal, $title:literal, $query:ident) => {
        #[doc = concat!("Operations listing: ", $title, ".")]
        #[get($route)]
        pub async fn $name(
            state: web::Data<HttpState>,
            session: SessionContext,
            req: HttpRequest,
        ) -> ApiResult<HttpResponse> {
            guarded!(guard(&state, &session, &req, Some(Portal::Ops)).await?);
            let records = state.operations.$query().await?;
            Ok(listing_page($title, &records))
        }
    };
}

ops_listing_page!(ops_cars, "/ops/cars", "Cars", cars);
ops_listing_page!(ops_clients, "/ops/clients", "Clients", clients);
ops_listing_page!(ops_sellers, "/ops/sellers", "Sellers", sellers);
ops_listing_page!(ops_brokers, "/ops/brokers", "Brokers", brokers);

/// Role access matrix summary.
#[get("/admin/roles")]
pub async fn admin_roles(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    guarded!(guard(&state, &session, &req, Some(Portal::Admin)).await?);
    let rules = state.role_access.rules().await?;
    let matrix = role_access_matrix(&rules);
    let rows: Vec<String> = matrix
        .sections
        .iter()
        .map(|section| {
            let granted: Vec<&str> = section
                .grants
                .iter()
                .filter(|(_, allowed)| **allowed)
                .map(|(role, _)| role.code())
                .collect();
            let marker = if section.has_override { " (custom)" } else { "" };
            format!("{}{marker}: {}", section.id, granted.join(", "))
        })
        .collect();
    Ok(Page::new("Roles and access").list(rows).into_response())
}

/// Register every page route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(landing)
        .service(apply)
        .service(login_page_generic)
        .service(login_page_for_portal)
        .service(ops_cars)
        .service(ops_clients)
        .service(ops_sellers)
        .service(ops_brokers)
        .service(admin_roles)
        .service(dashboard)
        .service(profile);
}
