//! OpenAPI document for the JSON API.
//!
//! Served by Swagger UI at `/docs` in debug builds and printed by the
//! `openapi-dump` binary. HTML page routes are not part of the document.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    AdminUserStatus, AppRole, CreateUserResponse, Error, ErrorCode, MatrixGroup, MatrixSection,
    Portal, RoleAccessMatrix,
};
use crate::inbound::http::admin::PermissionChange;
use crate::inbound::http::auth::{DetectPortalRequest, LoginRequest, PortalRedirect};
use crate::inbound::http::health::{PortBackend, ProbeBody};

/// Registers the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/auth/login.",
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Fast Lease portal API",
        description = "Sign-in, operations listings and administration for the leasing portals."
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::detect_portal,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::operations::list_cars,
        crate::inbound::http::operations::list_clients,
        crate::inbound::http::operations::list_sellers,
        crate::inbound::http::operations::list_brokers,
        crate::inbound::http::admin::create_user,
        crate::inbound::http::admin::get_permissions,
        crate::inbound::http::admin::update_permissions,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        AppRole,
        Portal,
        DetectPortalRequest,
        LoginRequest,
        PortalRedirect,
        AdminUserStatus,
        CreateUserResponse,
        PermissionChange,
        RoleAccessMatrix,
        MatrixGroup,
        MatrixSection,
        ProbeBody,
        PortBackend,
    )),
    tags(
        (name = "auth", description = "Portal detection and sessions"),
        (name = "ops", description = "Operations listings"),
        (name = "admin", description = "User and access administration"),
        (name = "health", description = "Probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn object_has_field(schema: &RefOr<Schema>, field: &str) -> bool {
        match schema {
            RefOr::T(Schema::Object(obj)) => obj.properties.contains_key(field),
            _ => false,
        }
    }

    #[rstest]
    #[case("Error", "code")]
    #[case("Error", "traceId")]
    #[case("PortalRedirect", "redirectTo")]
    #[case("CreateUserResponse", "userId")]
    fn schemas_expose_camel_case_fields(#[case] schema: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let found = schemas.get(schema).expect("schema registered");
        assert!(object_has_field(found, field), "{schema} lacks {field}");
    }

    #[rstest]
    #[case("/api/auth/login")]
    #[case("/api/ops/cars")]
    #[case("/api/admin/roles/permissions")]
    #[case("/health/ready")]
    fn paths_are_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }
}
