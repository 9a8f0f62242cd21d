//! Administration API: account creation and the role access matrix.
//!
//! ```text
//! POST /api/admin/users              {"fullName":"Ann Lee","email":"a@b.com","role":"OP_MANAGER"}
//! GET  /api/admin/roles/permissions
//! POST /api/admin/roles/permissions  {"section":"workspace_cars","role":"CLIENT","allowed":true}
//! POST /api/admin/roles/permissions  {"section":"workspace_cars","action":"reset"}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{
    AccessSection, AdminCreateUserInput, AppRole, CreateUserRequest, CreateUserResponse, Error,
    FieldErrors, Portal, RoleAccessMatrix, RoleAccessRule, SessionUser, role_access_matrix,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

const EDITABLE_SECTION_PREFIX: &str = "workspace_";
const RESET_ACTION: &str = "reset";

/// Resolve the session user and require the ADMIN role.
async fn require_admin(state: &HttpState, session: &SessionContext) -> ApiResult<SessionUser> {
    let raw = session.raw_user_id();
    let Some(user) = state.gate.current_user(raw.as_deref()).await? else {
        return Err(Error::unauthorized("login required"));
    };
    if user.has_role(AppRole::Admin) {
        Ok(user)
    } else {
        Err(Error::forbidden("administrator role required"))
    }
}

fn field_error(field: &str, message: &str) -> Error {
    let mut errors = FieldErrors::default();
    errors.add(field, message);
    Error::validation(&errors)
}

/// Create a user account and assign its role.
#[utoipa::path(
    post,
    path = "/api/admin/users",
    request_body(content = Object, description = "fullName, email, role, sendInvite"),
    responses(
        (status = 201, description = "User created", body = CreateUserResponse),
        (status = 400, description = "Invalid payload", body = Error),
        (status = 401, description = "Not signed in", body = Error),
        (status = 403, description = "Not an administrator", body = Error),
        (status = 503, description = "Data service unavailable", body = Error)
    ),
    tags = ["admin"],
    operation_id = "createUser"
)]
#[post("/admin/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let admin = require_admin(&state, &session).await?;
    let input = AdminCreateUserInput::parse(&payload).map_err(|errors| Error::validation(&errors))?;
    let (role, read_only) = input
        .resolve_role()
        .map_err(|errors| Error::validation(&errors))?;

    let status = input.initial_status();
    let request = CreateUserRequest {
        email: input.normalized_email(),
        full_name: input.full_name.trim().to_owned(),
        role,
        read_only,
        send_invite: input.send_invite,
        status,
        invited_by: admin.id().clone(),
    };
    let created = state.admin_users.create_user(&request).await?;
    info!(
        user_id = %created.user_id,
        invited_by = %admin.id(),
        role = role.code(),
        "admin created user"
    );

    Ok(HttpResponse::Created().json(CreateUserResponse {
        user_id: created.user_id,
        status,
        portal: Portal::for_role(role),
        invite_link: created.invite_link,
        temporary_password: created.temporary_password,
    }))
}

/// Current role access matrix.
#[utoipa::path(
    get,
    path = "/api/admin/roles/permissions",
    responses(
        (status = 200, description = "Role access matrix", body = RoleAccessMatrix),
        (status = 401, description = "Not signed in", body = Error),
        (status = 403, description = "Not an administrator", body = Error),
        (status = 503, description = "Data service unavailable", body = Error)
    ),
    tags = ["admin"],
    operation_id = "getRoleAccessMatrix"
)]
#[get("/admin/roles/permissions")]
pub async fn get_permissions(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<RoleAccessMatrix>> {
    require_admin(&state, &session).await?;
    let rules = state.role_access.rules().await?;
    Ok(web::Json(role_access_matrix(&rules)))
}

/// Permission change submitted from the matrix editor.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PermissionChange {
    pub section: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub allowed: Option<bool>,
    /// `reset` drops every override of the section.
    #[serde(default)]
    pub action: Option<String>,
}

enum PermissionCommand {
    Upsert(RoleAccessRule),
    Reset(&'static str),
}

impl PermissionChange {
    fn into_command(self) -> ApiResult<PermissionCommand> {
        let Some(section) = AccessSection::by_id(self.section.trim()) else {
            return Err(field_error("section", "Unknown section"));
        };
        if !section.id.starts_with(EDITABLE_SECTION_PREFIX) {
            return Err(field_error("section", "Section does not accept manual changes"));
        }
        if self.action.as_deref().map(str::trim) == Some(RESET_ACTION) {
            return Ok(PermissionCommand::Reset(section.id));
        }
        let Some(role) = self.role.as_deref().and_then(AppRole::parse) else {
            return Err(field_error("role", "Unknown role"));
        };
        let Some(allowed) = self.allowed else {
            return Err(field_error("allowed", "Required"));
        };
        Ok(PermissionCommand::Upsert(RoleAccessRule::new(
            section.id,
            role.code(),
            allowed,
        )))
    }
}

/// Upsert or reset a section override and return the updated matrix.
#[utoipa::path(
    post,
    path = "/api/admin/roles/permissions",
    request_body = PermissionChange,
    responses(
        (status = 200, description = "Updated matrix", body = RoleAccessMatrix),
        (status = 400, description = "Unknown or locked section, unknown role", body = Error),
        (status = 401, description = "Not signed in", body = Error),
        (status = 403, description = "Not an administrator or read-only", body = Error),
        (status = 503, description = "Data service unavailable", body = Error)
    ),
    tags = ["admin"],
    operation_id = "updateRoleAccess"
)]
#[post("/admin/roles/permissions")]
pub async fn update_permissions(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PermissionChange>,
) -> ApiResult<web::Json<RoleAccessMatrix>> {
    let admin = require_admin(&state, &session).await?;
    if !admin.can_mutate() {
        return Err(Error::forbidden("read-only access"));
    }
    match payload.into_inner().into_command()? {
        PermissionCommand::Upsert(rule) => {
            state.role_access.upsert_rule(&rule).await?;
            info!(
                section = %rule.section,
                role = %rule.role,
                allowed = rule.allowed,
                admin = %admin.id(),
                "role access override stored"
            );
        }
        PermissionCommand::Reset(section) => {
            state.role_access.reset_section(section).await?;
            info!(section, admin = %admin.id(), "role access overrides reset");
        }
    }
    let rules = state.role_access.rules().await?;
    Ok(web::Json(role_access_matrix(&rules)))
}
