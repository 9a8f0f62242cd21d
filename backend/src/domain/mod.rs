//! Domain primitives, policies and ports.
//!
//! Purpose: hold the portal rules (roles, portals, access sections, session
//! gating, portal detection) and the small utilities pages rely on, free of
//! HTTP and data-service concerns.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic error payload.
//! - AppRole / Portal: role and portal catalogues.
//! - SessionGate / SessionResult: protected-route gating.
//! - AccessPolicy: section access with stored overrides.
//! - ports: traits implemented by outbound adapters.

pub mod access;
pub mod admin_users;
pub mod auth;
pub mod error;
pub mod options;
pub mod portal;
pub mod portal_resolution;
pub mod ports;
pub mod profile;
pub mod role;
pub mod session;
pub mod theme;
pub mod trace_id;
pub mod user;
pub mod validation;

pub use self::access::{
    ACCESS_SECTIONS, AccessDecision, AccessPolicy, AccessSection, MatrixGroup, MatrixSection,
    RoleAccessMatrix, RoleAccessRule, is_access_allowed, overridden_roles,
    resolve_section_for_path, role_access_matrix,
};
pub use self::admin_users::{
    AdminCreateUserInput, AdminUserStatus, CreateUserRequest, CreateUserResponse, CreatedUser,
    RoleSelection, is_valid_email,
};
pub use self::auth::{AuthenticatedUser, LoginCredentials, LoginValidationError};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::options::{
    CLIENT_DOCUMENT_TYPES, Collation, DEFAULT_LOCALE, LabelledOption, OTHER_VALUE, SelectOption,
    client_document_options, sort_options,
};
pub use self::portal::{Portal, UnknownPortal};
pub use self::portal_resolution::{PortalDetection, infer_portal_for_email, sanitize_next_path};
pub use self::profile::{DEFAULT_TIMEZONE, ProfilePageData, ProfileRecord};
pub use self::role::{
    AppRole, normalize_roles, resolve_home_path, resolve_primary_role, roles_from_metadata,
};
pub use self::session::{LOGIN_PATH, SessionGate, SessionResult, login_redirect};
pub use self::theme::{RenderEnvironment, read_css_variable};
pub use self::trace_id::TraceId;
pub use self::user::{SessionUser, UserId, UserIdError};
pub use self::validation::FieldErrors;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use portal_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
