//! Admin user creation: payload schema and request types.
//!
//! [`AdminCreateUserInput::parse`] works on the raw JSON body so that type
//! mismatches are reported per field like any other violation.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use super::{AppRole, FieldErrors, Portal, UserId};

pub const FULL_NAME_MIN: usize = 2;
pub const FULL_NAME_MAX: usize = 200;
const LOCAL_PART_MAX: usize = 64;
const DOMAIN_MAX: usize = 255;

const REQUIRED: &str = "Required";
const FULL_NAME_TOO_SHORT: &str = "Full name must be at least 2 characters.";
const FULL_NAME_TOO_LONG: &str = "Full name must be at most 200 characters.";
const INVALID_EMAIL: &str = "Enter a valid email address.";
const SELECT_ROLE: &str = "Select a role.";
const UNKNOWN_ROLE: &str = "Unknown role.";

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"^[a-zA-Z0-9]([a-zA-Z0-9._%+-]*[a-zA-Z0-9])?@[a-zA-Z0-9]([a-zA-Z0-9.-]*[a-zA-Z0-9])?\.[a-zA-Z]{2,}$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Whether `email` looks like a deliverable address.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && local.len() <= LOCAL_PART_MAX
        && domain.len() <= DOMAIN_MAX
        && email_regex().is_match(email)
}

/// Requested role: a bare code or `{code, readOnly}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleSelection {
    pub code: String,
    #[serde(default)]
    pub read_only: bool,
}

/// Validated admin create-user payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCreateUserInput {
    pub full_name: String,
    pub email: String,
    pub role: Option<RoleSelection>,
    pub send_invite: bool,
}

impl AdminCreateUserInput {
    /// Validate a raw JSON payload.
    ///
    /// # Examples
    /// ```
    /// use portal_backend::domain::AdminCreateUserInput;
    /// use serde_json::json;
    ///
    /// let input = AdminCreateUserInput::parse(&json!({
    ///     "fullName": "Ann Lee",
    ///     "email": "a@b.com",
    ///     "role": "admin",
    /// }))
    /// .unwrap();
    /// assert!(input.send_invite);
    /// ```
    pub fn parse(payload: &Value) -> Result<Self, FieldErrors> {
        let empty = Map::new();
        let object = payload.as_object().unwrap_or(&empty);
        let mut errors = FieldErrors::default();

        let full_name = match object.get("fullName") {
            Some(Value::String(name)) => {
                let length = name.chars().count();
                if length < FULL_NAME_MIN {
                    errors.add("fullName", FULL_NAME_TOO_SHORT);
                } else if length > FULL_NAME_MAX {
                    errors.add("fullName", FULL_NAME_TOO_LONG);
                }
                name.clone()
            }
            Some(other) => {
                errors.add("fullName", expected("string", other));
                String::new()
            }
            None => {
                errors.add("fullName", REQUIRED);
                String::new()
            }
        };

        let email = match object.get("email") {
            Some(Value::String(email)) => {
                if !is_valid_email(email) {
                    errors.add("email", INVALID_EMAIL);
                }
                email.clone()
            }
            Some(other) => {
                errors.add("email", expected("string", other));
                String::new()
            }
            None => {
                errors.add("email", REQUIRED);
                String::new()
            }
        };

        let role = match object.get("role") {
            None | Some(Value::Null) => None,
            Some(Value::String(code)) => Some(RoleSelection {
                code: code.clone(),
                read_only: false,
            }),
            Some(value @ Value::Object(_)) => {
                match serde_json::from_value::<RoleSelection>(value.clone()) {
                    Ok(selection) => Some(selection),
                    Err(_) => {
                        errors.add("role", SELECT_ROLE);
                        None
                    }
                }
            }
            Some(other) => {
                errors.add("role", expected("string", other));
                None
            }
        };
        if role.as_ref().is_some_and(|selection| selection.code.is_empty()) {
            errors.add("role", SELECT_ROLE);
        }

        let send_invite = match object.get("sendInvite") {
            None | Some(Value::Null) => true,
            Some(Value::Bool(flag)) => *flag,
            Some(other) => {
                errors.add("sendInvite", expected("boolean", other));
                true
            }
        };

        errors.into_result(Self {
            full_name,
            email,
            role,
            send_invite,
        })
    }

    /// Trimmed, lower-cased e-mail.
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }

    /// Resolve the requested role, reporting a missing or unknown code.
    pub fn resolve_role(&self) -> Result<(AppRole, bool), FieldErrors> {
        let mut errors = FieldErrors::default();
        match &self.role {
            Some(selection) => match AppRole::parse(&selection.code) {
                Some(role) => return Ok((role, selection.read_only)),
                None => errors.add("role", UNKNOWN_ROLE),
            },
            None => errors.add("role", SELECT_ROLE),
        }
        Err(errors)
    }

    /// Status the new account starts in.
    pub fn initial_status(&self) -> AdminUserStatus {
        if self.send_invite {
            AdminUserStatus::Pending
        } else {
            AdminUserStatus::Active
        }
    }
}

fn expected(kind: &str, received: &Value) -> String {
    let received = match received {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    format!("Expected {kind}, received {received}")
}

/// Lifecycle state of an admin-created account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AdminUserStatus {
    /// Waiting for the invitee to accept.
    Pending,
    Active,
}

/// Command sent to the user directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserRequest {
    pub email: String,
    pub full_name: String,
    pub role: AppRole,
    pub read_only: bool,
    pub send_invite: bool,
    pub status: AdminUserStatus,
    pub invited_by: UserId,
}

/// Result of creating (or re-inviting) a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedUser {
    pub user_id: UserId,
    pub invite_link: Option<String>,
    pub temporary_password: Option<String>,
}

/// Response body of `POST /api/admin/users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserResponse {
    pub user_id: UserId,
    pub status: AdminUserStatus,
    pub portal: Portal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invite_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temporary_password: Option<String>,
}
