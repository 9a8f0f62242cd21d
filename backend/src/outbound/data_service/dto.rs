//! DTOs for PostgREST rows and GoTrue payloads.
//!
//! Adapters decode into these transport shapes first, then convert into
//! domain records in one pass.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{
    AdminUserStatus, AppRole, AuthenticatedUser, ProfileRecord, RoleAccessRule, UserId,
    roles_from_metadata,
};

#[derive(Debug, Deserialize)]
pub(super) struct UserRoleRowDto {
    pub(super) role: String,
    #[serde(default)]
    pub(super) read_only: Option<bool>,
}

/// Split role rows into `(roles, read_only_roles)`; unknown codes are dropped.
pub(super) fn split_role_rows(rows: Vec<UserRoleRowDto>) -> (Vec<AppRole>, Vec<AppRole>) {
    let mut roles = Vec::with_capacity(rows.len());
    let mut read_only = Vec::new();
    for row in rows {
        let Some(role) = AppRole::parse(&row.role) else {
            continue;
        };
        roles.push(role);
        if row.read_only.unwrap_or(false) {
            read_only.push(role);
        }
    }
    (roles, read_only)
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct ProfileRowDto {
    #[serde(default)]
    pub(super) full_name: Option<String>,
    #[serde(default)]
    pub(super) phone: Option<String>,
    #[serde(default)]
    pub(super) timezone: Option<String>,
}

impl From<ProfileRowDto> for ProfileRecord {
    fn from(row: ProfileRowDto) -> Self {
        Self {
            full_name: row.full_name,
            phone: row.phone,
            timezone: row.timezone,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct RoleAccessRuleRowDto {
    pub(super) section: String,
    pub(super) role: String,
    pub(super) allowed: bool,
}

impl From<RoleAccessRuleRowDto> for RoleAccessRule {
    fn from(row: RoleAccessRuleRowDto) -> Self {
        Self::new(row.section, row.role, row.allowed)
    }
}

impl From<&RoleAccessRule> for RoleAccessRuleRowDto {
    fn from(rule: &RoleAccessRule) -> Self {
        Self {
            section: rule.section.clone(),
            role: rule.role.clone(),
            allowed: rule.allowed,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct AuthUserDto {
    pub(super) id: String,
    #[serde(default)]
    pub(super) email: Option<String>,
    #[serde(default)]
    pub(super) app_metadata: Option<Value>,
    #[serde(default)]
    pub(super) user_metadata: Option<Value>,
}

impl AuthUserDto {
    pub(super) fn user_id(&self) -> Result<UserId, String> {
        UserId::new(&self.id).map_err(|err| format!("auth user id {:?}: {err}", self.id))
    }

    pub(super) fn metadata_roles(&self) -> Vec<AppRole> {
        roles_from_metadata(self.app_metadata.as_ref(), self.user_metadata.as_ref())
    }

    pub(super) fn full_name(&self) -> Option<String> {
        self.user_metadata
            .as_ref()
            .and_then(|metadata| metadata.get("full_name"))
            .and_then(Value::as_str)
            .map(str::to_owned)
    }

    pub(super) fn into_authenticated(self, fallback_email: &str) -> Result<AuthenticatedUser, String> {
        let id = self.user_id()?;
        let roles = self.metadata_roles();
        Ok(AuthenticatedUser {
            id,
            email: self.email.unwrap_or_else(|| fallback_email.to_owned()),
            roles,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct TokenResponseDto {
    pub(super) user: AuthUserDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct AdminUserListDto {
    #[serde(default)]
    pub(super) users: Vec<AuthUserDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GenerateLinkDto {
    #[serde(default)]
    pub(super) action_link: Option<String>,
    #[serde(default)]
    pub(super) properties: Option<GenerateLinkPropertiesDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GenerateLinkPropertiesDto {
    #[serde(default)]
    pub(super) action_link: Option<String>,
}

impl GenerateLinkDto {
    pub(super) fn into_link(self) -> Option<String> {
        self.properties
            .and_then(|properties| properties.action_link)
            .or(self.action_link)
    }
}

#[derive(Debug, Serialize)]
pub(super) struct ProfileUpsertDto<'a> {
    pub(super) user_id: String,
    pub(super) full_name: &'a str,
    pub(super) status: AdminUserStatus,
    pub(super) metadata: Value,
}

#[derive(Debug, Serialize)]
pub(super) struct UserRoleInsertDto {
    pub(super) user_id: String,
    pub(super) role: &'static str,
    pub(super) read_only: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn role_rows_keep_known_codes_and_flags() {
        let rows: Vec<UserRoleRowDto> = serde_json::from_value(json!([
            { "role": "op_manager", "read_only": true },
            { "role": "FINANCE" },
            { "role": "JANITOR", "read_only": true },
        ]))
        .expect("rows decode");
        let (roles, read_only) = split_role_rows(rows);
        assert_eq!(roles, vec![AppRole::OpManager, AppRole::Finance]);
        assert_eq!(read_only, vec![AppRole::OpManager]);
    }

    #[rstest]
    fn auth_user_reads_roles_from_both_metadata_objects() {
        let user: AuthUserDto = serde_json::from_value(json!({
            "id": "22222222-2222-2222-2222-222222222222",
            "email": "investor@investor.example",
            "app_metadata": { "roles": ["INVESTOR"] },
            "user_metadata": { "primary_role": "client", "full_name": "Ivan" }
        }))
        .expect("user decodes");
        assert_eq!(user.metadata_roles(), vec![AppRole::Investor, AppRole::Client]);
        assert_eq!(user.full_name().as_deref(), Some("Ivan"));
    }

    #[rstest]
    #[case(json!({ "properties": { "action_link": "https://a" }, "action_link": "https://b" }), Some("https://a"))]
    #[case(json!({ "action_link": "https://b" }), Some("https://b"))]
    #[case(json!({}), None)]
    fn generate_link_prefers_properties(#[case] body: Value, #[case] expected: Option<&str>) {
        let dto: GenerateLinkDto = serde_json::from_value(body).expect("decodes");
        assert_eq!(dto.into_link().as_deref(), expected);
    }
}
