//! Identity of a signed-in user.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{AppRole, Portal, resolve_primary_role};

/// Validation errors returned by [`UserId::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserIdError {
    #[error("user id must not be empty")]
    Empty,
    #[error("user id must be a valid UUID")]
    Invalid,
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, format = Uuid)]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`].
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserIdError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(UserIdError::Empty);
        }
        if raw.trim() != raw {
            return Err(UserIdError::Invalid);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserIdError::Invalid)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// The authenticated identity resolved from the session cookie.
///
/// ## Invariants
/// - `roles` are deduplicated and in priority order.
/// - `primary_role` is the highest-priority entry of `roles`.
/// - `portals` lists every portal the roles admit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    id: UserId,
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    full_name: Option<String>,
    roles: Vec<AppRole>,
    read_only_roles: Vec<AppRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    primary_role: Option<AppRole>,
    portals: Vec<Portal>,
}

impl SessionUser {
    /// Build a session user, deriving the primary role and portals.
    pub fn new(
        id: UserId,
        email: impl Into<String>,
        full_name: Option<String>,
        roles: Vec<AppRole>,
        read_only_roles: Vec<AppRole>,
    ) -> Self {
        let roles = super::normalize_roles(roles.iter().map(|role| role.code()));
        let read_only_roles = read_only_roles
            .into_iter()
            .filter(|role| roles.contains(role))
            .collect();
        Self {
            primary_role: resolve_primary_role(&roles),
            portals: Portal::accessible_to(&roles),
            id,
            email: email.into(),
            full_name: full_name.filter(|name| !name.trim().is_empty()),
            roles,
            read_only_roles,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    pub fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }

    /// Name to show in page headers: the full name, else the e-mail.
    pub fn display_name(&self) -> &str {
        self.full_name().unwrap_or(self.email.as_str())
    }

    pub fn roles(&self) -> &[AppRole] {
        &self.roles
    }

    pub fn read_only_roles(&self) -> &[AppRole] {
        &self.read_only_roles
    }

    pub fn primary_role(&self) -> Option<AppRole> {
        self.primary_role
    }

    pub fn portals(&self) -> &[Portal] {
        &self.portals
    }

    pub fn has_role(&self, role: AppRole) -> bool {
        self.roles.contains(&role)
    }

    /// Whether the user may enter `portal`.
    pub fn can_enter(&self, portal: Portal) -> bool {
        self.portals.contains(&portal)
    }

    /// Roles that are not restricted to read-only access.
    pub fn writable_roles(&self) -> Vec<AppRole> {
        self.roles
            .iter()
            .copied()
            .filter(|role| !self.read_only_roles.contains(role))
            .collect()
    }

    /// Whether the user holds at least one writable role.
    pub fn can_mutate(&self) -> bool {
        !self.writable_roles().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const USER_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    fn user(roles: Vec<AppRole>, read_only: Vec<AppRole>) -> SessionUser {
        SessionUser::new(
            UserId::new(USER_ID).expect("fixture id"),
            "ada@example.com",
            Some("Ada Lovelace".to_owned()),
            roles,
            read_only,
        )
    }

    #[rstest]
    #[case("", UserIdError::Empty)]
    #[case("not-a-uuid", UserIdError::Invalid)]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserIdError::Invalid)]
    fn user_id_rejects_bad_input(#[case] raw: &str, #[case] expected: UserIdError) {
        assert_eq!(UserId::new(raw), Err(expected));
    }

    #[rstest]
    fn user_id_round_trips_display() {
        let id = UserId::new(USER_ID).expect("valid id");
        assert_eq!(id.to_string(), USER_ID);
    }

    #[rstest]
    fn derives_primary_role_and_portals() {
        let session_user = user(vec![AppRole::Client, AppRole::Support], vec![]);
        assert_eq!(session_user.roles(), &[AppRole::Support, AppRole::Client]);
        assert_eq!(session_user.primary_role(), Some(AppRole::Support));
        assert!(session_user.can_enter(Portal::Ops));
        assert!(session_user.can_enter(Portal::Client));
        assert!(!session_user.can_enter(Portal::Admin));
    }

    #[rstest]
    fn read_only_roles_limit_mutation() {
        let read_only = user(vec![AppRole::Finance], vec![AppRole::Finance]);
        assert!(!read_only.can_mutate());

        let mixed = user(
            vec![AppRole::Finance, AppRole::Support],
            vec![AppRole::Finance],
        );
        assert_eq!(mixed.writable_roles(), vec![AppRole::Support]);
        assert!(mixed.can_mutate());
    }

    #[rstest]
    fn users_without_roles_cannot_mutate() {
        let session_user = user(vec![], vec![]);
        assert!(!session_user.can_mutate());
        assert!(session_user.portals().is_empty());
        assert_eq!(session_user.primary_role(), None);
    }

    #[rstest]
    fn display_name_falls_back_to_email() {
        let session_user = SessionUser::new(
            UserId::random(),
            "ops@fastlease.ae",
            Some("  ".to_owned()),
            vec![AppRole::OpManager],
            vec![],
        );
        assert_eq!(session_user.display_name(), "ops@fastlease.ae");
    }
}
