//! Portal detection during login.
//!
//! A signed-up user carries role codes in their auth metadata. When those
//! are present the primary role decides the portal; otherwise the e-mail
//! domain is used as a hint.

use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use super::{AppRole, Portal, resolve_home_path, resolve_primary_role, roles_from_metadata};

const INTERNAL_DOMAIN: &str = "fastlease.ae";
const DEFAULT_PORTAL: Portal = Portal::Client;

/// Portal guess derived from an e-mail address alone.
///
/// # Examples
/// ```
/// use portal_backend::domain::{Portal, infer_portal_for_email};
///
/// assert_eq!(infer_portal_for_email("ops@fastlease.ae"), Portal::Ops);
/// assert_eq!(infer_portal_for_email("ceo@investor-holdings.com"), Portal::Investor);
/// assert_eq!(infer_portal_for_email("driver@example.com"), Portal::Client);
/// ```
pub fn infer_portal_for_email(email: &str) -> Portal {
    let domain = email
        .split('@')
        .nth(1)
        .map(str::to_lowercase)
        .unwrap_or_default();
    if domain.is_empty() {
        DEFAULT_PORTAL
    } else if domain.ends_with(INTERNAL_DOMAIN) {
        Portal::Ops
    } else if domain.contains("investor") {
        Portal::Investor
    } else {
        DEFAULT_PORTAL
    }
}

/// Outcome of portal detection for one identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PortalDetection {
    pub portal: Portal,
    pub roles: Vec<AppRole>,
    pub preferred_role: Option<AppRole>,
}

impl PortalDetection {
    /// Detect from already-normalised roles, falling back to the e-mail hint.
    pub fn from_roles(roles: Vec<AppRole>, email: &str) -> Self {
        let preferred_role = resolve_primary_role(&roles);
        let portal = preferred_role.map_or_else(|| infer_portal_for_email(email), Portal::for_role);
        Self {
            portal,
            roles,
            preferred_role,
        }
    }

    /// Detect from raw auth metadata objects.
    pub fn from_metadata(
        app_metadata: Option<&Value>,
        user_metadata: Option<&Value>,
        email: &str,
    ) -> Self {
        Self::from_roles(roles_from_metadata(app_metadata, user_metadata), email)
    }

    /// Where to send the user after login.
    ///
    /// An explicit, non-blank `next` path wins, then the preferred role's
    /// home, then the home path of the role set, then the portal home.
    pub fn redirect_path(&self, next: Option<&str>) -> String {
        if let Some(next) = next.map(str::trim).filter(|next| !next.is_empty()) {
            return next.to_owned();
        }
        if let Some(role) = self.preferred_role {
            return role.home_path().to_owned();
        }
        let portal_home = self.portal.home_path();
        resolve_home_path(&self.roles, &portal_home).to_owned()
    }
}

/// Accept only same-site relative paths as login redirect targets.
pub fn sanitize_next_path(next: Option<&str>) -> Option<&str> {
    next.map(str::trim)
        .filter(|path| path.starts_with('/') && !path.starts_with("//") && !path.contains('\\'))
}
