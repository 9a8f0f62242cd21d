//! Session gating for protected pages.
//!
//! Handlers never short-circuit on a missing session themselves; they ask
//! [`SessionGate`] and branch on the returned [`SessionResult`].

use std::sync::Arc;

use tracing::{debug, warn};
use url::form_urlencoded;

use super::ports::SessionLookup;
use super::{Error, Portal, SessionUser, UserId};

/// Generic login entry point used when no portal is implied.
pub const LOGIN_PATH: &str = "/login";

/// Outcome of resolving the session for a protected route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionResult {
    Authenticated(SessionUser),
    /// No usable session; redirect to `login_path`.
    Unauthenticated { login_path: String },
}

impl SessionResult {
    pub fn user(&self) -> Option<&SessionUser> {
        match self {
            Self::Authenticated(user) => Some(user),
            Self::Unauthenticated { .. } => None,
        }
    }
}

/// Append a `next` query parameter to `base`.
///
/// # Examples
/// ```
/// use portal_backend::domain::login_redirect;
///
/// assert_eq!(
///     login_redirect("/login/ops", Some("/ops/cars?page=2")),
///     "/login/ops?next=%2Fops%2Fcars%3Fpage%3D2",
/// );
/// assert_eq!(login_redirect("/login", None), "/login");
/// ```
pub fn login_redirect(base: &str, next: Option<&str>) -> String {
    match next.filter(|path| !path.is_empty()) {
        Some(path) => {
            let query: String = form_urlencoded::Serializer::new(String::new())
                .append_pair("next", path)
                .finish();
            format!("{base}?{query}")
        }
        None => base.to_owned(),
    }
}

/// Resolves the user behind a session cookie and decides whether they may
/// see a protected route.
#[derive(Clone)]
pub struct SessionGate {
    lookup: Arc<dyn SessionLookup>,
}

impl SessionGate {
    pub fn new(lookup: Arc<dyn SessionLookup>) -> Self {
        Self { lookup }
    }

    /// Resolve the session user for a raw cookie value.
    ///
    /// A malformed id counts as no session. Lookup failures are surfaced as
    /// [`ErrorCode::ServiceUnavailable`](super::ErrorCode::ServiceUnavailable).
    pub async fn current_user(&self, raw_user_id: Option<&str>) -> Result<Option<SessionUser>, Error> {
        let Some(raw) = raw_user_id else {
            return Ok(None);
        };
        let user_id = match UserId::new(raw) {
            Ok(id) => id,
            Err(error) => {
                warn!(%error, "ignoring malformed user id in session cookie");
                return Ok(None);
            }
        };
        self.lookup.session_user(&user_id).await.map_err(|error| {
            warn!(user_id = %user_id, %error, "session lookup failed");
            Error::service_unavailable("session could not be resolved")
        })
    }

    /// Redirecting form: any authenticated user passes, others are sent to
    /// the generic login page with `return_path` as `next`.
    pub async fn require_session(
        &self,
        raw_user_id: Option<&str>,
        return_path: &str,
    ) -> Result<SessionResult, Error> {
        Ok(match self.current_user(raw_user_id).await? {
            Some(user) => SessionResult::Authenticated(user),
            None => SessionResult::Unauthenticated {
                login_path: login_redirect(LOGIN_PATH, Some(return_path)),
            },
        })
    }

    /// Requiring form: the user must exist and be admitted to `portal`.
    ///
    /// `return_path` defaults to the portal home path.
    pub async fn require_portal_session(
        &self,
        raw_user_id: Option<&str>,
        portal: Portal,
        return_path: Option<&str>,
    ) -> Result<SessionResult, Error> {
        let next = return_path.map_or_else(|| portal.home_path(), str::to_owned);
        let unauthenticated = || SessionResult::Unauthenticated {
            login_path: login_redirect(&portal.login_path(), Some(&next)),
        };
        Ok(match self.current_user(raw_user_id).await? {
            Some(user) if user.can_enter(portal) => SessionResult::Authenticated(user),
            Some(user) => {
                debug!(user_id = %user.id(), portal = %portal, "portal not open to user");
                unauthenticated()
            }
            None => unauthenticated(),
        })
    }
}

#[cfg(test)]
mod tests;
